//! Request boundary.
//!
//! One request in, one response out. Each call takes a fresh bank snapshot
//! from the store, runs a pure computation over it, and converts every
//! failure into an error response.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use tracing::Instrument;
use uuid::Uuid;

use crate::analysis::{analyze_topics, TopicReport};
use crate::bank::ItemBank;
use crate::error::EngineError;
use crate::estimator::{estimate_ability, standard_error};
use crate::model::{ItemId, ItemResponse, Recommendation};
use crate::selector::select_item;
use crate::traits::ItemBankStore;

/// A single command sent to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "kebab-case")]
pub enum Request {
    /// Re-estimate ability from a response history.
    #[serde(alias = "calculate_theta")]
    EstimateAbility {
        #[serde(default)]
        current_theta: f64,
        #[serde(default, deserialize_with = "null_as_empty")]
        history: Vec<ItemResponse>,
    },
    /// Choose the next item to present.
    #[serde(alias = "recommend")]
    RecommendItem {
        #[serde(default)]
        current_theta: f64,
        #[serde(default, deserialize_with = "null_as_empty")]
        answered_ids: Vec<ItemId>,
        #[serde(default, deserialize_with = "null_as_empty")]
        weak_topics: Vec<String>,
    },
    /// Break a response history down by topic.
    AnalyzeTopics {
        #[serde(default, deserialize_with = "null_as_empty")]
        history: Vec<ItemResponse>,
    },
}

/// An explicit `null` list is treated like an absent one.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Request {
    /// Wire name of the command.
    pub fn command(&self) -> &'static str {
        match self {
            Request::EstimateAbility { .. } => "estimate-ability",
            Request::RecommendItem { .. } => "recommend-item",
            Request::AnalyzeTopics { .. } => "analyze-topics",
        }
    }
}

/// The engine's reply. Serialized without a tag; the shape identifies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Response {
    Error {
        error: String,
    },
    Ability {
        new_theta: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        standard_error: Option<f64>,
    },
    Topics(TopicReport),
    // Last: an absent `item` key would otherwise match any object.
    Recommendation {
        item: Option<Recommendation>,
    },
}

impl Response {
    pub fn error(message: impl std::fmt::Display) -> Self {
        Response::Error {
            error: message.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Response::Error { .. })
    }
}

/// Parse a raw JSON payload into a [`Request`].
pub fn parse_request(raw: &str) -> Result<Request, EngineError> {
    serde_json::from_str(raw).map_err(|e| EngineError::MalformedRequest(e.to_string()))
}

/// Run a request against a bank snapshot.
pub fn dispatch(request: &Request, bank: &ItemBank) -> Result<Response, EngineError> {
    match request {
        Request::EstimateAbility {
            current_theta,
            history,
        } => {
            ensure_finite(*current_theta)?;
            let new_theta = estimate_ability(*current_theta, history, bank);
            Ok(Response::Ability {
                new_theta,
                standard_error: standard_error(new_theta, history, bank),
            })
        }
        Request::RecommendItem {
            current_theta,
            answered_ids,
            weak_topics,
        } => {
            ensure_finite(*current_theta)?;
            let answered: HashSet<ItemId> = answered_ids.iter().cloned().collect();
            Ok(Response::Recommendation {
                item: select_item(*current_theta, &answered, bank, weak_topics),
            })
        }
        Request::AnalyzeTopics { history } => Ok(Response::Topics(analyze_topics(history, bank))),
    }
}

fn ensure_finite(theta: f64) -> Result<(), EngineError> {
    if theta.is_finite() {
        Ok(())
    } else {
        Err(EngineError::MalformedRequest(format!(
            "current_theta must be a finite number, got {theta}"
        )))
    }
}

/// The CAT engine: a store handle and nothing else. Holds no state between
/// requests, so one instance can serve any number of concurrent callers.
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn ItemBankStore>,
}

impl Engine {
    pub fn new(store: Arc<dyn ItemBankStore>) -> Self {
        Self { store }
    }

    /// Handle a raw JSON payload. Never fails; errors become
    /// [`Response::Error`].
    pub async fn handle_json(&self, raw: &str) -> Response {
        match parse_request(raw) {
            Ok(request) => self.handle(request).await,
            Err(e) => {
                tracing::warn!("rejecting request: {e}");
                Response::error(e)
            }
        }
    }

    /// Handle a parsed request. Never fails; errors become
    /// [`Response::Error`].
    pub async fn handle(&self, request: Request) -> Response {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!(
            "request",
            %request_id,
            command = request.command(),
            store = self.store.name()
        );

        async move {
            match self.try_handle(&request).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::error!(transient = e.is_transient(), "request failed: {e}");
                    Response::error(e)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn try_handle(&self, request: &Request) -> Result<Response, EngineError> {
        let bank = self
            .store
            .snapshot()
            .await
            .map_err(|e| EngineError::BankUnavailable(format!("{e:#}")))?;
        tracing::debug!(items = bank.len(), "loaded bank snapshot");
        dispatch(request, &bank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Item;
    use async_trait::async_trait;

    struct FixedStore(Vec<Item>);

    #[async_trait]
    impl ItemBankStore for FixedStore {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn snapshot(&self) -> anyhow::Result<ItemBank> {
            Ok(ItemBank::new(self.0.clone()))
        }
    }

    struct DownStore;

    #[async_trait]
    impl ItemBankStore for DownStore {
        fn name(&self) -> &str {
            "down"
        }

        async fn snapshot(&self) -> anyhow::Result<ItemBank> {
            anyhow::bail!("connection refused")
        }
    }

    fn engine() -> Engine {
        Engine::new(Arc::new(FixedStore(vec![
            Item::new(1, "algebra", -1.0),
            Item::new(2, "algebra", 0.0),
            Item::new(3, "geometry", 1.0),
        ])))
    }

    #[test]
    fn parse_commands_with_defaults() {
        let req = parse_request(r#"{"command": "estimate-ability"}"#).unwrap();
        assert_eq!(
            req,
            Request::EstimateAbility {
                current_theta: 0.0,
                history: vec![]
            }
        );

        let req = parse_request(r#"{"command": "recommend-item", "current_theta": 1}"#).unwrap();
        assert_eq!(req.command(), "recommend-item");
        assert!(matches!(
            req,
            Request::RecommendItem { current_theta, .. } if current_theta == 1.0
        ));
    }

    #[test]
    fn parse_legacy_command_names() {
        let req = parse_request(r#"{"command": "calculate_theta", "history": []}"#).unwrap();
        assert_eq!(req.command(), "estimate-ability");
        let req = parse_request(r#"{"command": "recommend"}"#).unwrap();
        assert_eq!(req.command(), "recommend-item");
    }

    #[test]
    fn parse_null_lists_as_empty() {
        let req = parse_request(
            r#"{"command": "recommend-item", "answered_ids": null, "weak_topics": null}"#,
        )
        .unwrap();
        assert_eq!(
            req,
            Request::RecommendItem {
                current_theta: 0.0,
                answered_ids: vec![],
                weak_topics: vec![],
            }
        );

        let req = parse_request(r#"{"command": "analyze-topics", "history": null}"#).unwrap();
        assert_eq!(req, Request::AnalyzeTopics { history: vec![] });
    }

    #[test]
    fn parse_rejects_unknown_and_malformed() {
        assert!(parse_request(r#"{"command": "explode"}"#).is_err());
        assert!(parse_request(r#"{"current_theta": 0}"#).is_err());
        assert!(parse_request("not json").is_err());
    }

    #[test]
    fn response_shapes() {
        let json = serde_json::to_value(Response::Recommendation { item: None }).unwrap();
        assert_eq!(json, serde_json::json!({ "item": null }));

        let json = serde_json::to_value(Response::Ability {
            new_theta: 0.5,
            standard_error: None,
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "new_theta": 0.5 }));

        let json = serde_json::to_value(Response::error("boom")).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "boom" }));
    }

    #[test]
    fn response_round_trips_by_shape() {
        let back: Response = serde_json::from_str(r#"{"error": "x"}"#).unwrap();
        assert!(back.is_error());
        let back: Response = serde_json::from_str(r#"{"item": null}"#).unwrap();
        assert_eq!(back, Response::Recommendation { item: None });
    }

    #[tokio::test]
    async fn recommend_through_engine() {
        let response = engine()
            .handle_json(r#"{"command": "recommend-item", "current_theta": 0}"#)
            .await;
        let Response::Recommendation { item: Some(item) } = response else {
            panic!("unexpected response: {response:?}");
        };
        assert_eq!(item.id, ItemId::from(2));
    }

    #[tokio::test]
    async fn estimate_through_engine() {
        let response = engine()
            .handle_json(
                r#"{"command": "estimate-ability", "current_theta": 0,
                    "history": [{"id": 1, "correct": true}, {"id": 2, "correct": true}, {"id": 3, "correct": true}]}"#,
            )
            .await;
        let Response::Ability {
            new_theta,
            standard_error,
        } = response
        else {
            panic!("unexpected response: {response:?}");
        };
        assert!(new_theta > 0.0);
        assert!(standard_error.is_some());
    }

    #[tokio::test]
    async fn null_history_resets_theta() {
        let response = engine()
            .handle_json(r#"{"command": "estimate-ability", "current_theta": 1.5, "history": null}"#)
            .await;
        assert_eq!(
            response,
            Response::Ability {
                new_theta: 0.0,
                standard_error: None
            }
        );
    }

    #[tokio::test]
    async fn float_answered_ids_match_integer_items() {
        let response = engine()
            .handle_json(
                r#"{"command": "recommend-item", "answered_ids": [2.0], "weak_topics": null}"#,
            )
            .await;
        let Response::Recommendation { item: Some(item) } = response else {
            panic!("unexpected response: {response:?}");
        };
        assert_eq!(item.id, ItemId::from(1));
    }

    #[tokio::test]
    async fn malformed_request_becomes_error() {
        let response = engine().handle_json("{").await;
        assert!(response.is_error());
    }

    #[tokio::test]
    async fn unavailable_bank_becomes_error() {
        let engine = Engine::new(Arc::new(DownStore));
        let response = engine
            .handle(Request::RecommendItem {
                current_theta: 0.0,
                answered_ids: vec![],
                weak_topics: vec![],
            })
            .await;
        let Response::Error { error } = response else {
            panic!("expected error response");
        };
        assert!(error.contains("item bank unavailable"));
        assert!(error.contains("connection refused"));
    }

    #[tokio::test]
    async fn engine_stays_usable_after_failure() {
        let engine = engine();
        assert!(engine.handle_json("[]").await.is_error());
        assert!(!engine
            .handle_json(r#"{"command": "analyze-topics"}"#)
            .await
            .is_error());
    }

    #[test]
    fn non_finite_theta_is_rejected() {
        let bank = ItemBank::default();
        let request = Request::EstimateAbility {
            current_theta: f64::NAN,
            history: vec![],
        };
        assert!(dispatch(&request, &bank).is_err());
    }
}
