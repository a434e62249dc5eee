//! Core data model types for adaptest.
//!
//! Items come from the item bank store, responses from the caller's payload.
//! Everything here is constructed per request and dropped afterwards.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Display label used when an item record carries no difficulty label.
pub const DEFAULT_DIFFICULTY_LEVEL: &str = "Medium";

/// Identifier of an item in the bank.
///
/// Banks exported from different stores use either integer or string ids.
/// The id keeps whichever shape it arrived in, so it is echoed back to the
/// caller unchanged. `1` and `"1"` are different identifiers, but `1.0`
/// is read as `1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{n}"),
            ItemId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ItemIdVisitor)
    }
}

struct ItemIdVisitor;

impl<'de> Visitor<'de> for ItemIdVisitor {
    type Value = ItemId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an integer or string item id")
    }

    fn visit_i64<E: de::Error>(self, n: i64) -> Result<ItemId, E> {
        Ok(ItemId::Number(n))
    }

    fn visit_u64<E: de::Error>(self, n: u64) -> Result<ItemId, E> {
        i64::try_from(n)
            .map(ItemId::Number)
            .map_err(|_| E::custom(format!("item id {n} is out of range")))
    }

    // Some exporters write integer ids as floats.
    fn visit_f64<E: de::Error>(self, n: f64) -> Result<ItemId, E> {
        if n.fract() == 0.0 && n >= i64::MIN as f64 && n < i64::MAX as f64 {
            Ok(ItemId::Number(n as i64))
        } else {
            Err(E::custom(format!("item id {n} is not an integer")))
        }
    }

    fn visit_str<E: de::Error>(self, s: &str) -> Result<ItemId, E> {
        Ok(ItemId::Text(s.to_string()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> Result<ItemId, E> {
        Ok(ItemId::Text(s))
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Number(n)
    }
}

impl From<i32> for ItemId {
    fn from(n: i32) -> Self {
        ItemId::Number(n.into())
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Text(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::Text(s)
    }
}

impl ItemId {
    /// Parse a command-line token: integers become numeric ids, anything
    /// else is a text id.
    pub fn parse_token(token: &str) -> Self {
        let token = token.trim();
        match token.parse::<i64>() {
            Ok(n) => ItemId::Number(n),
            Err(_) => ItemId::Text(token.to_string()),
        }
    }
}

/// A single item record from the item bank.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Unique identifier.
    #[serde(rename = "question_id", alias = "id")]
    pub id: ItemId,
    /// Category label used for remediation filtering. Null or non-text
    /// values become empty.
    #[serde(default, deserialize_with = "deserialize_topic")]
    pub topic: String,
    /// 3PL difficulty parameter `b`. Missing or unparsable values become 0.0.
    #[serde(
        rename = "irt_difficulty_b",
        alias = "b",
        default,
        deserialize_with = "deserialize_difficulty"
    )]
    pub difficulty_b: f64,
    /// Free-form display label.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_label"
    )]
    pub difficulty_level: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<ItemId>, topic: impl Into<String>, difficulty_b: f64) -> Self {
        Self {
            id: id.into(),
            topic: topic.into(),
            difficulty_b: sanitize_difficulty(difficulty_b),
            difficulty_level: None,
        }
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.difficulty_level = Some(level.into());
        self
    }

    /// The display label, falling back to [`DEFAULT_DIFFICULTY_LEVEL`].
    pub fn level_or_default(&self) -> &str {
        self.difficulty_level
            .as_deref()
            .unwrap_or(DEFAULT_DIFFICULTY_LEVEL)
    }
}

fn sanitize_difficulty(b: f64) -> f64 {
    if b.is_finite() {
        b
    } else {
        0.0
    }
}

/// Accepts numbers, numeric strings, null, or anything else; yields a finite
/// difficulty in every case.
fn deserialize_difficulty<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawDifficulty {
        Number(f64),
        Text(String),
        Other(serde::de::IgnoredAny),
    }

    let raw = Option::<RawDifficulty>::deserialize(deserializer)?;
    let value = match raw {
        Some(RawDifficulty::Number(n)) => n,
        Some(RawDifficulty::Text(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        Some(RawDifficulty::Other(_)) | None => 0.0,
    };
    Ok(sanitize_difficulty(value))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLabel {
    Text(String),
    Integer(i64),
    Float(f64),
    Other(serde::de::IgnoredAny),
}

impl RawLabel {
    fn into_text(self) -> Option<String> {
        match self {
            RawLabel::Text(s) => Some(s),
            RawLabel::Integer(n) => Some(n.to_string()),
            RawLabel::Float(n) => Some(n.to_string()),
            RawLabel::Other(_) => None,
        }
    }
}

/// Numbers are rendered as text; null, booleans and containers are dropped.
fn deserialize_label<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RawLabel>::deserialize(deserializer)?.and_then(RawLabel::into_text))
}

fn deserialize_topic<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_label(deserializer)?.unwrap_or_default())
}

/// One answered item in a learner's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemResponse {
    /// Identifier of the answered item.
    pub id: ItemId,
    /// Whether the answer was correct.
    pub correct: bool,
}

impl ItemResponse {
    pub fn new(id: impl Into<ItemId>, correct: bool) -> Self {
        Self {
            id: id.into(),
            correct,
        }
    }
}

/// The item handed back to the caller by the selector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: ItemId,
    pub topic: String,
    pub difficulty_level: String,
}

impl From<&Item> for Recommendation {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            topic: item.topic.clone(),
            difficulty_level: item.level_or_default().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_id_keeps_shape() {
        let n: ItemId = serde_json::from_str("7").unwrap();
        let s: ItemId = serde_json::from_str("\"q-7\"").unwrap();
        assert_eq!(n, ItemId::Number(7));
        assert_eq!(s, ItemId::Text("q-7".into()));
        assert_eq!(serde_json::to_string(&n).unwrap(), "7");
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"q-7\"");
        assert_ne!(ItemId::from(1), ItemId::from("1"));
    }

    #[test]
    fn item_id_accepts_integral_floats() {
        let id: ItemId = serde_json::from_str("1.0").unwrap();
        assert_eq!(id, ItemId::Number(1));
        let ids: Vec<ItemId> = serde_json::from_str(r#"[2.0, 3, "4"]"#).unwrap();
        assert_eq!(ids, vec![ItemId::from(2), ItemId::from(3), ItemId::from("4")]);

        assert!(serde_json::from_str::<ItemId>("1.5").is_err());
        assert!(serde_json::from_str::<ItemId>("null").is_err());
        assert!(serde_json::from_str::<ItemId>("18446744073709551615").is_err());
    }

    #[test]
    fn null_or_odd_labels_fall_back() {
        let item: Item = serde_json::from_str(
            r#"{"question_id": 1, "topic": null, "difficulty_level": null}"#,
        )
        .unwrap();
        assert_eq!(item.topic, "");
        assert_eq!(item.level_or_default(), "Medium");

        let item: Item = serde_json::from_str(
            r#"{"question_id": 2, "topic": ["a"], "difficulty_level": 2}"#,
        )
        .unwrap();
        assert_eq!(item.topic, "");
        assert_eq!(item.difficulty_level.as_deref(), Some("2"));

        let item: Item =
            serde_json::from_str(r#"{"question_id": 3, "topic": "algebra", "difficulty_level": false}"#)
                .unwrap();
        assert_eq!(item.topic, "algebra");
        assert!(item.difficulty_level.is_none());
    }

    #[test]
    fn parse_token_prefers_integers() {
        assert_eq!(ItemId::parse_token("12"), ItemId::Number(12));
        assert_eq!(ItemId::parse_token(" alg-3 "), ItemId::Text("alg-3".into()));
    }

    #[test]
    fn difficulty_defaults_when_missing() {
        let item: Item = serde_json::from_str(r#"{"question_id": 1, "topic": "algebra"}"#).unwrap();
        assert_eq!(item.difficulty_b, 0.0);
        assert_eq!(item.level_or_default(), "Medium");
    }

    #[test]
    fn difficulty_defaults_when_unparsable() {
        let cases = [
            r#"{"question_id": 1, "irt_difficulty_b": null}"#,
            r#"{"question_id": 1, "irt_difficulty_b": "hard"}"#,
            r#"{"question_id": 1, "irt_difficulty_b": true}"#,
            r#"{"question_id": 1, "irt_difficulty_b": [1, 2]}"#,
            r#"{"question_id": 1, "irt_difficulty_b": "NaN"}"#,
        ];
        for raw in cases {
            let item: Item = serde_json::from_str(raw).unwrap();
            assert_eq!(item.difficulty_b, 0.0, "input: {raw}");
        }
    }

    #[test]
    fn difficulty_accepts_numeric_strings_and_aliases() {
        let item: Item =
            serde_json::from_str(r#"{"id": "x", "topic": "t", "b": " -1.25 "}"#).unwrap();
        assert_eq!(item.id, ItemId::Text("x".into()));
        assert!((item.difficulty_b + 1.25).abs() < f64::EPSILON);

        let item: Item = serde_json::from_str(r#"{"question_id": 2, "irt_difficulty_b": 1}"#).unwrap();
        assert!((item.difficulty_b - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn recommendation_uses_default_label() {
        let item = Item::new(3, "geometry", 1.0);
        let rec = Recommendation::from(&item);
        assert_eq!(rec.difficulty_level, "Medium");

        let rec = Recommendation::from(&item.with_level("vd"));
        assert_eq!(rec.difficulty_level, "vd");
    }
}
