//! The `adaptest recommend` command.

use anyhow::Result;

use adaptest_core::{Request, Response};

use super::{parse_answered, split_list, BankSource};

pub async fn execute(
    source: BankSource,
    theta: f64,
    answered: Option<String>,
    weak_topics: Option<String>,
) -> Result<()> {
    let engine = source.engine()?;
    let response = engine
        .handle(Request::RecommendItem {
            current_theta: theta,
            answered_ids: parse_answered(answered.as_deref()),
            weak_topics: split_list(weak_topics.as_deref()),
        })
        .await;

    match &response {
        Response::Error { error } => anyhow::bail!("{error}"),
        Response::Recommendation { item: None } => {
            eprintln!("No eligible item left: exam complete.");
        }
        _ => {}
    }
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
