//! The `adaptest estimate` command.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};

use adaptest_core::{ItemResponse, Request, Response};

use super::BankSource;

pub async fn execute(source: BankSource, theta: f64, history_path: PathBuf) -> Result<()> {
    let raw = if history_path.as_os_str() == "-" {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read history from stdin")?;
        raw
    } else {
        std::fs::read_to_string(&history_path)
            .with_context(|| format!("failed to read history: {}", history_path.display()))?
    };
    let history: Vec<ItemResponse> = serde_json::from_str(&raw)
        .with_context(|| format!("invalid history: {}", history_path.display()))?;

    let engine = source.engine()?;
    let response = engine
        .handle(Request::EstimateAbility {
            current_theta: theta,
            history,
        })
        .await;

    if let Response::Error { error } = &response {
        anyhow::bail!("{error}");
    }
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
