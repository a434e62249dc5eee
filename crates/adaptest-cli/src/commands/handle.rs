//! The `adaptest handle` command.
//!
//! The process boundary callers spawn per request: one JSON object on stdin
//! (or in `--request`), one JSON line on stdout. Failures are reported in
//! the payload as `{"error": ...}` and the process still exits 0.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

use adaptest_core::Response;

use super::BankSource;

pub async fn execute(source: BankSource, request_path: Option<PathBuf>) -> Result<()> {
    let response = match read_request(request_path).await {
        Ok(raw) => match source.engine() {
            Ok(engine) => engine.handle_json(&raw).await,
            Err(e) => {
                tracing::error!("cannot open item bank: {e:#}");
                Response::error(format!("item bank unavailable: {e:#}"))
            }
        },
        Err(e) => Response::error(format!("{e:#}")),
    };

    println!("{}", serde_json::to_string(&response)?);
    Ok(())
}

async fn read_request(path: Option<PathBuf>) -> Result<String> {
    match path {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("failed to read request: {}", path.display())),
        None => {
            let mut raw = String::new();
            tokio::io::stdin()
                .read_to_string(&mut raw)
                .await
                .context("failed to read request from stdin")?;
            Ok(raw)
        }
    }
}
