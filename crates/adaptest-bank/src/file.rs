//! File-backed item bank stores.
//!
//! Both stores re-read their source on every snapshot; there is no caching,
//! so edits to the bank are visible to the next request.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::instrument;

use adaptest_core::parser::{load_bank_directory, parse_bank_str, BankFormat};
use adaptest_core::traits::ItemBankStore;
use adaptest_core::ItemBank;

use crate::error::BankError;

/// A bank exported to a single `.json` or `.toml` file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    async fn load(&self) -> Result<ItemBank, BankError> {
        if !self.path.is_file() {
            return Err(BankError::NotFound(self.path.clone()));
        }
        let format = BankFormat::from_path(&self.path)
            .ok_or_else(|| BankError::UnsupportedFormat(self.path.clone()))?;

        let content = tokio::fs::read_to_string(&self.path).await?;
        let items =
            parse_bank_str(&content, format, &self.path).map_err(|e| BankError::Parse {
                path: self.path.clone(),
                message: format!("{e:#}"),
            })?;
        Ok(ItemBank::new(items))
    }
}

#[async_trait]
impl ItemBankStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn snapshot(&self) -> anyhow::Result<ItemBank> {
        let bank = self.load().await?;
        tracing::debug!(items = bank.len(), "read item bank file");
        Ok(bank)
    }
}

/// A bank split across many files under one directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    dir: PathBuf,
}

impl DirectoryStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ItemBankStore for DirectoryStore {
    fn name(&self) -> &str {
        "directory"
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn snapshot(&self) -> anyhow::Result<ItemBank> {
        if !self.dir.is_dir() {
            return Err(BankError::NotFound(self.dir.clone()).into());
        }
        let dir = self.dir.clone();
        let bank = tokio::task::spawn_blocking(move || load_bank_directory(&dir))
            .await
            .map_err(|e| BankError::Unavailable(format!("directory loader panicked: {e}")))??;
        tracing::debug!(items = bank.len(), "read item bank directory");
        Ok(bank)
    }
}
