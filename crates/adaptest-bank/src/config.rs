//! Configuration and store factory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use adaptest_core::traits::ItemBankStore;

use crate::file::{DirectoryStore, FileStore};

/// Environment variable that overrides the configured item bank location.
pub const BANK_ENV_VAR: &str = "ADAPTEST_BANK";

/// Where the item bank comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BankConfig {
    /// A single `.json` or `.toml` export.
    File {
        #[serde(default = "default_bank_path")]
        path: PathBuf,
    },
    /// Every `.json`/`.toml` file under a directory, merged.
    Directory { path: PathBuf },
}

impl Default for BankConfig {
    fn default() -> Self {
        BankConfig::File {
            path: default_bank_path(),
        }
    }
}

impl BankConfig {
    /// Pick file or directory based on what `path` currently points at.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        if path.is_dir() {
            BankConfig::Directory { path }
        } else {
            BankConfig::File { path }
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            BankConfig::File { path } | BankConfig::Directory { path } => path,
        }
    }
}

fn default_bank_path() -> PathBuf {
    PathBuf::from("item-bank.json")
}

/// Top-level adaptest configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdaptestConfig {
    /// Item bank source.
    #[serde(default)]
    pub bank: BankConfig,
}

/// Expand `${NAME}` references from the environment in one pass.
///
/// Unset variables expand to the empty string; an unterminated `${` is
/// kept literally, as is anything an expansion itself produces.
fn expand_env_vars(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find("${") {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        out.push_str(&rest[..open]);
        let name = &rest[open + 2..open + close];
        out.push_str(&std::env::var(name).unwrap_or_default());
        rest = &rest[open + close + 1..];
    }
    out.push_str(rest);
    out
}

fn resolve_bank_config(config: &BankConfig) -> BankConfig {
    let resolve = |p: &Path| PathBuf::from(expand_env_vars(&p.to_string_lossy()));
    match config {
        BankConfig::File { path } => BankConfig::File {
            path: resolve(path),
        },
        BankConfig::Directory { path } => BankConfig::Directory {
            path: resolve(path),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `adaptest.toml` in the current directory
/// 2. `~/.config/adaptest/config.toml`
///
/// Environment variable override: `ADAPTEST_BANK`.
pub fn load_config() -> Result<AdaptestConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AdaptestConfig> {
    let config_path = match path {
        Some(p) if !p.exists() => anyhow::bail!("config file not found: {}", p.display()),
        Some(p) => Some(p.to_path_buf()),
        None => locate_config(),
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<AdaptestConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(config = %path.display(), "loaded configuration");
            config
        }
        None => AdaptestConfig::default(),
    };

    if let Ok(bank) = std::env::var(BANK_ENV_VAR) {
        if !bank.is_empty() {
            config.bank = BankConfig::from_path(bank);
        }
    }

    config.bank = resolve_bank_config(&config.bank);

    Ok(config)
}

fn locate_config() -> Option<PathBuf> {
    let local = PathBuf::from("adaptest.toml");
    if local.is_file() {
        return Some(local);
    }
    dirs_path()
        .map(|dir| dir.join("config.toml"))
        .filter(|global| global.is_file())
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("adaptest"))
}

/// Create a store instance from its configuration.
pub fn create_store(config: &BankConfig) -> Result<Box<dyn ItemBankStore>> {
    match config {
        BankConfig::File { path } => Ok(Box::new(FileStore::new(path))),
        BankConfig::Directory { path } => Ok(Box::new(DirectoryStore::new(path))),
    }
}
