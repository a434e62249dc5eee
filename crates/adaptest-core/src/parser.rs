//! Item bank file parser.
//!
//! Loads item bank snapshots from JSON and TOML files and directories, and
//! validates them.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::bank::ItemBank;
use crate::irt::{THETA_MAX, THETA_MIN};
use crate::model::Item;

/// On-disk formats an item bank can be exported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankFormat {
    Json,
    Toml,
}

impl fmt::Display for BankFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BankFormat::Json => write!(f, "json"),
            BankFormat::Toml => write!(f, "toml"),
        }
    }
}

impl FromStr for BankFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(BankFormat::Json),
            "toml" => Ok(BankFormat::Toml),
            other => Err(format!("unsupported item bank format: {other}")),
        }
    }
}

impl BankFormat {
    /// Detect the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }
}

/// JSON exports wrapped in an `items` key.
#[derive(Debug, Deserialize)]
struct WrappedJsonBank {
    items: Vec<Item>,
}

/// TOML exports use an `[[items]]` array of tables.
#[derive(Debug, Deserialize)]
struct TomlBankFile {
    #[serde(default)]
    items: Vec<Item>,
}

/// Parse item records from a string (useful for testing).
pub fn parse_bank_str(content: &str, format: BankFormat, source_path: &Path) -> Result<Vec<Item>> {
    match format {
        BankFormat::Json => {
            // A bare array or an object with an `items` key. Picking the shape
            // up front keeps serde's line and column in the error.
            let parsed = if content.trim_start().starts_with('[') {
                serde_json::from_str::<Vec<Item>>(content)
            } else {
                serde_json::from_str::<WrappedJsonBank>(content).map(|bank| bank.items)
            };
            parsed.with_context(|| format!("failed to parse JSON: {}", source_path.display()))
        }
        BankFormat::Toml => {
            let parsed: TomlBankFile = toml::from_str(content)
                .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;
            Ok(parsed.items)
        }
    }
}

/// Parse a single `.json` or `.toml` file into an `ItemBank`.
pub fn parse_bank_file(path: &Path) -> Result<ItemBank> {
    Ok(ItemBank::new(read_items(path)?))
}

fn read_items(path: &Path) -> Result<Vec<Item>> {
    let format = BankFormat::from_path(path).with_context(|| {
        format!(
            "cannot infer item bank format from extension: {}",
            path.display()
        )
    })?;
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read item bank file: {}", path.display()))?;
    parse_bank_str(&content, format, path)
}

/// Recursively load and merge every `.json`/`.toml` file under `dir`.
///
/// Files are visited in sorted path order so the merged bank order is
/// stable across runs. Unparsable files are skipped with a warning.
pub fn load_bank_directory(dir: &Path) -> Result<ItemBank> {
    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut files = Vec::new();
    collect_bank_files(dir, &mut files)?;
    files.sort();

    let mut items = Vec::new();
    for path in &files {
        match read_items(path) {
            Ok(parsed) => items.extend(parsed),
            Err(e) => {
                tracing::warn!("skipping {}: {:#}", path.display(), e);
            }
        }
    }

    Ok(ItemBank::new(items))
}

fn collect_bank_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();

        if path.is_dir() {
            collect_bank_files(&path, files)?;
        } else if BankFormat::from_path(&path).is_some() {
            files.push(path);
        }
    }
    Ok(())
}

/// A warning from item bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The item id (if applicable).
    pub item_id: Option<String>,
    /// Warning message.
    pub message: String,
}

/// Validate an item bank for common data issues. Warnings never prevent the
/// bank from being used.
pub fn validate_bank(bank: &ItemBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if bank.is_empty() {
        warnings.push(ValidationWarning {
            item_id: None,
            message: "item bank is empty; every recommendation will be null".into(),
        });
        return warnings;
    }

    let mut seen_ids = HashSet::new();
    for item in bank.items() {
        if !seen_ids.insert(&item.id) {
            warnings.push(ValidationWarning {
                item_id: Some(item.id.to_string()),
                message: format!("duplicate item ID: {}", item.id),
            });
        }
    }

    for item in bank.items() {
        if item.topic.trim().is_empty() {
            warnings.push(ValidationWarning {
                item_id: Some(item.id.to_string()),
                message: "topic is empty".into(),
            });
        }
    }

    for item in bank.items() {
        if !(THETA_MIN..=THETA_MAX).contains(&item.difficulty_b) {
            warnings.push(ValidationWarning {
                item_id: Some(item.id.to_string()),
                message: format!(
                    "difficulty {} lies outside the ability range [{THETA_MIN}, {THETA_MAX}]",
                    item.difficulty_b
                ),
            });
        }
    }

    warnings
}
