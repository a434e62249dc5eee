pub mod estimate;
pub mod handle;
pub mod init;
pub mod rank;
pub mod recommend;
pub mod validate;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use adaptest_bank::config::{create_store, load_config, load_config_from, BankConfig};
use adaptest_core::traits::ItemBankStore;
use adaptest_core::{Engine, ItemId};

/// Global flags that decide where the item bank comes from.
pub struct BankSource {
    pub config: Option<PathBuf>,
    pub bank: Option<PathBuf>,
}

impl BankSource {
    /// `--bank` wins over `ADAPTEST_BANK`, which wins over the config file.
    pub fn resolve(&self) -> Result<BankConfig> {
        if let Some(path) = &self.bank {
            return Ok(BankConfig::from_path(path.clone()));
        }
        let config = match &self.config {
            Some(path) => load_config_from(Some(path.as_path()))?,
            None => load_config()?,
        };
        Ok(config.bank)
    }

    pub fn store(&self) -> Result<Arc<dyn ItemBankStore>> {
        let bank = self.resolve()?;
        tracing::debug!(bank = %bank.path().display(), "using item bank");
        Ok(Arc::from(create_store(&bank)?))
    }

    pub fn engine(&self) -> Result<Engine> {
        Ok(Engine::new(self.store()?))
    }
}

/// Split a comma-separated flag value, dropping empty entries.
pub fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Parse `--answered` into item ids.
pub fn parse_answered(value: Option<&str>) -> Vec<ItemId> {
    split_list(value)
        .iter()
        .map(|s| ItemId::parse_token(s))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_drops_empty() {
        assert_eq!(
            split_list(Some(" algebra, geometry ,,")),
            vec!["algebra", "geometry"]
        );
        assert!(split_list(None).is_empty());
    }

    #[test]
    fn answered_ids_keep_their_shape() {
        assert_eq!(
            parse_answered(Some("1,q-2")),
            vec![ItemId::from(1), ItemId::from("q-2")]
        );
    }
}
