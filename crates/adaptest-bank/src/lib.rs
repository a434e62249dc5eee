//! adaptest-bank: item bank store implementations.
//!
//! Implements the `ItemBankStore` trait over files, directories, and
//! in-memory item lists, and loads the configuration that selects between
//! them.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;

pub use config::{create_store, load_config, AdaptestConfig, BankConfig};
pub use error::BankError;
pub use file::{DirectoryStore, FileStore};
pub use memory::{MemoryStore, UnavailableStore};
