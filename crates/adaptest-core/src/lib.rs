//! adaptest-core: 3PL IRT engine for computerized adaptive testing.
//!
//! This crate holds the probability and information models, the ability
//! estimator, the next-item selector, and the request boundary that ties
//! them to an item bank store.

pub mod analysis;
pub mod bank;
pub mod engine;
pub mod error;
pub mod estimator;
pub mod irt;
pub mod model;
pub mod parser;
pub mod selector;
pub mod traits;

pub use bank::ItemBank;
pub use engine::{Engine, Request, Response};
pub use error::EngineError;
pub use model::{Item, ItemId, ItemResponse, Recommendation};
pub use traits::ItemBankStore;
