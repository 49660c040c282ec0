//! Module for the drink store and common storage utilities.
//!
//! The store keeps drinks in memory behind an async read/write lock and hands
//! out monotonically increasing ids starting at 1. Queries live in
//! [`queries`]; row types live in [`models`].

pub mod models;
pub mod queries;

use std::collections::BTreeMap;

use thiserror::Error;
use tokio::sync::RwLock;

pub use models::{Drink, DrinkSummary, RecipePart, RecipeSummary};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("drink {0} does not exist")]
    NotFound(u64),

    #[error("a drink titled {0:?} already exists")]
    DuplicateTitle(String),
}

#[derive(Debug, Default)]
pub struct DrinkStore {
    inner: RwLock<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    drinks: BTreeMap<u64, Drink>,
    last_id: u64,
}

impl DrinkStore {
    pub fn new() -> Self {
        Self::default()
    }
}
