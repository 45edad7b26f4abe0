//! # Store Contracts
//!
//! Narrow async traits between the engine and whatever persists state.
//! The engine only ever talks to these traits; the in-memory implementations
//! in [`memory`] are the reference backend used by tests and the demo.
//!
//! ```text
//! ┌──────────────┐     ProductStore ──── lookup, update, adjust_stock
//! │  SaleEngine  │────▶ CustomerStore ─── lookup
//! └──────────────┘     BranchStore ───── lookup
//!                      SaleStore ─────── create, lookup, update, numbering
//! ```
//!
//! Contract rules every implementation must honor:
//! - `adjust_stock` is atomic: check and write happen under one guard, and a
//!   delta that would push stock below zero changes nothing.
//! - `SaleStore::create` persists the sale and its items as one unit.
//! - Lookups return `Ok(None)` for absent rows; `Err` is reserved for the
//!   store itself failing.

pub mod memory;

use async_trait::async_trait;
use orion_core::{Branch, Customer, Product, Sale};
use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors surfaced by store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A write targeted a record that does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A unique field already holds this value.
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A stock decrement would push the count below zero.
    ///
    /// The store reports the quantity that was actually on hand so the
    /// caller can tell the requester how short the shelf is.
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// The store itself is unreachable or failed mid-operation.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Creates a NotFound error for the given entity and id.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Duplicate error for the given field and value.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Read and stock access to the product catalog.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Fetches a product by ID. Absent products are `Ok(None)`.
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Product>>;

    /// Replaces an existing product record verbatim.
    ///
    /// Callers own every field, timestamps included. Fails with
    /// [`StoreError::NotFound`] if the product does not exist.
    async fn update(&self, product: &Product) -> StoreResult<Product>;

    /// Applies a signed delta to a product's stock and returns the new count.
    ///
    /// Atomic: the check and the write happen under one guard. A delta that
    /// would take stock below zero fails with [`StoreError::InsufficientStock`]
    /// and leaves the count untouched.
    async fn adjust_stock(&self, id: &str, delta: i64) -> StoreResult<i64>;
}

/// Read access to customers.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Customer>>;
}

/// Read access to branches.
#[async_trait]
pub trait BranchStore: Send + Sync {
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Branch>>;
}

/// Persistence for sales and their business numbering.
#[async_trait]
pub trait SaleStore: Send + Sync {
    /// Persists a new sale together with all of its items, as one unit.
    ///
    /// Fails with [`StoreError::Duplicate`] if the id or number is taken.
    async fn create(&self, sale: Sale) -> StoreResult<Sale>;

    /// Fetches a sale (items included) by ID. Absent sales are `Ok(None)`.
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Sale>>;

    /// Replaces an existing sale record verbatim, items included.
    async fn update(&self, sale: &Sale) -> StoreResult<Sale>;

    /// Returns the next business number in the `SALE-NNNNNN` sequence.
    ///
    /// Every call returns a fresh number; gaps are allowed (a failed create
    /// burns its number), duplicates are not.
    async fn next_sale_number(&self) -> StoreResult<String>;
}
