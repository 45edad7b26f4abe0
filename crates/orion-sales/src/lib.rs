//! # Orion Sales
//!
//! The sale lifecycle layer: everything stateful about a sale, from
//! request to record to announcement. The math itself lives in
//! `orion-core`; this crate decides when to call it, where to look rules
//! up, and what to do when the world disagrees with the request.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        orion-sales                              │
//! │                                                                 │
//! │   engine ──── create_sale / cancel_sale orchestration           │
//! │   store ───── async contracts + in-memory reference stores      │
//! │   events ──── SaleCreated / SaleCancelled announcements         │
//! │   error ───── validation / conflict / invariant / store taxonomy│
//! │                                                                 │
//! └────────────────────────────┬────────────────────────────────────┘
//!                              │
//!                              ▼
//!                         orion-core
//!              (money, discounts, pricing, records)
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use std::sync::Arc;
//! use orion_sales::{
//!     BroadcastPublisher, CreateSaleRequest, EventEmitter, SaleEngine, SaleLineRequest,
//! };
//! use orion_sales::store::memory::{
//!     MemoryBranchStore, MemoryCustomerStore, MemoryProductStore, MemorySaleStore,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let publisher = Arc::new(BroadcastPublisher::default());
//! let engine = SaleEngine::new(
//!     Arc::new(MemoryProductStore::new()),
//!     Arc::new(MemoryCustomerStore::new()),
//!     Arc::new(MemoryBranchStore::new()),
//!     Arc::new(MemorySaleStore::new()),
//!     EventEmitter::new(publisher.clone()),
//! );
//!
//! // Stores are empty, so this reports the unknown references rather
//! // than creating anything.
//! let result = engine
//!     .create_sale(CreateSaleRequest {
//!         customer_id: "cust-1".to_string(),
//!         branch_id: "branch-1".to_string(),
//!         items: vec![SaleLineRequest {
//!             product_id: "prod-1".to_string(),
//!             quantity: 5,
//!             unit_price_cents: 1000,
//!         }],
//!     })
//!     .await;
//! assert!(result.is_err());
//! # }
//! ```

pub mod engine;
pub mod error;
pub mod events;
pub mod store;

// Re-export the surface most callers need.
pub use engine::{CancelSaleRequest, CreateSaleRequest, SaleEngine, SaleLineRequest};
pub use error::{Conflict, SalesError, SalesResult};
pub use events::{
    BroadcastPublisher, EventEmitter, EventPublisher, PublishError, SaleCancelled, SaleCreated,
    SaleEvent, DEFAULT_EVENT_CAPACITY,
};
pub use store::{
    BranchStore, CustomerStore, ProductStore, SaleStore, StoreError, StoreResult,
};
