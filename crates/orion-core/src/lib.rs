//! # orion-core: Pure Business Logic for the Orion Sales Engine
//!
//! This crate is the **heart** of the sale pipeline. It contains all
//! business rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Orion Sales Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Callers (API, demo, tests)                     │   │
//! │  │        create_sale(request)      cancel_sale(request)          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 orion-sales (lifecycle engine)                  │   │
//! │  │     validation sweep ─► stock check ─► persist ─► events       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ orion-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ discount  │  │  pricing  │  │   │
//! │  │   │   Sale    │  │   Money   │  │   tiers   │  │ PricedLine│  │   │
//! │  │   │  Product  │  │  rounding │  │   bounds  │  │ build_item│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO ASYNC • NO CLOCK • PURE FUNCTIONS                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Sale, SaleItem, Product, Customer, Branch)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`discount`] - The quantity-tiered discount ladder and its bounds
//! - [`pricing`] - Line pricing and sale totalling
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, clock access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use orion_core::money::Money;
//! use orion_core::pricing::price_line;
//!
//! // 5 units at $10.00 land in the 10% tier
//! let line = price_line(5, Money::from_cents(1000)).unwrap();
//!
//! assert_eq!(line.discount_cents, 500);  // $5.00 off
//! assert_eq!(line.total_cents, 4500);    // $45.00 line
//!
//! // The ledger identity every line satisfies:
//! assert_eq!(line.total_cents + line.discount_cents, 1000 * 5);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod discount;
pub mod error;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use orion_core::Money` instead of
// `use orion_core::money::Money`

pub use discount::{discount_for, DiscountRate, MAX_ITEM_QUANTITY, MIN_ITEM_QUANTITY};
pub use error::{InvariantViolation, ValidationError, Violations};
pub use money::Money;
pub use pricing::{build_item, price_line, sale_total, PricedLine};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a cancellation reason, in characters.
///
/// ## Business Reason
/// The reason lands on reports and audit trails. Long enough for a real
/// explanation, short enough to stay a field rather than a document.
pub const MAX_CANCEL_REASON_LEN: usize = 500;
