//! # Sales Error Types
//!
//! Top of the error stack for the sale lifecycle. Every failure a caller can
//! see leaves the engine as a [`SalesError`], sorted into four buckets:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          SalesError                             │
//! │                                                                 │
//! │  Validation ── the request itself is malformed; every broken    │
//! │                rule is listed, fix the request and resend       │
//! │                                                                 │
//! │  Conflict ──── the request was well-formed but current state    │
//! │                refuses it (stock, terminal status)              │
//! │                                                                 │
//! │  Invariant ─── a pricing-table hole; indicates a bug, not a     │
//! │                bad request                                      │
//! │                                                                 │
//! │  Store ─────── the backing store failed or is unavailable       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation and conflict errors are the caller's to resolve; invariant and
//! store errors are the operator's.

use orion_core::{InvariantViolation, Violations};
use thiserror::Error;

use crate::store::StoreError;

/// Result alias for engine operations.
pub type SalesResult<T> = Result<T, SalesError>;

/// State-based rejections.
///
/// A conflict means the request read fine but the world said no. Unlike a
/// [`Violations`] report these carry exactly one cause: the first conflict
/// found stops the operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Conflict {
    /// Requested quantity exceeds what the product has on hand.
    ///
    /// ## When This Occurs
    /// - Another sale drained the stock between request and execution
    /// - The caller asked for more than was ever available
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// A product passed validation but vanished before its stock was taken.
    #[error("Product no longer available: {0}")]
    ProductUnavailable(String),

    /// Cancelling a sale that is already in a terminal state.
    ///
    /// ## When This Occurs
    /// - Double-click on a cancel button
    /// - Two operators cancelling the same sale
    #[error("Sale already cancelled: {0}")]
    SaleAlreadyCancelled(String),
}

/// Sale lifecycle errors.
#[derive(Debug, Error)]
pub enum SalesError {
    /// The request is malformed; the report lists every broken rule.
    #[error("Validation failed: {0}")]
    Validation(#[from] Violations),

    /// Current state refuses the request.
    #[error("{0}")]
    Conflict(#[from] Conflict),

    /// A guaranteed-total rule did not hold. Indicates a bug.
    #[error("Invariant violated: {0}")]
    Invariant(#[from] InvariantViolation),

    /// The backing store failed.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl SalesError {
    /// True when the caller can fix the request and retry.
    pub fn is_caller_error(&self) -> bool {
        matches!(self, SalesError::Validation(_) | SalesError::Conflict(_))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use orion_core::ValidationError;

    #[test]
    fn test_conflict_messages() {
        let err = Conflict::InsufficientStock {
            product_id: "prod-1".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for product prod-1: available 3, requested 5"
        );

        let err = Conflict::SaleAlreadyCancelled("sale-9".to_string());
        assert_eq!(err.to_string(), "Sale already cancelled: sale-9");
    }

    #[test]
    fn test_violations_convert_to_sales_error() {
        let mut violations = Violations::new();
        violations.push(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
        let err: SalesError = violations.into();
        assert!(matches!(err, SalesError::Validation(_)));
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_store_errors_are_not_caller_errors() {
        let err: SalesError = StoreError::Unavailable("down".to_string()).into();
        assert!(!err.is_caller_error());
        assert_eq!(err.to_string(), "Store error: Store unavailable: down");
    }
}
