//! # Validation Module
//!
//! Input validation rules for sale requests.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request edge (out of scope here)                             │
//! │  ├── Shape checks (deserialization)                                    │
//! │  └── Immediate caller feedback                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE - business rule validation                       │
//! │  ├── One function per rule, Result per rule                            │
//! │  └── The engine runs every rule and aggregates failures into          │
//! │      Violations, so one reply names every problem                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Stores (execution time)                                      │
//! │  └── Stock floors, uniqueness - state that can drift after            │
//! │      validation passes                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orion_core::validation::{validate_cancel_reason, validate_quantity};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_quantity(25).is_err());
//! assert!(validate_cancel_reason("Customer request").is_ok());
//! ```

use crate::discount::{MAX_ITEM_QUANTITY, MIN_ITEM_QUANTITY};
use crate::error::ValidationError;
use crate::MAX_CANCEL_REASON_LEN;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed the discount ladder's ceiling
///   ([`MAX_ITEM_QUANTITY`], 20)
///
/// The bounds come from the discount module so the ladder and this rule
/// can never drift apart.
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: MIN_ITEM_QUANTITY,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// ## Rules
/// - Must be strictly positive; zero-priced lines are not sellable
pub fn validate_unit_price(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "unit price".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a cancellation reason.
///
/// ## Rules
/// - Must not be empty after trimming
/// - Must be at most [`MAX_CANCEL_REASON_LEN`] (500) characters
pub fn validate_cancel_reason(reason: &str) -> ValidationResult<()> {
    let reason = reason.trim();

    if reason.is_empty() {
        return Err(ValidationError::Required {
            field: "cancellation reason".to_string(),
        });
    }

    if reason.len() > MAX_CANCEL_REASON_LEN {
        return Err(ValidationError::TooLong {
            field: "cancellation reason".to_string(),
            max: MAX_CANCEL_REASON_LEN,
        });
    }

    Ok(())
}

/// Validates that a reference id is present.
///
/// Ids are opaque strings here; whether they resolve is the store's
/// question, answered separately as `MissingReference`.
pub fn validate_reference(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
