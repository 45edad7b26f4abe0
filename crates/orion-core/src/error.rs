//! # Error Types
//!
//! Domain-specific error types for orion-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  orion-core errors (this file)                                         │
//! │  ├── ValidationError    - One broken input rule                        │
//! │  ├── Violations         - Every broken rule found in one pass          │
//! │  └── InvariantViolation - Programming errors, not bad input            │
//! │                                                                         │
//! │  orion-sales errors (separate crate)                                   │
//! │  ├── StoreError         - Store contract failures                      │
//! │  ├── Conflict           - State drift found at execution time          │
//! │  └── SalesError         - Umbrella the engine returns                  │
//! │                                                                         │
//! │  Flow: ValidationError* → Violations → SalesError → Caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, id, bounds)
//! 3. Errors are enum variants, never String
//! 4. Validation reports ALL failures at once, never just the first

use std::fmt;

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// A single broken input rule.
///
/// These are recoverable: the caller fixes the request and retries.
/// They are collected into [`Violations`] so one reply names every
/// problem instead of the first one found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// A referenced entity does not exist.
    ///
    /// ## When This Occurs
    /// - Request names a customer/branch/product id the store cannot resolve
    /// - Cancel names a sale id that was never created
    #[error("{entity} not found: {id}")]
    MissingReference { entity: String, id: String },

    /// A referenced entity exists but is switched off.
    ///
    /// ## When This Occurs
    /// - Customer or product was deactivated (soft delete) before the request
    #[error("{entity} is inactive: {id}")]
    InactiveReference { entity: String, id: String },
}

impl ValidationError {
    /// Creates a MissingReference error for a given entity type and id.
    pub fn missing(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ValidationError::MissingReference {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates an InactiveReference error for a given entity type and id.
    pub fn inactive(entity: impl Into<String>, id: impl Into<String>) -> Self {
        ValidationError::InactiveReference {
            entity: entity.into(),
            id: id.into(),
        }
    }
}

// =============================================================================
// Violations (aggregate)
// =============================================================================

/// Every validation failure found in a single pass over a request.
///
/// ## Why Aggregate?
/// A request with three bad fields should produce one reply naming all
/// three, not three round-trips. Callers run every check, collect the
/// failures here, and convert to a `Result` at the end:
///
/// ```rust
/// use orion_core::error::{ValidationError, Violations};
/// use orion_core::validation::validate_quantity;
///
/// let mut violations = Violations::new();
/// violations.record(validate_quantity(0));
/// violations.record(validate_quantity(5));
/// violations.push(ValidationError::Required { field: "branch_id".into() });
///
/// let result = violations.into_result();
/// assert_eq!(result.unwrap_err().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct Violations {
    violations: Vec<ValidationError>,
}

impl Violations {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Violations {
            violations: Vec::new(),
        }
    }

    /// Adds a single violation.
    pub fn push(&mut self, violation: ValidationError) {
        self.violations.push(violation);
    }

    /// Records the outcome of one validation check, keeping the failure if any.
    pub fn record(&mut self, check: Result<(), ValidationError>) {
        if let Err(violation) = check {
            self.violations.push(violation);
        }
    }

    /// True when no violation has been recorded.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of recorded violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Iterates over the recorded violations in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.violations.iter()
    }

    /// `Ok(())` when empty, otherwise `Err(self)` carrying every violation.
    pub fn into_result(self) -> Result<(), Violations> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self.violations.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", rendered.join("; "))
    }
}

impl std::error::Error for Violations {}

impl From<ValidationError> for Violations {
    fn from(violation: ValidationError) -> Self {
        Violations {
            violations: vec![violation],
        }
    }
}

// =============================================================================
// Invariant Violation
// =============================================================================

/// States that indicate a bug in the calling code, not bad user input.
///
/// ## When This Occurs
/// - A quantity outside the tier ladder reaches pricing (the validator
///   should have rejected it first)
///
/// These are fatal for the operation and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    /// No discount tier covers this quantity.
    #[error("no discount tier covers quantity {quantity} (expected {min}..={max})")]
    QuantityOutsideTiers { quantity: i64, min: i64, max: i64 },
}

// =============================================================================
// Unit Tests
// =============================================================================
