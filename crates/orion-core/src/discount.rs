//! # Discount Policy
//!
//! The quantity-tiered discount ladder applied to every sale line.
//!
//! ## The Ladder
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Quantity-Tiered Discounts                           │
//! │                                                                         │
//! │   quantity 1..=3    →    0%  (   0 bps)   no discount                  │
//! │   quantity 4..=9    →   10%  (1000 bps)   volume tier                  │
//! │   quantity 10..=20  →   20%  (2000 bps)   bulk tier                    │
//! │   anything else     →   InvariantViolation (validator's job to stop)   │
//! │                                                                         │
//! │   Tiers are a step function of quantity only. Price never moves the    │
//! │   tier; quantity never changes the unit price.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This module is the single owner of the sellable quantity range. The
//! validator and the pricing layer both import [`MIN_ITEM_QUANTITY`] and
//! [`MAX_ITEM_QUANTITY`] from here instead of redefining them, so widening
//! the ladder is a one-line change.

use serde::{Deserialize, Serialize};

use crate::error::InvariantViolation;

// =============================================================================
// Quantity Bounds
// =============================================================================

/// Minimum quantity a single sale line may carry.
pub const MIN_ITEM_QUANTITY: i64 = 1;

/// Maximum quantity a single sale line may carry.
///
/// ## Business Reason
/// The top discount tier ends at 20. Larger orders go through a separate
/// wholesale channel, so a line above 20 is a request the engine must
/// refuse rather than price.
pub const MAX_ITEM_QUANTITY: i64 = 20;

// =============================================================================
// Discount Rate
// =============================================================================

/// Discount rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1000 bps = 10%, 2000 bps = 20%
/// Integer bps keep rate math exact; percentages are display-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a discount rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero discount rate.
    #[inline]
    pub const fn zero() -> Self {
        DiscountRate(0)
    }

    /// Checks if the rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for DiscountRate {
    fn default() -> Self {
        DiscountRate::zero()
    }
}

// =============================================================================
// Tier Lookup
// =============================================================================

/// Returns the discount rate for a line quantity.
///
/// The ladder is total: every quantity in
/// `MIN_ITEM_QUANTITY..=MAX_ITEM_QUANTITY` maps to exactly one rate.
/// A quantity outside that range reaching this function means the
/// validator was bypassed, which is a programming error, not a
/// business rejection.
///
/// ## Example
/// ```rust
/// use orion_core::discount::discount_for;
///
/// assert_eq!(discount_for(2).unwrap().bps(), 0);
/// assert_eq!(discount_for(5).unwrap().bps(), 1000);
/// assert_eq!(discount_for(15).unwrap().bps(), 2000);
/// assert!(discount_for(25).is_err());
/// ```
pub fn discount_for(quantity: i64) -> Result<DiscountRate, InvariantViolation> {
    match quantity {
        MIN_ITEM_QUANTITY..=3 => Ok(DiscountRate::zero()),
        4..=9 => Ok(DiscountRate::from_bps(1000)),
        10..=MAX_ITEM_QUANTITY => Ok(DiscountRate::from_bps(2000)),
        _ => Err(InvariantViolation::QuantityOutsideTiers {
            quantity,
            min: MIN_ITEM_QUANTITY,
            max: MAX_ITEM_QUANTITY,
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
