//! # Line Pricing
//!
//! Builds priced sale lines and totals them.
//!
//! ## Pricing Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  (quantity, unit price)                                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  discount_for(quantity)      tier lookup, rejects quantities the       │
//! │         │                    ladder does not cover                     │
//! │         ▼                                                               │
//! │  gross = unit price × qty                                              │
//! │  discount = gross.discount_amount(rate)        rounded half-up         │
//! │  total = gross − discount                                              │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  PricedLine { quantity, unit_price, bps, discount, total }             │
//! │                                                                         │
//! │  Identity held for every line:                                         │
//! │      total_cents + discount_cents == unit_price_cents × quantity       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::discount::discount_for;
use crate::error::InvariantViolation;
use crate::money::Money;
use crate::types::{Product, SaleItem, SaleStatus};

// =============================================================================
// Priced Line
// =============================================================================

/// The full pricing breakdown for one prospective sale line.
///
/// Pure data: no ids, no timestamps. [`build_item`] stamps a breakdown
/// into a persistable [`SaleItem`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedLine {
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub discount_bps: u32,
    pub discount_cents: i64,
    pub total_cents: i64,
}

impl PricedLine {
    /// Gross amount before discount.
    #[inline]
    pub fn gross(&self) -> Money {
        Money::from_cents(self.unit_price_cents).multiply_quantity(self.quantity)
    }

    /// Line total after discount, as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Pricing Operations
// =============================================================================

/// Prices one line: tier lookup, discount, total.
///
/// The tier lookup doubles as the range guard: a quantity the ladder
/// does not cover comes back as [`InvariantViolation`], so no line can
/// be priced without a valid tier even if a caller skipped validation.
///
/// ## Example
/// ```rust
/// use orion_core::money::Money;
/// use orion_core::pricing::price_line;
///
/// // 5 × $10.00 lands in the 10% tier
/// let line = price_line(5, Money::from_cents(1000)).unwrap();
/// assert_eq!(line.discount_cents, 500);
/// assert_eq!(line.total_cents, 4500);
/// ```
pub fn price_line(quantity: i64, unit_price: Money) -> Result<PricedLine, InvariantViolation> {
    let rate = discount_for(quantity)?;
    let gross = unit_price.multiply_quantity(quantity);
    let discount = gross.discount_amount(rate);
    let total = gross - discount;

    Ok(PricedLine {
        quantity,
        unit_price_cents: unit_price.cents(),
        discount_bps: rate.bps(),
        discount_cents: discount.cents(),
        total_cents: total.cents(),
    })
}

/// Builds a persistable sale item from a product and a priced quantity.
///
/// Freezes the product's sku and name into the item (snapshot pattern)
/// so later catalog edits never rewrite history. Ids and the timestamp
/// are passed in: this module stays pure.
pub fn build_item(
    id: String,
    sale_id: String,
    product: &Product,
    quantity: i64,
    unit_price: Money,
    created_at: DateTime<Utc>,
) -> Result<SaleItem, InvariantViolation> {
    let line = price_line(quantity, unit_price)?;

    Ok(SaleItem {
        id,
        sale_id,
        product_id: product.id.clone(),
        sku_snapshot: product.sku.clone(),
        name_snapshot: product.name.clone(),
        quantity: line.quantity,
        unit_price_cents: line.unit_price_cents,
        discount_bps: line.discount_bps,
        discount_cents: line.discount_cents,
        total_cents: line.total_cents,
        status: SaleStatus::Active,
        cancelled_at: None,
        cancellation_reason: None,
        created_at,
    })
}

/// Sums line totals into the sale total.
///
/// Counts items of every status: whole-sale cancellation keeps historic
/// totals intact, and no per-item cancellation path exists.
pub fn sale_total(items: &[SaleItem]) -> Money {
    items.iter().map(SaleItem::total).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, sku: &str, name: &str) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            sku: sku.to_string(),
            name: name.to_string(),
            price_cents: 1000,
            stock_quantity: 100,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_no_discount_tier() {
        // 2 × $10.00 stays at full price
        let line = price_line(2, Money::from_cents(1000)).unwrap();
        assert_eq!(line.discount_bps, 0);
        assert_eq!(line.discount_cents, 0);
        assert_eq!(line.total_cents, 2000);
    }

    #[test]
    fn test_volume_tier() {
        // 5 × $10.00 → 10% → $5.00 off, $45.00 line
        let line = price_line(5, Money::from_cents(1000)).unwrap();
        assert_eq!(line.discount_bps, 1000);
        assert_eq!(line.discount_cents, 500);
        assert_eq!(line.total_cents, 4500);
    }

    #[test]
    fn test_bulk_tier() {
        // 15 × $10.00 → 20% → $30.00 off, $120.00 line
        let line = price_line(15, Money::from_cents(1000)).unwrap();
        assert_eq!(line.discount_bps, 2000);
        assert_eq!(line.discount_cents, 3000);
        assert_eq!(line.total_cents, 12000);
    }

    #[test]
    fn test_line_identity_holds_across_the_ladder() {
        // Odd price so rounding actually fires
        let unit_price = Money::from_cents(333);
        for quantity in 1..=20 {
            let line = price_line(quantity, unit_price).unwrap();
            assert_eq!(
                line.total_cents + line.discount_cents,
                333 * quantity,
                "identity broke at quantity {}",
                quantity
            );
            assert_eq!(line.gross().cents(), 333 * quantity);
        }
    }

    #[test]
    fn test_unpriceable_quantity_is_invariant_violation() {
        assert!(price_line(0, Money::from_cents(1000)).is_err());
        assert!(price_line(21, Money::from_cents(1000)).is_err());
    }

    #[test]
    fn test_build_item_freezes_product_identity() {
        let product = product("p-1", "WID-330", "Widget 330ml");
        let now = Utc::now();

        let item = build_item(
            "item-1".to_string(),
            "sale-1".to_string(),
            &product,
            5,
            Money::from_cents(1000),
            now,
        )
        .unwrap();

        assert_eq!(item.product_id, "p-1");
        assert_eq!(item.sku_snapshot, "WID-330");
        assert_eq!(item.name_snapshot, "Widget 330ml");
        assert_eq!(item.status, SaleStatus::Active);
        assert_eq!(item.total_cents, 4500);
        assert_eq!(item.created_at, now);
    }

    #[test]
    fn test_sale_total_counts_every_status() {
        let p1 = product("p-1", "A", "A");
        let p2 = product("p-2", "B", "B");
        let now = Utc::now();

        let active = build_item("i-1".into(), "s-1".into(), &p1, 5, Money::from_cents(1000), now)
            .unwrap();
        let mut cancelled =
            build_item("i-2".into(), "s-1".into(), &p2, 2, Money::from_cents(1000), now).unwrap();
        cancelled.status = SaleStatus::Cancelled;

        let total = sale_total(&[active, cancelled]);
        assert_eq!(total, Money::from_cents(4500 + 2000));
    }

    #[test]
    fn test_sale_total_of_nothing_is_zero() {
        assert!(sale_total(&[]).is_zero());
    }
}
