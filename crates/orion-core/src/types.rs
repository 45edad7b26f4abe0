//! # Domain Types
//!
//! Core domain types for the sale lifecycle.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Sale       │   │    SaleItem     │   │    Product      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  number (biz)   │   │  sku_snapshot   │   │  sku (business) │       │
//! │  │  status         │   │  discount_cents │   │  stock_quantity │       │
//! │  │  items ────────►│   │  total_cents    │   │  is_active      │       │
//! │  │  total_cents    │   │  status         │   │  price_cents    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Customer     │   │     Branch      │   │   SaleStatus    │       │
//! │  │  referenced,    │   │  referenced,    │   │  Active         │       │
//! │  │  read-only      │   │  read-only      │   │  Cancelled      │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every entity has:
//! - `id`: UUID v4 - immutable, used for relations
//! - Business ID where one exists: `Sale.number` ("SALE-000042"),
//!   `Product.sku` - human-readable, shown to people

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Sale Status
// =============================================================================

/// The lifecycle state of a sale (and of each of its items).
///
/// Transitions only ever run `Active → Cancelled`, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    /// Live sale: stock has been taken, totals count toward revenue.
    Active,
    /// Terminal state: the sale was called off and stock handed back.
    Cancelled,
}

impl Default for SaleStatus {
    fn default() -> Self {
        SaleStatus::Active
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
///
/// Owned by the catalog; this crate reads it and adjusts stock through
/// the product store, nothing more.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown on sale lines.
    pub name: String,

    /// List price in cents. Requests may override it per line.
    pub price_cents: i64,

    /// Units currently on hand.
    pub stock_quantity: i64,

    /// Whether product is active (soft delete).
    pub is_active: bool,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the list price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether on-hand stock covers a requested quantity.
    #[inline]
    pub fn has_stock(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

// =============================================================================
// Customer / Branch
// =============================================================================

/// A customer placing sales. Referenced, never mutated here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    /// Inactive customers cannot place new sales.
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A branch (physical location) a sale is booked against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Branch {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A sale with its full item set, created atomically and never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    pub id: String,
    /// Sequential business number, "SALE-NNNNNN".
    pub number: String,
    pub sale_date: DateTime<Utc>,
    pub customer_id: String,
    pub branch_id: String,
    /// Line items in request order.
    pub items: Vec<SaleItem>,
    /// Sum of item totals over ALL items regardless of item status.
    pub total_cents: i64,
    pub status: SaleStatus,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// True once the sale has reached its terminal state.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.status == SaleStatus::Cancelled
    }

    /// Flips the sale and every still-active item to `Cancelled`.
    ///
    /// Returns the restock manifest: `(product_id, quantity)` for each
    /// item that was active before this call, in item order. The caller
    /// must have checked the sale is not already cancelled; calling this
    /// twice yields an empty manifest.
    pub fn cancel(&mut self, reason: &str, now: DateTime<Utc>) -> Vec<(String, i64)> {
        let mut restock = Vec::new();

        for item in &mut self.items {
            if item.status == SaleStatus::Active {
                item.status = SaleStatus::Cancelled;
                item.cancelled_at = Some(now);
                item.cancellation_reason = Some(reason.to_string());
                restock.push((item.product_id.clone(), item.quantity));
            }
        }

        self.status = SaleStatus::Cancelled;
        self.cancelled_at = Some(now);
        self.cancellation_reason = Some(reason.to_string());
        self.updated_at = now;

        restock
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
/// Uses snapshot pattern to freeze product data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,
    /// SKU at time of sale (frozen).
    pub sku_snapshot: String,
    /// Product name at time of sale (frozen).
    pub name_snapshot: String,
    /// Quantity sold.
    pub quantity: i64,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    /// Discount rate applied, in basis points.
    pub discount_bps: u32,
    /// Discount taken off the gross, in cents.
    pub discount_cents: i64,
    /// Line total after discount: `unit_price × quantity − discount`.
    pub total_cents: i64,
    pub status: SaleStatus,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancellation_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the discount amount as Money.
    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
