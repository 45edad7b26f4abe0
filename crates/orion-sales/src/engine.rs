//! # Sale Lifecycle Engine
//!
//! Orchestrates the two state transitions a sale can make, over the store
//! contracts and the event layer:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │ create_sale                                                         │
//! │                                                                     │
//! │  validate ──▶ check stock ──▶ number ──▶ price ──▶ take stock ──▶   │
//! │  (aggregate   (first conflict  (SALE-     (orion-   (per line,      │
//! │   everything)  wins)            NNNNNN)    core)     in order)      │
//! │                                                                     │
//! │          ──▶ persist sale + items ──▶ emit SaleCreated             │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │ cancel_sale                                                         │
//! │                                                                     │
//! │  validate ──▶ reject terminal ──▶ mark cancelled ──▶ persist ──▶    │
//! │                                                                     │
//! │          ──▶ hand stock back (best effort) ──▶ emit SaleCancelled   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ordering rules the flows above encode:
//! - No stock moves and nothing is persisted until validation passes in
//!   full. A rejected request leaves the system exactly as it found it.
//! - Stock is taken before the sale is persisted. A decrement that fails
//!   midway aborts the create; decrements already applied stand and are
//!   logged for the operator.
//! - On cancel the sale record turns terminal first; stock hand-back then
//!   proceeds item by item and skips failures rather than aborting.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use orion_core::pricing::{build_item, sale_total};
use orion_core::validation::{
    validate_cancel_reason, validate_quantity, validate_reference, validate_unit_price,
};
use orion_core::{Money, Product, Sale, SaleStatus, ValidationError, Violations};

use crate::error::{Conflict, SalesError, SalesResult};
use crate::events::{EventEmitter, SaleCancelled, SaleCreated, SaleEvent};
use crate::store::{BranchStore, CustomerStore, ProductStore, SaleStore, StoreError};

// =============================================================================
// Request Types
// =============================================================================

/// One line of a sale request.
///
/// The unit price is named by the caller rather than read from the catalog;
/// the till may be honoring a posted price or a negotiated one. What the
/// engine guarantees is that the discount ladder is applied to whatever
/// price is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLineRequest {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

/// Request to create a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSaleRequest {
    pub customer_id: String,
    pub branch_id: String,
    pub items: Vec<SaleLineRequest>,
}

/// Request to cancel an active sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancelSaleRequest {
    pub sale_id: String,
    pub reason: String,
}

// =============================================================================
// Engine
// =============================================================================

/// The sale lifecycle engine.
///
/// Holds one handle per store contract plus the event emitter. Construct it
/// once and share it; every method takes `&self`.
pub struct SaleEngine {
    products: Arc<dyn ProductStore>,
    customers: Arc<dyn CustomerStore>,
    branches: Arc<dyn BranchStore>,
    sales: Arc<dyn SaleStore>,
    events: EventEmitter,
}

impl SaleEngine {
    pub fn new(
        products: Arc<dyn ProductStore>,
        customers: Arc<dyn CustomerStore>,
        branches: Arc<dyn BranchStore>,
        sales: Arc<dyn SaleStore>,
        events: EventEmitter,
    ) -> Self {
        SaleEngine {
            products,
            customers,
            branches,
            sales,
            events,
        }
    }

    /// Creates a sale: validates the request in full, prices every line
    /// through the discount ladder, takes stock, persists, announces.
    ///
    /// Fails with [`SalesError::Validation`] listing every broken rule, or
    /// [`SalesError::Conflict`] when stock cannot cover a line. Nothing is
    /// persisted on any failure.
    pub async fn create_sale(&self, request: CreateSaleRequest) -> SalesResult<Sale> {
        debug!(
            customer_id = %request.customer_id,
            branch_id = %request.branch_id,
            items = request.items.len(),
            "Creating sale"
        );

        let resolved = self.validate_create(&request).await?;

        // First shortage wins; the request-order pairing with `resolved`
        // holds because validation only passes when every line resolved.
        for (line, product) in request.items.iter().zip(&resolved) {
            if !product.has_stock(line.quantity) {
                return Err(Conflict::InsufficientStock {
                    product_id: product.id.clone(),
                    available: product.stock_quantity,
                    requested: line.quantity,
                }
                .into());
            }
        }

        let number = self.sales.next_sale_number().await?;
        let sale_id = Uuid::new_v4().to_string();
        let now = Utc::now();

        let mut items = Vec::with_capacity(request.items.len());
        for (line, product) in request.items.iter().zip(&resolved) {
            let item = build_item(
                Uuid::new_v4().to_string(),
                sale_id.clone(),
                product,
                line.quantity,
                Money::from_cents(line.unit_price_cents),
                now,
            )?;
            items.push(item);
        }

        for (index, line) in request.items.iter().enumerate() {
            if let Err(e) = self
                .products
                .adjust_stock(&line.product_id, -line.quantity)
                .await
            {
                if index > 0 {
                    warn!(
                        number = %number,
                        decremented_lines = index,
                        error = %e,
                        "Stock take failed mid-sale, earlier decrements stand"
                    );
                }
                return Err(map_stock_error(e));
            }
        }

        let total = sale_total(&items);
        let sale = Sale {
            id: sale_id,
            number,
            sale_date: now,
            customer_id: request.customer_id,
            branch_id: request.branch_id,
            items,
            total_cents: total.cents(),
            status: SaleStatus::Active,
            cancelled_at: None,
            cancellation_reason: None,
            created_at: now,
            updated_at: now,
        };
        let sale = self.sales.create(sale).await?;

        self.events
            .emit(SaleEvent::SaleCreated(SaleCreated {
                sale_id: sale.id.clone(),
                sale_number: sale.number.clone(),
                customer_id: sale.customer_id.clone(),
                branch_id: sale.branch_id.clone(),
                total_cents: sale.total_cents,
                created_at: sale.created_at,
            }))
            .await;

        info!(
            sale_id = %sale.id,
            number = %sale.number,
            total = %sale.total(),
            items = sale.items.len(),
            "Sale created"
        );
        Ok(sale)
    }

    /// Cancels an active sale and hands its stock back.
    ///
    /// Cancelling is terminal and idempotent in effect: a second attempt
    /// fails with [`Conflict::SaleAlreadyCancelled`] and moves no stock.
    /// Hand-back is best effort; items whose product has since vanished are
    /// logged and skipped.
    pub async fn cancel_sale(&self, request: CancelSaleRequest) -> SalesResult<Sale> {
        debug!(sale_id = %request.sale_id, "Cancelling sale");

        let has_sale_id = !request.sale_id.trim().is_empty();

        let mut violations = Violations::new();
        violations.record(validate_reference("sale_id", &request.sale_id));
        violations.record(validate_cancel_reason(&request.reason));

        // Resolution joins the same sweep so one reply names every problem.
        let resolved = if has_sale_id {
            let found = self.sales.get_by_id(&request.sale_id).await?;
            if found.is_none() {
                violations.push(ValidationError::missing("sale", &request.sale_id));
            }
            found
        } else {
            None
        };

        violations.into_result()?;

        let mut sale = match resolved {
            Some(sale) => sale,
            None => {
                return Err(
                    Violations::from(ValidationError::missing("sale", &request.sale_id)).into(),
                )
            }
        };

        if sale.is_cancelled() {
            return Err(Conflict::SaleAlreadyCancelled(sale.id).into());
        }

        let now = Utc::now();
        let restock = sale.cancel(request.reason.trim(), now);
        let sale = self.sales.update(&sale).await?;

        // The sale is terminal on record at this point; a product that
        // disappeared since the sale was made must not block the rest.
        for (product_id, quantity) in &restock {
            if let Err(e) = self.products.adjust_stock(product_id, *quantity).await {
                warn!(
                    sale_id = %sale.id,
                    product_id = %product_id,
                    quantity,
                    error = %e,
                    "Stock hand-back failed, skipping item"
                );
            }
        }

        self.events
            .emit(SaleEvent::SaleCancelled(SaleCancelled {
                sale_id: sale.id.clone(),
                sale_number: sale.number.clone(),
                reason: request.reason.trim().to_string(),
                cancelled_at: now,
            }))
            .await;

        info!(
            sale_id = %sale.id,
            number = %sale.number,
            restocked_items = restock.len(),
            "Sale cancelled"
        );
        Ok(sale)
    }

    /// Runs the full validation sweep for a create request.
    ///
    /// Collects every broken rule before failing so the caller sees one
    /// complete report. On success returns the resolved products in request
    /// order, one per line.
    async fn validate_create(&self, request: &CreateSaleRequest) -> SalesResult<Vec<Product>> {
        let mut violations = Violations::new();

        violations.record(validate_reference("customer_id", &request.customer_id));
        if !request.customer_id.trim().is_empty() {
            match self.customers.get_by_id(&request.customer_id).await? {
                Some(customer) if customer.is_active => {}
                Some(_) => {
                    violations.push(ValidationError::inactive("customer", &request.customer_id))
                }
                None => violations.push(ValidationError::missing("customer", &request.customer_id)),
            }
        }

        violations.record(validate_reference("branch_id", &request.branch_id));
        if !request.branch_id.trim().is_empty()
            && self.branches.get_by_id(&request.branch_id).await?.is_none()
        {
            violations.push(ValidationError::missing("branch", &request.branch_id));
        }

        if request.items.is_empty() {
            violations.push(ValidationError::Required {
                field: "items".to_string(),
            });
        }

        let mut resolved = Vec::with_capacity(request.items.len());
        for line in &request.items {
            violations.record(validate_quantity(line.quantity));
            violations.record(validate_unit_price(line.unit_price_cents));
            violations.record(validate_reference("product_id", &line.product_id));
            if line.product_id.trim().is_empty() {
                continue;
            }
            match self.products.get_by_id(&line.product_id).await? {
                Some(product) if product.is_active => resolved.push(product),
                Some(_) => {
                    violations.push(ValidationError::inactive("product", &line.product_id))
                }
                None => violations.push(ValidationError::missing("product", &line.product_id)),
            }
        }

        violations.into_result()?;
        Ok(resolved)
    }
}

/// Translates stock-take failures into the caller-facing conflict shapes.
fn map_stock_error(err: StoreError) -> SalesError {
    match err {
        StoreError::InsufficientStock {
            product_id,
            available,
            requested,
        } => Conflict::InsufficientStock {
            product_id,
            available,
            requested,
        }
        .into(),
        StoreError::NotFound { id, .. } => Conflict::ProductUnavailable(id).into(),
        other => other.into(),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EventPublisher, PublishError};
    use crate::store::memory::{
        MemoryBranchStore, MemoryCustomerStore, MemoryProductStore, MemorySaleStore,
    };
    use async_trait::async_trait;
    use chrono::Utc;
    use orion_core::{Branch, Customer};
    use tokio::sync::Mutex;

    struct RecordingPublisher {
        events: Mutex<Vec<SaleEvent>>,
    }

    impl RecordingPublisher {
        fn new() -> Arc<Self> {
            Arc::new(RecordingPublisher {
                events: Mutex::new(Vec::new()),
            })
        }

        async fn take(&self) -> Vec<SaleEvent> {
            self.events.lock().await.drain(..).collect()
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, event: SaleEvent) -> Result<(), PublishError> {
            self.events.lock().await.push(event);
            Ok(())
        }
    }

    struct FailingPublisher;

    #[async_trait]
    impl EventPublisher for FailingPublisher {
        async fn publish(&self, _event: SaleEvent) -> Result<(), PublishError> {
            Err(PublishError::Unavailable("offline".to_string()))
        }
    }

    fn test_product(id: &str, price_cents: i64, stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            sku: format!("SKU-{id}"),
            name: format!("Product {id}"),
            price_cents,
            stock_quantity: stock,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn test_customer(id: &str, active: bool) -> Customer {
        Customer {
            id: id.to_string(),
            name: format!("Customer {id}"),
            email: None,
            is_active: active,
            created_at: Utc::now(),
        }
    }

    fn test_branch(id: &str) -> Branch {
        Branch {
            id: id.to_string(),
            name: format!("Branch {id}"),
            created_at: Utc::now(),
        }
    }

    fn line(product_id: &str, quantity: i64, unit_price_cents: i64) -> SaleLineRequest {
        SaleLineRequest {
            product_id: product_id.to_string(),
            quantity,
            unit_price_cents,
        }
    }

    fn request(items: Vec<SaleLineRequest>) -> CreateSaleRequest {
        CreateSaleRequest {
            customer_id: "cust-1".to_string(),
            branch_id: "branch-1".to_string(),
            items,
        }
    }

    struct Fixture {
        engine: SaleEngine,
        products: MemoryProductStore,
        customers: MemoryCustomerStore,
        sales: MemorySaleStore,
        published: Arc<RecordingPublisher>,
    }

    /// Seeded world: one active customer, one branch, prod-1 ($10.00, 50 on
    /// hand) and prod-2 ($5.00, 10 on hand).
    async fn fixture() -> Fixture {
        let products = MemoryProductStore::new();
        let customers = MemoryCustomerStore::new();
        let branches = MemoryBranchStore::new();
        let sales = MemorySaleStore::new();
        let published = RecordingPublisher::new();

        products.insert(test_product("prod-1", 1000, 50)).await;
        products.insert(test_product("prod-2", 500, 10)).await;
        customers.insert(test_customer("cust-1", true)).await;
        branches.insert(test_branch("branch-1")).await;

        let engine = SaleEngine::new(
            Arc::new(products.clone()),
            Arc::new(customers.clone()),
            Arc::new(branches.clone()),
            Arc::new(sales.clone()),
            EventEmitter::new(published.clone()),
        );

        Fixture {
            engine,
            products,
            customers,
            sales,
            published,
        }
    }

    async fn stock_of(products: &MemoryProductStore, id: &str) -> i64 {
        products
            .get_by_id(id)
            .await
            .unwrap()
            .map(|p| p.stock_quantity)
            .unwrap_or(-1)
    }

    #[tokio::test]
    async fn test_create_sale_prices_persists_and_announces() {
        let fx = fixture().await;

        let sale = fx
            .engine
            .create_sale(request(vec![
                line("prod-1", 5, 1000),
                line("prod-2", 2, 500),
            ]))
            .await
            .unwrap();

        // 5 x $10.00 at 10% off = $45.00, plus 2 x $5.00 undiscounted.
        assert_eq!(sale.number, "SALE-000001");
        assert_eq!(sale.total_cents, 5500);
        assert_eq!(sale.status, SaleStatus::Active);
        assert_eq!(sale.items.len(), 2);
        assert_eq!(sale.items[0].discount_bps, 1000);
        assert_eq!(sale.items[0].discount_cents, 500);
        assert_eq!(sale.items[0].total_cents, 4500);
        assert_eq!(sale.items[0].sku_snapshot, "SKU-prod-1");
        assert_eq!(sale.items[1].discount_cents, 0);

        assert_eq!(stock_of(&fx.products, "prod-1").await, 45);
        assert_eq!(stock_of(&fx.products, "prod-2").await, 8);

        let stored = fx.sales.get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.total_cents, 5500);

        let events = fx.published.take().await;
        assert_eq!(events.len(), 1);
        match &events[0] {
            SaleEvent::SaleCreated(created) => {
                assert_eq!(created.sale_number, "SALE-000001");
                assert_eq!(created.total_cents, 5500);
                assert_eq!(created.customer_id, "cust-1");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_reports_every_violation_at_once() {
        let fx = fixture().await;

        let err = fx
            .engine
            .create_sale(CreateSaleRequest {
                customer_id: "ghost".to_string(),
                branch_id: "branch-1".to_string(),
                items: vec![line("prod-1", 0, 0), line("nope", 1, 100)],
            })
            .await
            .unwrap_err();

        // Unknown customer, zero quantity, zero price, unknown product.
        match err {
            SalesError::Validation(violations) => assert_eq!(violations.len(), 4),
            other => panic!("expected validation error, got: {other}"),
        }
        assert_eq!(fx.sales.count().await, 0);
    }

    #[tokio::test]
    async fn test_create_rejects_oversize_quantity_without_touching_state() {
        let fx = fixture().await;

        let err = fx
            .engine
            .create_sale(request(vec![line("prod-1", 25, 1000)]))
            .await
            .unwrap_err();

        match err {
            SalesError::Validation(violations) => {
                assert_eq!(violations.len(), 1);
                assert!(violations
                    .iter()
                    .any(|v| matches!(v, ValidationError::OutOfRange { .. })));
            }
            other => panic!("expected validation error, got: {other}"),
        }
        assert_eq!(stock_of(&fx.products, "prod-1").await, 50);
        assert_eq!(fx.sales.count().await, 0);
        assert!(fx.published.take().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_with_empty_items_is_rejected() {
        let fx = fixture().await;

        let err = fx.engine.create_sale(request(vec![])).await.unwrap_err();
        match err {
            SalesError::Validation(violations) => {
                assert!(violations
                    .iter()
                    .any(|v| matches!(v, ValidationError::Required { field } if field == "items")));
            }
            other => panic!("expected validation error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_create_rejects_inactive_references() {
        let fx = fixture().await;
        fx.customers.insert(test_customer("cust-off", false)).await;
        let mut dormant = test_product("prod-off", 700, 5);
        dormant.is_active = false;
        fx.products.insert(dormant).await;

        let err = fx
            .engine
            .create_sale(CreateSaleRequest {
                customer_id: "cust-off".to_string(),
                branch_id: "branch-1".to_string(),
                items: vec![line("prod-off", 1, 700)],
            })
            .await
            .unwrap_err();

        match err {
            SalesError::Validation(violations) => {
                assert_eq!(violations.len(), 2);
                assert!(violations
                    .iter()
                    .all(|v| matches!(v, ValidationError::InactiveReference { .. })));
            }
            other => panic!("expected validation error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_create_insufficient_stock_is_a_conflict() {
        let fx = fixture().await;

        let err = fx
            .engine
            .create_sale(request(vec![line("prod-2", 15, 500)]))
            .await
            .unwrap_err();

        match err {
            SalesError::Conflict(Conflict::InsufficientStock {
                product_id,
                available,
                requested,
            }) => {
                assert_eq!(product_id, "prod-2");
                assert_eq!(available, 10);
                assert_eq!(requested, 15);
            }
            other => panic!("expected stock conflict, got: {other}"),
        }
        assert_eq!(stock_of(&fx.products, "prod-2").await, 10);
        assert_eq!(fx.sales.count().await, 0);
        assert!(fx.published.take().await.is_empty());
    }

    #[tokio::test]
    async fn test_create_duplicate_lines_can_fail_mid_take() {
        let fx = fixture().await;
        fx.products.insert(test_product("prod-dup", 200, 6)).await;

        // Each line passes the pre-check alone; the second decrement is the
        // one that discovers the shortage.
        let err = fx
            .engine
            .create_sale(request(vec![
                line("prod-dup", 4, 200),
                line("prod-dup", 4, 200),
            ]))
            .await
            .unwrap_err();

        match err {
            SalesError::Conflict(Conflict::InsufficientStock { available, .. }) => {
                assert_eq!(available, 2);
            }
            other => panic!("expected stock conflict, got: {other}"),
        }
        // The first line's decrement stands; no sale was recorded.
        assert_eq!(stock_of(&fx.products, "prod-dup").await, 2);
        assert_eq!(fx.sales.count().await, 0);
    }

    #[tokio::test]
    async fn test_sale_numbers_advance_per_sale() {
        let fx = fixture().await;

        let first = fx
            .engine
            .create_sale(request(vec![line("prod-1", 1, 1000)]))
            .await
            .unwrap();
        let second = fx
            .engine
            .create_sale(request(vec![line("prod-1", 1, 1000)]))
            .await
            .unwrap();

        assert_eq!(first.number, "SALE-000001");
        assert_eq!(second.number, "SALE-000002");
    }

    #[tokio::test]
    async fn test_create_survives_publisher_failure() {
        let products = MemoryProductStore::new();
        let customers = MemoryCustomerStore::new();
        let branches = MemoryBranchStore::new();
        let sales = MemorySaleStore::new();

        products.insert(test_product("prod-1", 1000, 50)).await;
        customers.insert(test_customer("cust-1", true)).await;
        branches.insert(test_branch("branch-1")).await;

        let engine = SaleEngine::new(
            Arc::new(products),
            Arc::new(customers),
            Arc::new(branches),
            Arc::new(sales.clone()),
            EventEmitter::new(Arc::new(FailingPublisher)),
        );

        let sale = engine
            .create_sale(request(vec![line("prod-1", 3, 1000)]))
            .await
            .unwrap();

        assert!(sales.get_by_id(&sale.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_cancel_restores_stock_and_announces() {
        let fx = fixture().await;

        let sale = fx
            .engine
            .create_sale(request(vec![line("prod-1", 5, 1000)]))
            .await
            .unwrap();
        assert_eq!(stock_of(&fx.products, "prod-1").await, 45);

        let cancelled = fx
            .engine
            .cancel_sale(CancelSaleRequest {
                sale_id: sale.id.clone(),
                reason: "Customer changed their mind".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(cancelled.status, SaleStatus::Cancelled);
        assert!(cancelled.cancelled_at.is_some());
        assert_eq!(
            cancelled.cancellation_reason.as_deref(),
            Some("Customer changed their mind")
        );
        assert!(cancelled.items.iter().all(|i| i.status == SaleStatus::Cancelled));
        // Totals stay as sold.
        assert_eq!(cancelled.total_cents, 4500);

        assert_eq!(stock_of(&fx.products, "prod-1").await, 50);

        let stored = fx.sales.get_by_id(&sale.id).await.unwrap().unwrap();
        assert!(stored.is_cancelled());

        let events = fx.published.take().await;
        assert_eq!(events.len(), 2);
        match &events[1] {
            SaleEvent::SaleCancelled(event) => {
                assert_eq!(event.sale_number, sale.number);
                assert_eq!(event.reason, "Customer changed their mind");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cancel_twice_is_a_conflict_and_moves_no_stock() {
        let fx = fixture().await;

        let sale = fx
            .engine
            .create_sale(request(vec![line("prod-1", 5, 1000)]))
            .await
            .unwrap();

        fx.engine
            .cancel_sale(CancelSaleRequest {
                sale_id: sale.id.clone(),
                reason: "first".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(stock_of(&fx.products, "prod-1").await, 50);

        let err = fx
            .engine
            .cancel_sale(CancelSaleRequest {
                sale_id: sale.id.clone(),
                reason: "second".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            SalesError::Conflict(Conflict::SaleAlreadyCancelled(id)) => assert_eq!(id, sale.id),
            other => panic!("expected already-cancelled conflict, got: {other}"),
        }
        // Stock restored exactly once.
        assert_eq!(stock_of(&fx.products, "prod-1").await, 50);
    }

    #[tokio::test]
    async fn test_cancel_unknown_sale_is_a_validation_error() {
        let fx = fixture().await;

        let err = fx
            .engine
            .cancel_sale(CancelSaleRequest {
                sale_id: "ghost".to_string(),
                reason: "whatever".to_string(),
            })
            .await
            .unwrap_err();

        match err {
            SalesError::Validation(violations) => {
                assert!(violations.iter().any(
                    |v| matches!(v, ValidationError::MissingReference { entity, .. } if entity == "sale")
                ));
            }
            other => panic!("expected validation error, got: {other}"),
        }
    }

    #[tokio::test]
    async fn test_cancel_rejects_blank_and_oversize_reasons() {
        let fx = fixture().await;

        let sale = fx
            .engine
            .create_sale(request(vec![line("prod-1", 5, 1000)]))
            .await
            .unwrap();

        for bad_reason in ["   ".to_string(), "x".repeat(501)] {
            let err = fx
                .engine
                .cancel_sale(CancelSaleRequest {
                    sale_id: sale.id.clone(),
                    reason: bad_reason,
                })
                .await
                .unwrap_err();
            assert!(matches!(err, SalesError::Validation(_)));
        }

        // Still active, stock still taken.
        let stored = fx.sales.get_by_id(&sale.id).await.unwrap().unwrap();
        assert_eq!(stored.status, SaleStatus::Active);
        assert_eq!(stock_of(&fx.products, "prod-1").await, 45);
    }

    #[tokio::test]
    async fn test_cancel_hand_back_skips_vanished_products() {
        let fx = fixture().await;

        let sale = fx
            .engine
            .create_sale(request(vec![
                line("prod-1", 5, 1000),
                line("prod-2", 2, 500),
            ]))
            .await
            .unwrap();

        fx.products.remove("prod-2").await;

        let cancelled = fx
            .engine
            .cancel_sale(CancelSaleRequest {
                sale_id: sale.id.clone(),
                reason: "Order entry mistake".to_string(),
            })
            .await
            .unwrap();

        // The missing product is skipped; the surviving one is restored.
        assert!(cancelled.is_cancelled());
        assert_eq!(stock_of(&fx.products, "prod-1").await, 50);
        assert!(fx.products.get_by_id("prod-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_then_cancel_conserves_stock() {
        let fx = fixture().await;

        let sale = fx
            .engine
            .create_sale(request(vec![
                line("prod-1", 4, 1000),
                line("prod-1", 3, 1000),
                line("prod-2", 2, 500),
            ]))
            .await
            .unwrap();
        assert_eq!(stock_of(&fx.products, "prod-1").await, 43);
        assert_eq!(stock_of(&fx.products, "prod-2").await, 8);

        fx.engine
            .cancel_sale(CancelSaleRequest {
                sale_id: sale.id.clone(),
                reason: "Full return".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(stock_of(&fx.products, "prod-1").await, 50);
        assert_eq!(stock_of(&fx.products, "prod-2").await, 10);
    }
}
