//! # Sale Lifecycle Demo
//!
//! Seeds the in-memory stores with a small catalog, then walks a sale
//! through its whole life: created, a rejected variant, cancelled, with
//! every emitted event printed at the end.
//!
//! ## Usage
//! ```bash
//! cargo run --bin demo
//!
//! # With engine-level logging:
//! RUST_LOG=debug cargo run --bin demo
//! ```

use std::sync::Arc;

use chrono::Utc;
use orion_core::{Branch, Customer, Product};
use orion_sales::store::memory::{
    MemoryBranchStore, MemoryCustomerStore, MemoryProductStore, MemorySaleStore,
};
use orion_sales::store::ProductStore;
use orion_sales::{
    BroadcastPublisher, CancelSaleRequest, CreateSaleRequest, EventEmitter, SaleEngine,
    SaleLineRequest,
};
use tracing_subscriber::EnvFilter;

/// Catalog rows: (id, sku, name, price in cents, stock on hand).
const PRODUCTS: &[(&str, &str, &str, i64, i64)] = &[
    ("prod-espresso", "BEV-ESP-250", "Espresso Roast 250g", 1250, 40),
    ("prod-grinder", "EQP-GRD-001", "Hand Burr Grinder", 8900, 12),
    ("prod-filters", "ACC-FLT-100", "Paper Filters (100 pack)", 450, 200),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!("🛒 Orion sale lifecycle demo");
    println!();

    let products = MemoryProductStore::new();
    let customers = MemoryCustomerStore::new();
    let branches = MemoryBranchStore::new();
    let sales = MemorySaleStore::new();

    let now = Utc::now();
    for (id, sku, name, price_cents, stock) in PRODUCTS {
        products
            .insert(Product {
                id: id.to_string(),
                sku: sku.to_string(),
                name: name.to_string(),
                price_cents: *price_cents,
                stock_quantity: *stock,
                is_active: true,
                created_at: now,
                updated_at: now,
            })
            .await;
    }
    customers
        .insert(Customer {
            id: "cust-ada".to_string(),
            name: "Ada Moreno".to_string(),
            email: Some("ada@example.com".to_string()),
            is_active: true,
            created_at: now,
        })
        .await;
    branches
        .insert(Branch {
            id: "branch-main".to_string(),
            name: "Main Street".to_string(),
            created_at: now,
        })
        .await;
    println!("✓ Seeded {} products, 1 customer, 1 branch", PRODUCTS.len());

    let publisher = Arc::new(BroadcastPublisher::default());
    let mut events = publisher.subscribe();
    let engine = SaleEngine::new(
        Arc::new(products.clone()),
        Arc::new(customers),
        Arc::new(branches),
        Arc::new(sales),
        EventEmitter::new(publisher.clone()),
    );

    // A request the ladder rewards: 5 bags hit the 10% tier, 12 filter
    // packs hit the 20% tier.
    let sale = engine
        .create_sale(CreateSaleRequest {
            customer_id: "cust-ada".to_string(),
            branch_id: "branch-main".to_string(),
            items: vec![
                SaleLineRequest {
                    product_id: "prod-espresso".to_string(),
                    quantity: 5,
                    unit_price_cents: 1250,
                },
                SaleLineRequest {
                    product_id: "prod-filters".to_string(),
                    quantity: 12,
                    unit_price_cents: 450,
                },
            ],
        })
        .await?;

    println!();
    println!("✓ Created {} for {}", sale.number, sale.total());
    for item in &sale.items {
        println!(
            "    {} x{} at {} ({} off) = {}",
            item.name_snapshot,
            item.quantity,
            item.unit_price(),
            item.discount(),
            item.total()
        );
    }
    println!();
    println!("  As stored:");
    println!("{}", serde_json::to_string_pretty(&sale)?);
    print_stock(&products).await?;

    // An oversize line is refused outright, stock untouched.
    let rejected = engine
        .create_sale(CreateSaleRequest {
            customer_id: "cust-ada".to_string(),
            branch_id: "branch-main".to_string(),
            items: vec![SaleLineRequest {
                product_id: "prod-grinder".to_string(),
                quantity: 25,
                unit_price_cents: 8900,
            }],
        })
        .await;
    if let Err(e) = rejected {
        println!();
        println!("⚠ Oversize request rejected: {e}");
    }

    let cancelled = engine
        .cancel_sale(CancelSaleRequest {
            sale_id: sale.id.clone(),
            reason: "Customer returned the whole order".to_string(),
        })
        .await?;

    println!();
    println!(
        "✓ Cancelled {} ({})",
        cancelled.number,
        cancelled.cancellation_reason.as_deref().unwrap_or("-")
    );
    print_stock(&products).await?;

    println!();
    println!("Events seen on the broadcast channel:");
    while let Ok(event) = events.try_recv() {
        println!("  [{}] {}", event.name(), serde_json::to_string(&event)?);
    }

    Ok(())
}

async fn print_stock(products: &MemoryProductStore) -> Result<(), Box<dyn std::error::Error>> {
    println!("  Stock on hand:");
    for (id, _, name, _, _) in PRODUCTS {
        if let Some(product) = products.get_by_id(id).await? {
            println!("    {:<26} {}", name, product.stock_quantity);
        }
    }
    Ok(())
}
