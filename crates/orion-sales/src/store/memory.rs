//! # In-Memory Stores
//!
//! Reference implementations of the store contracts over shared hash maps.
//! Tests and the demo binary run on these; a real deployment swaps in a
//! database-backed implementation of the same traits.
//!
//! All four stores are cheap to clone: clones share the same underlying
//! map, so a test can keep a handle for seeding and assertions while the
//! engine holds its own.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use orion_core::{Branch, Customer, Product, Sale};
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    BranchStore, CustomerStore, ProductStore, SaleStore, StoreError, StoreResult,
};

// =============================================================================
// Products
// =============================================================================

/// Product catalog held in a shared map keyed by product ID.
#[derive(Clone, Default)]
pub struct MemoryProductStore {
    products: Arc<RwLock<HashMap<String, Product>>>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a product, replacing any existing record with the same ID.
    pub async fn insert(&self, product: Product) {
        self.products
            .write()
            .await
            .insert(product.id.clone(), product);
    }

    /// Removes a product outright. Used to simulate catalog drift.
    pub async fn remove(&self, id: &str) -> Option<Product> {
        self.products.write().await.remove(id)
    }
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Product>> {
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn update(&self, product: &Product) -> StoreResult<Product> {
        let mut products = self.products.write().await;
        if !products.contains_key(&product.id) {
            return Err(StoreError::not_found("Product", &product.id));
        }
        products.insert(product.id.clone(), product.clone());
        Ok(product.clone())
    }

    async fn adjust_stock(&self, id: &str, delta: i64) -> StoreResult<i64> {
        let mut products = self.products.write().await;
        let product = products
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;

        let next = product.stock_quantity + delta;
        if next < 0 {
            return Err(StoreError::InsufficientStock {
                product_id: id.to_string(),
                available: product.stock_quantity,
                requested: -delta,
            });
        }

        product.stock_quantity = next;
        debug!(id = %id, delta = %delta, stock = %next, "Adjusted stock");
        Ok(next)
    }
}

// =============================================================================
// Customers
// =============================================================================

/// Customer records held in a shared map keyed by customer ID.
#[derive(Clone, Default)]
pub struct MemoryCustomerStore {
    customers: Arc<RwLock<HashMap<String, Customer>>>,
}

impl MemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, customer: Customer) {
        self.customers
            .write()
            .await
            .insert(customer.id.clone(), customer);
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Customer>> {
        Ok(self.customers.read().await.get(id).cloned())
    }
}

// =============================================================================
// Branches
// =============================================================================

/// Branch records held in a shared map keyed by branch ID.
#[derive(Clone, Default)]
pub struct MemoryBranchStore {
    branches: Arc<RwLock<HashMap<String, Branch>>>,
}

impl MemoryBranchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, branch: Branch) {
        self.branches
            .write()
            .await
            .insert(branch.id.clone(), branch);
    }
}

#[async_trait]
impl BranchStore for MemoryBranchStore {
    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Branch>> {
        Ok(self.branches.read().await.get(id).cloned())
    }
}

// =============================================================================
// Sales
// =============================================================================

/// Sales held in a shared map, plus the business-number sequence.
#[derive(Clone, Default)]
pub struct MemorySaleStore {
    sales: Arc<RwLock<HashMap<String, Sale>>>,
    sequence: Arc<AtomicU64>,
}

impl MemorySaleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sales currently stored.
    pub async fn count(&self) -> usize {
        self.sales.read().await.len()
    }
}

#[async_trait]
impl SaleStore for MemorySaleStore {
    async fn create(&self, sale: Sale) -> StoreResult<Sale> {
        let mut sales = self.sales.write().await;
        if sales.contains_key(&sale.id) {
            return Err(StoreError::duplicate("sale id", &sale.id));
        }
        if sales.values().any(|existing| existing.number == sale.number) {
            return Err(StoreError::duplicate("sale number", &sale.number));
        }
        debug!(
            id = %sale.id,
            number = %sale.number,
            items = sale.items.len(),
            "Inserting sale"
        );
        sales.insert(sale.id.clone(), sale.clone());
        Ok(sale)
    }

    async fn get_by_id(&self, id: &str) -> StoreResult<Option<Sale>> {
        Ok(self.sales.read().await.get(id).cloned())
    }

    async fn update(&self, sale: &Sale) -> StoreResult<Sale> {
        let mut sales = self.sales.write().await;
        if !sales.contains_key(&sale.id) {
            return Err(StoreError::not_found("Sale", &sale.id));
        }
        sales.insert(sale.id.clone(), sale.clone());
        Ok(sale.clone())
    }

    async fn next_sale_number(&self) -> StoreResult<String> {
        let n = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("SALE-{:06}", n))
    }
}

// =============================================================================
// Tests
// =============================================================================
