use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::model::{ModelId, Order, Product, ProductPatch};
use crate::storage::{OrderStorage, ProductStorage};

// In-memory implementation, used by tests and local runs without a database.
#[derive(Default)]
pub struct MemoryStorage {
    orders: Arc<Mutex<HashMap<ModelId, Order>>>,
    products: Arc<Mutex<HashMap<ModelId, Product>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStorage for MemoryStorage {
    async fn insert_order(&self, order: &Order) -> Result<(), StoreError> {
        let mut orders = self.orders.lock().await;
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn save_order(&self, order: &Order) -> Result<(), StoreError> {
        let mut orders = self.orders.lock().await;
        orders.insert(order.id, order.clone());
        Ok(())
    }

    async fn get_order(&self, id: ModelId) -> Result<Order, StoreError> {
        let orders = self.orders.lock().await;
        orders.get(&id).cloned().ok_or(StoreError::NotFound("order"))
    }

    async fn orders_for_email(&self, email: &str) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.lock().await;
        let mut owned: Vec<Order> = orders
            .values()
            .filter(|order| order.shipping_address.email == email)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn all_orders(&self, limit: Option<u64>) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.lock().await;
        let mut all: Vec<Order> = orders.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        if let Some(limit) = limit {
            all.truncate(limit as usize);
        }
        Ok(all)
    }

    async fn count_orders(&self) -> Result<u64, StoreError> {
        let orders = self.orders.lock().await;
        Ok(orders.len() as u64)
    }
}

#[async_trait]
impl ProductStorage for MemoryStorage {
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        let mut products = self.products.lock().await;
        products.insert(product.id, product.clone());
        Ok(())
    }

    async fn get_product(&self, id: ModelId) -> Result<Product, StoreError> {
        let products = self.products.lock().await;
        products
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("product"))
    }

    async fn all_products(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.products.lock().await;
        let mut all: Vec<Product> = products.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    async fn update_product(
        &self,
        id: ModelId,
        patch: &ProductPatch,
    ) -> Result<Product, StoreError> {
        let mut products = self.products.lock().await;
        let product = products
            .get_mut(&id)
            .ok_or(StoreError::NotFound("product"))?;
        patch.apply(product);
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ModelId) -> Result<(), StoreError> {
        let mut products = self.products.lock().await;
        products
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("product"))
    }

    async fn count_products(&self) -> Result<u64, StoreError> {
        let products = self.products.lock().await;
        Ok(products.len() as u64)
    }
}
