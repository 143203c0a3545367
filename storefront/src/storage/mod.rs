// Re-export all storage-related modules
pub mod memory;
pub mod pg;

pub use memory::*;
pub use pg::*;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::model::{ModelId, Order, Product, ProductPatch};

/// Persistence seam for orders. Single-record operations only; the
/// lifecycle controller composes them and no notification concern leaks in
/// here.
#[async_trait]
pub trait OrderStorage: Send + Sync {
    async fn insert_order(&self, order: &Order) -> Result<(), StoreError>;

    /// Full-document upsert of an existing order. Last write wins.
    async fn save_order(&self, order: &Order) -> Result<(), StoreError>;

    async fn get_order(&self, id: ModelId) -> Result<Order, StoreError>;

    /// Orders owned by the given customer email, newest first.
    async fn orders_for_email(&self, email: &str) -> Result<Vec<Order>, StoreError>;

    /// All orders newest first, optionally limited.
    async fn all_orders(&self, limit: Option<u64>) -> Result<Vec<Order>, StoreError>;

    async fn count_orders(&self) -> Result<u64, StoreError>;
}

#[async_trait]
pub trait ProductStorage: Send + Sync {
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError>;

    async fn get_product(&self, id: ModelId) -> Result<Product, StoreError>;

    async fn all_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn update_product(
        &self,
        id: ModelId,
        patch: &ProductPatch,
    ) -> Result<Product, StoreError>;

    async fn delete_product(&self, id: ModelId) -> Result<(), StoreError>;

    async fn count_products(&self) -> Result<u64, StoreError>;
}
