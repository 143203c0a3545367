use async_trait::async_trait;
use sqlx::Row;
use tracing::{debug, error, info};

use crate::error::StoreError;
use crate::model::{ModelId, Order, Product, ProductPatch};
use crate::storage::{OrderStorage, ProductStorage};

/// Document-style PostgreSQL storage. Orders and products live as whole
/// JSONB documents; the columns next to the document exist only for lookups
/// and ordering.
pub struct PgStorage {
    pub pool: sqlx::PgPool,
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id UUID PRIMARY KEY,
    customer_email TEXT NOT NULL,
    created_at TIMESTAMPTZ NOT NULL,
    doc JSONB NOT NULL
);
CREATE TABLE IF NOT EXISTS products (
    id UUID PRIMARY KEY,
    created_at TIMESTAMPTZ NOT NULL,
    doc JSONB NOT NULL
);
"#;

impl PgStorage {
    pub async fn new(database_url: &str) -> Result<Self, StoreError> {
        let pool = sqlx::PgPool::connect(database_url).await?;
        for statement in SCHEMA.split(';').filter(|s| !s.trim().is_empty()) {
            sqlx::query(statement).execute(&pool).await?;
        }
        info!("Connected to document store");
        Ok(Self { pool })
    }

    fn decode_order(row: &sqlx::postgres::PgRow) -> Result<Order, StoreError> {
        let doc: serde_json::Value = row.try_get("doc")?;
        Ok(serde_json::from_value(doc)?)
    }

    fn decode_product(row: &sqlx::postgres::PgRow) -> Result<Product, StoreError> {
        let doc: serde_json::Value = row.try_get("doc")?;
        Ok(serde_json::from_value(doc)?)
    }
}

#[async_trait]
impl OrderStorage for PgStorage {
    async fn insert_order(&self, order: &Order) -> Result<(), StoreError> {
        debug!("Inserting order record for order: {}", order.id);
        let doc = serde_json::to_value(order)?;
        match sqlx::query(
            r#"
            INSERT INTO orders (id, customer_email, created_at, doc)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(order.id)
        .bind(&order.shipping_address.email)
        .bind(order.created_at)
        .bind(doc)
        .execute(&self.pool)
        .await
        {
            Ok(_) => {
                debug!("Successfully inserted order record");
                Ok(())
            }
            Err(e) => {
                error!("Failed to insert order record: {}", e);
                Err(e.into())
            }
        }
    }

    async fn save_order(&self, order: &Order) -> Result<(), StoreError> {
        debug!("Saving order document for order: {}", order.id);
        let doc = serde_json::to_value(order)?;
        let result = sqlx::query(
            r#"
            UPDATE orders SET doc = $2 WHERE id = $1
            "#,
        )
        .bind(order.id)
        .bind(doc)
        .execute(&self.pool)
        .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("order"));
        }
        Ok(())
    }

    async fn get_order(&self, id: ModelId) -> Result<Order, StoreError> {
        debug!("Getting order data for order: {}", id);
        let row = sqlx::query(r#"SELECT doc FROM orders WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("order"))?;
        Self::decode_order(&row)
    }

    async fn orders_for_email(&self, email: &str) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT doc FROM orders
            WHERE customer_email = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(email)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::decode_order).collect()
    }

    async fn all_orders(&self, limit: Option<u64>) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT doc FROM orders
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit.map(|l| l as i64))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::decode_order).collect()
    }

    async fn count_orders(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM orders"#)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}

#[async_trait]
impl ProductStorage for PgStorage {
    async fn insert_product(&self, product: &Product) -> Result<(), StoreError> {
        debug!("Inserting product record for product: {}", product.id);
        let doc = serde_json::to_value(product)?;
        match sqlx::query(
            r#"
            INSERT INTO products (id, created_at, doc)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(product.id)
        .bind(product.created_at)
        .bind(doc)
        .execute(&self.pool)
        .await
        {
            Ok(_) => Ok(()),
            Err(e) => {
                error!("Failed to insert product record: {}", e);
                Err(e.into())
            }
        }
    }

    async fn get_product(&self, id: ModelId) -> Result<Product, StoreError> {
        let row = sqlx::query(r#"SELECT doc FROM products WHERE id = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound("product"))?;
        Self::decode_product(&row)
    }

    async fn all_products(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(r#"SELECT doc FROM products ORDER BY created_at DESC"#)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(Self::decode_product).collect()
    }

    async fn update_product(
        &self,
        id: ModelId,
        patch: &ProductPatch,
    ) -> Result<Product, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query(r#"SELECT doc FROM products WHERE id = $1 FOR UPDATE"#)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound("product"))?;
        let mut product = Self::decode_product(&row)?;
        patch.apply(&mut product);
        let doc = serde_json::to_value(&product)?;
        sqlx::query(r#"UPDATE products SET doc = $2 WHERE id = $1"#)
            .bind(id)
            .bind(doc)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(product)
    }

    async fn delete_product(&self, id: ModelId) -> Result<(), StoreError> {
        let result = sqlx::query(r#"DELETE FROM products WHERE id = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("product"));
        }
        Ok(())
    }

    async fn count_products(&self) -> Result<u64, StoreError> {
        let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM products"#)
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
