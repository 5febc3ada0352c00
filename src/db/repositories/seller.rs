//! Seller repository
//!
//! Database operations for seller product listings.

use crate::db::DbPool;
use crate::models::Seller;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Seller repository trait
#[async_trait]
pub trait SellerRepository: Send + Sync {
    /// Create a new listing
    async fn create(&self, seller: &Seller) -> Result<Seller>;

    /// Get listing by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Seller>>;

    /// Get listing by product name
    async fn get_by_product_name(&self, product_name: &str) -> Result<Option<Seller>>;

    /// Update a listing's stock and description
    async fn update_listing(&self, id: i64, stock: i64, product_description: &str) -> Result<()>;

    /// Replace a listing's price
    async fn change_price(&self, id: i64, price: i64) -> Result<bool>;

    /// Delete a listing
    async fn delete(&self, id: i64) -> Result<()>;

    /// List all listings
    async fn list(&self) -> Result<Vec<Seller>>;
}

/// SQLx-based seller repository implementation
pub struct SqlxSellerRepository {
    pool: DbPool,
}

impl SqlxSellerRepository {
    /// Create a new SQLx seller repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn SellerRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SellerRepository for SqlxSellerRepository {
    async fn create(&self, seller: &Seller) -> Result<Seller> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO sellers (product_name, price, stock, product_description, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&seller.product_name)
        .bind(seller.price)
        .bind(seller.stock)
        .bind(&seller.product_description)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create seller")?;

        Ok(Seller {
            id: result.last_insert_rowid(),
            product_name: seller.product_name.clone(),
            price: seller.price,
            stock: seller.stock,
            product_description: seller.product_description.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Seller>> {
        let row = sqlx::query(
            r#"
            SELECT id, product_name, price, stock, product_description, created_at, updated_at
            FROM sellers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get seller by ID")?;

        row.map(|row| row_to_seller(&row)).transpose()
    }

    async fn get_by_product_name(&self, product_name: &str) -> Result<Option<Seller>> {
        let row = sqlx::query(
            r#"
            SELECT id, product_name, price, stock, product_description, created_at, updated_at
            FROM sellers
            WHERE product_name = ?
            "#,
        )
        .bind(product_name)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to get seller by product name")?;

        row.map(|row| row_to_seller(&row)).transpose()
    }

    async fn update_listing(&self, id: i64, stock: i64, product_description: &str) -> Result<()> {
        sqlx::query(
            "UPDATE sellers SET stock = ?, product_description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(stock)
        .bind(product_description)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update seller")?;

        Ok(())
    }

    async fn change_price(&self, id: i64, price: i64) -> Result<bool> {
        let result = sqlx::query("UPDATE sellers SET price = ?, updated_at = ? WHERE id = ?")
            .bind(price)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to change price")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM sellers WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete seller")?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Seller>> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_name, price, stock, product_description, created_at, updated_at
            FROM sellers
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list sellers")?;

        rows.iter().map(row_to_seller).collect()
    }
}

fn row_to_seller(row: &sqlx::sqlite::SqliteRow) -> Result<Seller> {
    Ok(Seller {
        id: row.get("id"),
        product_name: row.get("product_name"),
        price: row.get("price"),
        stock: row.get("stock"),
        product_description: row.get("product_description"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
