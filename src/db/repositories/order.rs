//! Order repository
//!
//! Database operations for orders.

use crate::db::DbPool;
use crate::models::Order;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;
use std::sync::Arc;

/// Fields an order update may change; everything else is immutable after
/// creation.
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub items_name: String,
    pub order_quantity: i64,
    pub total_price: i64,
    pub address: String,
}

/// Order repository trait
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Create a new order
    async fn create(&self, order: &Order) -> Result<Order>;

    /// Get order by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Order>>;

    /// Get order by buyer email
    async fn get_by_email(&self, email: &str) -> Result<Option<Order>>;

    /// Update an order's mutable fields
    async fn update_order(&self, id: i64, update: &OrderUpdate) -> Result<()>;

    /// Replace an order's password hash
    async fn change_password(&self, id: i64, password_hash: &str) -> Result<bool>;

    /// Delete an order
    async fn delete(&self, id: i64) -> Result<()>;

    /// List all orders
    async fn list(&self) -> Result<Vec<Order>>;
}

/// SQLx-based order repository implementation
pub struct SqlxOrderRepository {
    pool: DbPool,
}

impl SqlxOrderRepository {
    /// Create a new SQLx order repository
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DbPool) -> Arc<dyn OrderRepository> {
        Arc::new(Self::new(pool))
    }
}

const ORDER_COLUMNS: &str = "id, buyer_name, email, password_hash, items_name, order_quantity, total_price, address, payment_method, created_at, updated_at";

#[async_trait]
impl OrderRepository for SqlxOrderRepository {
    async fn create(&self, order: &Order) -> Result<Order> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO orders (buyer_name, email, password_hash, items_name, order_quantity,
                                total_price, address, payment_method, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&order.buyer_name)
        .bind(&order.email)
        .bind(&order.password_hash)
        .bind(&order.items_name)
        .bind(order.order_quantity)
        .bind(order.total_price)
        .bind(&order.address)
        .bind(&order.payment_method)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .context("Failed to create order")?;

        let mut created = order.clone();
        created.id = result.last_insert_rowid();
        created.created_at = now;
        created.updated_at = now;
        Ok(created)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE id = ?", ORDER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get order by ID")?;

        row.map(|row| row_to_order(&row)).transpose()
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<Order>> {
        let sql = format!("SELECT {} FROM orders WHERE email = ? LIMIT 1", ORDER_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to get order by email")?;

        row.map(|row| row_to_order(&row)).transpose()
    }

    async fn update_order(&self, id: i64, update: &OrderUpdate) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE orders
            SET items_name = ?, order_quantity = ?, total_price = ?, address = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.items_name)
        .bind(update.order_quantity)
        .bind(update.total_price)
        .bind(&update.address)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to update order")?;

        Ok(())
    }

    async fn change_password(&self, id: i64, password_hash: &str) -> Result<bool> {
        let result =
            sqlx::query("UPDATE orders SET password_hash = ?, updated_at = ? WHERE id = ?")
                .bind(password_hash)
                .bind(Utc::now())
                .bind(id)
                .execute(&self.pool)
                .await
                .context("Failed to change password")?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("Failed to delete order")?;

        Ok(())
    }

    async fn list(&self) -> Result<Vec<Order>> {
        let sql = format!("SELECT {} FROM orders ORDER BY id", ORDER_COLUMNS);
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("Failed to list orders")?;

        rows.iter().map(row_to_order).collect()
    }
}

fn row_to_order(row: &sqlx::sqlite::SqliteRow) -> Result<Order> {
    Ok(Order {
        id: row.get("id"),
        buyer_name: row.get("buyer_name"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        items_name: row.get("items_name"),
        order_quantity: row.get("order_quantity"),
        total_price: row.get("total_price"),
        address: row.get("address"),
        payment_method: row.get("payment_method"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};

    async fn setup() -> SqlxOrderRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxOrderRepository::new(pool)
    }

    fn order(email: &str) -> Order {
        Order::new(
            "Hans".to_string(),
            email.to_string(),
            "hash".to_string(),
            "Widget".to_string(),
            2,
            3998,
            "1 Main Street".to_string(),
            "card".to_string(),
        )
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let repo = setup().await;

        let created = repo
            .create(&order("hans@example.com"))
            .await
            .expect("Failed to create");
        assert!(created.id > 0);

        let by_id = repo
            .get_by_id(created.id)
            .await
            .expect("query failed")
            .expect("Order should exist");
        assert_eq!(by_id.items_name, "Widget");
        assert_eq!(by_id.order_quantity, 2);

        let by_email = repo
            .get_by_email("hans@example.com")
            .await
            .expect("query failed")
            .expect("Order should exist");
        assert_eq!(by_email.id, created.id);
    }

    #[tokio::test]
    async fn test_update_order_leaves_identity_fields() {
        let repo = setup().await;

        let created = repo
            .create(&order("hans@example.com"))
            .await
            .expect("Failed to create");

        repo.update_order(
            created.id,
            &OrderUpdate {
                items_name: "Gadget".to_string(),
                order_quantity: 5,
                total_price: 9995,
                address: "2 Side Street".to_string(),
            },
        )
        .await
        .expect("Failed to update");

        let updated = repo
            .get_by_id(created.id)
            .await
            .expect("query failed")
            .expect("Order should exist");
        assert_eq!(updated.items_name, "Gadget");
        assert_eq!(updated.order_quantity, 5);
        assert_eq!(updated.total_price, 9995);
        assert_eq!(updated.address, "2 Side Street");
        assert_eq!(updated.buyer_name, "Hans");
        assert_eq!(updated.email, "hans@example.com");
        assert_eq!(updated.payment_method, "card");
    }

    #[tokio::test]
    async fn test_change_password() {
        let repo = setup().await;

        let created = repo
            .create(&order("hans@example.com"))
            .await
            .expect("Failed to create");

        assert!(repo
            .change_password(created.id, "new-hash")
            .await
            .expect("query failed"));
        assert!(!repo
            .change_password(999, "new-hash")
            .await
            .expect("query failed"));
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let repo = setup().await;

        let a = repo
            .create(&order("a@example.com"))
            .await
            .expect("Failed to create");
        repo.create(&order("b@example.com"))
            .await
            .expect("Failed to create");

        repo.delete(a.id).await.expect("Failed to delete");

        let all = repo.list().await.expect("Failed to list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].email, "b@example.com");
    }
}
