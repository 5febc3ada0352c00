//! Order service
//!
//! Business logic for orders. An order carries its own credentials: the
//! buyer's password is hashed on creation and can be rotated later after
//! verifying the old one. Identity fields (buyer, email, payment method)
//! are fixed once the order exists; updates only touch the order contents.

use crate::db::repositories::{OrderRepository, OrderUpdate};
use crate::models::Order;
use crate::services::password::{hash_password, validate_password_strength, verify_password};
use std::sync::Arc;

/// Error types for order service operations
#[derive(Debug, thiserror::Error)]
pub enum OrderServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Wrong password")]
    InvalidCredentials,

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Order not found
    #[error("Unknown order")]
    NotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Input for creating an order
#[derive(Debug)]
pub struct NewOrder {
    pub buyer_name: String,
    pub email: String,
    pub password: String,
    pub items_name: String,
    pub order_quantity: i64,
    pub total_price: i64,
    pub address: String,
    pub payment_method: String,
}

/// Order service
pub struct OrderService {
    order_repo: Arc<dyn OrderRepository>,
}

impl OrderService {
    /// Create a new order service
    pub fn new(order_repo: Arc<dyn OrderRepository>) -> Self {
        Self { order_repo }
    }

    /// Create an order, hashing the buyer's password
    pub async fn create_order(&self, input: NewOrder) -> Result<Order, OrderServiceError> {
        for (field, value) in [
            ("buyer_name", &input.buyer_name),
            ("items_name", &input.items_name),
            ("address", &input.address),
            ("payment_method", &input.payment_method),
        ] {
            if value.trim().is_empty() {
                return Err(OrderServiceError::ValidationError(format!(
                    "{field} must not be empty"
                )));
            }
        }
        if input.email.trim().is_empty() || !input.email.contains('@') {
            return Err(OrderServiceError::ValidationError(
                "email must be a valid address".to_string(),
            ));
        }
        validate_password_strength(&input.password)
            .map_err(|e| OrderServiceError::ValidationError(e.to_string()))?;
        validate_amounts(input.order_quantity, input.total_price)?;

        let password_hash = hash_password(&input.password)
            .map_err(|e| OrderServiceError::InternalError(e.into()))?;
        let order = Order::new(
            input.buyer_name,
            input.email,
            password_hash,
            input.items_name,
            input.order_quantity,
            input.total_price,
            input.address,
            input.payment_method,
        );

        Ok(self.order_repo.create(&order).await?)
    }

    /// Get an order by id
    pub async fn get_order(&self, id: i64) -> Result<Order, OrderServiceError> {
        self.order_repo
            .get_by_id(id)
            .await?
            .ok_or(OrderServiceError::NotFound)
    }

    /// Update an order's contents
    pub async fn update_order(
        &self,
        id: i64,
        update: OrderUpdate,
    ) -> Result<(), OrderServiceError> {
        validate_amounts(update.order_quantity, update.total_price)?;
        if self.order_repo.get_by_id(id).await?.is_none() {
            return Err(OrderServiceError::NotFound);
        }

        Ok(self.order_repo.update_order(id, &update).await?)
    }

    /// Change an order's password after verifying the old one
    pub async fn change_password(
        &self,
        id: i64,
        old_password: &str,
        new_password: &str,
    ) -> Result<(), OrderServiceError> {
        validate_password_strength(new_password)
            .map_err(|e| OrderServiceError::ValidationError(e.to_string()))?;

        let order = self.get_order(id).await?;
        let matches = verify_password(old_password, &order.password_hash)
            .map_err(|e| OrderServiceError::InternalError(e.into()))?;
        if !matches {
            return Err(OrderServiceError::InvalidCredentials);
        }

        let new_hash = hash_password(new_password)
            .map_err(|e| OrderServiceError::InternalError(e.into()))?;
        if !self.order_repo.change_password(id, &new_hash).await? {
            return Err(OrderServiceError::NotFound);
        }
        Ok(())
    }

    /// Delete an order
    pub async fn delete_order(&self, id: i64) -> Result<(), OrderServiceError> {
        if self.order_repo.get_by_id(id).await?.is_none() {
            return Err(OrderServiceError::NotFound);
        }
        Ok(self.order_repo.delete(id).await?)
    }

    /// List all orders
    pub async fn list_orders(&self) -> Result<Vec<Order>, OrderServiceError> {
        Ok(self.order_repo.list().await?)
    }
}

fn validate_amounts(order_quantity: i64, total_price: i64) -> Result<(), OrderServiceError> {
    if order_quantity < 1 {
        return Err(OrderServiceError::ValidationError(
            "order_quantity must be at least 1".to_string(),
        ));
    }
    if total_price < 0 {
        return Err(OrderServiceError::ValidationError(
            "total_price must not be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxOrderRepository;
    use crate::db::{create_test_pool, migrations};

    const PASSWORD: &str = "Secret.123";

    async fn setup() -> OrderService {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        OrderService::new(SqlxOrderRepository::boxed(pool))
    }

    fn new_order(email: &str) -> NewOrder {
        NewOrder {
            buyer_name: "Hans".to_string(),
            email: email.to_string(),
            password: PASSWORD.to_string(),
            items_name: "Widget".to_string(),
            order_quantity: 2,
            total_price: 3998,
            address: "1 Main Street".to_string(),
            payment_method: "card".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_order_hashes_password() {
        let service = setup().await;

        let created = service
            .create_order(new_order("hans@example.com"))
            .await
            .expect("Failed to create");
        assert!(created.id > 0);
        assert!(created.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_create_order_rejects_weak_password() {
        let service = setup().await;

        let mut input = new_order("hans@example.com");
        input.password = "weak".to_string();
        let err = service
            .create_order(input)
            .await
            .expect_err("Weak password should fail");
        assert!(matches!(err, OrderServiceError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_create_order_rejects_empty_fields() {
        let service = setup().await;

        let mut input = new_order("hans@example.com");
        input.buyer_name = "  ".to_string();
        assert!(matches!(
            service.create_order(input).await,
            Err(OrderServiceError::ValidationError(_))
        ));

        let input = new_order("not-an-email");
        assert!(matches!(
            service.create_order(input).await,
            Err(OrderServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_create_order_rejects_bad_amounts() {
        let service = setup().await;

        let mut input = new_order("hans@example.com");
        input.order_quantity = 0;
        assert!(service.create_order(input).await.is_err());

        let mut input = new_order("hans@example.com");
        input.total_price = -1;
        assert!(service.create_order(input).await.is_err());
    }

    #[tokio::test]
    async fn test_update_order_contents() {
        let service = setup().await;

        let created = service
            .create_order(new_order("hans@example.com"))
            .await
            .expect("Failed to create");

        service
            .update_order(
                created.id,
                OrderUpdate {
                    items_name: "Gadget".to_string(),
                    order_quantity: 5,
                    total_price: 9995,
                    address: "2 Side Street".to_string(),
                },
            )
            .await
            .expect("Failed to update");

        let fetched = service.get_order(created.id).await.expect("Failed to get");
        assert_eq!(fetched.items_name, "Gadget");
        assert_eq!(fetched.buyer_name, "Hans");
    }

    #[tokio::test]
    async fn test_change_password_requires_old_password() {
        let service = setup().await;

        let created = service
            .create_order(new_order("hans@example.com"))
            .await
            .expect("Failed to create");

        let err = service
            .change_password(created.id, "Wrong.123", "NewPass.1")
            .await
            .expect_err("Wrong old password should fail");
        assert!(matches!(err, OrderServiceError::InvalidCredentials));

        service
            .change_password(created.id, PASSWORD, "NewPass.1")
            .await
            .expect("Failed to change password");
    }

    #[tokio::test]
    async fn test_unknown_order_errors() {
        let service = setup().await;

        assert!(matches!(
            service.get_order(42).await,
            Err(OrderServiceError::NotFound)
        ));
        assert!(matches!(
            service.delete_order(42).await,
            Err(OrderServiceError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_delete_and_list() {
        let service = setup().await;

        let a = service
            .create_order(new_order("a@example.com"))
            .await
            .expect("Failed to create");
        service
            .create_order(new_order("b@example.com"))
            .await
            .expect("Failed to create");

        service.delete_order(a.id).await.expect("Failed to delete");

        let all = service.list_orders().await.expect("Failed to list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].email, "b@example.com");
    }
}
