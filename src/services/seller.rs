//! Seller service
//!
//! Business logic for seller product listings. Product names are unique;
//! updates after creation only touch stock and description, price changes
//! go through their own operation.

use crate::db::repositories::SellerRepository;
use crate::models::Seller;
use std::sync::Arc;

/// Error types for seller service operations
#[derive(Debug, thiserror::Error)]
pub enum SellerServiceError {
    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Product name is already taken
    #[error("Product already listed: {0}")]
    ProductNameTaken(String),

    /// Listing not found
    #[error("Unknown listing")]
    NotFound,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Seller service
pub struct SellerService {
    seller_repo: Arc<dyn SellerRepository>,
}

impl SellerService {
    /// Create a new seller service
    pub fn new(seller_repo: Arc<dyn SellerRepository>) -> Self {
        Self { seller_repo }
    }

    /// Create a listing. The product name must not already be listed.
    pub async fn create_listing(
        &self,
        product_name: &str,
        price: i64,
        stock: i64,
        product_description: &str,
    ) -> Result<Seller, SellerServiceError> {
        if product_name.trim().is_empty() {
            return Err(SellerServiceError::ValidationError(
                "product_name must not be empty".to_string(),
            ));
        }
        validate_amounts(price, stock)?;

        if self
            .seller_repo
            .get_by_product_name(product_name)
            .await?
            .is_some()
        {
            return Err(SellerServiceError::ProductNameTaken(
                product_name.to_string(),
            ));
        }

        let seller = Seller::new(
            product_name.to_string(),
            price,
            stock,
            product_description.to_string(),
        );
        Ok(self.seller_repo.create(&seller).await?)
    }

    /// Get a listing by id
    pub async fn get_listing(&self, id: i64) -> Result<Seller, SellerServiceError> {
        self.seller_repo
            .get_by_id(id)
            .await?
            .ok_or(SellerServiceError::NotFound)
    }

    /// Update a listing's stock and description
    pub async fn update_listing(
        &self,
        id: i64,
        stock: i64,
        product_description: &str,
    ) -> Result<(), SellerServiceError> {
        if stock < 0 {
            return Err(SellerServiceError::ValidationError(
                "stock must not be negative".to_string(),
            ));
        }
        if self.seller_repo.get_by_id(id).await?.is_none() {
            return Err(SellerServiceError::NotFound);
        }

        Ok(self
            .seller_repo
            .update_listing(id, stock, product_description)
            .await?)
    }

    /// Change a listing's price
    pub async fn change_price(&self, id: i64, price: i64) -> Result<(), SellerServiceError> {
        if price < 0 {
            return Err(SellerServiceError::ValidationError(
                "price must not be negative".to_string(),
            ));
        }
        if !self.seller_repo.change_price(id, price).await? {
            return Err(SellerServiceError::NotFound);
        }
        Ok(())
    }

    /// Delete a listing
    pub async fn delete_listing(&self, id: i64) -> Result<(), SellerServiceError> {
        if self.seller_repo.get_by_id(id).await?.is_none() {
            return Err(SellerServiceError::NotFound);
        }
        Ok(self.seller_repo.delete(id).await?)
    }

    /// List all listings
    pub async fn list_listings(&self) -> Result<Vec<Seller>, SellerServiceError> {
        Ok(self.seller_repo.list().await?)
    }
}

fn validate_amounts(price: i64, stock: i64) -> Result<(), SellerServiceError> {
    if price < 0 {
        return Err(SellerServiceError::ValidationError(
            "price must not be negative".to_string(),
        ));
    }
    if stock < 0 {
        return Err(SellerServiceError::ValidationError(
            "stock must not be negative".to_string(),
        ));
    }
    Ok(())
}
