//! Seller model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A seller's product listing.
///
/// Price is stored in minor currency units (cents) to avoid floating point
/// rounding in totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    /// Unique identifier
    pub id: i64,
    /// Product name (unique)
    pub product_name: String,
    /// Price in minor currency units
    pub price: i64,
    /// Units in stock
    pub stock: i64,
    /// Free-form product description
    pub product_description: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Seller {
    /// Create a new Seller listing
    pub fn new(product_name: String, price: i64, stock: i64, product_description: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Set by the database
            product_name,
            price,
            stock,
            product_description,
            created_at: now,
            updated_at: now,
        }
    }
}
