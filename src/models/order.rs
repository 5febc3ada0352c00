//! Order model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A buyer's order.
///
/// Orders carry their own credentials (the buyer sets a password when
/// placing the order); only the Argon2id hash is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Unique identifier
    pub id: i64,
    /// Name of the buyer
    pub buyer_name: String,
    /// Buyer's email address
    pub email: String,
    /// Password hash (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Name of the ordered items
    pub items_name: String,
    /// Quantity ordered
    pub order_quantity: i64,
    /// Total price in minor currency units
    pub total_price: i64,
    /// Shipping address
    pub address: String,
    /// Payment method used
    pub payment_method: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a new Order.
    ///
    /// The password must already be hashed; use
    /// `services::password::hash_password()`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        buyer_name: String,
        email: String,
        password_hash: String,
        items_name: String,
        order_quantity: i64,
        total_price: i64,
        address: String,
        payment_method: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0, // Set by the database
            buyer_name,
            email,
            password_hash,
            items_name,
            order_quantity,
            total_price,
            address,
            payment_method,
            created_at: now,
            updated_at: now,
        }
    }
}
