//! Data models
//!
//! Entities persisted by the storefront backend.

pub mod order;
pub mod seller;
pub mod user;

pub use order::Order;
pub use seller::Seller;
pub use user::User;
