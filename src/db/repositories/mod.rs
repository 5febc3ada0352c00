//! Repositories
//!
//! Data access for the storefront entities. Each entity gets a trait
//! describing its storage operations plus a sqlx implementation, so services
//! depend on the trait and tests can run against an in-memory database.

pub mod order;
pub mod seller;
pub mod user;

pub use order::{OrderRepository, OrderUpdate, SqlxOrderRepository};
pub use seller::{SellerRepository, SqlxSellerRepository};
pub use user::{SortOrder, SqlxUserRepository, UserField, UserListQuery, UserRepository};
