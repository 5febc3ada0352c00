//! Database layer
//!
//! SQLite-backed persistence for the storefront backend. The layer provides:
//! - connection pool creation (`pool`)
//! - code-based migrations embedded in the binary (`migrations`)
//! - repository traits and their sqlx implementations (`repositories`)

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{create_pool, create_test_pool, DbPool};
