//! Storefront - a small marketplace backend
//!
//! This library provides the core functionality for the storefront backend:
//! user, seller and order management plus login-attempt throttling.

pub mod api;
pub mod config;
pub mod db;
pub mod models;
pub mod services;
