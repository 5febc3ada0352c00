//! Shared API request types

use serde::Deserialize;

/// Query parameters for paginated listings
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    #[serde(default = "default_page_number")]
    pub page_number: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    /// Optional `field:key` substring filter
    pub search: Option<String>,
    /// Optional `field:order` sort, defaults to email ascending
    pub sort: Option<String>,
}

fn default_page_number() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}
