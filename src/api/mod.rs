//! API layer - HTTP handlers and routing
//!
//! HTTP endpoints for the storefront:
//! - Auth endpoints (login)
//! - User endpoints (CRUD, password change, paginated listing)
//! - Seller endpoints (CRUD, price change)
//! - Order endpoints (CRUD, password change)

pub mod auth;
pub mod common;
pub mod error;
pub mod orders;
pub mod sellers;
pub mod users;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::services::{OrderService, SellerService, UserService};

pub use error::{ApiError, ApiErrorDetail};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub seller_service: Arc<SellerService>,
    pub order_service: Arc<OrderService>,
}

/// Build the main API router
pub fn build_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/sellers", sellers::router())
        .nest("/orders", orders::router())
}

/// Build the complete router with middleware
pub fn build_router(state: AppState, cors_origin: &str) -> Router {
    let cors = match cors_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        Err(_) => {
            tracing::warn!(cors_origin, "Invalid CORS origin, allowing none");
            CorsLayer::new()
        }
    };

    Router::new()
        .nest("/api/v1", build_api_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::{SqlxOrderRepository, SqlxSellerRepository, SqlxUserRepository};
    use crate::db::{create_test_pool, migrations};
    use crate::services::LoginAttemptGuard;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tokio::time::Duration;
    use tower::ServiceExt;

    async fn test_app() -> Router {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let guard = Arc::new(LoginAttemptGuard::new(Duration::from_secs(15), false));
        let state = AppState {
            user_service: Arc::new(UserService::new(
                SqlxUserRepository::boxed(pool.clone()),
                guard,
                5,
            )),
            seller_service: Arc::new(SellerService::new(SqlxSellerRepository::boxed(pool.clone()))),
            order_service: Arc::new(OrderService::new(SqlxOrderRepository::boxed(pool))),
        };
        build_router(state, "http://localhost:3000")
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("Failed to build request")
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read body");
        serde_json::from_slice(&bytes).expect("Body should be JSON")
    }

    #[tokio::test]
    async fn test_create_user_and_login() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/users",
                serde_json::json!({
                    "name": "Hans",
                    "email": "hans@example.com",
                    "password": "Secret.123",
                    "password_confirm": "Secret.123"
                }),
            ))
            .await
            .expect("Request failed");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["email"], "hans@example.com");
        assert!(body.get("password_hash").is_none());

        let response = app
            .oneshot(post_json(
                "/api/v1/auth/login",
                serde_json::json!({ "email": "hans@example.com", "password": "Secret.123" }),
            ))
            .await
            .expect("Request failed");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Hans");
    }

    #[tokio::test]
    async fn test_password_confirm_mismatch_is_bad_request() {
        let app = test_app().await;

        let response = app
            .oneshot(post_json(
                "/api/v1/users",
                serde_json::json!({
                    "name": "Hans",
                    "email": "hans@example.com",
                    "password": "Secret.123",
                    "password_confirm": "Other.123"
                }),
            ))
            .await
            .expect("Request failed");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_login_wrong_password_then_throttled() {
        let app = test_app().await;

        app.clone()
            .oneshot(post_json(
                "/api/v1/users",
                serde_json::json!({
                    "name": "Hans",
                    "email": "hans@example.com",
                    "password": "Secret.123",
                    "password_confirm": "Secret.123"
                }),
            ))
            .await
            .expect("Request failed");

        for _ in 0..6 {
            let response = app
                .clone()
                .oneshot(post_json(
                    "/api/v1/auth/login",
                    serde_json::json!({ "email": "hans@example.com", "password": "Wrong.123" }),
                ))
                .await
                .expect("Request failed");
            assert_eq!(response.status(), StatusCode::FORBIDDEN);
            let body = body_json(response).await;
            assert_eq!(body["error"]["code"], "INVALID_CREDENTIALS");
        }

        // The count now exceeds the limit, so even the right password is
        // turned away
        let response = app
            .oneshot(post_json(
                "/api/v1/auth/login",
                serde_json::json!({ "email": "hans@example.com", "password": "Secret.123" }),
            ))
            .await
            .expect("Request failed");
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn test_list_users_page_shape() {
        let app = test_app().await;

        for i in 1..=3 {
            app.clone()
                .oneshot(post_json(
                    "/api/v1/users",
                    serde_json::json!({
                        "name": format!("User{i}"),
                        "email": format!("u{i}@example.com"),
                        "password": "Secret.123",
                        "password_confirm": "Secret.123"
                    }),
                ))
                .await
                .expect("Request failed");
        }

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/users?page_number=1&page_size=2")
                    .body(Body::empty())
                    .expect("Failed to build request"),
            )
            .await
            .expect("Request failed");
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["page_number"], 1);
        assert_eq!(body["page_size"], 2);
        assert_eq!(body["count"], 2);
        assert_eq!(body["total_pages"], 2);
        assert_eq!(body["has_previous_page"], false);
        assert_eq!(body["has_next_page"], true);
        assert_eq!(body["data"].as_array().map(|a| a.len()), Some(2));
    }

    #[tokio::test]
    async fn test_seller_crud_over_http() {
        let app = test_app().await;

        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/sellers",
                serde_json::json!({
                    "product_name": "Widget",
                    "price": 1999,
                    "stock": 10,
                    "product_description": "A fine product"
                }),
            ))
            .await
            .expect("Request failed");
        assert_eq!(response.status(), StatusCode::OK);
        let id = body_json(response).await["id"].as_i64().expect("id");

        // Duplicate product name conflicts
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/v1/sellers",
                serde_json::json!({
                    "product_name": "Widget",
                    "price": 999,
                    "stock": 1,
                    "product_description": "Cheaper"
                }),
            ))
            .await
            .expect("Request failed");
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(format!("/api/v1/sellers/{id}/price"))
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"price": 2499}"#))
                    .expect("Failed to build request"),
            )
            .await
            .expect("Request failed");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/v1/sellers/{id}"))
                    .body(Body::empty())
                    .expect("Failed to build request"),
            )
            .await
            .expect("Request failed");
        let body = body_json(response).await;
        assert_eq!(body["price"], 2499);
    }

    #[tokio::test]
    async fn test_unknown_resource_is_not_found() {
        let app = test_app().await;

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/users/42")
                    .body(Body::empty())
                    .expect("Failed to build request"),
            )
            .await
            .expect("Request failed");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
