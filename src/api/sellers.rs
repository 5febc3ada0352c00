//! Seller API endpoints

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use crate::api::{ApiError, AppState};
use crate::models::Seller;

/// Seller routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_sellers_handler).post(create_seller_handler))
        .route(
            "/{id}",
            get(get_seller_handler)
                .put(update_seller_handler)
                .delete(delete_seller_handler),
        )
        .route("/{id}/price", put(change_price_handler))
}

#[derive(Debug, Deserialize)]
pub struct CreateSellerRequest {
    pub product_name: String,
    pub price: i64,
    pub stock: i64,
    pub product_description: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSellerRequest {
    pub stock: i64,
    pub product_description: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePriceRequest {
    pub price: i64,
}

/// GET /sellers
async fn list_sellers_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Seller>>, ApiError> {
    Ok(Json(state.seller_service.list_listings().await?))
}

/// POST /sellers
async fn create_seller_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateSellerRequest>,
) -> Result<Json<Seller>, ApiError> {
    let seller = state
        .seller_service
        .create_listing(
            &payload.product_name,
            payload.price,
            payload.stock,
            &payload.product_description,
        )
        .await?;
    Ok(Json(seller))
}

/// GET /sellers/{id}
async fn get_seller_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Seller>, ApiError> {
    Ok(Json(state.seller_service.get_listing(id).await?))
}

/// PUT /sellers/{id}
async fn update_seller_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateSellerRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .seller_service
        .update_listing(id, payload.stock, &payload.product_description)
        .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

/// DELETE /sellers/{id}
async fn delete_seller_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.seller_service.delete_listing(id).await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

/// PUT /sellers/{id}/price
async fn change_price_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ChangePriceRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.seller_service.change_price(id, payload.price).await?;
    Ok(Json(serde_json::json!({ "id": id })))
}
