//! Order API endpoints

use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;

use crate::api::{ApiError, AppState};
use crate::db::repositories::OrderUpdate;
use crate::models::Order;
use crate::services::NewOrder;

/// Order routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_orders_handler).post(create_order_handler))
        .route(
            "/{id}",
            get(get_order_handler)
                .put(update_order_handler)
                .delete(delete_order_handler),
        )
        .route("/{id}/password", put(change_password_handler))
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub buyer_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
    pub items_name: String,
    pub order_quantity: i64,
    pub total_price: i64,
    pub address: String,
    pub payment_method: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub items_name: String,
    pub order_quantity: i64,
    pub total_price: i64,
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub password_old: String,
    pub password_new: String,
    pub password_confirm: String,
}

/// GET /orders
async fn list_orders_handler(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    Ok(Json(state.order_service.list_orders().await?))
}

/// POST /orders
async fn create_order_handler(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> Result<Json<Order>, ApiError> {
    if payload.password != payload.password_confirm {
        return Err(ApiError::validation_error("Passwords do not match"));
    }

    let order = state
        .order_service
        .create_order(NewOrder {
            buyer_name: payload.buyer_name,
            email: payload.email,
            password: payload.password,
            items_name: payload.items_name,
            order_quantity: payload.order_quantity,
            total_price: payload.total_price,
            address: payload.address,
            payment_method: payload.payment_method,
        })
        .await?;
    Ok(Json(order))
}

/// GET /orders/{id}
async fn get_order_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Order>, ApiError> {
    Ok(Json(state.order_service.get_order(id).await?))
}

/// PUT /orders/{id}
async fn update_order_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateOrderRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .order_service
        .update_order(
            id,
            OrderUpdate {
                items_name: payload.items_name,
                order_quantity: payload.order_quantity,
                total_price: payload.total_price,
                address: payload.address,
            },
        )
        .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

/// DELETE /orders/{id}
async fn delete_order_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.order_service.delete_order(id).await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

/// PUT /orders/{id}/password
async fn change_password_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if payload.password_new != payload.password_confirm {
        return Err(ApiError::validation_error("Passwords do not match"));
    }

    state
        .order_service
        .change_password(id, &payload.password_old, &payload.password_new)
        .await?;
    Ok(Json(serde_json::json!({ "id": id })))
}
