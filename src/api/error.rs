//! API error responses
//!
//! Every handler failure becomes a JSON body of the form
//! `{"error": {"code", "message", "details?"}}` with a status derived from
//! the code. Service errors map onto these via `From` impls so handlers
//! can use `?` directly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::{OrderServiceError, SellerServiceError, UserServiceError};

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::new("INVALID_CREDENTIALS", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error.code.as_str() {
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "INVALID_CREDENTIALS" | "FORBIDDEN" => StatusCode::FORBIDDEN,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "CONFLICT" => StatusCode::CONFLICT,
            "UNPROCESSABLE_ENTITY" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(self)).into_response()
    }
}

impl From<UserServiceError> for ApiError {
    fn from(err: UserServiceError) -> Self {
        match &err {
            UserServiceError::InvalidCredentials => Self::invalid_credentials(err.to_string()),
            UserServiceError::TooManyAttempts(_) => Self::forbidden(err.to_string()),
            UserServiceError::ValidationError(_) => Self::validation_error(err.to_string()),
            UserServiceError::EmailTaken(_) => Self::conflict(err.to_string()),
            UserServiceError::NotFound => Self::not_found(err.to_string()),
            UserServiceError::InternalError(inner) => {
                tracing::error!("User service error: {:#}", inner);
                Self::internal_error("Internal server error")
            }
        }
    }
}

impl From<SellerServiceError> for ApiError {
    fn from(err: SellerServiceError) -> Self {
        match &err {
            SellerServiceError::ValidationError(_) => Self::validation_error(err.to_string()),
            SellerServiceError::ProductNameTaken(_) => Self::conflict(err.to_string()),
            SellerServiceError::NotFound => Self::not_found(err.to_string()),
            SellerServiceError::InternalError(inner) => {
                tracing::error!("Seller service error: {:#}", inner);
                Self::internal_error("Internal server error")
            }
        }
    }
}

impl From<OrderServiceError> for ApiError {
    fn from(err: OrderServiceError) -> Self {
        match &err {
            OrderServiceError::InvalidCredentials => Self::invalid_credentials(err.to_string()),
            OrderServiceError::ValidationError(_) => Self::validation_error(err.to_string()),
            OrderServiceError::NotFound => Self::not_found(err.to_string()),
            OrderServiceError::InternalError(inner) => {
                tracing::error!("Order service error: {:#}", inner);
                Self::internal_error("Internal server error")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::validation_error("x"), StatusCode::BAD_REQUEST),
            (ApiError::invalid_credentials("x"), StatusCode::FORBIDDEN),
            (ApiError::forbidden("x"), StatusCode::FORBIDDEN),
            (ApiError::not_found("x"), StatusCode::NOT_FOUND),
            (ApiError::conflict("x"), StatusCode::CONFLICT),
            (
                ApiError::internal_error("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }

    #[test]
    fn test_throttle_error_maps_to_forbidden() {
        let api: ApiError = UserServiceError::TooManyAttempts(6).into();
        assert_eq!(api.error.code, "FORBIDDEN");
        assert!(api.error.message.contains('6'));
    }

    #[test]
    fn test_internal_error_is_opaque() {
        let api: ApiError = UserServiceError::InternalError(anyhow::anyhow!("db path leak")).into();
        assert_eq!(api.error.code, "INTERNAL_ERROR");
        assert!(!api.error.message.contains("db path"));
    }
}
