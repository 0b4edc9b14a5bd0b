//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("User not found: {0}")]
    UserNotFound(i64),

    #[error("Category not found: {0}")]
    CategoryNotFound(i64),

    #[error("Expense not found: {0}")]
    ExpenseNotFound(i64),

    #[error("Recurring expense not found: {0}")]
    RecurringExpenseNotFound(i64),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // Server errors (5xx)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Aggregator error: {0}")]
    Aggregator(#[from] crate::plaid::PlaidError),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, details) = match &self {
            // 400 Bad Request
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", Some(msg.clone()))
            }

            // 401 Unauthorized
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid_credentials", None)
            }

            // 404 Not Found
            AppError::UserNotFound(id) => {
                (StatusCode::NOT_FOUND, "user_not_found", Some(id.to_string()))
            }
            AppError::CategoryNotFound(id) => {
                (StatusCode::NOT_FOUND, "category_not_found", Some(id.to_string()))
            }
            AppError::ExpenseNotFound(id) => {
                (StatusCode::NOT_FOUND, "expense_not_found", Some(id.to_string()))
            }
            AppError::RecurringExpenseNotFound(id) => {
                (StatusCode::NOT_FOUND, "recurring_expense_not_found", Some(id.to_string()))
            }

            // 409 Conflict
            AppError::EmailTaken => {
                (StatusCode::CONFLICT, "email_taken", None)
            }

            // 500 Internal Server Error
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            // Aggregator failures are logged with detail but never leaked to the client
            AppError::Aggregator(e) => {
                tracing::error!("Aggregator error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "aggregator_error", None)
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
            AppError::Config(e) => {
                tracing::error!("Config error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "config_error", None)
            }
        };

        // 5xx responses carry the error code only, never the message
        let error = if status.is_server_error() {
            error_code.to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let response = AppError::CategoryNotFound(42).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_email_taken_maps_to_409() {
        let response = AppError::EmailTaken.into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_invalid_credentials_maps_to_401() {
        let response = AppError::InvalidCredentials.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_internal_error_does_not_leak_message() {
        let response = AppError::Internal("connection string with secrets".to_string())
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
