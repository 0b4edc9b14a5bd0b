//! HTTP API
//!
//! Router construction and shared request state.

pub mod routes;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use sqlx::PgPool;

use crate::error::AppError;
use crate::plaid::BankAggregator;

pub use routes::create_router;

/// JSON body extractor whose rejection is an [`AppError`].
///
/// The stock `axum::Json` rejects missing or malformed fields with a 422 and
/// a plain-text body; routing the rejection through `AppError::Validation`
/// keeps the error contract uniform: 400 with the usual JSON error body.
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(value) = axum::Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::Validation(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// Shared state handed to every request
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub aggregator: Arc<dyn BankAggregator>,
}

impl AppState {
    pub fn new(pool: PgPool, aggregator: Arc<dyn BankAggregator>) -> Self {
        Self { pool, aggregator }
    }
}
