//! Bank aggregator adapter
//!
//! Wraps the external financial-data aggregator (Plaid). Handlers consume the
//! [`BankAggregator`] trait; production wires in [`PlaidClient`], tests mock
//! the trait. The aggregator itself is an external collaborator and is never
//! reimplemented here.

mod client;

pub use client::PlaidClient;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors from the aggregator adapter.
///
/// These are mapped to a sanitized 500 at the handler boundary; the detail is
/// only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum PlaidError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Aggregator returned status {status}")]
    Api { status: u16 },

    #[error("Malformed aggregator response: {0}")]
    MalformedResponse(String),
}

/// Payload returned when creating a bank-linking token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkTokenPayload {
    pub link_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// A bank transaction fetched from the aggregator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankTransaction {
    pub transaction_id: String,
    pub name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Operations the handlers need from the external aggregator
#[async_trait]
pub trait BankAggregator: Send + Sync {
    /// Create a bank-linking token for a user
    async fn create_link_token(&self, user_id: i64) -> Result<LinkTokenPayload, PlaidError>;

    /// Exchange a temporary public token for a durable access token
    async fn exchange_public_token(&self, public_token: &str) -> Result<String, PlaidError>;

    /// Fetch recent transactions (last 30 days, capped) for an access token
    async fn recent_transactions(
        &self,
        access_token: &str,
    ) -> Result<Vec<BankTransaction>, PlaidError>;
}
