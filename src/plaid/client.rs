//! Plaid REST client.
//!
//! Thin pass-through to the aggregator's sandbox/production API. All requests
//! share one `reqwest::Client` with a bounded timeout.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{BankAggregator, BankTransaction, LinkTokenPayload, PlaidError};

/// How far back transactions are fetched
const TRANSACTION_WINDOW_DAYS: i64 = 30;

/// Cap on the number of transactions returned per fetch
const TRANSACTION_COUNT: u32 = 10;

#[derive(Debug, Deserialize)]
struct ExchangeTokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct TransactionsGetResponse {
    #[serde(default)]
    transactions: Vec<BankTransaction>,
}

/// Client for the Plaid API
pub struct PlaidClient {
    client: Client,
    client_id: String,
    secret: String,
    base_url: String,
}

impl PlaidClient {
    pub fn new(
        client_id: String,
        secret: String,
        base_url: String,
        timeout: Duration,
    ) -> Result<Self, PlaidError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            client_id,
            secret,
            base_url,
        })
    }

    /// POST a JSON body to an aggregator endpoint and decode the response
    async fn post<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, PlaidError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlaidError::Api {
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PlaidError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl BankAggregator for PlaidClient {
    async fn create_link_token(&self, user_id: i64) -> Result<LinkTokenPayload, PlaidError> {
        let body = json!({
            "client_id": self.client_id,
            "secret": self.secret,
            "client_name": "Savvium App",
            "language": "en",
            "country_codes": ["US"],
            "products": ["transactions"],
            "user": { "client_user_id": user_id.to_string() },
        });

        self.post("/link/token/create", body).await
    }

    async fn exchange_public_token(&self, public_token: &str) -> Result<String, PlaidError> {
        let body = json!({
            "client_id": self.client_id,
            "secret": self.secret,
            "public_token": public_token,
        });

        let response: ExchangeTokenResponse =
            self.post("/item/public_token/exchange", body).await?;

        Ok(response.access_token)
    }

    async fn recent_transactions(
        &self,
        access_token: &str,
    ) -> Result<Vec<BankTransaction>, PlaidError> {
        let end_date = Utc::now().date_naive();
        let start_date = end_date - chrono::Duration::days(TRANSACTION_WINDOW_DAYS);

        let body = json!({
            "client_id": self.client_id,
            "secret": self.secret,
            "access_token": access_token,
            "start_date": start_date.to_string(),
            "end_date": end_date.to_string(),
            "options": { "count": TRANSACTION_COUNT },
        });

        let response: TransactionsGetResponse = self.post("/transactions/get", body).await?;

        Ok(response.transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_token_payload_deserialize() {
        let json = r#"{
            "link_token": "link-sandbox-12345",
            "expiration": "2024-03-15T22:00:00Z",
            "request_id": "req-1"
        }"#;

        let payload: LinkTokenPayload = serde_json::from_str(json).unwrap();
        assert_eq!(payload.link_token, "link-sandbox-12345");
        assert_eq!(payload.request_id.as_deref(), Some("req-1"));
    }

    #[test]
    fn test_transactions_response_tolerates_extra_fields() {
        let json = r#"{
            "transactions": [
                {
                    "transaction_id": "txn-1",
                    "name": "Coffee Shop",
                    "amount": 4.25,
                    "date": "2024-03-10",
                    "pending": false,
                    "iso_currency_code": "USD"
                }
            ],
            "total_transactions": 1
        }"#;

        let response: TransactionsGetResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.transactions.len(), 1);
        assert_eq!(response.transactions[0].name, "Coffee Shop");
        assert_eq!(response.transactions[0].date.to_string(), "2024-03-10");
    }

    #[test]
    fn test_exchange_response_deserialize() {
        let json = r#"{"access_token": "access-sandbox-abc", "item_id": "item-1", "request_id": "req-2"}"#;

        let response: ExchangeTokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.access_token, "access-sandbox-abc");
    }
}
