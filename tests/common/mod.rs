//! Shared test fixtures: router construction, a mock bank aggregator, and
//! database setup for the DB-backed tests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use savvium_server::api::{self, AppState};
use savvium_server::db;
use savvium_server::plaid::{BankAggregator, BankTransaction, LinkTokenPayload, PlaidError};

/// Aggregator double. `fail_on` short-circuits the named operation so error
/// mapping can be exercised without a network.
#[derive(Default)]
pub struct MockAggregator {
    pub fail_on: Option<&'static str>,
}

#[async_trait]
impl BankAggregator for MockAggregator {
    async fn create_link_token(&self, user_id: i64) -> Result<LinkTokenPayload, PlaidError> {
        if self.fail_on == Some("create_link_token") {
            return Err(PlaidError::Api { status: 500 });
        }
        Ok(LinkTokenPayload {
            link_token: format!("link-sandbox-{user_id}"),
            expiration: None,
            request_id: Some("req-mock".to_string()),
        })
    }

    async fn exchange_public_token(&self, public_token: &str) -> Result<String, PlaidError> {
        if self.fail_on == Some("exchange_public_token") {
            return Err(PlaidError::Api { status: 400 });
        }
        Ok(format!("access-sandbox-{public_token}"))
    }

    async fn recent_transactions(
        &self,
        _access_token: &str,
    ) -> Result<Vec<BankTransaction>, PlaidError> {
        if self.fail_on == Some("recent_transactions") {
            return Err(PlaidError::MalformedResponse("truncated body".to_string()));
        }
        Ok(vec![
            BankTransaction {
                transaction_id: "txn-1".to_string(),
                name: "Coffee Shop".to_string(),
                amount: Decimal::new(425, 2),
                date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            },
            BankTransaction {
                transaction_id: "txn-2".to_string(),
                name: "Grocery Store".to_string(),
                amount: Decimal::new(5230, 2),
                date: NaiveDate::from_ymd_opt(2024, 3, 12).unwrap(),
            },
        ])
    }
}

/// Pool that never actually connects; usable for routes that stay off the
/// database (aggregator endpoints, extractor rejections).
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost/savvium_test")
        .expect("lazy pool")
}

/// Connect to the database named by TEST_DATABASE_URL and make sure the
/// schema exists. Used only by the `#[ignore]`d DB-backed tests.
pub async fn setup_test_db() -> PgPool {
    let url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set for DB-backed tests");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to test database");

    db::ensure_schema(&pool).await.expect("ensure schema");

    pool
}

/// Build the application router around the given pool and aggregator.
pub fn test_app(pool: PgPool, aggregator: MockAggregator) -> Router {
    api::create_router().with_state(AppState::new(pool, Arc::new(aggregator)))
}
