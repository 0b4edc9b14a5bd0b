//! Income operations.

use chrono::Utc;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

use super::{CreateIncomeCommand, IncomeRecord};

/// Handler for income entries
pub struct IncomeHandler {
    pool: PgPool,
}

impl IncomeHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an income entry; a missing date defaults to the current UTC date.
    pub async fn create(&self, command: CreateIncomeCommand) -> AppResult<IncomeRecord> {
        command.validate()?;

        let user_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(command.user_id)
                .fetch_one(&self.pool)
                .await?;

        if !user_exists {
            return Err(AppError::UserNotFound(command.user_id));
        }

        let date = command.date.unwrap_or_else(|| Utc::now().date_naive());

        let income = sqlx::query_as::<_, IncomeRecord>(
            r#"
            INSERT INTO incomes (user_id, name, amount, date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, amount, date
            "#,
        )
        .bind(command.user_id)
        .bind(&command.name)
        .bind(command.amount)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(income_id = income.id, user_id = income.user_id, "Income created");

        Ok(income)
    }

    /// List all income entries for a user
    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<IncomeRecord>> {
        let incomes = sqlx::query_as::<_, IncomeRecord>(
            "SELECT id, user_id, name, amount, date FROM incomes WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(incomes)
    }
}
