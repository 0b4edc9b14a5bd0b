//! Recurring expense operations.

use sqlx::PgPool;

use crate::error::{AppError, AppResult};

use super::{
    CreateRecurringExpenseCommand, RecurringExpenseRecord, UpdateRecurringExpenseCommand,
};

/// Handler for recurring expenses
pub struct RecurringExpenseHandler {
    pool: PgPool,
}

impl RecurringExpenseHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a recurring expense; both the user and the category must exist.
    pub async fn create(
        &self,
        command: CreateRecurringExpenseCommand,
    ) -> AppResult<RecurringExpenseRecord> {
        command.validate()?;

        let user_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
                .bind(command.user_id)
                .fetch_one(&self.pool)
                .await?;

        if !user_exists {
            return Err(AppError::UserNotFound(command.user_id));
        }

        let category_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM budget_categories WHERE id = $1)")
                .bind(command.category_id)
                .fetch_one(&self.pool)
                .await?;

        if !category_exists {
            return Err(AppError::CategoryNotFound(command.category_id));
        }

        let recurring = sqlx::query_as::<_, RecurringExpenseRecord>(
            r#"
            INSERT INTO recurring_expenses (user_id, category_id, name, amount, due_day)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, category_id, name, amount, due_day
            "#,
        )
        .bind(command.user_id)
        .bind(command.category_id)
        .bind(&command.name)
        .bind(command.amount)
        .bind(command.due_day)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(
            recurring_expense_id = recurring.id,
            user_id = recurring.user_id,
            "Recurring expense created"
        );

        Ok(recurring)
    }

    /// List all recurring expenses for a user
    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<RecurringExpenseRecord>> {
        let recurring = sqlx::query_as::<_, RecurringExpenseRecord>(
            r#"
            SELECT id, user_id, category_id, name, amount, due_day
            FROM recurring_expenses
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(recurring)
    }

    /// Apply a partial update to amount and/or due_day.
    pub async fn update(
        &self,
        recurring_id: i64,
        command: UpdateRecurringExpenseCommand,
    ) -> AppResult<RecurringExpenseRecord> {
        command.validate()?;

        let recurring = sqlx::query_as::<_, RecurringExpenseRecord>(
            r#"
            UPDATE recurring_expenses
            SET amount = COALESCE($2, amount),
                due_day = COALESCE($3, due_day)
            WHERE id = $1
            RETURNING id, user_id, category_id, name, amount, due_day
            "#,
        )
        .bind(recurring_id)
        .bind(command.amount)
        .bind(command.due_day)
        .fetch_optional(&self.pool)
        .await?;

        recurring.ok_or(AppError::RecurringExpenseNotFound(recurring_id))
    }

    /// Hard delete a recurring expense
    pub async fn delete(&self, recurring_id: i64) -> AppResult<()> {
        let deleted: Option<i64> =
            sqlx::query_scalar("DELETE FROM recurring_expenses WHERE id = $1 RETURNING id")
                .bind(recurring_id)
                .fetch_optional(&self.pool)
                .await?;

        if deleted.is_none() {
            return Err(AppError::RecurringExpenseNotFound(recurring_id));
        }

        Ok(())
    }
}
