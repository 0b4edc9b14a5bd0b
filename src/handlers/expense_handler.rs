//! Expense operations.
//!
//! A user never owns expenses directly; "a user's expenses" always resolves
//! through the category join. The monthly view selects everything on or after
//! the first day of the current UTC month.

use chrono::{Datelike, NaiveDate, Utc};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

use super::{CreateExpenseCommand, ExpenseRecord, ExpenseWithCategory, UpdateExpenseCommand};

/// First day of the month containing `today`.
pub fn month_start(today: NaiveDate) -> NaiveDate {
    // Day 1 exists in every month
    today.with_day(1).unwrap_or(today)
}

/// Handler for expense CRUD and queries
pub struct ExpenseHandler {
    pool: PgPool,
}

impl ExpenseHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an expense; a missing date defaults to the current UTC date.
    pub async fn create(&self, command: CreateExpenseCommand) -> AppResult<ExpenseRecord> {
        command.validate()?;

        let category_exists: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM budget_categories WHERE id = $1)")
                .bind(command.category_id)
                .fetch_one(&self.pool)
                .await?;

        if !category_exists {
            return Err(AppError::CategoryNotFound(command.category_id));
        }

        let date = command.date.unwrap_or_else(|| Utc::now().date_naive());

        let expense = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            INSERT INTO expenses (category_id, name, amount, date)
            VALUES ($1, $2, $3, $4)
            RETURNING id, category_id, name, amount, date
            "#,
        )
        .bind(command.category_id)
        .bind(&command.name)
        .bind(command.amount)
        .bind(date)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(expense_id = expense.id, category_id = expense.category_id, "Expense created");

        Ok(expense)
    }

    /// Apply a partial update to name, amount and/or date.
    pub async fn update(
        &self,
        expense_id: i64,
        command: UpdateExpenseCommand,
    ) -> AppResult<ExpenseRecord> {
        command.validate()?;

        let expense = sqlx::query_as::<_, ExpenseRecord>(
            r#"
            UPDATE expenses
            SET name = COALESCE($2, name),
                amount = COALESCE($3, amount),
                date = COALESCE($4, date)
            WHERE id = $1
            RETURNING id, category_id, name, amount, date
            "#,
        )
        .bind(expense_id)
        .bind(command.name)
        .bind(command.amount)
        .bind(command.date)
        .fetch_optional(&self.pool)
        .await?;

        expense.ok_or(AppError::ExpenseNotFound(expense_id))
    }

    /// Hard delete a single expense
    pub async fn delete(&self, expense_id: i64) -> AppResult<()> {
        let deleted: Option<i64> =
            sqlx::query_scalar("DELETE FROM expenses WHERE id = $1 RETURNING id")
                .bind(expense_id)
                .fetch_optional(&self.pool)
                .await?;

        if deleted.is_none() {
            return Err(AppError::ExpenseNotFound(expense_id));
        }

        Ok(())
    }

    /// List expenses belonging to one category
    pub async fn list_by_category(&self, category_id: i64) -> AppResult<Vec<ExpenseRecord>> {
        let expenses = sqlx::query_as::<_, ExpenseRecord>(
            "SELECT id, category_id, name, amount, date FROM expenses WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// List all of a user's expenses across categories, joined with the
    /// category name for display.
    pub async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<ExpenseWithCategory>> {
        let expenses = sqlx::query_as::<_, ExpenseWithCategory>(
            r#"
            SELECT e.id, e.category_id, e.name, e.amount, e.date, c.name AS category_name
            FROM expenses e
            JOIN budget_categories c ON c.id = e.category_id
            WHERE c.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }

    /// Current-calendar-month expenses for a user: everything dated on or
    /// after the first of the current UTC month. No upper bound.
    pub async fn list_current_month(&self, user_id: i64) -> AppResult<Vec<ExpenseWithCategory>> {
        self.list_since(user_id, month_start(Utc::now().date_naive()))
            .await
    }

    /// Expenses for a user dated on or after `cutoff`, joined with category
    /// name. Split out so the month boundary can be pinned in tests.
    pub async fn list_since(
        &self,
        user_id: i64,
        cutoff: NaiveDate,
    ) -> AppResult<Vec<ExpenseWithCategory>> {
        let expenses = sqlx::query_as::<_, ExpenseWithCategory>(
            r#"
            SELECT e.id, e.category_id, e.name, e.amount, e.date, c.name AS category_name
            FROM expenses e
            JOIN budget_categories c ON c.id = e.category_id
            WHERE c.user_id = $1 AND e.date >= $2
            "#,
        )
        .bind(user_id)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;

        Ok(expenses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_start_mid_month() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(month_start(today), NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
    }

    #[test]
    fn test_month_start_first_of_month() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        assert_eq!(month_start(today), today);
    }

    #[test]
    fn test_month_cutoff_excludes_prior_month() {
        let cutoff = month_start(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());

        let late_february = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let first_of_march = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();

        assert!(late_february < cutoff);
        assert!(first_of_march >= cutoff);
    }

    #[test]
    fn test_month_start_across_year_boundary() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 31).unwrap();
        assert_eq!(month_start(today), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }
}
