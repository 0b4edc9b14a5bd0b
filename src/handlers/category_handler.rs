//! Budget category operations.
//!
//! Deleting a category relies on the `ON DELETE CASCADE` foreign keys to
//! remove its expenses and recurring expenses in the same transaction.

use sqlx::PgPool;

use crate::error::{AppError, AppResult};

use super::{CategoryRecord, CreateCategoryCommand, UpdateCategoryCommand};

/// Fallback display color when the client does not pick one
pub const DEFAULT_CATEGORY_COLOR: &str = "#7C3AED";

/// Handler for budget category CRUD
pub struct CategoryHandler {
    pool: PgPool,
}

impl CategoryHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a category for a user
    pub async fn create(&self, command: CreateCategoryCommand) -> AppResult<CategoryRecord> {
        command.validate()?;

        let user_exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = $1)")
            .bind(command.user_id)
            .fetch_one(&self.pool)
            .await?;

        if !user_exists {
            return Err(AppError::UserNotFound(command.user_id));
        }

        let color = command
            .color
            .unwrap_or_else(|| DEFAULT_CATEGORY_COLOR.to_string());

        let category = sqlx::query_as::<_, CategoryRecord>(
            r#"
            INSERT INTO budget_categories (user_id, name, budget, color)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, budget, color
            "#,
        )
        .bind(command.user_id)
        .bind(&command.name)
        .bind(command.budget)
        .bind(&color)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(category_id = category.id, user_id = category.user_id, "Category created");

        Ok(category)
    }

    /// List all categories owned by a user, unordered
    pub async fn list_for_user(&self, user_id: i64) -> AppResult<Vec<CategoryRecord>> {
        let categories = sqlx::query_as::<_, CategoryRecord>(
            "SELECT id, user_id, name, budget, color FROM budget_categories WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Apply a partial update. Only populated fields change; an empty patch
    /// is a no-op that still verifies the row exists.
    pub async fn update(
        &self,
        category_id: i64,
        command: UpdateCategoryCommand,
    ) -> AppResult<CategoryRecord> {
        let category = sqlx::query_as::<_, CategoryRecord>(
            r#"
            UPDATE budget_categories
            SET budget = COALESCE($2, budget)
            WHERE id = $1
            RETURNING id, user_id, name, budget, color
            "#,
        )
        .bind(category_id)
        .bind(command.budget)
        .fetch_optional(&self.pool)
        .await?;

        category.ok_or(AppError::CategoryNotFound(category_id))
    }

    /// Hard delete; cascades to expenses and recurring expenses
    pub async fn delete(&self, category_id: i64) -> AppResult<()> {
        let deleted: Option<i64> =
            sqlx::query_scalar("DELETE FROM budget_categories WHERE id = $1 RETURNING id")
                .bind(category_id)
                .fetch_optional(&self.pool)
                .await?;

        if deleted.is_none() {
            return Err(AppError::CategoryNotFound(category_id));
        }

        tracing::info!(category_id, "Category deleted (expenses cascaded)");

        Ok(())
    }
}
