//! Database module
//!
//! Schema bootstrap and verification utilities.

use sqlx::PgPool;

/// DDL statements run at startup. Each statement is idempotent so repeated
/// boots against the same database are safe.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        last_name TEXT,
        phone TEXT,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS budget_categories (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        budget NUMERIC(14, 2) NOT NULL,
        color TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS expenses (
        id BIGSERIAL PRIMARY KEY,
        category_id BIGINT NOT NULL REFERENCES budget_categories(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        amount NUMERIC(14, 2) NOT NULL,
        date DATE NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS incomes (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        amount NUMERIC(14, 2) NOT NULL,
        date DATE NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS recurring_expenses (
        id BIGSERIAL PRIMARY KEY,
        user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        category_id BIGINT NOT NULL REFERENCES budget_categories(id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        amount NUMERIC(14, 2) NOT NULL,
        due_day INTEGER NOT NULL CHECK (due_day BETWEEN 1 AND 31)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_budget_categories_user_id ON budget_categories (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_expenses_category_id ON expenses (category_id)",
    "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses (date)",
    "CREATE INDEX IF NOT EXISTS idx_incomes_user_id ON incomes (user_id)",
    "CREATE INDEX IF NOT EXISTS idx_recurring_expenses_user_id ON recurring_expenses (user_id)",
];

/// Simple connectivity check
pub async fn verify_connection(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Create tables and indexes if they do not exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    Ok(())
}

/// Check if all required tables exist
pub async fn check_schema(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let required_tables = [
        "users",
        "budget_categories",
        "expenses",
        "incomes",
        "recurring_expenses",
    ];

    for table in required_tables {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM information_schema.tables
                WHERE table_schema = 'public' AND table_name = $1
            )
            "#,
        )
        .bind(table)
        .fetch_one(pool)
        .await?;

        if !exists {
            tracing::error!("Required table '{}' does not exist", table);
            return Ok(false);
        }
    }

    Ok(true)
}
