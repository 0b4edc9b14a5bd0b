//! Signup and login.
//!
//! No session or token is issued on login; the endpoint only confirms the
//! credentials and returns the display name. See DESIGN.md for the rationale.

use sqlx::PgPool;

use crate::auth;
use crate::error::{AppError, AppResult};

use super::{LoginResult, SignupCommand, SignupResult};

/// Handler for user registration and login
pub struct AuthHandler {
    pool: PgPool,
}

impl AuthHandler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Register a new user. The email is unique; a duplicate yields Conflict.
    pub async fn signup(&self, command: SignupCommand) -> AppResult<SignupResult> {
        command.validate()?;

        let email_taken: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
                .bind(&command.email)
                .fetch_one(&self.pool)
                .await?;

        if email_taken {
            return Err(AppError::EmailTaken);
        }

        let password_hash = auth::hash_password(&command.password)?;

        let user_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (name, last_name, phone, email, password_hash)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&command.name)
        .bind(command.last_name.as_deref())
        .bind(command.phone.as_deref())
        .bind(&command.email)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Concurrent signup with the same email loses the unique-index race
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::EmailTaken;
                }
            }
            AppError::Database(e)
        })?;

        tracing::info!(user_id, "User registered");

        Ok(SignupResult { user_id })
    }

    /// Verify credentials. Unknown email and hash mismatch are
    /// indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResult> {
        let user: Option<(i64, String, String)> =
            sqlx::query_as("SELECT id, name, password_hash FROM users WHERE email = $1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        let (user_id, name, password_hash) = user.ok_or(AppError::InvalidCredentials)?;

        if !auth::verify_password(password, &password_hash)? {
            return Err(AppError::InvalidCredentials);
        }

        Ok(LoginResult { user_id, name })
    }
}
