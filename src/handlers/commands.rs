//! Command and record definitions
//!
//! Commands represent intentions to change the system state; records are the
//! rows read back from the database and echoed in responses. Partial updates
//! carry an explicit optional per updatable field and apply only populated
//! ones.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AppError, AppResult};

// =========================================================================
// Records
// =========================================================================

/// A budget category row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryRecord {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub budget: Decimal,
    pub color: Option<String>,
}

/// An expense row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExpenseRecord {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// An expense row joined with its category name
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ExpenseWithCategory {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category_name: String,
}

/// An income row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IncomeRecord {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// A recurring expense row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RecurringExpenseRecord {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub name: String,
    pub amount: Decimal,
    pub due_day: i32,
}

// =========================================================================
// Category commands
// =========================================================================

/// Command to create a budget category
#[derive(Debug, Clone)]
pub struct CreateCategoryCommand {
    pub user_id: i64,
    pub name: String,
    pub budget: Decimal,
    pub color: Option<String>,
}

impl CreateCategoryCommand {
    pub fn new(user_id: i64, name: String, budget: Decimal) -> Self {
        Self {
            user_id,
            name,
            budget,
            color: None,
        }
    }

    pub fn with_color(mut self, color: String) -> Self {
        self.color = Some(color);
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Partial update for a budget category
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryCommand {
    pub budget: Option<Decimal>,
}

// =========================================================================
// Expense commands
// =========================================================================

/// Command to create an expense; a missing date defaults to the current UTC
/// date at creation time.
#[derive(Debug, Clone)]
pub struct CreateExpenseCommand {
    pub category_id: i64,
    pub name: String,
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
}

impl CreateExpenseCommand {
    pub fn new(category_id: i64, name: String, amount: Decimal) -> Self {
        Self {
            category_id,
            name,
            amount,
            date: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Partial update for an expense
#[derive(Debug, Clone, Default)]
pub struct UpdateExpenseCommand {
    pub name: Option<String>,
    pub amount: Option<Decimal>,
    pub date: Option<NaiveDate>,
}

impl UpdateExpenseCommand {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(ref name) = self.name {
            if name.trim().is_empty() {
                return Err(AppError::Validation("name must not be empty".to_string()));
            }
        }
        Ok(())
    }
}

// =========================================================================
// Income command
// =========================================================================

/// Command to create an income entry
#[derive(Debug, Clone)]
pub struct CreateIncomeCommand {
    pub user_id: i64,
    pub name: String,
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
}

impl CreateIncomeCommand {
    pub fn new(user_id: i64, name: String, amount: Decimal) -> Self {
        Self {
            user_id,
            name,
            amount,
            date: None,
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }
        Ok(())
    }
}

// =========================================================================
// Recurring expense commands
// =========================================================================

/// Command to create a recurring expense
#[derive(Debug, Clone)]
pub struct CreateRecurringExpenseCommand {
    pub user_id: i64,
    pub category_id: i64,
    pub name: String,
    pub amount: Decimal,
    pub due_day: i32,
}

impl CreateRecurringExpenseCommand {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }
        validate_due_day(self.due_day)
    }
}

/// Partial update for a recurring expense
#[derive(Debug, Clone, Default)]
pub struct UpdateRecurringExpenseCommand {
    pub amount: Option<Decimal>,
    pub due_day: Option<i32>,
}

impl UpdateRecurringExpenseCommand {
    pub fn validate(&self) -> AppResult<()> {
        if let Some(due_day) = self.due_day {
            validate_due_day(due_day)?;
        }
        Ok(())
    }
}

/// Due day is a calendar day number; month-length mismatches (e.g. 31 in
/// February) are allowed and resolved by the client.
fn validate_due_day(due_day: i32) -> AppResult<()> {
    if !(1..=31).contains(&due_day) {
        return Err(AppError::Validation(format!(
            "due_day must be between 1 and 31, got {due_day}"
        )));
    }
    Ok(())
}

// =========================================================================
// Auth commands
// =========================================================================

/// Command to register a new user
#[derive(Debug, Clone)]
pub struct SignupCommand {
    pub name: String,
    pub email: String,
    pub password: String,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl SignupCommand {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name must not be empty".to_string()));
        }
        if self.email.trim().is_empty() || !self.email.contains('@') {
            return Err(AppError::Validation("email is malformed".to_string()));
        }
        if self.password.is_empty() {
            return Err(AppError::Validation("password must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Result of a successful signup
#[derive(Debug, Clone, Serialize)]
pub struct SignupResult {
    pub user_id: i64,
}

/// Result of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct LoginResult {
    pub user_id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_category_command_builder() {
        let cmd = CreateCategoryCommand::new(1, "Groceries".to_string(), dec!(500))
            .with_color("#0EA5E9".to_string());

        assert_eq!(cmd.name, "Groceries");
        assert_eq!(cmd.color, Some("#0EA5E9".to_string()));
        assert!(cmd.validate().is_ok());
    }

    #[test]
    fn test_empty_category_name_rejected() {
        let cmd = CreateCategoryCommand::new(1, "   ".to_string(), dec!(500));
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_due_day_range() {
        let mut cmd = CreateRecurringExpenseCommand {
            user_id: 1,
            category_id: 2,
            name: "Rent".to_string(),
            amount: dec!(1200),
            due_day: 1,
        };
        assert!(cmd.validate().is_ok());

        cmd.due_day = 31;
        assert!(cmd.validate().is_ok());

        cmd.due_day = 0;
        assert!(cmd.validate().is_err());

        cmd.due_day = 32;
        assert!(cmd.validate().is_err());
    }

    #[test]
    fn test_signup_command_validation() {
        let cmd = SignupCommand {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            last_name: None,
            phone: None,
        };
        assert!(cmd.validate().is_ok());

        let bad_email = SignupCommand {
            email: "not-an-email".to_string(),
            ..cmd.clone()
        };
        assert!(bad_email.validate().is_err());

        let empty_password = SignupCommand {
            password: String::new(),
            ..cmd
        };
        assert!(empty_password.validate().is_err());
    }
}
