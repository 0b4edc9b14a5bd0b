//! API Routes
//!
//! HTTP endpoint definitions. Handlers stay thin: deserialize, delegate to a
//! business handler, serialize.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::handlers::{
    AuthHandler, CategoryHandler, CategoryRecord, CreateCategoryCommand, CreateExpenseCommand,
    CreateIncomeCommand, CreateRecurringExpenseCommand, ExpenseHandler, ExpenseRecord,
    ExpenseWithCategory, IncomeHandler, IncomeRecord, RecurringExpenseHandler,
    RecurringExpenseRecord, SignupCommand, UpdateCategoryCommand, UpdateExpenseCommand,
    UpdateRecurringExpenseCommand,
};
use crate::plaid::BankTransaction;

use super::{AppJson, AppState};

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub user_id: i64,
    pub name: String,
    pub budget: Decimal,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub budget: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct CreateExpenseRequest {
    pub category_id: i64,
    pub name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateExpenseRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CreateIncomeRequest {
    pub user_id: i64,
    pub name: String,
    pub amount: Decimal,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecurringExpenseRequest {
    pub user_id: i64,
    pub category_id: i64,
    pub name: String,
    pub amount: Decimal,
    pub due_day: i32,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateRecurringExpenseRequest {
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub due_day: Option<i32>,
}

/// Query parameter used by the monthly-expense and recurring-expense lists
#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user_id: i64,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateLinkTokenRequest {
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct ExchangeTokenRequest {
    pub public_token: String,
}

#[derive(Debug, Serialize)]
pub struct TransactionsResponse {
    pub transactions: Vec<BankTransaction>,
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Categories
        .route("/categories", post(create_category))
        .route("/users/:user_id/categories", get(list_categories))
        .route(
            "/categories/:category_id",
            patch(update_category).delete(delete_category),
        )
        .route("/categories/:category_id/expenses", get(list_category_expenses))
        // Expenses
        .route("/expenses", post(create_expense))
        .route("/expenses/monthly", get(list_monthly_expenses))
        .route(
            "/expenses/:expense_id",
            patch(update_expense).delete(delete_expense),
        )
        .route("/users/:user_id/expenses", get(list_user_expenses))
        // Incomes
        .route("/incomes", post(create_income))
        .route("/users/:user_id/incomes", get(list_incomes))
        // Recurring expenses
        .route(
            "/recurring-expenses",
            post(create_recurring_expense).get(list_recurring_expenses),
        )
        .route(
            "/recurring-expenses/:recurring_id",
            patch(update_recurring_expense).delete(delete_recurring_expense),
        )
        // Auth
        .route("/signup", post(signup))
        .route("/login", post(login))
        // Bank aggregator
        .route("/create_link_token", post(create_link_token))
        .route("/exchange_token", post(exchange_token))
}

// =========================================================================
// Category endpoints
// =========================================================================

/// POST /categories
async fn create_category(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<CategoryRecord>), AppError> {
    let handler = CategoryHandler::new(state.pool);

    let command = CreateCategoryCommand::new(request.user_id, request.name, request.budget);
    let command = if let Some(color) = request.color {
        command.with_color(color)
    } else {
        command
    };

    let category = handler.create(command).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /users/:user_id/categories
async fn list_categories(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<CategoryRecord>>, AppError> {
    let handler = CategoryHandler::new(state.pool);

    Ok(Json(handler.list_for_user(user_id).await?))
}

/// PATCH /categories/:category_id
async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
    AppJson(request): AppJson<UpdateCategoryRequest>,
) -> Result<Json<CategoryRecord>, AppError> {
    let handler = CategoryHandler::new(state.pool);

    let command = UpdateCategoryCommand {
        budget: request.budget,
    };

    Ok(Json(handler.update(category_id, command).await?))
}

/// DELETE /categories/:category_id
async fn delete_category(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let handler = CategoryHandler::new(state.pool);

    handler.delete(category_id).await?;

    Ok(Json(MessageResponse {
        message: "Category deleted".to_string(),
    }))
}

/// GET /categories/:category_id/expenses
async fn list_category_expenses(
    State(state): State<AppState>,
    Path(category_id): Path<i64>,
) -> Result<Json<Vec<ExpenseRecord>>, AppError> {
    let handler = ExpenseHandler::new(state.pool);

    Ok(Json(handler.list_by_category(category_id).await?))
}

// =========================================================================
// Expense endpoints
// =========================================================================

/// POST /expenses
async fn create_expense(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseRecord>), AppError> {
    let handler = ExpenseHandler::new(state.pool);

    let command = CreateExpenseCommand::new(request.category_id, request.name, request.amount);
    let command = if let Some(date) = request.date {
        command.with_date(date)
    } else {
        command
    };

    let expense = handler.create(command).await?;

    Ok((StatusCode::CREATED, Json(expense)))
}

/// PATCH /expenses/:expense_id
async fn update_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<i64>,
    AppJson(request): AppJson<UpdateExpenseRequest>,
) -> Result<Json<ExpenseRecord>, AppError> {
    let handler = ExpenseHandler::new(state.pool);

    let command = UpdateExpenseCommand {
        name: request.name,
        amount: request.amount,
        date: request.date,
    };

    Ok(Json(handler.update(expense_id, command).await?))
}

/// DELETE /expenses/:expense_id
async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let handler = ExpenseHandler::new(state.pool);

    handler.delete(expense_id).await?;

    Ok(Json(MessageResponse {
        message: "Expense deleted".to_string(),
    }))
}

/// GET /expenses/monthly?user_id=
async fn list_monthly_expenses(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Vec<ExpenseWithCategory>>, AppError> {
    let handler = ExpenseHandler::new(state.pool);

    Ok(Json(handler.list_current_month(query.user_id).await?))
}

/// GET /users/:user_id/expenses
async fn list_user_expenses(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<ExpenseWithCategory>>, AppError> {
    let handler = ExpenseHandler::new(state.pool);

    Ok(Json(handler.list_by_user(user_id).await?))
}

// =========================================================================
// Income endpoints
// =========================================================================

/// POST /incomes
async fn create_income(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateIncomeRequest>,
) -> Result<(StatusCode, Json<IncomeRecord>), AppError> {
    let handler = IncomeHandler::new(state.pool);

    let command = CreateIncomeCommand::new(request.user_id, request.name, request.amount);
    let command = if let Some(date) = request.date {
        command.with_date(date)
    } else {
        command
    };

    let income = handler.create(command).await?;

    Ok((StatusCode::CREATED, Json(income)))
}

/// GET /users/:user_id/incomes
async fn list_incomes(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<Vec<IncomeRecord>>, AppError> {
    let handler = IncomeHandler::new(state.pool);

    Ok(Json(handler.list_for_user(user_id).await?))
}

// =========================================================================
// Recurring expense endpoints
// =========================================================================

/// POST /recurring-expenses
async fn create_recurring_expense(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateRecurringExpenseRequest>,
) -> Result<(StatusCode, Json<RecurringExpenseRecord>), AppError> {
    let handler = RecurringExpenseHandler::new(state.pool);

    let command = CreateRecurringExpenseCommand {
        user_id: request.user_id,
        category_id: request.category_id,
        name: request.name,
        amount: request.amount,
        due_day: request.due_day,
    };

    let recurring = handler.create(command).await?;

    Ok((StatusCode::CREATED, Json(recurring)))
}

/// GET /recurring-expenses?user_id=
async fn list_recurring_expenses(
    State(state): State<AppState>,
    Query(query): Query<UserIdQuery>,
) -> Result<Json<Vec<RecurringExpenseRecord>>, AppError> {
    let handler = RecurringExpenseHandler::new(state.pool);

    Ok(Json(handler.list_for_user(query.user_id).await?))
}

/// PATCH /recurring-expenses/:recurring_id
async fn update_recurring_expense(
    State(state): State<AppState>,
    Path(recurring_id): Path<i64>,
    AppJson(request): AppJson<UpdateRecurringExpenseRequest>,
) -> Result<Json<RecurringExpenseRecord>, AppError> {
    let handler = RecurringExpenseHandler::new(state.pool);

    let command = UpdateRecurringExpenseCommand {
        amount: request.amount,
        due_day: request.due_day,
    };

    Ok(Json(handler.update(recurring_id, command).await?))
}

/// DELETE /recurring-expenses/:recurring_id
async fn delete_recurring_expense(
    State(state): State<AppState>,
    Path(recurring_id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    let handler = RecurringExpenseHandler::new(state.pool);

    handler.delete(recurring_id).await?;

    Ok(Json(MessageResponse {
        message: "Recurring expense deleted".to_string(),
    }))
}

// =========================================================================
// Auth endpoints
// =========================================================================

/// POST /signup
async fn signup(
    State(state): State<AppState>,
    AppJson(request): AppJson<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), AppError> {
    let handler = AuthHandler::new(state.pool);

    let command = SignupCommand {
        name: request.name,
        email: request.email,
        password: request.password,
        last_name: request.last_name,
        phone: request.phone,
    };

    let result = handler.signup(command).await?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            message: "User created successfully".to_string(),
            user_id: result.user_id,
        }),
    ))
}

/// POST /login
async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let handler = AuthHandler::new(state.pool);

    let result = handler.login(&request.email, &request.password).await?;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        user_id: result.user_id,
        name: result.name,
    }))
}

// =========================================================================
// Bank aggregator endpoints
// =========================================================================

/// POST /create_link_token
async fn create_link_token(
    State(state): State<AppState>,
    AppJson(request): AppJson<CreateLinkTokenRequest>,
) -> Result<Json<crate::plaid::LinkTokenPayload>, AppError> {
    let payload = state.aggregator.create_link_token(request.user_id).await?;

    Ok(Json(payload))
}

/// POST /exchange_token
///
/// Exchanges the public token and immediately fetches recent transactions,
/// mirroring the single round trip the client expects.
async fn exchange_token(
    State(state): State<AppState>,
    AppJson(request): AppJson<ExchangeTokenRequest>,
) -> Result<Json<TransactionsResponse>, AppError> {
    let access_token = state
        .aggregator
        .exchange_public_token(&request.public_token)
        .await?;

    let transactions = state.aggregator.recent_transactions(&access_token).await?;

    tracing::info!(count = transactions.len(), "Fetched bank transactions");

    Ok(Json(TransactionsResponse { transactions }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_category_request_deserialize() {
        let json = r#"{
            "user_id": 1,
            "name": "Groceries",
            "budget": 500
        }"#;

        let request: CreateCategoryRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.name, "Groceries");
        assert!(request.color.is_none());
    }

    #[test]
    fn test_create_expense_request_date_optional() {
        let json = r#"{"category_id": 3, "name": "Lunch", "amount": 12.50}"#;
        let request: CreateExpenseRequest = serde_json::from_str(json).unwrap();
        assert!(request.date.is_none());

        let json = r#"{"category_id": 3, "name": "Lunch", "amount": 12.50, "date": "2024-03-15"}"#;
        let request: CreateExpenseRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.date.unwrap().to_string(), "2024-03-15");
    }

    #[test]
    fn test_create_expense_request_rejects_bad_date() {
        let json = r#"{"category_id": 3, "name": "Lunch", "amount": 12.50, "date": "15/03/2024"}"#;
        assert!(serde_json::from_str::<CreateExpenseRequest>(json).is_err());
    }

    #[test]
    fn test_update_requests_default_to_empty() {
        let request: UpdateCategoryRequest = serde_json::from_str("{}").unwrap();
        assert!(request.budget.is_none());

        let request: UpdateExpenseRequest = serde_json::from_str("{}").unwrap();
        assert!(request.name.is_none() && request.amount.is_none() && request.date.is_none());
    }

    #[test]
    fn test_signup_request_optional_fields() {
        let json = r#"{"name": "Ada", "email": "ada@example.com", "password": "pw"}"#;
        let request: SignupRequest = serde_json::from_str(json).unwrap();
        assert!(request.last_name.is_none());
        assert!(request.phone.is_none());
    }

    #[test]
    fn test_missing_required_field_rejected() {
        // no amount
        let json = r#"{"category_id": 3, "name": "Lunch"}"#;
        assert!(serde_json::from_str::<CreateExpenseRequest>(json).is_err());
    }
}
