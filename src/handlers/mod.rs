//! Business-logic handlers
//!
//! One handler struct per resource, each owning a pool clone. Routes stay
//! thin and delegate here.

pub mod auth_handler;
pub mod category_handler;
pub mod commands;
pub mod expense_handler;
pub mod income_handler;
pub mod recurring_handler;

pub use auth_handler::AuthHandler;
pub use category_handler::{CategoryHandler, DEFAULT_CATEGORY_COLOR};
pub use commands::{
    CategoryRecord, CreateCategoryCommand, CreateExpenseCommand, CreateIncomeCommand,
    CreateRecurringExpenseCommand, ExpenseRecord, ExpenseWithCategory, IncomeRecord,
    LoginResult, RecurringExpenseRecord, SignupCommand, SignupResult, UpdateCategoryCommand,
    UpdateExpenseCommand, UpdateRecurringExpenseCommand,
};
pub use expense_handler::{month_start, ExpenseHandler};
pub use income_handler::IncomeHandler;
pub use recurring_handler::RecurringExpenseHandler;
