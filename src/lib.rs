//! Savvium backend library
//!
//! Re-exports modules for integration testing and the server binary.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod plaid;

pub use api::AppState;
pub use config::Config;
pub use error::{AppError, AppResult};
