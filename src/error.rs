use axum::http::StatusCode;
use thiserror::Error;

use crate::category::Category;

/// Raised by the estimator when a category has no configured rules.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EstimationError {
    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

/// Reasons the ledger refuses a submission. Nothing is appended when one is returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(u32),

    #[error("unknown category: {0}")]
    UnknownCategory(String),
}

impl From<EstimationError> for LedgerError {
    fn from(e: EstimationError) -> Self {
        match e {
            EstimationError::UnknownCategory(c) => LedgerError::UnknownCategory(c),
        }
    }
}

/// Invalid calorie table.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no calorie rules configured for {0}")]
    MissingCategory(Category),

    #[error("default calories for {0} must be positive")]
    ZeroDefault(Category),

    #[error("rule #{index} for {category} has no keywords")]
    EmptyRule { category: Category, index: usize },

    #[error("rule #{index} for {category} contains an empty keyword")]
    EmptyKeyword { category: Category, index: usize },

    #[error("rule #{index} for {category} must be worth more than 0 kcal")]
    ZeroCalories { category: Category, index: usize },
}

pub(crate) fn internal<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    tracing::error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

pub(crate) fn bad_request<E: std::fmt::Display>(e: E) -> (StatusCode, String) {
    tracing::warn!(error = %e, "bad request");
    (StatusCode::BAD_REQUEST, e.to_string())
}
