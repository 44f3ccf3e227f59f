//! Keyword-based calorie estimation.

mod estimator;
mod normalize;
mod rules;

pub use estimator::{Estimate, Estimator, KeywordMatch};
pub use normalize::{normalize, normalize_opt};
pub use rules::{CalorieTable, CategoryRules, KeywordRule};
