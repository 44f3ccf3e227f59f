//! Photo calorie journal: keyword-based calorie estimation, an append-only
//! entry ledger with per-day totals, and the HTTP service around them.

pub mod app;
pub mod calories;
pub mod category;
pub mod config;
pub mod entries;
pub mod error;
pub mod estimation;
pub mod images;
pub mod ledger;
pub mod state;
pub mod storage;
pub mod totals;

pub use category::Category;
pub use error::{ConfigError, EstimationError, LedgerError};
pub use estimation::{normalize, CalorieTable, Estimate, Estimator, KeywordRule};
pub use ledger::{DailyTotal, Entry, EstimationMode, ImageReference, Ledger, NewEntry};
