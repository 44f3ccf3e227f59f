mod dto;
pub mod handlers;
pub mod services;

pub(crate) use dto::parse_date;
pub use dto::{EntryFields, EntryResponse};

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::routes()
}
