use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::instrument;

use crate::entries::parse_date;
use crate::error::bad_request;
use crate::ledger::DailyTotal;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/totals/daily", get(daily_totals))
        .route("/totals/:date", get(total_for_date))
}

/// Calories per day, oldest first. Feeds the daily chart.
#[instrument(skip(state))]
pub async fn daily_totals(State(state): State<AppState>) -> Json<Vec<DailyTotal>> {
    Json(state.ledger.read().await.daily_totals())
}

#[instrument(skip(state))]
pub async fn total_for_date(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DailyTotal>, (StatusCode, String)> {
    let date = parse_date(&date).map_err(bad_request)?;
    let total_calories = state.ledger.read().await.total_for_date(date);
    Ok(Json(DailyTotal {
        date,
        total_calories,
    }))
}
