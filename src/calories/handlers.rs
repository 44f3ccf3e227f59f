use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::instrument;

use crate::category::Category;
use crate::error::bad_request;
use crate::estimation::{CalorieTable, Estimate};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/calories/table", get(get_table))
        .route("/calories/estimate", post(estimate))
}

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub category: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Defaults and keyword rules currently used for estimation.
#[instrument(skip(state))]
pub async fn get_table(State(state): State<AppState>) -> Json<CalorieTable> {
    Json(state.ledger.read().await.estimator().table().clone())
}

/// POST /calories/estimate { category: "plat", name: "Pizza au fromage" }
#[instrument(skip(state))]
pub async fn estimate(
    State(state): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> Result<Json<Estimate>, (StatusCode, String)> {
    let category: Category = req.category.parse().map_err(bad_request)?;
    let ledger = state.ledger.read().await;
    let estimate = ledger
        .estimator()
        .estimate(category, req.name.as_deref().unwrap_or_default())
        .map_err(bad_request)?;
    Ok(Json(estimate))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn call(req: Request<Body>) -> (StatusCode, Value) {
        let app = routes().with_state(AppState::fake());
        let res = app.oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn post_estimate(body: Value) -> Request<Body> {
        Request::post("/calories/estimate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn estimate_averages_matches() {
        let (status, json) = call(post_estimate(json!({
            "category": "Plat",
            "name": "Pizza au fromage"
        })))
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["calories"], 775);
        assert_eq!(json["matched_keyword"], "pizza");
        assert_eq!(json["matches"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn estimate_without_name_uses_default() {
        let (status, json) = call(post_estimate(json!({ "category": "drink" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["calories"], 120);
        assert!(json["matched_keyword"].is_null());
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let (status, _) =
            call(post_estimate(json!({ "category": "snack", "name": "chips" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn table_lists_both_categories() {
        let (status, json) =
            call(Request::get("/calories/table").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["dish"]["default_calories"], 550);
        assert_eq!(json["drink"]["default_calories"], 120);
        assert_eq!(json["dish"]["rules"][1]["keywords"][0], "pizza");
    }
}
