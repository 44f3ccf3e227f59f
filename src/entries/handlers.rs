use axum::{
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64ct::{Base64, Encoding};
use bytes::Bytes;
use time::OffsetDateTime;
use tracing::{error, instrument, warn};
use uuid::Uuid;

use super::dto::{split_data_url, CreateEntryBase64, EntryResponse, MultipartFields, Pagination};
use super::services::{submit_entry, SubmitError};
use crate::error::{bad_request, internal};
use crate::images::services::{load_photo, PhotoUpload};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/entries", get(list_entries).post(create_entry_multipart))
        .route("/entries/base64", post(create_entry_base64))
        .route("/entries/:id", get(get_entry))
        .route("/entries/:id/photo", get(get_entry_photo))
}

type Created = (StatusCode, HeaderMap, Json<EntryResponse>);

/// GET /entries — most recent submission first.
#[instrument(skip(state))]
pub async fn list_entries(
    State(state): State<AppState>,
    Query(p): Query<Pagination>,
) -> Json<Vec<EntryResponse>> {
    let ledger = state.ledger.read().await;
    let items = ledger
        .history()
        .skip(p.offset)
        .take(p.limit)
        .map(EntryResponse::from)
        .collect();
    Json(items)
}

#[instrument(skip(state))]
pub async fn get_entry(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EntryResponse>, (StatusCode, String)> {
    let ledger = state.ledger.read().await;
    match ledger.get(id) {
        Some(entry) => Ok(Json(EntryResponse::from(entry))),
        None => {
            warn!(%id, "entry not found");
            Err((StatusCode::NOT_FOUND, "Entry not found".into()))
        }
    }
}

/// POST /entries (multipart)
/// Parts: photo (file), date, category, name, quantity, calories.
#[instrument(skip(state, mp))]
pub async fn create_entry_multipart(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> Result<Created, (StatusCode, String)> {
    let mut fields = MultipartFields::default();
    let mut photo: Option<PhotoUpload> = None;

    while let Some(field) = mp.next_field().await.map_err(bad_request)? {
        let Some(name) = field.name().map(|s| s.to_string()) else {
            continue;
        };
        if name == "photo" {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            let body = field.bytes().await.map_err(bad_request)?;
            photo = Some(PhotoUpload { body, content_type });
        } else {
            let value = field.text().await.map_err(bad_request)?;
            fields.set(&name, value);
        }
    }

    let fields = fields.parse().map_err(bad_request)?;
    let entry = submit_entry(&state, fields, photo, today())
        .await
        .map_err(rejection)?;
    created(EntryResponse::from(&entry))
}

/// POST /entries/base64 { image_b64: "...", content_type?: "image/jpeg", category, ... }
#[instrument(skip(state, body))]
pub async fn create_entry_base64(
    State(state): State<AppState>,
    Json(body): Json<CreateEntryBase64>,
) -> Result<Created, (StatusCode, String)> {
    let photo = match body.image_b64.as_deref() {
        Some(raw) if !raw.trim().is_empty() => {
            let (url_type, payload) = split_data_url(raw.trim());
            let content_type = body
                .content_type
                .as_deref()
                .or(url_type)
                .unwrap_or("application/octet-stream")
                .to_string();
            let bytes = Base64::decode_vec(payload)
                .map_err(|_| (StatusCode::BAD_REQUEST, "invalid base64".to_string()))?;
            Some(PhotoUpload {
                body: Bytes::from(bytes),
                content_type,
            })
        }
        _ => None,
    };

    let entry = submit_entry(&state, body.fields(), photo, today())
        .await
        .map_err(rejection)?;
    created(EntryResponse::from(&entry))
}

/// Photo bytes, served with the content type they were uploaded with.
#[instrument(skip(state))]
pub async fn get_entry_photo(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, (StatusCode, String)> {
    let image = state
        .ledger
        .read()
        .await
        .get(id)
        .map(|e| e.image().clone())
        .ok_or((StatusCode::NOT_FOUND, "Entry not found".to_string()))?;

    match load_photo(state.storage.as_ref(), &image).await {
        Ok(Some(bytes)) => {
            Ok(([(header::CONTENT_TYPE, image.content_type)], bytes).into_response())
        }
        Ok(None) => {
            error!(%id, key = %image.key, "photo missing from storage");
            Err((StatusCode::NOT_FOUND, "Photo not found".into()))
        }
        Err(e) => Err(internal(e)),
    }
}

fn created(entry: EntryResponse) -> Result<Created, (StatusCode, String)> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::LOCATION,
        HeaderValue::from_str(&format!("/api/v1/entries/{}", entry.id)).map_err(internal)?,
    );
    Ok((StatusCode::CREATED, headers, Json(entry)))
}

fn rejection(e: SubmitError) -> (StatusCode, String) {
    match e {
        SubmitError::Storage(e) => internal(e),
        other => bad_request(other),
    }
}

fn today() -> time::Date {
    OffsetDateTime::now_utc().date()
}
