use thiserror::Error;
use time::Date;

use super::dto::EntryFields;
use crate::error::LedgerError;
use crate::images::services::{discard_photo, is_supported_image, store_photo, PhotoUpload};
use crate::ledger::{Entry, NewEntry};
use crate::state::AppState;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("photo is required")]
    MissingPhoto,

    #[error("unsupported photo type {0:?}")]
    UnsupportedPhoto(String),

    #[error(transparent)]
    Rejected(#[from] LedgerError),

    #[error("photo storage failed: {0:#}")]
    Storage(anyhow::Error),
}

/// Stores the photo, then appends the entry. A photo whose entry the ledger
/// refuses is removed again.
pub async fn submit_entry(
    st: &AppState,
    fields: EntryFields,
    photo: Option<PhotoUpload>,
    today: Date,
) -> Result<Entry, SubmitError> {
    let photo = photo
        .filter(|p| !p.body.is_empty())
        .ok_or(SubmitError::MissingPhoto)?;
    if !is_supported_image(&photo.content_type) {
        return Err(SubmitError::UnsupportedPhoto(photo.content_type));
    }

    let image = store_photo(st.storage.as_ref(), photo)
        .await
        .map_err(SubmitError::Storage)?;

    let new = NewEntry {
        date: fields.date.unwrap_or(today),
        category: fields.category,
        name: fields.name,
        quantity: fields.quantity,
        calories: fields.calories,
        image: image.clone(),
    };
    let appended = st.ledger.write().await.append(new);

    match appended {
        Ok(entry) => Ok(entry),
        Err(e) => {
            discard_photo(st.storage.as_ref(), &image).await;
            Err(e.into())
        }
    }
}
