use anyhow::Context;
use bytes::Bytes;
use uuid::Uuid;

use crate::ledger::ImageReference;
use crate::storage::StorageClient;

/// Photo received with a submission.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub body: Bytes,
    pub content_type: String,
}

/// Stores the photo under a fresh key and returns the handle kept on the entry.
pub async fn store_photo(
    storage: &dyn StorageClient,
    photo: PhotoUpload,
) -> anyhow::Result<ImageReference> {
    let content_type = essence(&photo.content_type);
    let ext = ext_from_mime(&content_type).unwrap_or("bin");
    let key = format!("photos/{}.{}", Uuid::new_v4(), ext);
    storage
        .put_object(&key, photo.body, &content_type)
        .await
        .with_context(|| format!("put_object {}", key))?;
    Ok(ImageReference { key, content_type })
}

pub async fn load_photo(
    storage: &dyn StorageClient,
    image: &ImageReference,
) -> anyhow::Result<Option<Bytes>> {
    storage
        .get_object(&image.key)
        .await
        .with_context(|| format!("get_object {}", image.key))
}

/// Best-effort removal of a photo whose entry was refused.
pub async fn discard_photo(storage: &dyn StorageClient, image: &ImageReference) {
    if let Err(e) = storage.delete_object(&image.key).await {
        tracing::warn!(error = %e, key = %image.key, "orphan photo left in storage");
    }
}

pub fn is_supported_image(content_type: &str) -> bool {
    ext_from_mime(&essence(content_type)).is_some()
}

/// `type/subtype` without parameters, lowercased: "Image/JPEG; q=1" is "image/jpeg".
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn ext_from_mime(ct: &str) -> Option<&'static str> {
    match ct {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/webp" => Some("webp"),
        "image/heic" => Some("heic"),
        _ => None,
    }
}
