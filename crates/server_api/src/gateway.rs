use chrono::Utc;
use shared::{
    domain::MediaKind,
    error::{ApiError, ErrorCode},
    protocol::{GalleryUpload, UploadedUrl},
    upload::{object_path, UploadKind},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::ApiContext;

const SUFFIX_LEN: usize = 10;

/// A file received from a multipart form.
#[derive(Debug, Clone)]
pub struct IncomingFile {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredUpload {
    pub url: String,
    pub media: MediaKind,
}

/// Validates `file` for `kind`, writes it under a fresh timestamped key and
/// returns its public URL. Nothing is written when validation fails.
pub async fn upload(
    ctx: &ApiContext,
    kind: UploadKind,
    file: &IncomingFile,
) -> Result<StoredUpload, ApiError> {
    let media = ctx
        .limits
        .check(kind, &file.mime_type, file.bytes.len() as u64)
        .map_err(|rejection| ApiError::validation(rejection.to_string()))?;

    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(SUFFIX_LEN)
        .collect();
    let key = object_path(
        kind,
        media,
        &file.filename,
        Utc::now().timestamp_millis(),
        &suffix,
    );

    ctx.media
        .put_new(kind.bucket(), &key, &file.bytes)
        .await
        .map_err(|error| {
            warn!(bucket = kind.bucket(), %key, %error, "upload: storage write failed");
            ApiError::new(ErrorCode::Storage, format!("{error:#}"))
        })?;
    let url = ctx
        .media
        .public_url(kind.bucket(), &key)
        .map_err(|error| ApiError::new(ErrorCode::Storage, format!("{error:#}")))?;

    info!(
        bucket = kind.bucket(),
        %key,
        media = media.as_str(),
        size_bytes = file.bytes.len(),
        "upload: stored"
    );
    Ok(StoredUpload { url, media })
}

pub async fn upload_board_photo(
    ctx: &ApiContext,
    file: &IncomingFile,
) -> Result<UploadedUrl, ApiError> {
    let stored = upload(ctx, UploadKind::BoardPhoto, file).await?;
    Ok(UploadedUrl { url: stored.url })
}

pub async fn upload_hero_image(
    ctx: &ApiContext,
    file: &IncomingFile,
) -> Result<UploadedUrl, ApiError> {
    let stored = upload(ctx, UploadKind::HeroImage, file).await?;
    Ok(UploadedUrl { url: stored.url })
}

/// Gallery uploads have no generated thumbnail; the media URL doubles as one.
pub async fn upload_gallery_media(
    ctx: &ApiContext,
    file: &IncomingFile,
) -> Result<GalleryUpload, ApiError> {
    let stored = upload(ctx, UploadKind::GalleryMedia, file).await?;
    Ok(GalleryUpload {
        thumbnail: stored.url.clone(),
        media_url: stored.url,
    })
}
