//! Upload rules shared by the admin client (checked before any request is
//! sent) and the server (checked again before anything is written).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::MediaKind;

pub const MIB: u64 = 1024 * 1024;
pub const DEFAULT_MAX_PHOTO_BYTES: u64 = 5 * MIB;
pub const DEFAULT_MAX_VIDEO_BYTES: u64 = 50 * MIB;

/// What an uploaded file is for. Decides the bucket, the folder and which
/// media families are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadKind {
    BoardPhoto,
    HeroImage,
    GalleryMedia,
}

impl UploadKind {
    pub fn bucket(self) -> &'static str {
        match self {
            UploadKind::BoardPhoto => "board-members",
            UploadKind::HeroImage => "hero",
            UploadKind::GalleryMedia => "quick-media",
        }
    }

    /// Folder inside the bucket; `None` writes at the bucket root.
    pub fn folder(self, media: MediaKind) -> Option<&'static str> {
        match (self, media) {
            (UploadKind::GalleryMedia, MediaKind::Video) => Some("videos"),
            (UploadKind::GalleryMedia, MediaKind::Image) => Some("images"),
            (UploadKind::BoardPhoto | UploadKind::HeroImage, _) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadRejection {
    #[error("no file uploaded")]
    Empty,
    #[error("unsupported file type '{mime_type}': only images and videos are accepted")]
    UnsupportedType { mime_type: String },
    #[error("only image files are allowed")]
    ImageRequired,
    #[error("file must be at most {} MiB", .limit_bytes / MIB)]
    PhotoTooLarge { limit_bytes: u64 },
    #[error("video must be at most {} MiB", .limit_bytes / MIB)]
    VideoTooLarge { limit_bytes: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadLimits {
    pub max_photo_bytes: u64,
    pub max_video_bytes: u64,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
            max_video_bytes: DEFAULT_MAX_VIDEO_BYTES,
        }
    }
}

impl UploadLimits {
    /// Checks type and size of a candidate upload and returns its media family.
    pub fn check(
        &self,
        kind: UploadKind,
        mime_type: &str,
        size_bytes: u64,
    ) -> Result<MediaKind, UploadRejection> {
        if size_bytes == 0 {
            return Err(UploadRejection::Empty);
        }
        let media =
            MediaKind::from_mime(mime_type).ok_or_else(|| UploadRejection::UnsupportedType {
                mime_type: mime_type.to_string(),
            })?;

        match kind {
            UploadKind::BoardPhoto | UploadKind::HeroImage => {
                if media != MediaKind::Image {
                    return Err(UploadRejection::ImageRequired);
                }
                if size_bytes > self.max_photo_bytes {
                    return Err(UploadRejection::PhotoTooLarge {
                        limit_bytes: self.max_photo_bytes,
                    });
                }
            }
            UploadKind::GalleryMedia => {
                if media == MediaKind::Video && size_bytes > self.max_video_bytes {
                    return Err(UploadRejection::VideoTooLarge {
                        limit_bytes: self.max_video_bytes,
                    });
                }
            }
        }

        Ok(media)
    }
}

/// Extension of the original filename, without the dot. Falls back to `bin`
/// when the name has none or it holds anything but ASCII letters and digits.
pub fn file_extension(filename: &str) -> String {
    match filename.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) => {
            ext.to_ascii_lowercase()
        }
        _ => "bin".to_string(),
    }
}

/// Object key `{folder}/{millis}-{suffix}.{ext}`, or without the folder for
/// root-level kinds.
pub fn object_path(
    kind: UploadKind,
    media: MediaKind,
    filename: &str,
    timestamp_millis: i64,
    suffix: &str,
) -> String {
    let name = format!("{timestamp_millis}-{suffix}.{}", file_extension(filename));
    match kind.folder(media) {
        Some(folder) => format!("{folder}/{name}"),
        None => name,
    }
}
