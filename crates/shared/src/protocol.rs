use serde::{Deserialize, Serialize};

use crate::domain::{EventId, EventRecord, MediaKind, QuickItemId, QuickSection};

/// Body of every `DELETE` route and of id-keyed updates. The id stays
/// optional so a missing id can be answered with a validation error instead
/// of a decode failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdRequest<I> {
    #[serde(default = "Option::default")]
    pub id: Option<I>,
}

impl<I> IdRequest<I> {
    pub fn new(id: I) -> Self {
        Self { id: Some(id) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryUpload {
    pub media_url: String,
    pub thumbnail: String,
}

/// Fields accepted when creating a gallery item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewQuickItem {
    pub section: QuickSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub media_type: MediaKind,
    #[serde(default)]
    pub media_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub sequence: i64,
}

/// Partial update of a gallery item. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickItemPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<QuickItemId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<QuickSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(
        default,
        alias = "thumbnail",
        skip_serializing_if = "Option::is_none"
    )]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
}

/// Partial update of an event. Absent fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EventId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&EventRecord> for EventPatch {
    fn from(event: &EventRecord) -> Self {
        Self {
            id: event.id,
            title: Some(event.title.clone()),
            date: Some(event.date.clone()),
            time: Some(event.time.clone()),
            location: Some(event.location.clone()),
            description: Some(event.description.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BoardMemberId;

    #[test]
    fn id_request_tolerates_missing_id() {
        let req: IdRequest<BoardMemberId> = serde_json::from_str("{}").expect("decode");
        assert!(req.id.is_none());
        let req: IdRequest<BoardMemberId> = serde_json::from_str(r#"{"id":7}"#).expect("decode");
        assert_eq!(req.id, Some(BoardMemberId(7)));
    }

    #[test]
    fn new_quick_item_defaults_optional_fields() {
        let item: NewQuickItem =
            serde_json::from_str(r#"{"section":"fun","media_type":"image"}"#).expect("decode");
        assert_eq!(item.media_url, "");
        assert_eq!(item.sequence, 0);
        assert!(item.thumbnail_url.is_none());
    }

    #[test]
    fn quick_patch_accepts_legacy_thumbnail_key() {
        let patch: QuickItemPatch =
            serde_json::from_str(r#"{"id":3,"thumbnail":"https://cdn/t.png"}"#).expect("decode");
        assert_eq!(patch.id, Some(QuickItemId(3)));
        assert_eq!(patch.thumbnail_url.as_deref(), Some("https://cdn/t.png"));
    }

    #[test]
    fn event_patch_leaves_unsent_fields_empty() {
        let patch: EventPatch =
            serde_json::from_str(r#"{"id":5,"title":"Picnic at noon"}"#).expect("decode");
        assert_eq!(patch.id, Some(EventId(5)));
        assert_eq!(patch.title.as_deref(), Some("Picnic at noon"));
        assert!(patch.date.is_none());
        assert!(patch.location.is_none());
    }
}
