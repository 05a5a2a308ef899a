use std::sync::Arc;

use shared::{
    domain::{MediaKind, QuickItem, QuickItemId, QuickSection},
    protocol::{NewQuickItem, QuickItemPatch},
    upload::{UploadKind, UploadLimits},
};
use tracing::info;

use super::optional_text;
use crate::{
    backend::{ClientResult, PendingUpload, SiteBackend},
    error::ClientError,
};

/// Values of the gallery submission form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickForm {
    pub section: QuickSection,
    pub title: String,
    pub description: String,
    pub media_type: MediaKind,
    pub sequence: i64,
}

impl QuickForm {
    pub fn new(section: QuickSection, media_type: MediaKind) -> Self {
        Self {
            section,
            title: String::new(),
            description: String::new(),
            media_type,
            sequence: 0,
        }
    }
}

/// Gallery items are created from a form and refreshed from the site after
/// every change.
pub struct QuickEditor {
    backend: Arc<dyn SiteBackend>,
    limits: UploadLimits,
    items: Vec<QuickItem>,
}

impl QuickEditor {
    pub fn new(backend: Arc<dyn SiteBackend>) -> Self {
        Self::with_limits(backend, UploadLimits::default())
    }

    pub fn with_limits(backend: Arc<dyn SiteBackend>, limits: UploadLimits) -> Self {
        Self {
            backend,
            limits,
            items: Vec::new(),
        }
    }

    pub fn items(&self) -> &[QuickItem] {
        &self.items
    }

    pub async fn load(&mut self) -> ClientResult<()> {
        self.items = self.backend.list_quick_items().await?;
        Ok(())
    }

    /// Uploads `file` when given, creates the item and reloads the list. The
    /// upload's thumbnail is used when there is one; otherwise the site fills
    /// in its placeholder.
    pub async fn submit(
        &mut self,
        form: QuickForm,
        file: Option<PendingUpload>,
    ) -> ClientResult<QuickItem> {
        let (media_url, thumbnail_url) = match &file {
            Some(file) => {
                file.check(UploadKind::GalleryMedia, &self.limits)?;
                let uploaded = self.backend.upload_quick_media(file).await?;
                (uploaded.media_url, Some(uploaded.thumbnail))
            }
            None => (String::new(), None),
        };

        let item = NewQuickItem {
            section: form.section,
            title: optional_text(form.title),
            description: optional_text(form.description),
            media_type: form.media_type,
            media_url,
            thumbnail_url: thumbnail_url.filter(|url| !url.trim().is_empty()),
            sequence: form.sequence,
        };
        let created = self.backend.create_quick_item(&item).await?;
        info!(
            item_id = created.id.0,
            section = created.section.as_str(),
            "quick editor: item created"
        );

        self.load().await?;
        Ok(created)
    }

    /// Applies a partial update by id. Fails when the site no longer has the
    /// item.
    pub async fn update(&mut self, patch: QuickItemPatch) -> ClientResult<QuickItem> {
        let id = patch.id.ok_or_else(|| ClientError::validation("ID is required"))?;
        let updated = self
            .backend
            .update_quick_item(&patch)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                ClientError::validation(format!("gallery item {} no longer exists", id.0))
            })?;
        info!(item_id = id.0, "quick editor: item updated");

        self.load().await?;
        Ok(updated)
    }

    pub async fn delete(&mut self, id: QuickItemId) -> ClientResult<()> {
        self.backend.delete_quick_item(id).await?;
        info!(item_id = id.0, "quick editor: item deleted");
        self.load().await
    }
}
