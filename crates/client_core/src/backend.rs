use async_trait::async_trait;
use reqwest::{
    multipart::{Form, Part},
    Client, RequestBuilder,
};
use serde::de::DeserializeOwned;
use shared::{
    domain::{
        BoardMember, BoardMemberId, EventId, EventRecord, HeroContent, MediaKind, ProjectRecord,
        QuickItem, QuickItemId,
    },
    protocol::{
        GalleryUpload, IdRequest, NewQuickItem, QuickItemPatch, SuccessResponse, UploadedUrl,
    },
    upload::{UploadKind, UploadLimits},
};
use tracing::{debug, info};

use crate::error::ClientError;

pub type ClientResult<T> = Result<T, ClientError>;

/// A file picked in an editor, held in memory until the record is saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingUpload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl PendingUpload {
    pub fn new(filename: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Same checks the server runs, applied before anything is sent.
    pub fn check(&self, kind: UploadKind, limits: &UploadLimits) -> ClientResult<MediaKind> {
        Ok(limits.check(kind, &self.mime_type, self.bytes.len() as u64)?)
    }
}

/// Everything the editors and the public renderer need from the site.
#[async_trait]
pub trait SiteBackend: Send + Sync {
    async fn list_board_members(&self) -> ClientResult<Vec<BoardMember>>;
    async fn save_board_members(&self, members: &[BoardMember]) -> ClientResult<Vec<BoardMember>>;
    async fn delete_board_member(&self, id: BoardMemberId) -> ClientResult<()>;
    async fn upload_board_photo(&self, file: &PendingUpload) -> ClientResult<String>;

    async fn list_events(&self) -> ClientResult<Vec<EventRecord>>;
    async fn create_event(&self, event: &EventRecord) -> ClientResult<EventRecord>;
    async fn update_event(&self, event: &EventRecord) -> ClientResult<EventRecord>;
    async fn delete_event(&self, id: EventId) -> ClientResult<()>;

    async fn list_quick_items(&self) -> ClientResult<Vec<QuickItem>>;
    async fn create_quick_item(&self, item: &NewQuickItem) -> ClientResult<QuickItem>;
    async fn update_quick_item(&self, patch: &QuickItemPatch) -> ClientResult<Vec<QuickItem>>;
    async fn delete_quick_item(&self, id: QuickItemId) -> ClientResult<()>;
    async fn upload_quick_media(&self, file: &PendingUpload) -> ClientResult<GalleryUpload>;

    async fn get_hero(&self) -> ClientResult<HeroContent>;
    async fn save_hero(&self, hero: &HeroContent) -> ClientResult<HeroContent>;
    async fn upload_hero_image(&self, file: &PendingUpload) -> ClientResult<String>;

    async fn list_projects(&self) -> ClientResult<Vec<ProjectRecord>>;
}

/// [`SiteBackend`] over the site's JSON API.
pub struct HttpBackend {
    http: Client,
    site_url: String,
}

impl HttpBackend {
    pub fn new(site_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), site_url)
    }

    pub fn with_client(http: Client, site_url: impl Into<String>) -> Self {
        let site_url = site_url.into().trim_end_matches('/').to_string();
        Self { http, site_url }
    }

    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.site_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ClientResult<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::from_response_body(status.as_u16(), &body));
        }
        Ok(response.json().await?)
    }

    async fn upload<T: DeserializeOwned>(&self, path: &str, file: &PendingUpload) -> ClientResult<T> {
        let part = Part::bytes(file.bytes.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| ClientError::validation(format!("invalid file type: {e}")))?;
        let form = Form::new().part("file", part);
        info!(
            path,
            filename = %file.filename,
            size_bytes = file.bytes.len(),
            "backend: uploading file"
        );
        self.send(self.http.post(self.url(path)).multipart(form))
            .await
    }
}

/// Create and update routes answer with the affected rows.
fn single_row<T>(rows: Vec<T>, what: &str) -> ClientResult<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| ClientError::Decode(format!("server returned no {what}")))
}

#[async_trait]
impl SiteBackend for HttpBackend {
    async fn list_board_members(&self) -> ClientResult<Vec<BoardMember>> {
        self.send(self.http.get(self.url("/api/bod"))).await
    }

    async fn save_board_members(&self, members: &[BoardMember]) -> ClientResult<Vec<BoardMember>> {
        debug!(count = members.len(), "backend: saving board");
        self.send(self.http.post(self.url("/api/bod")).json(members))
            .await
    }

    async fn delete_board_member(&self, id: BoardMemberId) -> ClientResult<()> {
        let _: SuccessResponse = self
            .send(self.http.delete(self.url("/api/bod")).json(&IdRequest::new(id)))
            .await?;
        Ok(())
    }

    async fn upload_board_photo(&self, file: &PendingUpload) -> ClientResult<String> {
        let uploaded: UploadedUrl = self.upload("/api/bod/upload", file).await?;
        Ok(uploaded.url)
    }

    async fn list_events(&self) -> ClientResult<Vec<EventRecord>> {
        self.send(self.http.get(self.url("/api/events"))).await
    }

    async fn create_event(&self, event: &EventRecord) -> ClientResult<EventRecord> {
        let rows: Vec<EventRecord> = self
            .send(self.http.post(self.url("/api/events")).json(event))
            .await?;
        single_row(rows, "event")
    }

    async fn update_event(&self, event: &EventRecord) -> ClientResult<EventRecord> {
        let rows: Vec<EventRecord> = self
            .send(self.http.patch(self.url("/api/events")).json(event))
            .await?;
        single_row(rows, "event")
    }

    async fn delete_event(&self, id: EventId) -> ClientResult<()> {
        let _: SuccessResponse = self
            .send(self.http.delete(self.url("/api/events")).json(&IdRequest::new(id)))
            .await?;
        Ok(())
    }

    async fn list_quick_items(&self) -> ClientResult<Vec<QuickItem>> {
        self.send(self.http.get(self.url("/api/quick"))).await
    }

    async fn create_quick_item(&self, item: &NewQuickItem) -> ClientResult<QuickItem> {
        let rows: Vec<QuickItem> = self
            .send(self.http.post(self.url("/api/quick")).json(item))
            .await?;
        single_row(rows, "gallery item")
    }

    async fn update_quick_item(&self, patch: &QuickItemPatch) -> ClientResult<Vec<QuickItem>> {
        self.send(self.http.put(self.url("/api/quick")).json(patch))
            .await
    }

    async fn delete_quick_item(&self, id: QuickItemId) -> ClientResult<()> {
        let _: SuccessResponse = self
            .send(self.http.delete(self.url("/api/quick")).json(&IdRequest::new(id)))
            .await?;
        Ok(())
    }

    async fn upload_quick_media(&self, file: &PendingUpload) -> ClientResult<GalleryUpload> {
        self.upload("/api/quick/upload", file).await
    }

    async fn get_hero(&self) -> ClientResult<HeroContent> {
        self.send(self.http.get(self.url("/api/hero"))).await
    }

    async fn save_hero(&self, hero: &HeroContent) -> ClientResult<HeroContent> {
        self.send(self.http.post(self.url("/api/hero")).json(hero))
            .await
    }

    async fn upload_hero_image(&self, file: &PendingUpload) -> ClientResult<String> {
        let uploaded: UploadedUrl = self.upload("/api/hero/upload", file).await?;
        Ok(uploaded.url)
    }

    async fn list_projects(&self) -> ClientResult<Vec<ProjectRecord>> {
        self.send(self.http.get(self.url("/api/projects"))).await
    }
}

#[cfg(test)]
#[path = "tests/backend_tests.rs"]
mod tests;
