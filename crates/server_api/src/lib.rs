use std::sync::Arc;

use shared::{
    domain::{
        BoardMember, BoardMemberId, EventId, EventRecord, HeroContent, ProjectRecord, QuickItem,
        QuickItemId,
    },
    error::{ApiError, ErrorCode},
    protocol::{EventPatch, IdRequest, NewQuickItem, QuickItemPatch, SuccessResponse},
    upload::UploadLimits,
};
use storage::{ObjectStore, Storage};
use tracing::info;

pub mod gateway;

pub use gateway::{
    upload, upload_board_photo, upload_gallery_media, upload_hero_image, IncomingFile,
    StoredUpload,
};

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
    pub media: Arc<dyn ObjectStore>,
    pub limits: UploadLimits,
}

pub async fn list_board_members(ctx: &ApiContext) -> Result<Vec<BoardMember>, ApiError> {
    ctx.storage.list_board_members().await.map_err(internal)
}

/// Bulk upsert of the whole board. The returned rows carry the ids the store
/// assigned to members that were sent without one.
pub async fn save_board_members(
    ctx: &ApiContext,
    members: &[BoardMember],
) -> Result<Vec<BoardMember>, ApiError> {
    let saved = ctx
        .storage
        .save_board_members(members)
        .await
        .map_err(internal)?;
    info!(count = saved.len(), "board: members saved");
    Ok(saved)
}

pub async fn delete_board_member(
    ctx: &ApiContext,
    req: IdRequest<BoardMemberId>,
) -> Result<SuccessResponse, ApiError> {
    let id = req.id.ok_or_else(ApiError::missing_id)?;
    let removed = ctx
        .storage
        .delete_board_member(id)
        .await
        .map_err(internal)?;
    info!(member_id = id.0, removed, "board: member deleted");
    Ok(SuccessResponse::ok())
}

pub async fn list_quick_items(ctx: &ApiContext) -> Result<Vec<QuickItem>, ApiError> {
    ctx.storage.list_quick_items().await.map_err(internal)
}

pub async fn create_quick_item(
    ctx: &ApiContext,
    item: &NewQuickItem,
) -> Result<Vec<QuickItem>, ApiError> {
    let created = ctx
        .storage
        .create_quick_item(item)
        .await
        .map_err(internal)?;
    info!(
        item_id = created.id.0,
        section = created.section.as_str(),
        "quick: item created"
    );
    Ok(vec![created])
}

/// Returns the updated rows; an id that matches nothing yields an empty list.
pub async fn update_quick_item(
    ctx: &ApiContext,
    patch: &QuickItemPatch,
) -> Result<Vec<QuickItem>, ApiError> {
    let id = patch.id.ok_or_else(ApiError::missing_id)?;
    let updated = ctx
        .storage
        .update_quick_item(id, patch)
        .await
        .map_err(internal)?;
    info!(item_id = id.0, matched = updated.is_some(), "quick: item updated");
    Ok(updated.into_iter().collect())
}

pub async fn delete_quick_item(
    ctx: &ApiContext,
    req: IdRequest<QuickItemId>,
) -> Result<SuccessResponse, ApiError> {
    let id = req.id.ok_or_else(ApiError::missing_id)?;
    let removed = ctx
        .storage
        .delete_quick_item(id)
        .await
        .map_err(internal)?;
    info!(item_id = id.0, removed, "quick: item deleted");
    Ok(SuccessResponse::ok())
}

/// An unset hero reads as all-empty content.
pub async fn get_hero(ctx: &ApiContext) -> Result<HeroContent, ApiError> {
    Ok(ctx
        .storage
        .load_hero()
        .await
        .map_err(internal)?
        .unwrap_or_default())
}

pub async fn save_hero(ctx: &ApiContext, hero: &HeroContent) -> Result<HeroContent, ApiError> {
    let saved = ctx.storage.save_hero(hero).await.map_err(internal)?;
    info!("hero: content saved");
    Ok(saved)
}

pub async fn list_events(ctx: &ApiContext) -> Result<Vec<EventRecord>, ApiError> {
    ctx.storage.list_events().await.map_err(internal)
}

pub async fn create_event(
    ctx: &ApiContext,
    event: &EventRecord,
) -> Result<Vec<EventRecord>, ApiError> {
    let created = ctx.storage.create_event(event).await.map_err(internal)?;
    info!(event_id = created.id.map(|id| id.0), "events: event created");
    Ok(vec![created])
}

pub async fn update_event(
    ctx: &ApiContext,
    patch: &EventPatch,
) -> Result<Vec<EventRecord>, ApiError> {
    let id = patch.id.ok_or_else(ApiError::missing_id)?;
    let updated = ctx
        .storage
        .update_event(id, patch)
        .await
        .map_err(internal)?
        .ok_or_else(|| ApiError::new(ErrorCode::NotFound, "event not found"))?;
    info!(event_id = id.0, "events: event updated");
    Ok(vec![updated])
}

pub async fn delete_event(
    ctx: &ApiContext,
    req: IdRequest<EventId>,
) -> Result<SuccessResponse, ApiError> {
    let id = req.id.ok_or_else(ApiError::missing_id)?;
    let removed = ctx.storage.delete_event(id).await.map_err(internal)?;
    info!(event_id = id.0, removed, "events: event deleted");
    Ok(SuccessResponse::ok())
}

pub async fn list_projects(ctx: &ApiContext) -> Result<Vec<ProjectRecord>, ApiError> {
    ctx.storage.list_projects().await.map_err(internal)
}

fn internal(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Storage, format!("{err:#}"))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
