use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use server_api::{ApiContext, IncomingFile};
use shared::{
    domain::{
        BoardMember, BoardMemberId, EventId, EventRecord, HeroContent, ProjectRecord, QuickItem,
        QuickItemId,
    },
    error::{ApiError, ErrorCode},
    protocol::{
        EventPatch, GalleryUpload, IdRequest, NewQuickItem, QuickItemPatch, SuccessResponse,
        UploadedUrl,
    },
    upload::{UploadLimits, MIB},
};
use storage::{LocalBucketStore, Storage, MEDIA_ROUTE_PREFIX};
use tower_http::{limit::RequestBodyLimitLayer, services::ServeDir};
use tracing::{error, info, warn};

mod config;

use config::{load_settings, prepare_database_url, prepare_media_root};

/// Headroom above the largest accepted file for multipart framing.
const MULTIPART_OVERHEAD_BYTES: u64 = MIB;

#[derive(Clone)]
struct AppState {
    api: ApiContext,
    media_root: PathBuf,
}

type HttpError = (StatusCode, Json<ApiError>);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|error| {
        error!(
            %database_url,
            %error,
            "failed to open SQLite database; verify parent directory exists and permissions are correct"
        );
        error
    })?;
    prepare_media_root(&settings.media_root)?;
    let media = LocalBucketStore::new(&settings.media_root, &settings.public_base_url)?;

    let api = ApiContext {
        storage,
        media: Arc::new(media),
        limits: UploadLimits {
            max_video_bytes: settings.max_video_bytes,
            ..UploadLimits::default()
        },
    };
    let state = AppState {
        api,
        media_root: settings.media_root.clone(),
    };
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(
        %addr,
        media_root = %settings.media_root.display(),
        public_base_url = %settings.public_base_url,
        "server listening"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let limits = state.api.limits;
    let body_limit = limits
        .max_video_bytes
        .max(limits.max_photo_bytes)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);
    let body_limit = usize::try_from(body_limit).unwrap_or(usize::MAX);
    let media = ServeDir::new(&state.media_root);

    Router::new()
        .route("/healthz", get(healthz))
        .route(
            "/api/bod",
            get(http_list_board)
                .post(http_save_board)
                .delete(http_delete_board_member),
        )
        .route("/api/bod/upload", post(http_upload_board_photo))
        .route(
            "/api/quick",
            get(http_list_quick)
                .post(http_create_quick)
                .put(http_update_quick)
                .delete(http_delete_quick),
        )
        .route("/api/quick/upload", post(http_upload_quick_media))
        .route("/api/hero", get(http_get_hero).post(http_save_hero))
        .route("/api/hero/upload", post(http_upload_hero_image))
        .route(
            "/api/events",
            get(http_list_events)
                .post(http_create_event)
                .patch(http_update_event)
                .delete(http_delete_event),
        )
        .route("/api/projects", get(http_list_projects))
        .nest_service(&format!("/{MEDIA_ROUTE_PREFIX}"), media)
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> Result<&'static str, HttpError> {
    state.api.storage.health_check().await.map_err(|e| {
        reject(ApiError::new(ErrorCode::Internal, e.to_string()))
    })?;
    Ok("ok")
}

fn reject(err: ApiError) -> HttpError {
    let status = match err.code {
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Storage | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!(code = ?err.code, message = %err.message, "request failed");
    }
    (status, Json(err))
}

fn multipart_rejection(err: MultipartError) -> HttpError {
    let status = err.status();
    let body = ApiError::validation(err.body_text());
    (status, Json(body))
}

/// Pulls the `file` field out of a multipart form; other fields are skipped.
async fn read_file_field(mut multipart: Multipart) -> Result<IncomingFile, HttpError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_rejection)? {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let mime_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await.map_err(multipart_rejection)?;
        return Ok(IncomingFile {
            filename,
            mime_type,
            bytes: bytes.to_vec(),
        });
    }
    Err(reject(ApiError::validation("no file uploaded")))
}

async fn http_list_board(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<BoardMember>>, HttpError> {
    let members = server_api::list_board_members(&state.api)
        .await
        .map_err(reject)?;
    Ok(Json(members))
}

async fn http_save_board(
    State(state): State<Arc<AppState>>,
    Json(members): Json<Vec<BoardMember>>,
) -> Result<Json<Vec<BoardMember>>, HttpError> {
    let saved = server_api::save_board_members(&state.api, &members)
        .await
        .map_err(reject)?;
    Ok(Json(saved))
}

async fn http_delete_board_member(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest<BoardMemberId>>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let done = server_api::delete_board_member(&state.api, req)
        .await
        .map_err(reject)?;
    Ok(Json(done))
}

async fn http_upload_board_photo(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadedUrl>, HttpError> {
    let file = read_file_field(multipart).await?;
    let uploaded = server_api::upload_board_photo(&state.api, &file)
        .await
        .map_err(reject)?;
    Ok(Json(uploaded))
}

async fn http_list_quick(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<QuickItem>>, HttpError> {
    let items = server_api::list_quick_items(&state.api)
        .await
        .map_err(reject)?;
    Ok(Json(items))
}

async fn http_create_quick(
    State(state): State<Arc<AppState>>,
    Json(item): Json<NewQuickItem>,
) -> Result<Json<Vec<QuickItem>>, HttpError> {
    let created = server_api::create_quick_item(&state.api, &item)
        .await
        .map_err(reject)?;
    Ok(Json(created))
}

async fn http_update_quick(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<QuickItemPatch>,
) -> Result<Json<Vec<QuickItem>>, HttpError> {
    let updated = server_api::update_quick_item(&state.api, &patch)
        .await
        .map_err(reject)?;
    Ok(Json(updated))
}

async fn http_delete_quick(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest<QuickItemId>>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let done = server_api::delete_quick_item(&state.api, req)
        .await
        .map_err(reject)?;
    Ok(Json(done))
}

async fn http_upload_quick_media(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<GalleryUpload>, HttpError> {
    let file = read_file_field(multipart).await?;
    let uploaded = server_api::upload_gallery_media(&state.api, &file)
        .await
        .map_err(reject)?;
    Ok(Json(uploaded))
}

async fn http_get_hero(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HeroContent>, HttpError> {
    let hero = server_api::get_hero(&state.api).await.map_err(reject)?;
    Ok(Json(hero))
}

async fn http_save_hero(
    State(state): State<Arc<AppState>>,
    Json(hero): Json<HeroContent>,
) -> Result<Json<HeroContent>, HttpError> {
    let saved = server_api::save_hero(&state.api, &hero)
        .await
        .map_err(reject)?;
    Ok(Json(saved))
}

async fn http_upload_hero_image(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<UploadedUrl>, HttpError> {
    let file = read_file_field(multipart).await?;
    let uploaded = server_api::upload_hero_image(&state.api, &file)
        .await
        .map_err(reject)?;
    Ok(Json(uploaded))
}

async fn http_list_events(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EventRecord>>, HttpError> {
    let events = server_api::list_events(&state.api).await.map_err(reject)?;
    Ok(Json(events))
}

async fn http_create_event(
    State(state): State<Arc<AppState>>,
    Json(event): Json<EventRecord>,
) -> Result<Json<Vec<EventRecord>>, HttpError> {
    let created = server_api::create_event(&state.api, &event)
        .await
        .map_err(reject)?;
    Ok(Json(created))
}

async fn http_update_event(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<EventPatch>,
) -> Result<Json<Vec<EventRecord>>, HttpError> {
    let updated = server_api::update_event(&state.api, &patch)
        .await
        .map_err(reject)?;
    Ok(Json(updated))
}

async fn http_delete_event(
    State(state): State<Arc<AppState>>,
    Json(req): Json<IdRequest<EventId>>,
) -> Result<Json<SuccessResponse>, HttpError> {
    let done = server_api::delete_event(&state.api, req)
        .await
        .map_err(reject)?;
    Ok(Json(done))
}

async fn http_list_projects(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ProjectRecord>>, HttpError> {
    let projects = server_api::list_projects(&state.api)
        .await
        .map_err(reject)?;
    Ok(Json(projects))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
