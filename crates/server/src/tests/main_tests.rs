use super::*;
use axum::{
    body::{self, Body},
    http::Request,
    response::Response,
};
use shared::domain::DEFAULT_THUMBNAIL_URL;
use tower::ServiceExt;

const BOUNDARY: &str = "site-test-boundary";

struct TestApp {
    router: Router,
    _media_dir: tempfile::TempDir,
}

async fn test_app_with(limits: UploadLimits) -> TestApp {
    let media_dir = tempfile::tempdir().expect("tempdir");
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let media = LocalBucketStore::new(media_dir.path(), "http://localhost:8080").expect("store");
    let api = ApiContext {
        storage,
        media: Arc::new(media),
        limits,
    };
    let router = build_router(Arc::new(AppState {
        api,
        media_root: media_dir.path().to_path_buf(),
    }));
    TestApp {
        router,
        _media_dir: media_dir,
    }
}

async fn test_app() -> TestApp {
    test_app_with(UploadLimits::default()).await
}

fn json_request(method: &str, uri: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .expect("request")
}

fn multipart_request(uri: &str, field: &str, filename: &str, mime: &str, bytes: &[u8]) -> Request<Body> {
    let mut payload = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {mime}\r\n\r\n"
    )
    .into_bytes();
    payload.extend_from_slice(bytes);
    payload.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

    Request::post(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(payload))
        .expect("request")
}

async fn json_body<T: serde::de::DeserializeOwned>(response: Response) -> T {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

#[tokio::test]
async fn healthz_reports_ok_when_storage_is_ready() {
    let app = test_app().await;
    let request = Request::get("/healthz").body(Body::empty()).expect("request");
    let response = app.router.oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"ok");
}

#[tokio::test]
async fn board_save_returns_assigned_ids_and_lists_by_sequence() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/bod",
            serde_json::json!([
                { "name": "Second", "position": "Secretary", "initial": "s", "sequence": 2 },
                { "name": "First", "position": "President", "initial": "f", "sequence": 1,
                  "linkedIn": "https://linkedin.example/first" }
            ]),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let saved: Vec<BoardMember> = json_body(response).await;
    assert_eq!(saved.len(), 2);
    assert_eq!(saved[0].name, "Second");
    assert!(saved.iter().all(|m| m.id.is_some()));

    let response = app
        .router
        .oneshot(Request::get("/api/bod").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let listed: Vec<BoardMember> = json_body(response).await;
    assert_eq!(listed[0].name, "First");
    assert_eq!(listed[0].initial, "F");
    assert_eq!(
        listed[0].linkedin.as_deref(),
        Some("https://linkedin.example/first")
    );
}

#[tokio::test]
async fn board_save_accepts_empty_array() {
    let app = test_app().await;
    let response = app
        .router
        .oneshot(json_request("POST", "/api/bod", serde_json::json!([])))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let saved: Vec<BoardMember> = json_body(response).await;
    assert!(saved.is_empty());
}

#[tokio::test]
async fn delete_without_id_is_bad_request() {
    let app = test_app().await;
    for uri in ["/api/bod", "/api/quick", "/api/events"] {
        let response = app
            .router
            .clone()
            .oneshot(json_request("DELETE", uri, serde_json::json!({})))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
        let err: ApiError = json_body(response).await;
        assert_eq!(err.code, ErrorCode::Validation);
        assert_eq!(err.message, "ID is required");
    }
}

#[tokio::test]
async fn delete_of_unknown_id_succeeds() {
    let app = test_app().await;
    let response = app
        .router
        .oneshot(json_request("DELETE", "/api/events", serde_json::json!({ "id": 77 })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let done: SuccessResponse = json_body(response).await;
    assert!(done.success);
}

#[tokio::test]
async fn quick_item_defaults_thumbnail_and_put_patches() {
    let app = test_app().await;

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/quick",
            serde_json::json!({
                "section": "dances",
                "title": "Garba night",
                "media_type": "video",
                "media_url": "http://localhost:8080/media/quick-media/videos/1-a.mp4",
                "sequence": 1
            }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let created: Vec<QuickItem> = json_body(response).await;
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].thumbnail_url, DEFAULT_THUMBNAIL_URL);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/quick",
            serde_json::json!({ "id": created[0].id, "thumbnail": "https://cdn.example/t.jpg" }),
        ))
        .await
        .expect("response");
    let updated: Vec<QuickItem> = json_body(response).await;
    assert_eq!(updated[0].thumbnail_url, "https://cdn.example/t.jpg");
    assert_eq!(updated[0].title.as_deref(), Some("Garba night"));

    let response = app
        .router
        .oneshot(json_request("PUT", "/api/quick", serde_json::json!({ "title": "x" })))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn events_patch_of_unknown_id_is_not_found() {
    let app = test_app().await;
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/events",
            serde_json::json!({ "title": "Picnic", "date": "2031-06-01" }),
        ))
        .await
        .expect("response");
    let created: Vec<EventRecord> = json_body(response).await;
    assert_eq!(created.len(), 1);

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "PATCH",
            "/api/events",
            serde_json::json!({ "id": 9001, "title": "Ghost" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .router
        .oneshot(json_request(
            "PATCH",
            "/api/events",
            serde_json::json!({ "id": created[0].id, "title": "Picnic at noon" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Vec<EventRecord> = json_body(response).await;
    assert_eq!(updated[0].title, "Picnic at noon");
    assert_eq!(updated[0].date, "2031-06-01");
}

#[tokio::test]
async fn hero_is_empty_until_saved() {
    let app = test_app().await;
    let response = app
        .router
        .clone()
        .oneshot(Request::get("/api/hero").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let hero: HeroContent = json_body(response).await;
    assert_eq!(hero, HeroContent::default());

    let response = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/hero",
            serde_json::json!({ "title": "Service above self", "cta_text": "Join" }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .router
        .oneshot(Request::get("/api/hero").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let hero: HeroContent = json_body(response).await;
    assert_eq!(hero.title, "Service above self");
    assert_eq!(hero.cta_text, "Join");
}

#[tokio::test]
async fn uploaded_board_photo_is_served_from_media_route() {
    let app = test_app().await;
    let response = app
        .router
        .clone()
        .oneshot(multipart_request(
            "/api/bod/upload",
            "file",
            "portrait.png",
            "image/png",
            b"png-bytes",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let uploaded: UploadedUrl = json_body(response).await;
    let path = uploaded
        .url
        .strip_prefix("http://localhost:8080")
        .expect("public base");
    assert!(path.starts_with("/media/board-members/"));
    assert!(path.ends_with(".png"));

    let response = app
        .router
        .oneshot(Request::get(path).body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    assert_eq!(body.as_ref(), b"png-bytes");
}

#[tokio::test]
async fn gallery_upload_returns_media_url_as_thumbnail() {
    let app = test_app().await;
    let response = app
        .router
        .oneshot(multipart_request(
            "/api/quick/upload",
            "file",
            "clip.mp4",
            "video/mp4",
            b"frames",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let uploaded: GalleryUpload = json_body(response).await;
    assert!(uploaded
        .media_url
        .starts_with("http://localhost:8080/media/quick-media/videos/"));
    assert_eq!(uploaded.thumbnail, uploaded.media_url);
}

#[tokio::test]
async fn oversize_gallery_video_is_rejected() {
    let app = test_app_with(UploadLimits {
        max_video_bytes: 8,
        ..UploadLimits::default()
    })
    .await;
    let response = app
        .router
        .oneshot(multipart_request(
            "/api/quick/upload",
            "file",
            "clip.mp4",
            "video/mp4",
            b"nine-byte",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ApiError = json_body(response).await;
    assert_eq!(err.code, ErrorCode::Validation);
}

#[tokio::test]
async fn hero_upload_rejects_video() {
    let app = test_app().await;
    let response = app
        .router
        .oneshot(multipart_request(
            "/api/hero/upload",
            "file",
            "banner.mp4",
            "video/mp4",
            b"frames",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ApiError = json_body(response).await;
    assert_eq!(err.message, "only image files are allowed");
}

#[tokio::test]
async fn upload_without_file_field_is_bad_request() {
    let app = test_app().await;
    let response = app
        .router
        .oneshot(multipart_request(
            "/api/bod/upload",
            "attachment",
            "portrait.png",
            "image/png",
            b"png-bytes",
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let err: ApiError = json_body(response).await;
    assert_eq!(err.message, "no file uploaded");
}

#[tokio::test]
async fn projects_route_lists_seeded_projects() {
    let media_dir = tempfile::tempdir().expect("tempdir");
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .create_project(
            "Clean water",
            "Wells",
            "Six wells in two villages",
            &["https://cdn.example/w.jpg".to_string()],
        )
        .await
        .expect("project");
    let media = LocalBucketStore::new(media_dir.path(), "http://localhost:8080").expect("store");
    let router = build_router(Arc::new(AppState {
        api: ApiContext {
            storage,
            media: Arc::new(media),
            limits: UploadLimits::default(),
        },
        media_root: media_dir.path().to_path_buf(),
    }));

    let response = router
        .oneshot(Request::get("/api/projects").body(Body::empty()).expect("request"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let projects: serde_json::Value = json_body(response).await;
    assert_eq!(projects[0]["project_title"], "Clean water");
    assert_eq!(
        projects[0]["project_images"][0]["image_url"],
        "https://cdn.example/w.jpg"
    );
}
