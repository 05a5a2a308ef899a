use shared::{
    domain::{BoardMember, MediaKind},
    upload::{object_path, UploadKind},
};
use storage::{LocalBucketStore, ObjectStore, Storage};

#[tokio::test]
async fn photo_upload_then_board_save_acceptance() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let bucket_root = tempfile::tempdir().expect("tempdir");
    let media = LocalBucketStore::new(bucket_root.path(), "http://localhost:8080").expect("media");

    let kind = UploadKind::BoardPhoto;
    let key = object_path(kind, MediaKind::Image, "portrait.PNG", 1_700_000_000_000, "k3x9");
    media
        .put_new(kind.bucket(), &key, b"\x89PNG")
        .await
        .expect("upload");
    let url = media.public_url(kind.bucket(), &key).expect("url");
    assert_eq!(
        url,
        "http://localhost:8080/media/board-members/1700000000000-k3x9.png"
    );

    let saved = storage
        .save_board_members(&[BoardMember {
            name: "Dana".into(),
            image_url: url.clone(),
            initial: "d".into(),
            sequence: 1,
            ..BoardMember::default()
        }])
        .await
        .expect("save");

    let listed = storage.list_board_members().await.expect("list");
    assert_eq!(listed, saved);
    assert_eq!(listed[0].image_url, url);
    assert_eq!(listed[0].initial, "D");
}
