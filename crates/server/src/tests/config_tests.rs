use super::{
    apply_file_settings, normalize_database_url, prepare_database_url, prepare_media_root,
    Settings,
};

use shared::upload::MIB;

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
    assert_eq!(normalize_database_url("sqlite:site.db"), "sqlite://site.db");
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(normalize_database_url("   "), Settings::default().database_url);
}

#[test]
fn creates_parent_dir_for_sqlite_url() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("data").join("test.db");

    prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare db url");
    assert!(temp_root.path().join("data").exists());
}

#[test]
fn creates_media_root() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let media = temp_root.path().join("bucket").join("media");
    prepare_media_root(&media).expect("media root");
    assert!(media.is_dir());
}

#[test]
fn file_settings_override_defaults() {
    let mut settings = Settings::default();
    apply_file_settings(
        &mut settings,
        r#"
bind_addr = "0.0.0.0:9000"
public_base_url = "https://club.example"
media_root = "/srv/media"
max_video_bytes = 10485760
unrelated = true
"#,
    );
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.public_base_url, "https://club.example");
    assert_eq!(settings.media_root, std::path::PathBuf::from("/srv/media"));
    assert_eq!(settings.max_video_bytes, 10 * MIB);
    assert_eq!(settings.database_url, Settings::default().database_url);
}

#[test]
fn unparsable_file_settings_are_ignored() {
    let mut settings = Settings::default();
    apply_file_settings(&mut settings, "this is = = not toml");
    assert_eq!(settings.server_bind, Settings::default().server_bind);
}
