use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use shared::upload::DEFAULT_MAX_VIDEO_BYTES;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    pub media_root: PathBuf,
    pub public_base_url: String,
    pub max_video_bytes: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8080".into(),
            database_url: "sqlite://./data/site.db".into(),
            media_root: PathBuf::from("./data/media"),
            public_base_url: "http://127.0.0.1:8080".into(),
            max_video_bytes: DEFAULT_MAX_VIDEO_BYTES,
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("server.toml") {
        apply_file_settings(&mut settings, &raw);
    }

    if let Ok(v) = std::env::var("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Ok(v) = std::env::var("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Ok(v) = std::env::var("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Ok(v) = std::env::var("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Ok(v) = std::env::var("APP__MEDIA_ROOT") {
        settings.media_root = PathBuf::from(v);
    }

    if let Ok(v) = std::env::var("PUBLIC_BASE_URL") {
        settings.public_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__PUBLIC_BASE_URL") {
        settings.public_base_url = v;
    }

    if let Ok(v) = std::env::var("APP__MAX_VIDEO_BYTES") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.max_video_bytes = parsed;
        }
    }

    settings
}

/// Applies the flat `key = "value"` pairs of a `server.toml`. Unknown keys
/// and unparsable files are ignored.
fn apply_file_settings(settings: &mut Settings, raw: &str) {
    let Ok(file_cfg) = toml::from_str::<HashMap<String, toml::Value>>(raw) else {
        return;
    };

    if let Some(v) = file_cfg.get("bind_addr").and_then(toml::Value::as_str) {
        settings.server_bind = v.to_string();
    }
    if let Some(v) = file_cfg.get("database_url").and_then(toml::Value::as_str) {
        settings.database_url = v.to_string();
    }
    if let Some(v) = file_cfg.get("media_root").and_then(toml::Value::as_str) {
        settings.media_root = PathBuf::from(v);
    }
    if let Some(v) = file_cfg.get("public_base_url").and_then(toml::Value::as_str) {
        settings.public_base_url = v.to_string();
    }
    if let Some(v) = file_cfg
        .get("max_video_bytes")
        .and_then(toml::Value::as_integer)
        .and_then(|v| u64::try_from(v).ok())
    {
        settings.max_video_bytes = v;
    }
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    ensure_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

fn ensure_parent_dir_exists(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

/// Creates the bucket root so the static file service has something to serve.
pub fn prepare_media_root(media_root: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(media_root).with_context(|| {
        format!("failed to create media root '{}'", media_root.display())
    })
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
