use std::path::{Component, Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};
use tracing::debug;
use url::Url;

/// URL prefix under which bucket objects are served.
pub const MEDIA_ROUTE_PREFIX: &str = "media";

/// Write-once object storage with public URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `bytes` at `bucket/path`. Fails when the object already exists.
    async fn put_new(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<()>;

    fn public_url(&self, bucket: &str, path: &str) -> Result<String>;
}

/// Buckets are directories under `root`; objects are served by the HTTP
/// server at `{public_base}/media/{bucket}/{path}`.
#[derive(Debug, Clone)]
pub struct LocalBucketStore {
    root: PathBuf,
    public_base: Url,
}

impl LocalBucketStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Result<Self> {
        let mut base = public_base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let public_base = Url::parse(&base)
            .with_context(|| format!("invalid public base url '{public_base_url}'"))?;
        Ok(Self {
            root: root.into(),
            public_base,
        })
    }

    pub fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf> {
        let bucket = checked_relative(bucket)?;
        let path = checked_relative(path)?;
        Ok(self.root.join(bucket).join(path))
    }
}

#[async_trait]
impl ObjectStore for LocalBucketStore {
    async fn put_new(&self, bucket: &str, path: &str, bytes: &[u8]) -> Result<()> {
        let target = self.object_path(bucket, path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("failed to create bucket directory '{}'", parent.display())
            })?;
        }

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
            .await
            .map_err(|error| match error.kind() {
                std::io::ErrorKind::AlreadyExists => {
                    anyhow!("The resource already exists: {bucket}/{path}")
                }
                _ => anyhow!(error).context(format!("failed to create object {bucket}/{path}")),
            })?;
        file.write_all(bytes)
            .await
            .with_context(|| format!("failed to write object {bucket}/{path}"))?;
        file.flush().await?;

        debug!(bucket, path, size_bytes = bytes.len(), "media: object stored");
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> Result<String> {
        let bucket = checked_relative(bucket)?;
        let path = checked_relative(path)?;
        let url = self
            .public_base
            .join(&format!("{MEDIA_ROUTE_PREFIX}/{}/{}", bucket.display(), path.display()))
            .context("failed to build public url")?;
        Ok(url.to_string())
    }
}

/// Accepts only plain relative paths: no roots, no `..`, nothing empty.
fn checked_relative(raw: &str) -> Result<PathBuf> {
    let path = Path::new(raw);
    if raw.is_empty()
        || !path
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
    {
        return Err(anyhow!("invalid object key '{raw}'"));
    }
    Ok(path.to_path_buf())
}
