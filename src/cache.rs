use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Display;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;

/// Base URL of the RFC Editor document tree.
pub const DEFAULT_BASE_URL: &str = "https://www.rfc-editor.org";

/// Filename of the master index inside the cache directory.
pub const INDEX_FILE: &str = "rfc-index.txt";

/// A fetch that could not be completed, carrying the identifying key
/// ("index" or "RFC <n>") and the underlying transport/status message.
#[derive(Debug, Error)]
#[error("Failed to fetch {key}: {message}")]
pub struct FetchError {
    pub key: String,
    pub message: String,
}

impl FetchError {
    pub fn new(key: impl Into<String>, err: impl Display) -> Self {
        Self {
            key: key.into(),
            message: err.to_string(),
        }
    }
}

/// Trait for the store that resolves index and document keys to local files.
#[async_trait]
pub trait DocStore: Send + Sync {
    /// Resolve the master index to a local path, downloading it if absent.
    async fn ensure_index(&self) -> Result<PathBuf, FetchError>;
    /// Resolve one RFC body to a local path, downloading it if absent.
    async fn ensure_document(&self, number: &str) -> Result<PathBuf, FetchError>;
}

/// Filesystem-backed cache of RFC Editor files. Filenames are a
/// deterministic function of the key, so a re-run detects existing
/// entries by path existence alone and never re-downloads.
#[derive(Debug, Clone)]
pub struct FileCache {
    client: Client,
    cache_dir: PathBuf,
    base_url: String,
}

impl FileCache {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self::new_with_base_url(cache_dir, DEFAULT_BASE_URL)
    }

    pub fn new_with_base_url(cache_dir: PathBuf, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            cache_dir,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Fetch-or-create for one cache entry. An existing file short-circuits
    /// without network access; otherwise the full response body is written
    /// to a temp path and renamed into place, so a failed fetch never
    /// leaves a partial cache file behind.
    async fn ensure_cached(
        &self,
        file_name: &str,
        url: &str,
        key: &str,
    ) -> Result<PathBuf, FetchError> {
        let path = self.cache_dir.join(file_name);
        if path.exists() {
            tracing::debug!("Cache hit for {} at {:?}", key, path);
            return Ok(path);
        }

        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| FetchError::new(key, e))?;

        tracing::info!("Downloading {} from {}", key, url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| FetchError::new(key, e))?;
        let body = response.text().await.map_err(|e| FetchError::new(key, e))?;

        let tmp = path.with_extension("part");
        fs::write(&tmp, &body)
            .await
            .map_err(|e| FetchError::new(key, e))?;
        fs::rename(&tmp, &path)
            .await
            .map_err(|e| FetchError::new(key, e))?;

        Ok(path)
    }
}

#[async_trait]
impl DocStore for FileCache {
    async fn ensure_index(&self) -> Result<PathBuf, FetchError> {
        let url = format!("{}/{}", self.base_url, INDEX_FILE);
        self.ensure_cached(INDEX_FILE, &url, "index").await
    }

    async fn ensure_document(&self, number: &str) -> Result<PathBuf, FetchError> {
        let file_name = format!("rfc{}.txt", number);
        let url = format!("{}/rfc/{}", self.base_url, file_name);
        self.ensure_cached(&file_name, &url, &format!("RFC {}", number))
            .await
    }
}
