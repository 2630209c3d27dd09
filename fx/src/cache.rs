//! Feed document caching with a freshness threshold.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use refrates_common::{Clock, Timestamp};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::endpoint::FeedVariant;
use crate::error::{FxError, FxResult};
use crate::fetcher::FeedFetcher;

/// Key-value storage for fetched documents.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Stored bytes for `key`, if any.
    async fn read(&self, key: &str) -> FxResult<Option<Vec<u8>>>;

    /// Store `bytes` under `key`, replacing any previous entry.
    async fn write(&self, key: &str, bytes: &[u8]) -> FxResult<()>;

    /// When `key` was last written, if it exists.
    async fn modified_at(&self, key: &str) -> FxResult<Option<Timestamp>>;
}

/// Cache backed by files in a directory, one file per key.
#[derive(Debug, Clone)]
pub struct FileCacheBackend {
    dir: PathBuf,
}

impl FileCacheBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

fn io_error(action: &str, path: &Path, e: std::io::Error) -> FxError {
    FxError::Cache(format!("failed to {} {}: {}", action, path.display(), e))
}

#[async_trait]
impl CacheBackend for FileCacheBackend {
    async fn read(&self, key: &str) -> FxResult<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error("read", &path, e)),
        }
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> FxResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error("create", &self.dir, e))?;

        // Readers only ever see a complete file: write aside, then rename over.
        let path = self.path(key);
        let tmp = self.dir.join(format!(".{}.{}.tmp", key, Uuid::new_v4()));
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| io_error("write", &tmp, e))?;
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(io_error("replace", &path, e));
        }
        Ok(())
    }

    async fn modified_at(&self, key: &str) -> FxResult<Option<Timestamp>> {
        let path = self.path(key);
        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error("stat", &path, e)),
        };
        let modified = metadata
            .modified()
            .map_err(|e| io_error("stat", &path, e))?;
        Ok(Some(DateTime::<Utc>::from(modified)))
    }
}

#[derive(Debug, Clone)]
struct StoredDocument {
    bytes: Vec<u8>,
    stored_at: Timestamp,
}

/// In-memory cache, timestamped by an injected clock.
pub struct MemoryCacheBackend {
    entries: DashMap<String, StoredDocument>,
    clock: Arc<dyn Clock>,
}

impl MemoryCacheBackend {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            clock,
        }
    }

    /// Seed an entry as if it had been written at `at`.
    pub fn insert_at(&self, key: impl Into<String>, bytes: impl Into<Vec<u8>>, at: Timestamp) {
        self.entries.insert(
            key.into(),
            StoredDocument {
                bytes: bytes.into(),
                stored_at: at,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheBackend for MemoryCacheBackend {
    async fn read(&self, key: &str) -> FxResult<Option<Vec<u8>>> {
        Ok(self.entries.get(key).map(|e| e.bytes.clone()))
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> FxResult<()> {
        self.insert_at(key, bytes.to_vec(), self.clock.now());
        Ok(())
    }

    async fn modified_at(&self, key: &str) -> FxResult<Option<Timestamp>> {
        Ok(self.entries.get(key).map(|e| e.stored_at))
    }
}

/// Configuration for the document cache.
#[derive(Debug, Clone)]
pub struct CacheStoreConfig {
    /// Base URL the feed variants are fetched from.
    pub feed_base_url: String,
    /// Documents younger than this are reused without fetching.
    pub freshness: Duration,
}

impl Default for CacheStoreConfig {
    fn default() -> Self {
        Self {
            feed_base_url: crate::config::DEFAULT_FEED_URL.to_string(),
            freshness: refrates_common::constants::cache_freshness(),
        }
    }
}

/// Serves feed documents from cache while fresh, refetching once stale.
pub struct CacheStore {
    backend: Arc<dyn CacheBackend>,
    fetcher: Arc<dyn FeedFetcher>,
    clock: Arc<dyn Clock>,
    config: CacheStoreConfig,
}

impl CacheStore {
    pub fn new(
        backend: Arc<dyn CacheBackend>,
        fetcher: Arc<dyn FeedFetcher>,
        clock: Arc<dyn Clock>,
        config: CacheStoreConfig,
    ) -> Self {
        Self {
            backend,
            fetcher,
            clock,
            config,
        }
    }

    /// Age of the cached document for `variant`, if one exists.
    pub async fn age(&self, variant: FeedVariant) -> FxResult<Option<Duration>> {
        let modified = self.backend.modified_at(variant.cache_key()).await?;
        Ok(modified.map(|at| self.clock.now().signed_duration_since(at)))
    }

    /// Raw document for `variant`.
    ///
    /// A fresh cached copy is returned as is. Otherwise one fetch is made; if it
    /// fails, a stale copy is still served. Cache backend errors never fail the
    /// call on their own: only a failed fetch with nothing readable cached does.
    #[instrument(skip_all, fields(variant = %variant))]
    pub async fn resolve(&self, variant: FeedVariant) -> FxResult<Vec<u8>> {
        let key = variant.cache_key();

        let age = match self.age(variant).await {
            Ok(age) => age,
            Err(e) => {
                warn!(key, error = %e, "Cannot read cache timestamp, treating entry as stale");
                None
            }
        };

        match age {
            Some(age) if age < self.config.freshness => {
                match self.backend.read(key).await {
                    Ok(Some(bytes)) => {
                        debug!(key, age_secs = age.num_seconds(), "Cache hit");
                        return Ok(bytes);
                    }
                    Ok(None) => debug!(key, "Cache entry vanished before read"),
                    Err(e) => warn!(key, error = %e, "Cache read failed, refetching"),
                }
            }
            Some(age) => debug!(key, age_secs = age.num_seconds(), "Cache entry stale"),
            None => debug!(key, "Cache miss"),
        }

        let url = variant.url(&self.config.feed_base_url);
        match self.fetcher.fetch(&url).await {
            Ok(bytes) => {
                info!(
                    fetcher = self.fetcher.name(),
                    url = %url,
                    bytes = bytes.len(),
                    "Fetched feed document"
                );
                if let Err(e) = self.backend.write(key, &bytes).await {
                    warn!(key, error = %e, "Failed to cache feed document");
                }
                Ok(bytes)
            }
            Err(fetch_err) => match self.backend.read(key).await {
                Ok(Some(stale)) => {
                    warn!(key, error = %fetch_err, "Fetch failed, serving stale cache");
                    Ok(stale)
                }
                Ok(None) => Err(fetch_err),
                Err(e) => {
                    warn!(key, error = %e, "Stale cache unreadable");
                    Err(fetch_err)
                }
            },
        }
    }
}
