//! Query cache.
//!
//! A best-effort accelerator in front of the verse store. Backends
//! are plain TTL key/value stores; `QueryCache` adds content-addressed
//! key derivation and typed JSON access on top. Every backend failure
//! is treated as a miss by callers.
//!
//! Expiry is lazy: an expired entry is reported as absent on read and
//! only removed by a later write or `invalidate_prefix`.

mod file;
mod keys;
mod memory;
mod none;

pub use file::FileCache;
pub use keys::{
    namespace_prefix, passage_key, search_key, KEY_PREFIX, PASSAGE_NAMESPACE, SEARCH_NAMESPACE,
};
pub use memory::MemoryCache;
pub use none::NoCache;

use crate::core::config::{CacheBackendKind, CacheConfig};
use crate::core::error::CacheError;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Generic TTL key/value store
pub trait CacheBackend: Send + Sync {
    /// Payload for a live key, `None` when absent or expired
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store a payload, replacing any existing entry
    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError>;

    /// Delete every entry whose key starts with `prefix`
    ///
    /// Returns the number of entries removed.
    fn invalidate_prefix(&self, prefix: &str) -> Result<usize, CacheError>;

    /// Short backend name for logs
    fn name(&self) -> &'static str;
}

/// A stored payload with its lifetime
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub key: String,
    pub payload: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub ttl: Duration,
}

impl CacheEntry {
    pub fn new(key: &str, payload: &[u8], ttl: Duration) -> Self {
        Self {
            key: key.to_string(),
            payload: payload.to_vec(),
            created_at: Utc::now(),
            ttl,
        }
    }

    /// Whether the entry is dead at `now` (a zero TTL is dead at once)
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or(chrono::Duration::MAX);
        match self.created_at.checked_add_signed(ttl) {
            Some(expires_at) => now >= expires_at,
            None => false,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

/// Typed, key-deriving front end over a cache backend
#[derive(Clone)]
pub struct QueryCache {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self { backend, ttl }
    }

    /// Build the backend selected by configuration
    ///
    /// A file cache whose directory cannot be created degrades to
    /// `NoCache` with a warning.
    pub fn from_config(config: &CacheConfig) -> Self {
        let ttl = Duration::from_secs(config.ttl_secs);
        let backend: Arc<dyn CacheBackend> = match config.backend {
            CacheBackendKind::Memory => Arc::new(MemoryCache::new()),
            CacheBackendKind::None => Arc::new(NoCache),
            CacheBackendKind::File => match FileCache::open(Path::new(&config.dir)) {
                Ok(cache) => Arc::new(cache),
                Err(e) => {
                    tracing::warn!(
                        dir = %config.dir.display(),
                        error = %e,
                        "Query cache unavailable, continuing without cache"
                    );
                    Arc::new(NoCache)
                }
            },
        };
        Self::new(backend, ttl)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Read and decode an entry; any failure is a miss
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.backend.get(key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                tracing::debug!(key = %key, "Cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                tracing::debug!(key = %key, "Cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Unreadable cache entry, treating as miss");
                None
            }
        }
    }

    /// Encode and store an entry with the configured TTL; failures are logged
    pub fn set_json<T: Serialize>(&self, key: &str, value: &T) {
        let result = serde_json::to_vec(value)
            .map_err(CacheError::from)
            .and_then(|bytes| self.backend.set(key, &bytes, self.ttl));
        if let Err(e) = result {
            tracing::warn!(key = %key, error = %e, "Cache write failed");
        }
    }

    pub fn invalidate_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let removed = self.backend.invalidate_prefix(prefix)?;
        tracing::info!(prefix = %prefix, removed, "Invalidated cache entries");
        Ok(removed)
    }
}
