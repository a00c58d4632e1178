//! On-disk cache backend.
//!
//! One JSON envelope per key, named after the SHA-256 of the key:
//!
//! ```json
//! {"key": "verselink:search:…", "created_at": "…", "ttl_secs": 3600, "payload": "<base64>"}
//! ```
//!
//! Writes go to a temporary file first and are renamed into place,
//! so readers never observe a partially written entry.

use super::{CacheBackend, CacheEntry};
use crate::core::error::CacheError;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    key: String,
    created_at: DateTime<Utc>,
    ttl_secs: u64,
    payload: String,
}

impl Envelope {
    fn into_entry(self) -> Option<CacheEntry> {
        let payload = BASE64.decode(self.payload.as_bytes()).ok()?;
        Some(CacheEntry {
            key: self.key,
            payload,
            created_at: self.created_at,
            ttl: Duration::from_secs(self.ttl_secs),
        })
    }
}

/// Cache stored as files in a directory
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    /// Open (creating if needed) a cache directory
    pub fn open(dir: &Path) -> Result<Self, CacheError> {
        fs::create_dir_all(dir)
            .map_err(|e| CacheError::Unavailable(format!("{}: {e}", dir.display())))?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name = hex::encode(Sha256::digest(key.as_bytes()));
        self.dir.join(format!("{name}.json"))
    }

    fn read_envelope(path: &Path) -> Option<Envelope> {
        let bytes = fs::read(path).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

impl CacheBackend for FileCache {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let Some(envelope) = Self::read_envelope(&path) else {
            tracing::debug!(path = %path.display(), "Ignoring unreadable cache file");
            return Ok(None);
        };

        Ok(envelope
            .into_entry()
            .filter(|entry| entry.key == key && !entry.is_expired())
            .map(|entry| entry.payload))
    }

    fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<(), CacheError> {
        let entry = CacheEntry::new(key, value, ttl);
        let envelope = Envelope {
            key: entry.key,
            created_at: entry.created_at,
            ttl_secs: entry.ttl.as_secs(),
            payload: BASE64.encode(&entry.payload),
        };

        let path = self.path_for(key);
        let temp = path.with_extension(format!("tmp-{}", std::process::id()));
        fs::write(&temp, serde_json::to_vec(&envelope)?)?;
        fs::rename(&temp, &path)?;
        Ok(())
    }

    fn invalidate_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        let mut removed = 0;
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let matches = Self::read_envelope(&path)
                .map(|envelope| envelope.key.starts_with(prefix))
                // Unreadable files are garbage either way
                .unwrap_or(true);
            if matches {
                match fs::remove_file(&path) {
                    Ok(()) => removed += 1,
                    Err(e) => tracing::warn!("Failed to remove cache file {:?}: {}", path, e),
                }
            }
        }
        Ok(removed)
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
