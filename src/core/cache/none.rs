use super::CacheBackend;
use crate::core::error::CacheError;
use std::time::Duration;

/// Backend that stores nothing; every read is a miss
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCache;

impl CacheBackend for NoCache {
    fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &[u8], _ttl: Duration) -> Result<(), CacheError> {
        Ok(())
    }

    fn invalidate_prefix(&self, _prefix: &str) -> Result<usize, CacheError> {
        Ok(0)
    }

    fn name(&self) -> &'static str {
        "none"
    }
}
