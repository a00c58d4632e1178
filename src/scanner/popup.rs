//! Popup passage loading.
//!
//! Each annotated span is a popup target. Requests for the same target
//! may overlap (the pointer moves from one reference to another), and
//! responses complete in any order. Only the newest request for a
//! target may render; older ones resolve to `Superseded`.

use crate::core::error::{Result, VerselinkError};
use crate::core::search::PassageService;
use crate::core::types::{Passage, PassageOptions};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Asynchronous passage fetcher used by popups
#[async_trait]
pub trait PassageSource: Send + Sync {
    async fn fetch(&self, reference: &str, version: &str) -> Result<Passage>;
}

/// `PassageSource` backed by the local `PassageService`
pub struct ServicePassageSource {
    passages: Arc<PassageService>,
    options: PassageOptions,
}

impl ServicePassageSource {
    pub fn new(passages: Arc<PassageService>, options: PassageOptions) -> Self {
        Self { passages, options }
    }
}

#[async_trait]
impl PassageSource for ServicePassageSource {
    async fn fetch(&self, reference: &str, version: &str) -> Result<Passage> {
        self.passages.get_passage(reference, version, &self.options)
    }
}

/// What a popup should show once its request completes
#[derive(Debug, Clone, PartialEq)]
pub enum PopupOutcome {
    Rendered(Passage),
    /// A newer request for the same target was issued meanwhile
    Superseded,
    /// Reference or version not found, with a user-facing message
    NotFound(String),
    Failed(String),
}

/// Last-request-wins loader keyed by popup target
pub struct PopupLoader {
    source: Arc<dyn PassageSource>,
    generations: Mutex<HashMap<String, u64>>,
}

impl PopupLoader {
    pub fn new(source: Arc<dyn PassageSource>) -> Self {
        Self {
            source,
            generations: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the passage for a target
    pub async fn load(&self, target: &str, reference: &str, version: &str) -> PopupOutcome {
        let ticket = self.bump(target);
        let fetched = self.source.fetch(reference, version).await;

        if !self.is_current(target, ticket) {
            tracing::debug!(target = %target, reference = %reference, "Discarding stale popup response");
            return PopupOutcome::Superseded;
        }

        match fetched {
            Ok(passage) => PopupOutcome::Rendered(passage),
            Err(e) if e.is_not_found() => PopupOutcome::NotFound(not_found_message(&e)),
            Err(e) => {
                tracing::warn!(reference = %reference, error = %e, "Popup passage fetch failed");
                PopupOutcome::Failed(e.message())
            }
        }
    }

    /// Invalidate any request in flight for a target (popup closed)
    pub fn cancel(&self, target: &str) {
        self.bump(target);
    }

    fn bump(&self, target: &str) -> u64 {
        let mut generations = self
            .generations
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let generation = generations.entry(target.to_string()).or_insert(0);
        *generation += 1;
        *generation
    }

    fn is_current(&self, target: &str, ticket: u64) -> bool {
        self.generations
            .lock()
            .map(|generations| generations.get(target) == Some(&ticket))
            .unwrap_or(false)
    }
}

fn not_found_message(error: &VerselinkError) -> String {
    match error {
        VerselinkError::Parse(_) => "Reference not found".to_string(),
        other => other.message(),
    }
}
