//! Unified service container for Verselink
//!
//! Provides shared access to all core services.

use crate::core::cache::QueryCache;
use crate::core::config::Config;
use crate::core::error::Result;
use crate::core::reference::ReferenceParser;
use crate::core::search::{PassageService, SearchService};
use crate::core::store::{TantivyVerseStore, VerseStore};
use crate::core::types::PassageOptions;
use crate::scanner::{PopupLoader, ReferenceScanner, ServicePassageSource};
use std::sync::Arc;

/// Unified services container
///
/// Adapters (the CLI, tests) use this same struct for service access.
#[derive(Clone)]
pub struct Services {
    /// Verse Store every search and passage lookup goes through
    pub store: Arc<dyn VerseStore>,

    /// The on-disk store, when `store` is one (needed for imports)
    pub library: Option<Arc<TantivyVerseStore>>,

    /// Reference parser sharing the store's book vocabulary
    pub parser: Arc<ReferenceParser>,

    /// Multi-version search
    pub search: Arc<SearchService>,

    /// Passage lookup
    pub passages: Arc<PassageService>,

    /// Query cache shared by search and passages
    pub cache: QueryCache,

    /// Application configuration
    pub config: Arc<Config>,
}

impl Services {
    /// Create services from configuration, opening the version indexes
    pub fn new(config: Config) -> Result<Self> {
        let library = Arc::new(TantivyVerseStore::open(&config.storage.index_dir)?);
        let store: Arc<dyn VerseStore> = library.clone();
        let mut services = Self::with_store(config, store);
        services.library = Some(library);
        Ok(services)
    }

    /// Create services over any Verse Store
    pub fn with_store(config: Config, store: Arc<dyn VerseStore>) -> Self {
        let cache = QueryCache::from_config(&config.cache);
        let parser = Arc::new(ReferenceParser::new(store.clone()));

        let search = Arc::new(SearchService::new(
            Arc::clone(&store),
            cache.clone(),
            config.search.clone(),
        ));
        let passages = Arc::new(PassageService::new(
            Arc::clone(&store),
            Arc::clone(&parser),
            cache.clone(),
        ));

        Self {
            store,
            library: None,
            parser,
            search,
            passages,
            cache,
            config: Arc::new(config),
        }
    }

    /// A scanner configured from `[scanner]`
    pub fn scanner(&self) -> ReferenceScanner {
        ReferenceScanner::new(Arc::clone(&self.parser), self.config.scanner.clone())
    }

    /// Popup loader backed by the local passage service
    pub fn popup_loader(&self) -> PopupLoader {
        let options = PassageOptions {
            language: self.config.scanner.language.clone(),
            ..PassageOptions::default()
        };
        PopupLoader::new(Arc::new(ServicePassageSource::new(
            Arc::clone(&self.passages),
            options,
        )))
    }
}
