//! CLI command implementations
//!
//! Each command module handles argument parsing and execution for a specific CLI command.

pub mod cache;
pub mod completions;
pub mod config;
pub mod import;
pub mod lookup;
pub mod parse;
pub mod scan;
pub mod search;
pub mod versions;

// Re-export argument types for use in mod.rs
pub use cache::ClearCacheArgs;
pub use completions::CompletionsArgs;
pub use config::ConfigArgs;
pub use import::ImportArgs;
pub use lookup::LookupArgs;
pub use parse::ParseArgs;
pub use scan::ScanArgs;
pub use search::SearchArgs;
pub use versions::ListVersionsArgs;

use crate::core::services::Services;

/// Version used when the caller names none
pub(crate) fn default_version(services: &Services) -> String {
    services
        .config
        .search
        .default_versions
        .first()
        .cloned()
        .unwrap_or_else(|| services.config.scanner.default_version.clone())
}
