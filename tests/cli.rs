//! CLI adapter integration tests
//!
//! Tests for CLI command handlers. These tests call the execute() functions
//! directly with test services, avoiding the complexity of E2E binary spawning.
//!
//! Test organization mirrors the CLI commands:
//! - lookup/parse: passage lookup and reference parsing
//! - search: multi-version search
//! - scan: HTML reference linking
//! - versions: import-version and list-versions
//! - cache: clear-cache and show-config
//! - output: output formatting helpers

mod common;

// CLI submodules - tests/cli/ directory
mod cli {
    pub mod test_cache;
    pub mod test_helpers;
    pub mod test_lookup;
    pub mod test_output;
    pub mod test_scan;
    pub mod test_search;
    pub mod test_versions;
}
