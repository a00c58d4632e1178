// Common test utilities and fixtures

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items
// Note: These may appear unused in some test binaries
#[allow(unused_imports)]
pub use fixtures::{verses, VersionFiles, KJV_TSV, SAMPLE_PAGE, WEB_TSV};
#[allow(unused_imports)]
pub use helpers::{create_indexed_services, create_test_services, memory_store, test_config};
