//! Core domain logic (protocol-agnostic)
//!
//! This module contains all business logic that is independent
//! of the CLI and of any host page.
//!
//! # Architecture
//!
//! - **config**: Configuration loading (TOML + environment)
//! - **error**: Error types and Result alias
//! - **types**: Domain data structures
//! - **xdg**: XDG directory handling
//! - **grammar**: Shared book vocabulary and reference grammar
//! - **reference**: Reference parsing and canonical formatting
//! - **store**: Verse Store interface, in-memory and Tantivy stores
//! - **cache**: TTL query cache and content-addressed keys
//! - **search**: Multi-version search and passage lookup
//! - **services**: Unified service container

pub mod cache;
pub mod config;
pub mod error;
pub mod grammar;
pub mod reference;
pub mod search;
pub mod services;
pub mod store;
pub mod types;
pub mod xdg;

// Re-export key types for convenience
pub use config::Config;
pub use error::{Result, VerselinkError};
pub use services::Services;
