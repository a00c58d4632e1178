//! Verselink - Bible reference parsing and verse search
//!
//! Parses human-written Bible references ("John 3:16-18", "1 Sam 1:1",
//! "约 3:16"), searches one or more installed Bible versions with
//! cached, paginated and highlighted results, and auto-links references
//! found in document text.
//!
//! # Architecture
//!
//! The codebase is organized into three main modules:
//!
//! - **core**: Domain logic (protocol-agnostic)
//!   - config, error, types, xdg
//!   - grammar, reference (one vocabulary for parser and scanner)
//!   - store (Verse Store interface, Tantivy indexes)
//!   - cache (TTL key/value cache)
//!   - search (orchestrator, ranking, passages)
//!   - services (unified service container)
//!
//! - **scanner**: Client text scanner (depends on core)
//!   - document model, annotation, cooperative scheduling, popups
//!
//! - **cli**: Command-line adapter (depends on core and scanner)

// Core domain logic (protocol-agnostic)
pub mod core;

// Reference auto-linking over a document tree
pub mod scanner;

// Command-line adapter
pub mod cli;

// Re-export commonly used types for convenience
pub use core::config::Config;
pub use core::error::{Result, VerselinkError};
pub use core::reference::ReferenceParser;
pub use core::search::{PassageService, SearchService};
pub use core::services::Services;
pub use core::types::*;
pub use scanner::ReferenceScanner;
