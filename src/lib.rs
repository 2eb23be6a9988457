// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! codiga-ls - a language server for Codiga static analysis.
//!
//! The server sends the source of open documents to a remote analyzer together with
//! the rules configured for their workspace, and turns the results into diagnostics
//! and quick fixes.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - [`types`] - Positions, ranges, diagnostics and text edits
//! - [`error`] - Error types and result aliases
//! - [`config`] - `codiga.yml` parsing and server settings
//! - [`language`] - File extension to language mapping
//! - [`workspace`] - Workspace folders and relative paths
//! - [`document`] - Open document store
//! - [`registry`] - Rule registry client (GraphQL)
//! - [`rules`] - Per-workspace rule cache and rule selection
//! - [`analyzer`] - Analyzer client
//! - [`diagnostics`] - Debounced analysis and the fix registry
//! - [`actions`] - Rule fix and ignore code actions
//! - [`server`] - `tower-lsp` server
//! - [`telemetry`] - Logging setup
//!
//! # Data flow
//!
//! ```text
//! didOpen/didChange -> AnalysisCoordinator (debounce) -> RuleCache/select_rules
//!     -> Analyzer -> diagnostics + FixRegistry -> publishDiagnostics
//!
//! periodic timer -> RuleCache::refresh_all -> RuleRegistry -> revalidate open documents
//! ```

pub mod actions;
pub mod analyzer;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod language;
pub mod registry;
pub mod rules;
pub mod server;
pub mod telemetry;
pub mod types;
pub mod workspace;

// Re-export commonly used types at crate root
pub use error::{AnalyzerError, ConfigError, RegistryError, Result};
pub use types::{Diagnostic, DiagnosticSeverity, Position, Range, TextEdit};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
