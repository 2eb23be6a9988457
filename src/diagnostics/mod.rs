// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Diagnostics: debounced analysis of open documents and the fixes it produced.

mod coordinator;
mod fixes;

use async_trait::async_trait;

pub use coordinator::{AnalysisCoordinator, AnalysisOutcome};
pub use fixes::FixRegistry;

use crate::types::Diagnostic;

/// Sink for the diagnostics of a document.
///
/// Each call replaces every diagnostic previously published for `uri`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DiagnosticsPublisher: Send + Sync {
    async fn publish(&self, uri: &str, diagnostics: Vec<Diagnostic>);
}
