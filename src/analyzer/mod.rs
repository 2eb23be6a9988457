// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Remote analyzer.
//!
//! The analyzer receives a file's source (base64) together with the rules to run and
//! answers with one [`RuleResponse`] per rule. All coordinates it reports are 1-based.

mod client;
mod types;

use async_trait::async_trait;

pub use client::{encode_source, RosieClient};
pub use types::{
    AnalysisRequest, AnalysisResponse, AnalyzerPosition, EditType, RosieFix, RosieFixEdit,
    RuleResponse, Violation,
};

use crate::error::AnalyzerError;
use crate::rules::Rule;

/// Runs rules against a file.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Analyze `code_base64` written in `language` (analyzer tag) with `rules`.
    async fn analyze(
        &self,
        filename: &str,
        language: &str,
        code_base64: &str,
        rules: &[Rule],
    ) -> Result<Vec<RuleResponse>, AnalyzerError>;
}
