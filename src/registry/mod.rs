// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Remote rule registry.
//!
//! The registry serves the rules of named rulesets, plus a version token that changes
//! whenever any of those rulesets changes. Every request carries the user fingerprint.

mod client;
mod queries;

use async_trait::async_trait;

pub use client::GraphQlRegistryClient;
pub use queries::{GET_RULESETS_FOR_CLIENT, GET_RULESETS_LAST_UPDATED_TIMESTAMP, USE_RULE_FIX};

use crate::error::RegistryError;
use crate::rules::{Rule, VersionToken};

/// Source of rules and ruleset version tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RuleRegistry: Send + Sync {
    /// All rules of the given rulesets.
    async fn fetch_rules(&self, ruleset_names: &[String]) -> Result<Vec<Rule>, RegistryError>;

    /// Current version token of the given rulesets. `None` if the registry has none.
    async fn fetch_version_token(
        &self,
        ruleset_names: &[String],
    ) -> Result<Option<VersionToken>, RegistryError>;

    /// Record that the user applied a rule fix.
    async fn record_rule_fix(&self) -> Result<(), RegistryError>;

    /// Replace the API token used for subsequent requests.
    fn set_api_token(&self, _token: Option<String>) {}

    /// Report requests as coming from the given editor.
    fn set_client_info(&self, _name: &str, _version: &str) {}
}
