// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Workspace configuration types.
//!
//! A `codiga.yml` file lists the rulesets to run and, optionally, rules to ignore:
//!
//! ```yaml
//! rulesets:
//!   - python-security
//! ignore:
//!   - python-security:
//!     - no-eval
//!     - no-exec:
//!       - prefix: /scripts
//!     - no-pickle:
//!       - prefix:
//!         - /tests
//!         - /tools
//! ```

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Valid ruleset names: lowercase alphanumerics and dashes, 5 to 32 characters.
static RULESET_NAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]{4,31}$").expect("ruleset name pattern is valid"));

/// Whether `name` is an acceptable ruleset name.
pub fn is_valid_ruleset_name(name: &str) -> bool {
    RULESET_NAME_PATTERN.is_match(name)
}

/// Parsed content of a workspace's `codiga.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceConfig {
    /// Rulesets to fetch, in file order.
    pub ruleset_names: Vec<String>,
    /// Ignore configuration keyed by ruleset name.
    pub ignore: HashMap<String, RulesetIgnore>,
}

impl WorkspaceConfig {
    /// The configuration of a workspace without rulesets.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.ruleset_names.is_empty() && self.ignore.is_empty()
    }

    /// Ignore entry for a rule, if the workspace declares one.
    pub fn rule_ignore(&self, ruleset_name: &str, rule_name: &str) -> Option<&RuleIgnore> {
        self.ignore
            .get(ruleset_name)
            .and_then(|ruleset| ruleset.rule_ignores.get(rule_name))
    }
}

/// Ignore configuration for one ruleset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesetIgnore {
    pub ruleset_name: String,
    pub rule_ignores: HashMap<String, RuleIgnore>,
}

impl RulesetIgnore {
    pub fn new(ruleset_name: impl Into<String>) -> Self {
        Self {
            ruleset_name: ruleset_name.into(),
            rule_ignores: HashMap::new(),
        }
    }

    /// Add or replace the ignore entry of a rule.
    pub fn insert(&mut self, rule_ignore: RuleIgnore) {
        self.rule_ignores
            .insert(rule_ignore.rule_name.clone(), rule_ignore);
    }
}

/// Ignore configuration for one rule.
///
/// Without prefixes the rule is ignored everywhere; otherwise only in files whose
/// workspace-relative path starts with one of the prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleIgnore {
    pub rule_name: String,
    pub prefixes: Vec<String>,
}

impl RuleIgnore {
    pub fn new(rule_name: impl Into<String>) -> Self {
        Self {
            rule_name: rule_name.into(),
            prefixes: Vec::new(),
        }
    }

    /// Add a prefix unless it is already present.
    pub fn add_prefix(&mut self, prefix: impl Into<String>) {
        let prefix = prefix.into();
        if !self.prefixes.contains(&prefix) {
            self.prefixes.push(prefix);
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.add_prefix(prefix);
        self
    }
}
