// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Rule types shared by the registry, the cache and the analyzer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::WorkspaceConfig;

/// A single analysis rule, as sent to the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rule {
    /// `<ruleset>/<rule>`.
    pub id: String,
    pub ruleset_name: String,
    pub rule_name: String,
    /// Registry language name. Compared case-insensitively.
    pub language: String,
    #[serde(rename = "type")]
    pub rule_type: RuleType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_checked: Option<EntityChecked>,
    /// Rule source, base64-encoded.
    pub content_base64: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

impl Rule {
    pub fn new(
        ruleset_name: impl Into<String>,
        rule_name: impl Into<String>,
        language: impl Into<String>,
        rule_type: RuleType,
        content_base64: impl Into<String>,
    ) -> Self {
        let ruleset_name = ruleset_name.into();
        let rule_name = rule_name.into();
        Self {
            id: format!("{}/{}", ruleset_name, rule_name),
            ruleset_name,
            rule_name,
            language: language.into(),
            rule_type,
            entity_checked: None,
            content_base64: content_base64.into(),
            pattern: None,
        }
    }

    pub fn with_entity_checked(mut self, entity_checked: EntityChecked) -> Self {
        self.entity_checked = Some(entity_checked);
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }
}

/// How the analyzer evaluates a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleType {
    Ast,
    Pattern,
}

impl RuleType {
    /// Parse a registry rule type, ignoring case.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "ast" => Some(Self::Ast),
            "pattern" => Some(Self::Pattern),
            _ => None,
        }
    }
}

/// Syntax element an AST rule is evaluated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityChecked {
    FunctionCall,
    IfCondition,
    Import,
    Assignment,
    ForLoop,
    FunctionDefinition,
    TryBlock,
    Type,
    Interface,
    HtmlElement,
    ClassDefinition,
    FunctionExpression,
}

impl EntityChecked {
    /// Map a registry `elementChecked` value, ignoring case.
    pub fn from_element_checked(value: &str) -> Option<Self> {
        let entity = match value.to_lowercase().as_str() {
            "functioncall" => Self::FunctionCall,
            "ifcondition" => Self::IfCondition,
            "import" => Self::Import,
            "assign" | "assignment" => Self::Assignment,
            "forloop" => Self::ForLoop,
            "functiondefinition" => Self::FunctionDefinition,
            "tryblock" => Self::TryBlock,
            "type" => Self::Type,
            "interface" => Self::Interface,
            "htmlelement" => Self::HtmlElement,
            "classdefinition" => Self::ClassDefinition,
            "functionexpression" => Self::FunctionExpression,
            _ => return None,
        };
        Some(entity)
    }
}

/// Opaque registry value identifying the current state of a set of rulesets.
///
/// Only equality is meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionToken(String);

impl VersionToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Build a token from a JSON value. `null` means no token.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(Self(s.clone())),
            other => Some(Self(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VersionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Cached rules of one workspace folder.
#[derive(Debug, Clone, PartialEq)]
pub struct CachedWorkspaceEntry {
    pub config: WorkspaceConfig,
    pub rules: Vec<Rule>,
    /// Last time the entry was confirmed up to date.
    pub last_refreshed: DateTime<Utc>,
    /// Registry token the rules were fetched with.
    pub last_timestamp: VersionToken,
    /// Modification time of `codiga.yml` when the rules were fetched.
    pub file_modified: DateTime<Utc>,
}
