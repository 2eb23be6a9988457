// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! GraphQL documents and response shapes of the rule registry.

use serde::{Deserialize, Serialize};

/// Rules of the requested rulesets.
pub const GET_RULESETS_FOR_CLIENT: &str = r#"
  query getRulesetsForClient($fingerprint: String, $names: [String!]!) {
    ruleSetsForClient(names: $names, fingerprint: $fingerprint) {
      id
      name
      rules(howmany: 10000, skip: 0) {
        id
        name
        content
        ruleType
        language
        pattern
        elementChecked
      }
    }
  }
"#;

/// Token that changes whenever one of the requested rulesets changes.
pub const GET_RULESETS_LAST_UPDATED_TIMESTAMP: &str = r#"
  query getRulesetsLastUpdatedTimestamp($fingerprint: String, $names: [String!]!) {
    ruleSetsLastUpdatedTimestamp(names: $names, fingerprint: $fingerprint)
  }
"#;

/// Records that a rule fix was applied in the editor.
pub const USE_RULE_FIX: &str = r#"
  mutation recordAccess($fingerprint: String, $ruleId: Long) {
    recordAccess(
      accessType: VsCode
      actionType: RuleFix
      ruleId: $ruleId
      userFingerprint: $fingerprint
    )
  }
"#;

#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest<'a, V: Serialize> {
    pub query: &'a str,
    pub variables: V,
}

#[derive(Debug, Serialize)]
pub(crate) struct RulesetVariables<'a> {
    pub fingerprint: &'a str,
    pub names: &'a [String],
}

#[derive(Debug, Serialize)]
pub(crate) struct FingerprintVariables<'a> {
    pub fingerprint: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlErrorMessage {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RulesetsForClientData {
    pub rule_sets_for_client: Vec<RulesetData>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RulesetData {
    pub name: String,
    #[serde(default)]
    pub rules: Vec<RuleData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RuleData {
    pub name: String,
    #[serde(default)]
    pub content: String,
    pub rule_type: String,
    pub language: String,
    pub pattern: Option<String>,
    pub element_checked: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LastUpdatedTimestampData {
    #[serde(default)]
    pub rule_sets_last_updated_timestamp: serde_json::Value,
}
