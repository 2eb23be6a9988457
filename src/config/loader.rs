// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Loading of `codiga.yml` files.
//!
//! The file is parsed into a loosely typed YAML tree and walked by hand, so that a
//! malformed entry only drops that entry instead of the whole file.

use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::error::ConfigError;

use super::types::{is_valid_ruleset_name, RuleIgnore, RulesetIgnore, WorkspaceConfig};

/// Name of the workspace configuration file.
pub const CODIGA_RULES_FILE: &str = "codiga.yml";

/// Parse the configuration file at `path`.
///
/// Never fails: a missing, unreadable or malformed file yields the empty configuration.
pub fn parse_config(path: &Path) -> WorkspaceConfig {
    match load_config_file(path) {
        Ok(config) => config,
        Err(ConfigError::NotFound(_)) => WorkspaceConfig::empty(),
        Err(e) => {
            tracing::warn!("Error when parsing {}: {}", path.display(), e);
            WorkspaceConfig::empty()
        }
    }
}

/// Read and parse a configuration file.
pub fn load_config_file(path: &Path) -> Result<WorkspaceConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config_str(&content)
}

/// Parse configuration file content.
pub fn parse_config_str(content: &str) -> Result<WorkspaceConfig, ConfigError> {
    let root: Value = serde_yaml::from_str(content)?;

    let mut config = WorkspaceConfig::empty();
    if root.is_null() {
        return Ok(config);
    }

    config.ruleset_names = parse_rulesets(root.get("rulesets"))?;
    config.ignore = parse_ignore(root.get("ignore"))
        .into_iter()
        .map(|ruleset| (ruleset.ruleset_name.clone(), ruleset))
        .collect();

    Ok(config)
}

fn parse_rulesets(value: Option<&Value>) -> Result<Vec<String>, ConfigError> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Sequence(entries)) => Ok(entries
            .iter()
            .filter_map(Value::as_str)
            .filter(|name| is_valid_ruleset_name(name))
            .map(str::to_string)
            .collect()),
        Some(other) => Err(ConfigError::InvalidFormat(format!(
            "rulesets must be a list, found {}",
            kind_of(other)
        ))),
    }
}

/// Ruleset ignores in file order. A later entry for the same ruleset wins.
fn parse_ignore(value: Option<&Value>) -> Vec<RulesetIgnore> {
    let Some(Value::Sequence(entries)) = value else {
        return Vec::new();
    };

    let mut rulesets = Vec::new();
    for entry in entries {
        // A bare ruleset name carries no rules to ignore.
        let Value::Mapping(mapping) = entry else {
            continue;
        };
        for (name, rules) in string_keys(mapping) {
            if is_valid_ruleset_name(name) {
                rulesets.retain(|ruleset: &RulesetIgnore| ruleset.ruleset_name != name);
                rulesets.push(parse_ruleset_ignore(name, rules));
            }
        }
    }
    rulesets
}

fn parse_ruleset_ignore(ruleset_name: &str, value: &Value) -> RulesetIgnore {
    let mut ruleset = RulesetIgnore::new(ruleset_name);
    let Value::Sequence(entries) = value else {
        return ruleset;
    };

    for entry in entries {
        match entry {
            Value::String(rule_name) => ruleset.insert(RuleIgnore::new(rule_name.as_str())),
            Value::Mapping(mapping) => {
                for (rule_name, prefixes) in string_keys(mapping) {
                    ruleset.insert(parse_rule_ignore(rule_name, prefixes));
                }
            }
            _ => {}
        }
    }
    ruleset
}

fn parse_rule_ignore(rule_name: &str, value: &Value) -> RuleIgnore {
    let mut rule = RuleIgnore::new(rule_name);
    let Value::Sequence(entries) = value else {
        return rule;
    };

    for mapping in entries.iter().filter_map(Value::as_mapping) {
        for (key, prefixes) in string_keys(mapping) {
            if key != "prefix" {
                continue;
            }
            match prefixes {
                Value::String(prefix) => rule.add_prefix(prefix.as_str()),
                Value::Sequence(list) => {
                    for prefix in list.iter().filter_map(Value::as_str) {
                        rule.add_prefix(prefix);
                    }
                }
                _ => {}
            }
        }
    }
    rule
}

fn string_keys(mapping: &Mapping) -> impl Iterator<Item = (&str, &Value)> {
    mapping
        .iter()
        .filter_map(|(key, value)| key.as_str().map(|key| (key, value)))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
