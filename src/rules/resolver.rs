// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Selection of the rules that apply to a document.

use crate::config::{RuleIgnore, WorkspaceConfig};
use crate::language::Language;
use crate::workspace::{relative_path, WorkspaceFolders};

use super::cache::RuleCache;
use super::types::Rule;

/// Keep the rules written for one of `languages`, in input order.
pub fn filter_rules(languages: &[Language], rules: &[Rule]) -> Vec<Rule> {
    rules
        .iter()
        .filter(|rule| {
            languages
                .iter()
                .any(|language| rule.language.eq_ignore_ascii_case(language.name()))
        })
        .cloned()
        .collect()
}

/// Rules to run on `file_uri`, a document of `language`.
///
/// The document must belong to exactly one workspace folder. Rules ignored by that
/// workspace's configuration for the document's path are dropped.
pub fn select_rules(
    language: Language,
    rules: &[Rule],
    file_uri: &str,
    folders: &WorkspaceFolders,
    cache: &RuleCache,
) -> Vec<Rule> {
    let candidates = filter_rules(language.rule_languages(), rules);
    if candidates.is_empty() {
        return candidates;
    }

    let Some(workspace) = folders.owning_folder(file_uri) else {
        return Vec::new();
    };

    let path = relative_path(file_uri, &workspace);
    let config = cache.config_for(&workspace);
    apply_ignores(candidates, config.as_ref(), &path)
}

/// Drop the rules that `config` ignores for the file at `relative_path`.
pub fn apply_ignores(
    rules: Vec<Rule>,
    config: Option<&WorkspaceConfig>,
    relative_path: &str,
) -> Vec<Rule> {
    let Some(config) = config else {
        return rules;
    };
    rules
        .into_iter()
        .filter(|rule| {
            is_rule_applicable(
                config.rule_ignore(&rule.ruleset_name, &rule.rule_name),
                relative_path,
            )
        })
        .collect()
}

/// Whether a rule with the given ignore entry still runs on `relative_path`.
///
/// An entry without prefixes ignores the rule everywhere. Otherwise the rule is
/// dropped as soon as one valid prefix matches the path.
pub fn is_rule_applicable(ignore: Option<&RuleIgnore>, relative_path: &str) -> bool {
    let Some(ignore) = ignore else {
        return true;
    };
    if ignore.prefixes.is_empty() {
        return false;
    }

    let path = strip_leading_slash(relative_path);
    ignore.prefixes.iter().all(|prefix| {
        let prefix = strip_leading_slash(prefix);
        !is_valid_prefix(prefix) || !path.starts_with(prefix)
    })
}

/// `..`, `./` and `/.` are not allowed in prefixes. Single dots are, so that exact
/// file names can be targeted.
fn is_valid_prefix(prefix: &str) -> bool {
    !(prefix.contains("..") || prefix.contains("./") || prefix.contains("/."))
}

fn strip_leading_slash(path: &str) -> &str {
    path.strip_prefix('/').unwrap_or(path)
}
