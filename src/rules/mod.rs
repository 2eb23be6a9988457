// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Rules: the per-workspace cache, rule selection for documents and activity tracking.

pub mod activity;
mod cache;
mod resolver;
mod types;

pub use activity::ActivityTracker;
pub use cache::{Revalidator, RuleCache};
pub use resolver::{apply_ignores, filter_rules, is_rule_applicable, select_rules};
pub use types::{CachedWorkspaceEntry, EntityChecked, Rule, RuleType, VersionToken};
