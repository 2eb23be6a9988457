// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Per-workspace rule cache.
//!
//! Each workspace folder with a `codiga.yml` gets one entry holding its parsed
//! configuration and the rules of its rulesets. Entries are refreshed periodically
//! and only re-fetched when the registry's version token or the config file's
//! modification time changes.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use tokio::task::JoinHandle;

use crate::config::{parse_config, WorkspaceConfig, RULES_MAX_TIME_IN_CACHE};
use crate::document::TextDocument;
use crate::registry::RuleRegistry;
use crate::workspace::{rules_file_path, WorkspaceFolders};

use super::activity::ActivityTracker;
use super::resolver::select_rules;
use super::types::{CachedWorkspaceEntry, Rule};

/// Callback that re-analyzes every open document.
pub type Revalidator = Arc<dyn Fn() + Send + Sync>;

/// Rule cache keyed by workspace folder URI.
pub struct RuleCache {
    entries: RwLock<HashMap<String, CachedWorkspaceEntry>>,
    registry: Arc<dyn RuleRegistry>,
    folders: Arc<WorkspaceFolders>,
    activity: Arc<ActivityTracker>,
    revalidator: OnceCell<Revalidator>,
    ttl: Duration,
}

impl RuleCache {
    pub fn new(
        registry: Arc<dyn RuleRegistry>,
        folders: Arc<WorkspaceFolders>,
        activity: Arc<ActivityTracker>,
    ) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            registry,
            folders,
            activity,
            revalidator: OnceCell::new(),
            ttl: RULES_MAX_TIME_IN_CACHE,
        }
    }

    /// Override the time after which unrefreshed entries are collected.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn folders(&self) -> &Arc<WorkspaceFolders> {
        &self.folders
    }

    /// Install the revalidation hook. Only the first call has an effect.
    pub fn set_revalidator(&self, revalidator: Revalidator) {
        if self.revalidator.set(revalidator).is_err() {
            tracing::warn!("Revalidator already set, ignoring");
        }
    }

    pub fn get(&self, workspace: &str) -> Option<CachedWorkspaceEntry> {
        self.read().get(workspace).cloned()
    }

    pub fn insert(&self, workspace: impl Into<String>, entry: CachedWorkspaceEntry) {
        self.write().insert(workspace.into(), entry);
    }

    pub fn remove(&self, workspace: &str) -> Option<CachedWorkspaceEntry> {
        self.write().remove(workspace)
    }

    pub fn contains(&self, workspace: &str) -> bool {
        self.read().contains_key(workspace)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Configuration cached for a workspace.
    pub fn config_for(&self, workspace: &str) -> Option<WorkspaceConfig> {
        self.read().get(workspace).map(|entry| entry.config.clone())
    }

    /// Ignore entry of a rule in a workspace's configuration.
    pub fn ignore_for(
        &self,
        workspace: &str,
        ruleset_name: &str,
        rule_name: &str,
    ) -> Option<crate::config::RuleIgnore> {
        self.read()
            .get(workspace)
            .and_then(|entry| entry.config.rule_ignore(ruleset_name, rule_name).cloned())
    }

    /// Rules to run on an open document.
    ///
    /// Empty when the document does not belong to exactly one cached workspace.
    pub fn rules_for_document(&self, document: &TextDocument) -> Vec<Rule> {
        let Some(workspace) = self.folders.owning_folder(document.uri()) else {
            return Vec::new();
        };
        let Some(rules) = self.read().get(&workspace).map(|entry| entry.rules.clone()) else {
            return Vec::new();
        };
        select_rules(document.language(), &rules, document.uri(), &self.folders, self)
    }

    /// Refresh every workspace folder that has a `codiga.yml`.
    ///
    /// Skipped entirely while the editor is inactive.
    pub async fn refresh_all(&self) {
        if !self.activity.was_active_recently() {
            tracing::trace!("Editor inactive, skipping rule refresh");
            return;
        }

        for workspace in self.folders.all() {
            let config_path = rules_file_path(&workspace);
            if config_path.exists() {
                self.update_workspace(&workspace, &config_path).await;
            }
        }
    }

    /// Bring the entry of one workspace up to date.
    ///
    /// Failures are logged and leave the cache as it was, except that a workspace
    /// without rulesets or without a registry token loses its entry.
    pub async fn update_workspace(&self, workspace: &str, config_path: &Path) {
        let config = parse_config(config_path);
        if config.ruleset_names.is_empty() {
            if self.remove(workspace).is_some() {
                tracing::debug!("No rulesets configured for {}, evicted", workspace);
            }
            return;
        }

        let file_modified = match modification_time(config_path) {
            Ok(modified) => modified,
            Err(e) => {
                tracing::warn!("Cannot stat {}: {}", config_path.display(), e);
                return;
            }
        };

        let token = match self.registry.fetch_version_token(&config.ruleset_names).await {
            Ok(Some(token)) => token,
            Ok(None) | Err(_) => {
                self.remove(workspace);
                return;
            }
        };

        let now = Utc::now();
        {
            let mut entries = self.write();
            if let Some(entry) = entries.get_mut(workspace) {
                if entry.last_timestamp == token && entry.file_modified == file_modified {
                    entry.last_refreshed = now;
                    return;
                }
            }
        }

        let rules = match self.registry.fetch_rules(&config.ruleset_names).await {
            Ok(rules) => rules,
            Err(e) => {
                tracing::error!("Error when updating the rules of {}: {}", workspace, e);
                return;
            }
        };

        tracing::info!("Cached {} rules for {}", rules.len(), workspace);
        self.insert(
            workspace,
            CachedWorkspaceEntry {
                config,
                rules,
                last_refreshed: now,
                last_timestamp: token,
                file_modified,
            },
        );

        if let Some(revalidate) = self.revalidator.get() {
            revalidate();
        }
    }

    /// Drop entries that have not been refreshed within the TTL.
    pub fn garbage_collect(&self) {
        self.garbage_collect_at(Utc::now());
    }

    fn garbage_collect_at(&self, now: DateTime<Utc>) {
        let ttl = chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::days(365));
        let cutoff = now - ttl;
        self.write().retain(|workspace, entry| {
            let keep = entry.last_refreshed >= cutoff;
            if !keep {
                tracing::debug!("Collecting stale rules of {}", workspace);
            }
            keep
        });
    }

    /// Refresh and collect forever, sleeping `interval` after each round.
    pub async fn run_periodic(&self, interval: Duration) {
        loop {
            self.refresh_all().await;
            self.garbage_collect();
            tokio::time::sleep(interval).await;
        }
    }

    /// Spawn [`run_periodic`](Self::run_periodic) on the runtime.
    pub fn spawn_periodic(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache = Arc::clone(self);
        tokio::spawn(async move { cache.run_periodic(interval).await })
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, CachedWorkspaceEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, CachedWorkspaceEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn modification_time(path: &Path) -> std::io::Result<DateTime<Utc>> {
    let modified = std::fs::metadata(path)?.modified()?;
    Ok(DateTime::<Utc>::from(modified))
}
