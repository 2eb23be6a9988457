// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Debounced analysis of open documents.
//!
//! Every open or change event bumps the document's generation and starts a task that
//! waits for the debounce delay. Only the task whose generation is still current when
//! the delay expires talks to the analyzer, and its result is dropped if a newer
//! event arrived while the request was in flight.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::analyzer::{encode_source, Analyzer, RuleResponse};
use crate::config::DEBOUNCE_DELAY;
use crate::document::TextDocument;
use crate::language::Language;
use crate::rules::{ActivityTracker, RuleCache};
use crate::types::{Diagnostic, DiagnosticSeverity, DIAGNOSTIC_SOURCE};

use super::fixes::FixRegistry;
use super::DiagnosticsPublisher;

/// Outcome of one analysis pass, mostly useful to tests and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// The document does not qualify for analysis.
    Skipped,
    /// A newer event for the same document took over.
    Superseded,
    /// Diagnostics were published.
    Published(usize),
}

/// Drives analyses of open documents and publishes their diagnostics.
pub struct AnalysisCoordinator {
    cache: Arc<RuleCache>,
    analyzer: Arc<dyn Analyzer>,
    publisher: Arc<dyn DiagnosticsPublisher>,
    fixes: Arc<FixRegistry>,
    activity: Arc<ActivityTracker>,
    generations: Mutex<HashMap<String, u64>>,
    // Shared across documents so a reopened document never reuses a generation.
    counter: AtomicU64,
    debounce: Duration,
}

impl AnalysisCoordinator {
    pub fn new(
        cache: Arc<RuleCache>,
        analyzer: Arc<dyn Analyzer>,
        publisher: Arc<dyn DiagnosticsPublisher>,
        fixes: Arc<FixRegistry>,
        activity: Arc<ActivityTracker>,
    ) -> Self {
        Self {
            cache,
            analyzer,
            publisher,
            fixes,
            activity,
            generations: Mutex::new(HashMap::new()),
            counter: AtomicU64::new(0),
            debounce: DEBOUNCE_DELAY,
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn fixes(&self) -> &Arc<FixRegistry> {
        &self.fixes
    }

    /// React to an open or change event of `document`.
    ///
    /// The generation is bumped before returning, so events are ordered as received.
    pub fn schedule(self: &Arc<Self>, document: TextDocument) -> JoinHandle<AnalysisOutcome> {
        self.activity.record();
        let Some(language_tag) = analyzable_language(document.language()) else {
            return tokio::spawn(async { AnalysisOutcome::Skipped });
        };

        let generation = self.next_generation(document.uri());
        let coordinator = Arc::clone(self);
        tokio::spawn(async move { coordinator.run(document, language_tag, generation).await })
    }

    /// Re-analyze every given document, each through its own debounce window.
    pub fn schedule_all(self: &Arc<Self>, documents: Vec<TextDocument>) {
        tracing::debug!("Revalidating {} open documents", documents.len());
        for document in documents {
            self.schedule(document);
        }
    }

    /// Stop tracking a closed document. Pending analyses of it are abandoned.
    pub fn forget(&self, uri: &str) {
        self.lock_generations().remove(uri);
        self.fixes.reset_for_document(uri);
    }

    /// Debounce, then analyze `document` unless a newer event supersedes it.
    pub async fn validate(&self, document: TextDocument) -> AnalysisOutcome {
        let Some(language_tag) = analyzable_language(document.language()) else {
            return AnalysisOutcome::Skipped;
        };
        let generation = self.next_generation(document.uri());
        self.run(document, language_tag, generation).await
    }

    async fn run(
        &self,
        document: TextDocument,
        language_tag: &'static str,
        generation: u64,
    ) -> AnalysisOutcome {
        tokio::time::sleep(self.debounce).await;
        if !self.is_current(document.uri(), generation) {
            tracing::trace!("Analysis of {} superseded during debounce", document.uri());
            return AnalysisOutcome::Superseded;
        }

        self.analyze(&document, language_tag, generation).await
    }

    async fn analyze(
        &self,
        document: &TextDocument,
        language_tag: &str,
        generation: u64,
    ) -> AnalysisOutcome {
        if document.text().is_empty() || document.line_count() < 2 {
            return AnalysisOutcome::Skipped;
        }

        let uri = document.uri();
        let rules = self.cache.rules_for_document(document);
        if rules.is_empty() {
            self.fixes.reset_for_document(uri);
            self.publisher.publish(uri, Vec::new()).await;
            return AnalysisOutcome::Published(0);
        }

        let filename = self.cache.folders().analysis_path(uri);
        let responses = match self
            .analyzer
            .analyze(&filename, language_tag, &encode_source(document.text()), &rules)
            .await
        {
            Ok(responses) => responses,
            Err(e) => {
                tracing::warn!("Analysis of {} failed: {}", uri, e);
                Vec::new()
            }
        };

        if !self.is_current(uri, generation) {
            tracing::trace!("Discarding superseded analysis of {}", uri);
            return AnalysisOutcome::Superseded;
        }

        self.fixes.reset_for_document(uri);
        let diagnostics = self.collect_diagnostics(uri, responses);
        let count = diagnostics.len();
        self.publisher.publish(uri, diagnostics).await;
        AnalysisOutcome::Published(count)
    }

    /// Turn rule responses into diagnostics, registering their fixes on the way.
    fn collect_diagnostics(&self, uri: &str, responses: Vec<RuleResponse>) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for response in responses {
            for error in &response.errors {
                tracing::debug!("Rule {} reported: {}", response.identifier, error);
            }

            for violation in response.violations {
                let range = violation.range();
                if let Some(fixes) = violation.fixes {
                    for fix in fixes {
                        self.fixes.register_fix(uri, range, fix);
                    }
                }

                diagnostics.push(
                    Diagnostic::new(
                        range,
                        DiagnosticSeverity::from_analyzer(&violation.severity),
                        violation.message,
                    )
                    .with_rule(response.identifier.clone())
                    .with_source(DIAGNOSTIC_SOURCE),
                );
            }
        }
        diagnostics
    }

    fn next_generation(&self, uri: &str) -> u64 {
        let generation = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.lock_generations().insert(uri.to_string(), generation);
        generation
    }

    fn is_current(&self, uri: &str, generation: u64) -> bool {
        self.lock_generations().get(uri) == Some(&generation)
    }

    fn lock_generations(&self) -> std::sync::MutexGuard<'_, HashMap<String, u64>> {
        self.generations.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn analyzable_language(language: Language) -> Option<&'static str> {
    if language == Language::Unknown {
        return None;
    }
    language.analyzer_tag()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{
        AnalyzerPosition, EditType, MockAnalyzer, RosieFix, RosieFixEdit, Violation,
    };
    use crate::diagnostics::MockDiagnosticsPublisher;
    use crate::error::AnalyzerError;
    use crate::registry::MockRuleRegistry;
    use crate::rules::{CachedWorkspaceEntry, Rule, RuleType, VersionToken};
    use crate::types::Range;
    use crate::workspace::WorkspaceFolders;
    use crate::config::WorkspaceConfig;
    use chrono::Utc;

    const WORKSPACE: &str = "file:///workspace";
    const URI: &str = "file:///workspace/main.py";
    const SOURCE: &str = "import os\nresult = eval(data)\n";

    fn cache_with_rules(rules: Vec<Rule>) -> Arc<RuleCache> {
        let cache = RuleCache::new(
            Arc::new(MockRuleRegistry::new()),
            Arc::new(WorkspaceFolders::with_folders(vec![WORKSPACE.to_string()])),
            Arc::new(ActivityTracker::default()),
        );
        cache.insert(
            WORKSPACE,
            CachedWorkspaceEntry {
                config: WorkspaceConfig {
                    ruleset_names: vec!["python-security".to_string()],
                    ..Default::default()
                },
                rules,
                last_refreshed: Utc::now(),
                last_timestamp: VersionToken::new("1"),
                file_modified: Utc::now(),
            },
        );
        Arc::new(cache)
    }

    fn eval_rule() -> Rule {
        Rule::new("python-security", "no-eval", "python", RuleType::Ast, "Y29kZQ==")
    }

    fn coordinator(
        cache: Arc<RuleCache>,
        analyzer: MockAnalyzer,
        publisher: MockDiagnosticsPublisher,
    ) -> Arc<AnalysisCoordinator> {
        Arc::new(
            AnalysisCoordinator::new(
                cache,
                Arc::new(analyzer),
                Arc::new(publisher),
                Arc::new(FixRegistry::new()),
                Arc::new(ActivityTracker::default()),
            )
            .with_debounce(Duration::from_millis(10)),
        )
    }

    fn eval_violation() -> Violation {
        Violation {
            start: AnalyzerPosition::new(2, 10),
            end: AnalyzerPosition::new(2, 20),
            message: "do not use eval".to_string(),
            severity: "critical".to_string(),
            fixes: Some(vec![RosieFix {
                description: "Use literal_eval".to_string(),
                edits: vec![RosieFixEdit {
                    start: AnalyzerPosition::new(2, 10),
                    end: AnalyzerPosition::new(2, 14),
                    edit_type: EditType::Update,
                    content: Some("literal_eval".to_string()),
                }],
            }]),
        }
    }

    #[tokio::test]
    async fn test_single_line_document_is_skipped() {
        let mut analyzer = MockAnalyzer::new();
        analyzer.expect_analyze().never();
        let mut publisher = MockDiagnosticsPublisher::new();
        publisher.expect_publish().never();

        let coordinator = coordinator(cache_with_rules(vec![eval_rule()]), analyzer, publisher);
        let document = TextDocument::new(URI, "python", 1, "import os");
        assert_eq!(coordinator.validate(document).await, AnalysisOutcome::Skipped);
    }

    #[tokio::test]
    async fn test_unsupported_language_is_skipped() {
        let mut analyzer = MockAnalyzer::new();
        analyzer.expect_analyze().never();
        let mut publisher = MockDiagnosticsPublisher::new();
        publisher.expect_publish().never();

        let coordinator = coordinator(cache_with_rules(vec![eval_rule()]), analyzer, publisher);
        for uri in ["file:///workspace/main.rs", "file:///workspace/README"] {
            let document = TextDocument::new(uri, "rust", 1, "fn main() {}\n\n");
            assert_eq!(coordinator.validate(document).await, AnalysisOutcome::Skipped);
        }
    }

    #[tokio::test]
    async fn test_no_rules_publishes_empty() {
        let mut analyzer = MockAnalyzer::new();
        analyzer.expect_analyze().never();
        let mut publisher = MockDiagnosticsPublisher::new();
        publisher
            .expect_publish()
            .withf(|uri, diagnostics| uri == URI && diagnostics.is_empty())
            .times(1)
            .returning(|_, _| ());

        let coordinator = coordinator(cache_with_rules(Vec::new()), analyzer, publisher);
        coordinator.fixes().register_fix(
            URI,
            Range::from_coords(0, 0, 0, 1),
            eval_violation().fixes.unwrap().remove(0),
        );

        let document = TextDocument::new(URI, "python", 1, SOURCE);
        assert_eq!(coordinator.validate(document).await, AnalysisOutcome::Published(0));
        assert_eq!(coordinator.fixes().range_count(URI), 0);
    }

    #[tokio::test]
    async fn test_violations_become_diagnostics() {
        let mut analyzer = MockAnalyzer::new();
        analyzer
            .expect_analyze()
            .withf(|filename, language, code, rules| {
                filename == "/main.py"
                    && language == "python"
                    && code == encode_source(SOURCE)
                    && rules.len() == 1
            })
            .times(1)
            .returning(|_, _, _, _| {
                Ok(vec![RuleResponse {
                    identifier: "python-security/no-eval".to_string(),
                    violations: vec![eval_violation()],
                    errors: Vec::new(),
                    execution_time_ms: Some(3),
                }])
            });

        let mut publisher = MockDiagnosticsPublisher::new();
        publisher
            .expect_publish()
            .withf(|uri, diagnostics| {
                let Some(diagnostic) = diagnostics.first() else {
                    return false;
                };
                uri == URI
                    && diagnostics.len() == 1
                    && diagnostic.range == Range::from_coords(1, 9, 1, 19)
                    && diagnostic.severity == DiagnosticSeverity::Error
                    && diagnostic.code.as_deref() == Some("python-security/no-eval")
                    && diagnostic.code_description.as_deref()
                        == Some("https://app.codiga.io/hub/ruleset/python-security/no-eval")
                    && diagnostic.source.as_deref() == Some("Codiga")
            })
            .times(1)
            .returning(|_, _| ());

        let coordinator = coordinator(cache_with_rules(vec![eval_rule()]), analyzer, publisher);
        let document = TextDocument::new(URI, "python", 1, SOURCE);
        assert_eq!(coordinator.validate(document).await, AnalysisOutcome::Published(1));

        let fixes = coordinator
            .fixes()
            .get_fixes(URI, &Range::from_coords(1, 12, 1, 12));
        assert_eq!(fixes.len(), 1);
        assert_eq!(fixes[0].description, "Use literal_eval");
    }

    #[tokio::test]
    async fn test_warning_severity_mapping() {
        let mut analyzer = MockAnalyzer::new();
        analyzer.expect_analyze().returning(|_, _, _, _| {
            Ok(vec![RuleResponse {
                identifier: "python-security/no-eval".to_string(),
                violations: vec![Violation {
                    start: AnalyzerPosition::new(2, 6),
                    end: AnalyzerPosition::new(2, 11),
                    message: "warning".to_string(),
                    severity: "WARNING".to_string(),
                    fixes: None,
                }],
                errors: Vec::new(),
                execution_time_ms: None,
            }])
        });

        let mut publisher = MockDiagnosticsPublisher::new();
        publisher
            .expect_publish()
            .withf(|_, diagnostics| {
                diagnostics.len() == 1
                    && diagnostics[0].range == Range::from_coords(1, 5, 1, 10)
                    && diagnostics[0].severity == DiagnosticSeverity::Warning
            })
            .times(1)
            .returning(|_, _| ());

        let coordinator = coordinator(cache_with_rules(vec![eval_rule()]), analyzer, publisher);
        let document = TextDocument::new(URI, "python", 1, SOURCE);
        coordinator.validate(document).await;
        assert_eq!(coordinator.fixes().range_count(URI), 0);
    }

    #[tokio::test]
    async fn test_analyzer_failure_publishes_empty() {
        let mut analyzer = MockAnalyzer::new();
        analyzer
            .expect_analyze()
            .returning(|_, _, _, _| Err(AnalyzerError::NetworkError("refused".to_string())));
        let mut publisher = MockDiagnosticsPublisher::new();
        publisher
            .expect_publish()
            .withf(|_, diagnostics| diagnostics.is_empty())
            .times(1)
            .returning(|_, _| ());

        let coordinator = coordinator(cache_with_rules(vec![eval_rule()]), analyzer, publisher);
        let document = TextDocument::new(URI, "python", 1, SOURCE);
        assert_eq!(coordinator.validate(document).await, AnalysisOutcome::Published(0));
    }

    #[tokio::test]
    async fn test_rapid_changes_analyze_once() {
        let mut analyzer = MockAnalyzer::new();
        analyzer
            .expect_analyze()
            .times(1)
            .returning(|_, _, _, _| Ok(Vec::new()));
        let mut publisher = MockDiagnosticsPublisher::new();
        publisher.expect_publish().times(1).returning(|_, _| ());

        let coordinator = coordinator(cache_with_rules(vec![eval_rule()]), analyzer, publisher);
        let first = coordinator.schedule(TextDocument::new(URI, "python", 1, SOURCE));
        let second = coordinator.schedule(TextDocument::new(URI, "python", 2, SOURCE));
        let third = coordinator.schedule(TextDocument::new(URI, "python", 3, SOURCE));

        let outcomes = [
            first.await.unwrap(),
            second.await.unwrap(),
            third.await.unwrap(),
        ];
        let published = outcomes
            .iter()
            .filter(|outcome| matches!(outcome, AnalysisOutcome::Published(_)))
            .count();
        assert_eq!(published, 1);
        assert!(outcomes.contains(&AnalysisOutcome::Superseded));
    }

    #[tokio::test]
    async fn test_forget_abandons_pending_analysis() {
        let mut analyzer = MockAnalyzer::new();
        analyzer.expect_analyze().never();
        let mut publisher = MockDiagnosticsPublisher::new();
        publisher.expect_publish().never();

        let coordinator = Arc::new(
            AnalysisCoordinator::new(
                cache_with_rules(vec![eval_rule()]),
                Arc::new(analyzer),
                Arc::new(publisher),
                Arc::new(FixRegistry::new()),
                Arc::new(ActivityTracker::default()),
            )
            .with_debounce(Duration::from_millis(200)),
        );

        let pending = coordinator.schedule(TextDocument::new(URI, "python", 1, SOURCE));
        tokio::time::sleep(Duration::from_millis(20)).await;
        coordinator.forget(URI);
        assert_eq!(pending.await.unwrap(), AnalysisOutcome::Superseded);
    }

    #[tokio::test]
    async fn test_result_discarded_when_edited_during_analysis() {
        // Filled once the coordinator exists; the analyzer uses it to simulate an edit.
        let handle: Arc<once_cell::sync::OnceCell<Arc<AnalysisCoordinator>>> =
            Arc::new(once_cell::sync::OnceCell::new());

        let mut analyzer = MockAnalyzer::new();
        let in_flight = Arc::clone(&handle);
        analyzer.expect_analyze().times(1).returning(move |_, _, _, _| {
            if let Some(coordinator) = in_flight.get() {
                coordinator.next_generation(URI);
            }
            Ok(vec![RuleResponse {
                identifier: "python-security/no-eval".to_string(),
                violations: vec![eval_violation()],
                errors: Vec::new(),
                execution_time_ms: None,
            }])
        });
        let mut publisher = MockDiagnosticsPublisher::new();
        publisher.expect_publish().never();

        let coordinator = coordinator(cache_with_rules(vec![eval_rule()]), analyzer, publisher);
        assert!(handle.set(Arc::clone(&coordinator)).is_ok());

        let document = TextDocument::new(URI, "python", 1, SOURCE);
        assert_eq!(coordinator.validate(document).await, AnalysisOutcome::Superseded);
        assert_eq!(coordinator.fixes().range_count(URI), 0);
    }
}
