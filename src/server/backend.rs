// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The `LanguageServer` implementation.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use tokio::task::JoinHandle;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};

use crate::actions::{self, FixData, APPLY_FIX_COMMAND};
use crate::analyzer::{Analyzer, RosieClient};
use crate::config::{ServerSettings, API_TOKEN_SETTING, CLIENT_NAME};
use crate::diagnostics::{AnalysisCoordinator, DiagnosticsPublisher, FixRegistry};
use crate::document::{DocumentStore, TextDocument};
use crate::registry::{GraphQlRegistryClient, RuleRegistry};
use crate::rules::{ActivityTracker, RuleCache};
use crate::types;
use crate::workspace::WorkspaceFolders;

use super::capabilities::{server_capabilities, ClientFeatures};
use super::convert;

/// Publishes diagnostics through the LSP connection.
struct ClientPublisher {
    client: Client,
}

#[async_trait]
impl DiagnosticsPublisher for ClientPublisher {
    async fn publish(&self, uri: &str, diagnostics: Vec<types::Diagnostic>) {
        let Ok(url) = Url::parse(uri) else {
            tracing::warn!("Cannot publish diagnostics for invalid URI {}", uri);
            return;
        };
        let diagnostics = diagnostics.iter().map(convert::to_lsp_diagnostic).collect();
        self.client.publish_diagnostics(url, diagnostics, None).await;
    }
}

/// Codiga language server.
pub struct Backend {
    client: Client,
    settings: ServerSettings,
    features: RwLock<ClientFeatures>,
    documents: Arc<DocumentStore>,
    folders: Arc<WorkspaceFolders>,
    registry: Arc<dyn RuleRegistry>,
    cache: Arc<RuleCache>,
    fixes: Arc<FixRegistry>,
    coordinator: Arc<AnalysisCoordinator>,
    api_token: RwLock<Option<String>>,
    refresher: Mutex<Option<JoinHandle<()>>>,
}

impl Backend {
    /// Server talking to the registry and analyzer configured in `settings`.
    pub fn new(client: Client, settings: ServerSettings) -> Self {
        let registry = Arc::new(GraphQlRegistryClient::new(&settings));
        let analyzer = Arc::new(RosieClient::new(&settings));
        Self::with_services(client, settings, registry, analyzer)
    }

    pub fn with_services(
        client: Client,
        settings: ServerSettings,
        registry: Arc<dyn RuleRegistry>,
        analyzer: Arc<dyn Analyzer>,
    ) -> Self {
        let documents = Arc::new(DocumentStore::new());
        let folders = Arc::new(WorkspaceFolders::new());
        let activity = Arc::new(ActivityTracker::new(settings.activity_window));
        let fixes = Arc::new(FixRegistry::new());

        let cache = Arc::new(
            RuleCache::new(Arc::clone(&registry), Arc::clone(&folders), Arc::clone(&activity))
                .with_ttl(settings.cache_ttl),
        );

        let publisher = Arc::new(ClientPublisher {
            client: client.clone(),
        });
        let coordinator = Arc::new(
            AnalysisCoordinator::new(
                Arc::clone(&cache),
                analyzer,
                publisher,
                Arc::clone(&fixes),
                activity,
            )
            .with_debounce(settings.debounce),
        );

        Self {
            client,
            api_token: RwLock::new(settings.api_token.clone()),
            settings,
            features: RwLock::new(ClientFeatures::default()),
            documents,
            folders,
            registry,
            cache,
            fixes,
            coordinator,
            refresher: Mutex::new(None),
        }
    }

    fn features(&self) -> ClientFeatures {
        *self.features.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn has_api_token(&self) -> bool {
        self.api_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn set_api_token(&self, token: Option<String>) {
        let token = token.filter(|t| !t.is_empty());
        tracing::debug!("API token {}", if token.is_some() { "set" } else { "cleared" });
        self.registry.set_api_token(token.clone());
        *self.api_token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn revalidate_all(&self) {
        self.coordinator.schedule_all(self.documents.all());
    }

    async fn register_configuration_changes(&self) {
        let registration = Registration {
            id: uuid::Uuid::new_v4().to_string(),
            method: "workspace/didChangeConfiguration".to_string(),
            register_options: None,
        };
        if let Err(e) = self.client.register_capability(vec![registration]).await {
            tracing::warn!("Cannot register for configuration changes: {}", e);
        }
    }

    async fn refresh_workspace_folders(&self) {
        match self.client.workspace_folders().await {
            Ok(folders) => {
                let uris = folders
                    .unwrap_or_default()
                    .into_iter()
                    .map(|folder| folder.uri.to_string())
                    .collect();
                self.folders.set(uris);
            }
            Err(e) => tracing::warn!("Cannot fetch workspace folders: {}", e),
        }
    }

    /// Pick up the API token from the editor settings, unless a configuration change
    /// already delivered one.
    async fn load_api_token(&self) {
        let item = ConfigurationItem {
            scope_uri: None,
            section: Some(API_TOKEN_SETTING.to_string()),
        };
        match self.client.configuration(vec![item]).await {
            Ok(values) => {
                if !self.has_api_token() {
                    let token = values.first().and_then(Value::as_str).map(str::to_string);
                    self.set_api_token(token);
                }
            }
            Err(e) => tracing::debug!("Cannot read {}: {}", API_TOKEN_SETTING, e),
        }
    }

    fn start_rule_refresh(&self) {
        let coordinator = Arc::downgrade(&self.coordinator);
        let documents = Arc::clone(&self.documents);
        self.cache.set_revalidator(Arc::new(move || {
            if let Some(coordinator) = coordinator.upgrade() {
                coordinator.schedule_all(documents.all());
            }
        }));

        let handle = self.cache.spawn_periodic(self.settings.polling_interval);
        let previous = self
            .refresher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }
}

/// Token found under `codiga.api.token` in a configuration change.
fn api_token_from_settings(settings: &Value) -> Option<String> {
    settings
        .pointer("/codiga/api/token")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let features = ClientFeatures::from_capabilities(&params.capabilities);
        *self.features.write().unwrap_or_else(PoisonError::into_inner) = features;
        tracing::info!("Initializing with client features {:?}", features);

        let server_info = Some(ServerInfo {
            name: CLIENT_NAME.to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
        });

        if !features.diagnostics {
            tracing::warn!("Client cannot show diagnostics, disabling the server");
            return Ok(InitializeResult {
                capabilities: ServerCapabilities::default(),
                server_info,
            });
        }

        if let Some(info) = &params.client_info {
            self.registry
                .set_client_info(&info.name, info.version.as_deref().unwrap_or("unknown"));
        }

        if features.workspace_folders {
            let uris = params
                .workspace_folders
                .unwrap_or_default()
                .into_iter()
                .map(|folder| folder.uri.to_string())
                .collect();
            self.folders.set(uris);
        } else {
            #[allow(deprecated)]
            let root = params.root_uri.map(|uri| uri.to_string());
            self.folders.set(root.into_iter().collect());
        }

        Ok(InitializeResult {
            capabilities: server_capabilities(&features),
            server_info,
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        let features = self.features();
        if features.configuration {
            self.register_configuration_changes().await;
        }
        if features.workspace_folders {
            self.refresh_workspace_folders().await;
        }

        self.load_api_token().await;

        if features.diagnostics {
            self.start_rule_refresh();
        }
        tracing::info!(
            "Codiga language server ready with {} workspace folders",
            self.folders.all().len()
        );
    }

    async fn shutdown(&self) -> Result<()> {
        tracing::info!("Shutting down");
        if let Some(handle) = self
            .refresher
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
        self.fixes.clear();
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let item = params.text_document;
        tracing::debug!("Document opened: {}", item.uri);

        let document = TextDocument::new(item.uri.to_string(), item.language_id, item.version, item.text);
        self.documents.open(document.clone());
        self.coordinator.schedule(document);
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri.to_string();
        let changes = params
            .content_changes
            .into_iter()
            .map(convert::to_content_change)
            .collect();

        match self
            .documents
            .change(&uri, changes, params.text_document.version)
        {
            Some(document) => {
                self.coordinator.schedule(document);
            }
            None => tracing::warn!("Change for unknown document {}", uri),
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri.to_string();
        tracing::debug!("Document closed: {}", uri);
        self.documents.close(&uri);
        self.coordinator.forget(&uri);
    }

    async fn did_change_configuration(&self, params: DidChangeConfigurationParams) {
        self.set_api_token(api_token_from_settings(&params.settings));
        self.revalidate_all();
    }

    async fn did_change_workspace_folders(&self, params: DidChangeWorkspaceFoldersParams) {
        let added = params
            .event
            .added
            .into_iter()
            .map(|folder| folder.uri.to_string())
            .collect();
        let removed: Vec<String> = params
            .event
            .removed
            .into_iter()
            .map(|folder| folder.uri.to_string())
            .collect();
        self.folders.update(added, &removed);
        tracing::debug!("Workspace folders now {:?}", self.folders.all());
    }

    async fn code_action(&self, params: CodeActionParams) -> Result<Option<CodeActionResponse>> {
        if !self.features().supports_quick_fixes() || params.context.diagnostics.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let uri = params.text_document.uri.to_string();
        if self.documents.get(&uri).is_none() {
            return Ok(Some(Vec::new()));
        }

        let diagnostics: Vec<_> = params
            .context
            .diagnostics
            .iter()
            .map(convert::from_lsp_diagnostic)
            .collect();
        let range = convert::from_lsp_range(&params.range);

        let actions = actions::code_actions(&uri, &range, &diagnostics, &self.fixes)
            .iter()
            .map(|action| CodeActionOrCommand::CodeAction(convert::to_lsp_code_action(action)))
            .collect();
        Ok(Some(actions))
    }

    async fn code_action_resolve(&self, mut action: CodeAction) -> Result<CodeAction> {
        let Some(data) = action.data.clone() else {
            return Ok(action);
        };
        let data: FixData = match serde_json::from_value(data) {
            Ok(data) => data,
            Err(e) => {
                tracing::debug!("Ignoring code action with foreign data: {}", e);
                return Ok(action);
            }
        };

        let diagnostics: Vec<_> = action
            .diagnostics
            .iter()
            .flatten()
            .map(convert::from_lsp_diagnostic)
            .collect();

        if let Some(edits) = actions::resolve_edits(&data, &diagnostics, &self.documents) {
            action.edit = convert::to_workspace_edit(&edits);
        }
        Ok(action)
    }

    async fn execute_command(&self, params: ExecuteCommandParams) -> Result<Option<Value>> {
        if params.command == APPLY_FIX_COMMAND {
            let registry = Arc::clone(&self.registry);
            tokio::spawn(async move {
                if let Err(e) = registry.record_rule_fix().await {
                    tracing::debug!("Rule fix not recorded: {}", e);
                }
            });
        }
        Ok(None)
    }
}
