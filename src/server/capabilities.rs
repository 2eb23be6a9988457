// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Capability negotiation with the editor.

use tower_lsp::lsp_types::{
    ClientCapabilities, CodeActionKind, CodeActionOptions, CodeActionProviderCapability,
    ExecuteCommandOptions, OneOf, ServerCapabilities, TextDocumentSyncCapability,
    TextDocumentSyncKind, WorkspaceFoldersServerCapabilities, WorkspaceServerCapabilities,
};

use crate::actions::APPLY_FIX_COMMAND;

/// What the connected editor supports, as far as this server cares.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClientFeatures {
    pub diagnostics: bool,
    pub workspace_folders: bool,
    pub configuration: bool,
    pub apply_edit: bool,
    pub code_action_literals: bool,
    pub code_action_resolve: bool,
    pub code_action_data: bool,
}

impl ClientFeatures {
    pub fn from_capabilities(capabilities: &ClientCapabilities) -> Self {
        let workspace = capabilities.workspace.as_ref();
        let text_document = capabilities.text_document.as_ref();
        let code_action = text_document.and_then(|t| t.code_action.as_ref());

        Self {
            diagnostics: text_document.is_some_and(|t| t.publish_diagnostics.is_some()),
            workspace_folders: workspace.is_some_and(|w| w.workspace_folders == Some(true)),
            configuration: workspace.is_some_and(|w| {
                w.configuration == Some(true) && w.did_change_configuration.is_some()
            }),
            apply_edit: workspace.is_some_and(|w| w.apply_edit == Some(true)),
            code_action_literals: code_action.is_some_and(|c| c.code_action_literal_support.is_some()),
            code_action_resolve: code_action.is_some_and(|c| c.resolve_support.is_some()),
            code_action_data: code_action.is_some_and(|c| c.data_support == Some(true)),
        }
    }

    /// Whether quick fixes can be offered at all.
    pub fn supports_quick_fixes(&self) -> bool {
        self.apply_edit && self.code_action_literals
    }
}

/// Capabilities announced in answer to `initialize`.
///
/// An editor that cannot show diagnostics gets no capability at all.
pub fn server_capabilities(features: &ClientFeatures) -> ServerCapabilities {
    if !features.diagnostics {
        return ServerCapabilities::default();
    }

    let mut capabilities = ServerCapabilities {
        text_document_sync: Some(TextDocumentSyncCapability::Kind(
            TextDocumentSyncKind::INCREMENTAL,
        )),
        ..ServerCapabilities::default()
    };

    if features.code_action_literals {
        if features.apply_edit {
            capabilities.execute_command_provider = Some(ExecuteCommandOptions {
                commands: vec![APPLY_FIX_COMMAND.to_string()],
                work_done_progress_options: Default::default(),
            });
        }

        let resolve = features.code_action_resolve && features.code_action_data;
        capabilities.code_action_provider =
            Some(CodeActionProviderCapability::Options(CodeActionOptions {
                code_action_kinds: Some(vec![CodeActionKind::QUICKFIX]),
                work_done_progress_options: Default::default(),
                resolve_provider: resolve.then_some(true),
            }));
    }

    if features.workspace_folders {
        capabilities.workspace = Some(WorkspaceServerCapabilities {
            workspace_folders: Some(WorkspaceFoldersServerCapabilities {
                supported: Some(true),
                change_notifications: Some(OneOf::Left(true)),
            }),
            file_operations: None,
        });
    }

    capabilities
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_lsp::lsp_types::{
        CodeActionCapabilityResolveSupport, CodeActionClientCapabilities, CodeActionKindLiteralSupport,
        CodeActionLiteralSupport, PublishDiagnosticsClientCapabilities,
        TextDocumentClientCapabilities, WorkspaceClientCapabilities,
    };

    fn full_capabilities() -> ClientCapabilities {
        ClientCapabilities {
            workspace: Some(WorkspaceClientCapabilities {
                apply_edit: Some(true),
                workspace_folders: Some(true),
                configuration: Some(true),
                did_change_configuration: Some(Default::default()),
                ..Default::default()
            }),
            text_document: Some(TextDocumentClientCapabilities {
                publish_diagnostics: Some(PublishDiagnosticsClientCapabilities::default()),
                code_action: Some(CodeActionClientCapabilities {
                    code_action_literal_support: Some(CodeActionLiteralSupport {
                        code_action_kind: CodeActionKindLiteralSupport {
                            value_set: vec!["quickfix".to_string()],
                        },
                    }),
                    data_support: Some(true),
                    resolve_support: Some(CodeActionCapabilityResolveSupport {
                        properties: vec!["edit".to_string()],
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_features_from_full_capabilities() {
        let features = ClientFeatures::from_capabilities(&full_capabilities());
        assert!(features.diagnostics);
        assert!(features.workspace_folders);
        assert!(features.configuration);
        assert!(features.supports_quick_fixes());
        assert!(features.code_action_resolve && features.code_action_data);
    }

    #[test]
    fn test_no_diagnostics_means_no_capabilities() {
        let features = ClientFeatures::from_capabilities(&ClientCapabilities::default());
        let capabilities = server_capabilities(&features);
        assert!(capabilities.text_document_sync.is_none());
        assert!(capabilities.code_action_provider.is_none());
        assert!(capabilities.execute_command_provider.is_none());
    }

    #[test]
    fn test_full_server_capabilities() {
        let features = ClientFeatures::from_capabilities(&full_capabilities());
        let capabilities = server_capabilities(&features);

        assert_eq!(
            capabilities.text_document_sync,
            Some(TextDocumentSyncCapability::Kind(TextDocumentSyncKind::INCREMENTAL))
        );
        assert_eq!(
            capabilities.execute_command_provider.unwrap().commands,
            vec!["codiga.applyFix".to_string()]
        );
        match capabilities.code_action_provider {
            Some(CodeActionProviderCapability::Options(options)) => {
                assert_eq!(options.resolve_provider, Some(true));
                assert_eq!(options.code_action_kinds, Some(vec![CodeActionKind::QUICKFIX]));
            }
            other => panic!("unexpected code action provider: {:?}", other),
        }
        assert!(capabilities.workspace.is_some());
    }

    #[test]
    fn test_code_actions_without_apply_edit() {
        let features = ClientFeatures {
            diagnostics: true,
            code_action_literals: true,
            ..Default::default()
        };
        let capabilities = server_capabilities(&features);
        assert!(capabilities.execute_command_provider.is_none());
        match capabilities.code_action_provider {
            Some(CodeActionProviderCapability::Options(options)) => {
                assert_eq!(options.resolve_provider, None);
            }
            other => panic!("unexpected code action provider: {:?}", other),
        }
        assert!(capabilities.workspace.is_none());
    }
}
