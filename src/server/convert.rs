// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Conversions between crate types and LSP types.

use std::collections::HashMap;

use tower_lsp::lsp_types::{
    self, CodeAction as LspCodeAction, CodeActionKind, CodeDescription,
    Diagnostic as LspDiagnostic, DiagnosticSeverity as LspDiagnosticSeverity, NumberOrString,
    Position as LspPosition, Range as LspRange, TextDocumentContentChangeEvent,
    TextEdit as LspTextEdit, Url, WorkspaceEdit,
};

use crate::actions::{CodeAction, DocumentEdits};
use crate::document::ContentChange;
use crate::types::{Diagnostic, DiagnosticSeverity, Position, Range, TextEdit};

pub fn to_lsp_position(position: &Position) -> LspPosition {
    LspPosition::new(position.line, position.character)
}

pub fn from_lsp_position(position: &LspPosition) -> Position {
    Position::new(position.line, position.character)
}

pub fn to_lsp_range(range: &Range) -> LspRange {
    LspRange::new(to_lsp_position(&range.start), to_lsp_position(&range.end))
}

pub fn from_lsp_range(range: &LspRange) -> Range {
    Range::new(from_lsp_position(&range.start), from_lsp_position(&range.end))
}

fn to_lsp_severity(severity: DiagnosticSeverity) -> LspDiagnosticSeverity {
    match severity {
        DiagnosticSeverity::Error => LspDiagnosticSeverity::ERROR,
        DiagnosticSeverity::Warning => LspDiagnosticSeverity::WARNING,
        DiagnosticSeverity::Information => LspDiagnosticSeverity::INFORMATION,
        DiagnosticSeverity::Hint => LspDiagnosticSeverity::HINT,
    }
}

fn from_lsp_severity(severity: LspDiagnosticSeverity) -> DiagnosticSeverity {
    if severity == LspDiagnosticSeverity::ERROR {
        DiagnosticSeverity::Error
    } else if severity == LspDiagnosticSeverity::WARNING {
        DiagnosticSeverity::Warning
    } else if severity == LspDiagnosticSeverity::HINT {
        DiagnosticSeverity::Hint
    } else {
        DiagnosticSeverity::Information
    }
}

pub fn to_lsp_diagnostic(diagnostic: &Diagnostic) -> LspDiagnostic {
    LspDiagnostic {
        range: to_lsp_range(&diagnostic.range),
        severity: Some(to_lsp_severity(diagnostic.severity)),
        code: diagnostic.code.clone().map(NumberOrString::String),
        code_description: diagnostic
            .code_description
            .as_deref()
            .and_then(|href| Url::parse(href).ok())
            .map(|href| CodeDescription { href }),
        source: diagnostic.source.clone(),
        message: diagnostic.message.clone(),
        related_information: None,
        tags: None,
        data: None,
    }
}

/// Diagnostics sent back by the editor in a code action request.
pub fn from_lsp_diagnostic(diagnostic: &LspDiagnostic) -> Diagnostic {
    Diagnostic {
        range: from_lsp_range(&diagnostic.range),
        severity: diagnostic
            .severity
            .map(from_lsp_severity)
            .unwrap_or_default(),
        code: diagnostic.code.as_ref().map(|code| match code {
            NumberOrString::String(code) => code.clone(),
            NumberOrString::Number(code) => code.to_string(),
        }),
        code_description: diagnostic
            .code_description
            .as_ref()
            .map(|description| description.href.to_string()),
        source: diagnostic.source.clone(),
        message: diagnostic.message.clone(),
    }
}

pub fn to_lsp_text_edit(edit: &TextEdit) -> LspTextEdit {
    LspTextEdit::new(to_lsp_range(&edit.range), edit.new_text.clone())
}

pub fn to_content_change(event: TextDocumentContentChangeEvent) -> ContentChange {
    match event.range {
        Some(range) => ContentChange::incremental(from_lsp_range(&range), event.text),
        None => ContentChange::full(event.text),
    }
}

pub fn to_lsp_code_action(action: &CodeAction) -> LspCodeAction {
    LspCodeAction {
        title: action.title.clone(),
        kind: Some(CodeActionKind::QUICKFIX),
        diagnostics: (!action.diagnostics.is_empty())
            .then(|| action.diagnostics.iter().map(to_lsp_diagnostic).collect()),
        edit: None,
        command: action.command.as_ref().map(|command| lsp_types::Command {
            title: command.title.clone(),
            command: command.command.clone(),
            arguments: None,
        }),
        is_preferred: Some(action.is_preferred),
        disabled: None,
        data: serde_json::to_value(&action.data).ok(),
    }
}

/// Workspace edit for resolved action edits. `None` if the document URI is not a URL.
pub fn to_workspace_edit(document_edits: &DocumentEdits) -> Option<WorkspaceEdit> {
    let uri = Url::parse(&document_edits.uri).ok()?;
    let edits = document_edits.edits.iter().map(to_lsp_text_edit).collect();
    Some(WorkspaceEdit::new(HashMap::from([(uri, edits)])))
}
