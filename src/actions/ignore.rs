// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! `codiga-disable` comments that silence a violation.

use crate::document::TextDocument;
use crate::types::{Diagnostic, Position, Range, TextEdit};

use super::{CodeAction, FixData};

const DISABLE_MARKER: &str = "codiga-disable";

/// Code action that silences the rule of `diagnostic` on its line.
pub fn ignore_action(document_uri: &str, diagnostic: &Diagnostic) -> CodeAction {
    let title = match &diagnostic.code {
        Some(code) => format!("Ignore rule {}", code),
        None => "Ignore rule".to_string(),
    };

    CodeAction {
        title,
        diagnostics: vec![diagnostic.clone()],
        is_preferred: false,
        command: None,
        data: FixData::IgnoreViolation {
            document_uri: document_uri.to_string(),
        },
    }
}

/// Insert a disable comment above the line of `range`, matching its indentation.
pub fn ignore_edit(document: &TextDocument, range: &Range) -> TextEdit {
    let line = range.start.line;
    let indentation = " ".repeat(document.indentation_at(line));
    let comment = document.language().comment_sign();
    TextEdit::insert(
        Position::new(line, 0),
        format!("{}{} {}\n", indentation, comment, DISABLE_MARKER),
    )
}
