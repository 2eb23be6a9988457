// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Code actions offered on Codiga diagnostics.
//!
//! Two kinds of quick fixes exist:
//!
//! - rule fixes, proposed by the analyzer and looked up in the [`FixRegistry`]
//! - ignore fixes, inserting a `codiga-disable` comment above the violation
//!
//! Actions are sent without edits. The edits are computed when the editor resolves
//! the action, from the [`FixData`] it sends back.

mod ignore;
mod rule_fix;

use serde::{Deserialize, Serialize};

pub use ignore::{ignore_action, ignore_edit};
pub use rule_fix::{edits_for, rule_fix_action};

use crate::analyzer::RosieFixEdit;
use crate::diagnostics::FixRegistry;
use crate::document::DocumentStore;
use crate::types::{Diagnostic, Range, TextEdit};

/// Command run after a rule fix has been applied.
pub const APPLY_FIX_COMMAND: &str = "codiga.applyFix";

/// Payload carried by an action between the request and its resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "fixKind")]
pub enum FixData {
    #[serde(rename = "rosie.rule.fix", rename_all = "camelCase")]
    RuleFix {
        document_uri: String,
        rosie_fix_edits: Vec<RosieFixEdit>,
    },
    #[serde(rename = "rosie.ignore.violation.fix", rename_all = "camelCase")]
    IgnoreViolation { document_uri: String },
}

impl FixData {
    pub fn document_uri(&self) -> &str {
        match self {
            Self::RuleFix { document_uri, .. } | Self::IgnoreViolation { document_uri } => {
                document_uri
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub title: String,
    pub command: String,
}

/// A quick fix, always of kind `quickfix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeAction {
    pub title: String,
    pub diagnostics: Vec<Diagnostic>,
    pub is_preferred: bool,
    pub command: Option<Command>,
    pub data: FixData,
}

/// Edits of a resolved action, all on one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentEdits {
    pub uri: String,
    pub edits: Vec<TextEdit>,
}

/// Actions for `range` of a document, given the diagnostics the editor sent along.
///
/// Rule fixes come first, then one ignore action per Codiga diagnostic.
pub fn code_actions(
    document_uri: &str,
    range: &Range,
    diagnostics: &[Diagnostic],
    fixes: &FixRegistry,
) -> Vec<CodeAction> {
    if diagnostics.is_empty() {
        return Vec::new();
    }

    let mut actions: Vec<CodeAction> = fixes
        .get_fixes(document_uri, range)
        .iter()
        .map(|fix| rule_fix_action(document_uri, fix))
        .collect();

    actions.extend(
        diagnostics
            .iter()
            .filter(|diagnostic| diagnostic.is_codiga())
            .map(|diagnostic| ignore_action(document_uri, diagnostic)),
    );
    actions
}

/// Compute the edits of an action sent back by the editor.
///
/// `None` when the document is no longer open, or an ignore action lost its diagnostic.
pub fn resolve_edits(
    data: &FixData,
    diagnostics: &[Diagnostic],
    documents: &DocumentStore,
) -> Option<DocumentEdits> {
    let document = documents.get(data.document_uri())?;
    let edits = match data {
        FixData::RuleFix {
            rosie_fix_edits, ..
        } => edits_for(&document, rosie_fix_edits),
        FixData::IgnoreViolation { .. } => {
            let diagnostic = diagnostics.first()?;
            vec![ignore_edit(&document, &diagnostic.range)]
        }
    };

    Some(DocumentEdits {
        uri: document.uri().to_string(),
        edits,
    })
}
