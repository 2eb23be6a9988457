// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Quick fixes proposed by the analyzer.

use crate::analyzer::{EditType, RosieFix, RosieFixEdit};
use crate::document::TextDocument;
use crate::types::{Range, TextEdit};

use super::{CodeAction, Command, FixData, APPLY_FIX_COMMAND};

/// Code action applying `fix` to the document at `document_uri`.
///
/// The edits are only computed when the action is resolved.
pub fn rule_fix_action(document_uri: &str, fix: &RosieFix) -> CodeAction {
    CodeAction {
        title: format!("Fix: {}", fix.description),
        diagnostics: Vec::new(),
        is_preferred: true,
        command: Some(Command {
            title: "Apply Fix".to_string(),
            command: APPLY_FIX_COMMAND.to_string(),
        }),
        data: FixData::RuleFix {
            document_uri: document_uri.to_string(),
            rosie_fix_edits: fix.edits.clone(),
        },
    }
}

/// Text edits for the fix edits that can be applied to `document`.
///
/// Edits with negative coordinates, a start after their end, or an unknown type
/// are dropped.
pub fn edits_for(document: &TextDocument, fix_edits: &[RosieFixEdit]) -> Vec<TextEdit> {
    fix_edits
        .iter()
        .filter_map(|edit| to_text_edit(document, edit))
        .collect()
}

fn to_text_edit(document: &TextDocument, edit: &RosieFixEdit) -> Option<TextEdit> {
    let content = edit.content.clone().unwrap_or_default();
    match edit.edit_type {
        EditType::Add => {
            let position = edit.start.to_editor_checked()?;
            Some(TextEdit::insert(position, content))
        }
        EditType::Update => checked_range(document, edit).map(|range| TextEdit::replace(range, content)),
        EditType::Remove => checked_range(document, edit).map(TextEdit::delete),
        EditType::Unknown => None,
    }
}

fn checked_range(document: &TextDocument, edit: &RosieFixEdit) -> Option<Range> {
    let start = edit.start.to_editor_checked()?;
    let end = edit.end.to_editor_checked()?;
    (document.offset_at(start) <= document.offset_at(end)).then(|| Range::new(start, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalyzerPosition;
    use crate::types::Position;

    const URI: &str = "file:///workspace/main.js";

    fn document() -> TextDocument {
        TextDocument::new(
            URI,
            "javascript",
            1,
            "const a = 1;\nconsole.log(a);\nfunction f() {}\n",
        )
    }

    fn edit(
        edit_type: EditType,
        start: (i64, i64),
        end: (i64, i64),
        content: Option<&str>,
    ) -> RosieFixEdit {
        RosieFixEdit {
            start: AnalyzerPosition::new(start.0, start.1),
            end: AnalyzerPosition::new(end.0, end.1),
            edit_type,
            content: content.map(str::to_string),
        }
    }

    #[test]
    fn test_add_inserts_at_zero_based_start() {
        let edits = edits_for(
            &document(),
            &[edit(EditType::Add, (1, 5), (1, 5), Some("x"))],
        );
        assert_eq!(edits, vec![TextEdit::insert(Position::new(0, 4), "x")]);
    }

    #[test]
    fn test_add_without_content_inserts_nothing() {
        let edits = edits_for(&document(), &[edit(EditType::Add, (2, 1), (2, 1), None)]);
        assert_eq!(edits, vec![TextEdit::insert(Position::new(1, 0), "")]);
    }

    #[test]
    fn test_add_with_negative_start_is_rejected() {
        let edits = edits_for(
            &document(),
            &[
                edit(EditType::Add, (0, 5), (1, 5), Some("x")),
                edit(EditType::Add, (1, 0), (1, 5), Some("x")),
            ],
        );
        assert!(edits.is_empty());
    }

    #[test]
    fn test_update_replaces_range() {
        let edits = edits_for(
            &document(),
            &[edit(EditType::Update, (1, 1), (1, 6), Some("let"))],
        );
        assert_eq!(
            edits,
            vec![TextEdit::replace(Range::from_coords(0, 0, 0, 5), "let")]
        );
    }

    #[test]
    fn test_update_with_start_after_end_is_rejected() {
        let edits = edits_for(
            &document(),
            &[edit(EditType::Update, (2, 5), (1, 5), Some("let"))],
        );
        assert!(edits.is_empty());
    }

    #[test]
    fn test_update_with_negative_end_is_rejected() {
        let edits = edits_for(
            &document(),
            &[edit(EditType::Update, (1, 1), (1, 0), Some("let"))],
        );
        assert!(edits.is_empty());
    }

    #[test]
    fn test_remove_deletes_range() {
        let edits = edits_for(&document(), &[edit(EditType::Remove, (2, 1), (3, 1), None)]);
        assert_eq!(edits, vec![TextEdit::delete(Range::from_coords(1, 0, 2, 0))]);
    }

    #[test]
    fn test_empty_range_is_accepted() {
        let edits = edits_for(&document(), &[edit(EditType::Remove, (2, 3), (2, 3), None)]);
        assert_eq!(edits.len(), 1);
    }

    #[test]
    fn test_unknown_type_is_dropped() {
        let edits = edits_for(
            &document(),
            &[
                edit(EditType::Unknown, (1, 1), (1, 2), Some("x")),
                edit(EditType::Remove, (1, 1), (1, 2), None),
            ],
        );
        assert_eq!(edits, vec![TextEdit::delete(Range::from_coords(0, 0, 0, 1))]);
    }

    #[test]
    fn test_rule_fix_action() {
        let fix = RosieFix {
            description: "Use let".to_string(),
            edits: vec![edit(EditType::Update, (1, 1), (1, 6), Some("let"))],
        };
        let action = rule_fix_action(URI, &fix);
        assert_eq!(action.title, "Fix: Use let");
        assert!(action.is_preferred);
        assert_eq!(action.command.as_ref().unwrap().command, "codiga.applyFix");
        assert_eq!(
            action.data,
            FixData::RuleFix {
                document_uri: URI.to_string(),
                rosie_fix_edits: fix.edits.clone(),
            }
        );
    }
}
