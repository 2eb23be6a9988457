// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Open text documents.
//!
//! Positions follow the editor protocol: `character` counts UTF-16 code units, and
//! out-of-range positions are clamped rather than rejected.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::language::Language;
use crate::types::{Position, Range};

/// A change reported by the editor. A missing range replaces the whole text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    pub range: Option<Range>,
    pub text: String,
}

impl ContentChange {
    pub fn full(text: impl Into<String>) -> Self {
        Self {
            range: None,
            text: text.into(),
        }
    }

    pub fn incremental(range: Range, text: impl Into<String>) -> Self {
        Self {
            range: Some(range),
            text: text.into(),
        }
    }
}

/// Snapshot of an open document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextDocument {
    uri: String,
    language_id: String,
    version: i32,
    text: String,
    /// Byte offset of the start of each line.
    line_offsets: Vec<usize>,
}

impl TextDocument {
    /// Create a document from its full text.
    pub fn new(
        uri: impl Into<String>,
        language_id: impl Into<String>,
        version: i32,
        text: impl Into<String>,
    ) -> Self {
        let text = text.into();
        let line_offsets = compute_line_offsets(&text);
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            version,
            text,
            line_offsets,
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Language resolved from the document's file name.
    pub fn language(&self) -> Language {
        Language::for_file(&self.uri)
    }

    /// Number of lines. An empty document has one line; a trailing newline opens another.
    pub fn line_count(&self) -> usize {
        self.line_offsets.len()
    }

    /// Byte offset of a position, clamped to the document.
    ///
    /// Lines past the end map to the text length; characters past the end of a line
    /// map to the end of that line, before its line break.
    pub fn offset_at(&self, position: Position) -> usize {
        let line = position.line as usize;
        if line >= self.line_offsets.len() {
            return self.text.len();
        }

        let line_start = self.line_offsets[line];
        let line_end = self.content_end_of_line(line);

        let mut units = 0u32;
        for (index, ch) in self.text[line_start..line_end].char_indices() {
            if units >= position.character {
                return line_start + index;
            }
            units += ch.len_utf16() as u32;
        }
        line_end
    }

    /// Text of a line without its line break. Lines past the end are empty.
    pub fn line_at(&self, line: u32) -> &str {
        let line = line as usize;
        if line >= self.line_offsets.len() {
            return "";
        }
        &self.text[self.line_offsets[line]..self.content_end_of_line(line)]
    }

    /// Number of leading spaces on a line. Tabs are not counted.
    pub fn indentation_at(&self, line: u32) -> usize {
        self.line_at(line).chars().take_while(|c| *c == ' ').count()
    }

    /// Apply editor changes in order and move to `version`.
    pub fn apply_changes(&mut self, changes: Vec<ContentChange>, version: i32) {
        for change in changes {
            match change.range {
                Some(range) => {
                    let start = self.offset_at(range.start);
                    let end = self.offset_at(range.end).max(start);
                    self.text.replace_range(start..end, &change.text);
                }
                None => self.text = change.text,
            }
            self.line_offsets = compute_line_offsets(&self.text);
        }
        self.version = version;
    }

    fn content_end_of_line(&self, line: usize) -> usize {
        let next = self
            .line_offsets
            .get(line + 1)
            .copied()
            .unwrap_or(self.text.len());
        let start = self.line_offsets[line];
        let bytes = self.text.as_bytes();
        let mut end = next;
        if end > start && bytes[end - 1] == b'\n' {
            end -= 1;
        }
        if end > start && bytes[end - 1] == b'\r' {
            end -= 1;
        }
        end
    }
}

fn compute_line_offsets(text: &str) -> Vec<usize> {
    let bytes = text.as_bytes();
    let mut offsets = vec![0];
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\r' => {
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                offsets.push(i + 1);
            }
            b'\n' => offsets.push(i + 1),
            _ => {}
        }
        i += 1;
    }
    offsets
}

/// Thread-safe store of the documents currently open in the editor.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: RwLock<HashMap<String, TextDocument>>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a newly opened document, replacing any previous snapshot.
    pub fn open(&self, document: TextDocument) {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(document.uri().to_string(), document);
    }

    /// Apply changes to an open document. Returns the updated snapshot.
    pub fn change(
        &self,
        uri: &str,
        changes: Vec<ContentChange>,
        version: i32,
    ) -> Option<TextDocument> {
        let mut documents = self
            .documents
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let document = documents.get_mut(uri)?;
        document.apply_changes(changes, version);
        Some(document.clone())
    }

    pub fn close(&self, uri: &str) -> Option<TextDocument> {
        self.documents
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(uri)
    }

    pub fn get(&self, uri: &str) -> Option<TextDocument> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(uri)
            .cloned()
    }

    /// Snapshots of every open document.
    pub fn all(&self) -> Vec<TextDocument> {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(text: &str) -> TextDocument {
        TextDocument::new("file:///project/main.py", "python", 1, text)
    }

    #[test]
    fn test_line_count() {
        assert_eq!(doc("").line_count(), 1);
        assert_eq!(doc("a").line_count(), 1);
        assert_eq!(doc("a\n").line_count(), 2);
        assert_eq!(doc("a\r\nb\rc").line_count(), 3);
    }

    #[test]
    fn test_offset_at_clamps() {
        let document = doc("abc\ndef\n");
        assert_eq!(document.offset_at(Position::new(0, 0)), 0);
        assert_eq!(document.offset_at(Position::new(0, 2)), 2);
        // Past the end of the line stops before the line break.
        assert_eq!(document.offset_at(Position::new(0, 10)), 3);
        assert_eq!(document.offset_at(Position::new(1, 1)), 5);
        // Past the last line maps to the text length.
        assert_eq!(document.offset_at(Position::new(9, 0)), 8);
    }

    #[test]
    fn test_offset_at_crlf() {
        let document = doc("ab\r\ncd");
        assert_eq!(document.offset_at(Position::new(0, 5)), 2);
        assert_eq!(document.offset_at(Position::new(1, 0)), 4);
        assert_eq!(document.line_at(0), "ab");
    }

    #[test]
    fn test_offset_at_counts_utf16_units() {
        let document = doc("é😀x\n");
        // é is one unit, the emoji two.
        assert_eq!(document.offset_at(Position::new(0, 1)), 2);
        assert_eq!(document.offset_at(Position::new(0, 3)), 6);
    }

    #[test]
    fn test_line_at_and_indentation() {
        let document = doc("def f():\n    return 1\n\tx\n");
        assert_eq!(document.line_at(1), "    return 1");
        assert_eq!(document.indentation_at(0), 0);
        assert_eq!(document.indentation_at(1), 4);
        assert_eq!(document.indentation_at(2), 0);
        assert_eq!(document.line_at(42), "");
    }

    #[test]
    fn test_apply_incremental_changes() {
        let mut document = doc("hello world\nsecond");
        document.apply_changes(
            vec![ContentChange::incremental(
                Range::from_coords(0, 6, 0, 11),
                "there",
            )],
            2,
        );
        assert_eq!(document.text(), "hello there\nsecond");
        assert_eq!(document.version(), 2);

        document.apply_changes(
            vec![ContentChange::incremental(Range::from_coords(1, 0, 1, 0), "a\n")],
            3,
        );
        assert_eq!(document.text(), "hello there\na\nsecond");
        assert_eq!(document.line_count(), 3);
    }

    #[test]
    fn test_apply_full_change() {
        let mut document = doc("old");
        document.apply_changes(vec![ContentChange::full("new\ntext")], 5);
        assert_eq!(document.text(), "new\ntext");
        assert_eq!(document.line_count(), 2);
    }

    #[test]
    fn test_document_store() {
        let store = DocumentStore::new();
        assert!(store.is_empty());

        store.open(doc("a\nb"));
        assert_eq!(store.len(), 1);

        let updated = store
            .change("file:///project/main.py", vec![ContentChange::full("c")], 2)
            .unwrap();
        assert_eq!(updated.text(), "c");
        assert!(store.change("file:///other.py", vec![], 1).is_none());

        assert!(store.close("file:///project/main.py").is_some());
        assert!(store.get("file:///project/main.py").is_none());
    }
}
