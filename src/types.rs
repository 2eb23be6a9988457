// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Editor-facing types shared by the analysis pipeline.
//!
//! These types mirror the LSP protocol types but are simplified for the needs of
//! the rule pipeline. The server module converts them to `tower_lsp::lsp_types`
//! at the protocol boundary.

use serde::{Deserialize, Serialize};

/// Source label attached to every diagnostic this server publishes.
pub const DIAGNOSTIC_SOURCE: &str = "Codiga";

/// Base URL of the rule pages on the Codiga hub.
pub const RULE_DOCUMENTATION_URL: &str = "https://app.codiga.io/hub/ruleset/";

// ============================================================================
// Positions and ranges
// ============================================================================

/// Position in a text document (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Position {
    /// Line number (0-indexed).
    pub line: u32,
    /// Character offset (0-indexed).
    pub character: u32,
}

impl Position {
    /// Create a new position.
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }

    /// Whether this position comes strictly before `other`.
    pub fn is_before(&self, other: &Position) -> bool {
        (self.line, self.character) < (other.line, other.character)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// A range in a text document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Range {
    /// Start position.
    pub start: Position,
    /// End position.
    pub end: Position,
}

impl Range {
    /// Create a new range.
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Create a range from line/character coordinates.
    pub fn from_coords(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> Self {
        Self {
            start: Position::new(start_line, start_char),
            end: Position::new(end_line, end_char),
        }
    }

    /// Check if a position lies within this range, boundaries included.
    pub fn contains_position(&self, pos: Position) -> bool {
        !(pos.is_before(&self.start) || self.end.is_before(&pos))
    }

    /// Check if `other` lies completely within this range.
    ///
    /// Containment is closed: a range contains itself, and shared boundaries count.
    pub fn contains(&self, other: &Range) -> bool {
        self.contains_position(other.start) && self.contains_position(other.end)
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Reports an error.
    Error = 1,
    /// Reports a warning.
    Warning = 2,
    /// Reports an information.
    Information = 3,
    /// Reports a hint.
    Hint = 4,
}

impl DiagnosticSeverity {
    /// Map an analyzer severity to the editor severity.
    ///
    /// `CRITICAL` becomes an error, `ERROR` and `WARNING` become warnings,
    /// and anything else is informational. Matching is case-insensitive.
    pub fn from_analyzer(severity: &str) -> Self {
        match severity.to_uppercase().as_str() {
            "CRITICAL" => Self::Error,
            "ERROR" | "WARNING" => Self::Warning,
            _ => Self::Information,
        }
    }

    /// Get a short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Information => "info",
            Self::Hint => "hint",
        }
    }
}

impl Default for DiagnosticSeverity {
    fn default() -> Self {
        Self::Information
    }
}

impl std::fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A diagnostic produced from an analyzer violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Range in the document.
    pub range: Range,
    /// Severity level.
    #[serde(default)]
    pub severity: DiagnosticSeverity,
    /// Rule identifier (`ruleset/rule`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Link to the rule documentation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_description: Option<String>,
    /// Source of the diagnostic.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Create a new diagnostic.
    pub fn new(range: Range, severity: DiagnosticSeverity, message: impl Into<String>) -> Self {
        Self {
            range,
            severity,
            code: None,
            code_description: None,
            source: None,
            message: message.into(),
        }
    }

    /// Attach the rule identifier and the matching documentation link.
    pub fn with_rule(mut self, identifier: impl Into<String>) -> Self {
        let identifier = identifier.into();
        self.code_description = Some(format!("{}{}", RULE_DOCUMENTATION_URL, identifier));
        self.code = Some(identifier);
        self
    }

    /// Add a source to the diagnostic.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Whether the diagnostic was published by this server.
    pub fn is_codiga(&self) -> bool {
        self.source
            .as_deref()
            .is_some_and(|source| source.contains(DIAGNOSTIC_SOURCE))
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.range.start, self.message)?;
        if let Some(ref code) = self.code {
            write!(f, " [{}]", code)?;
        }
        Ok(())
    }
}

// ============================================================================
// Text edits
// ============================================================================

/// A textual change to apply to a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextEdit {
    /// Range to replace. Empty for insertions.
    pub range: Range,
    /// Replacement text. Empty for deletions.
    pub new_text: String,
}

impl TextEdit {
    /// Insert text at a position.
    pub fn insert(position: Position, text: impl Into<String>) -> Self {
        Self {
            range: Range::new(position, position),
            new_text: text.into(),
        }
    }

    /// Replace a range with text.
    pub fn replace(range: Range, text: impl Into<String>) -> Self {
        Self {
            range,
            new_text: text.into(),
        }
    }

    /// Delete a range.
    pub fn delete(range: Range) -> Self {
        Self {
            range,
            new_text: String::new(),
        }
    }
}
