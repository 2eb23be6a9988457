// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Wire types of the analyzer.
//!
//! Analyzer coordinates are 1-based on both axes.

use serde::{Deserialize, Serialize};

use crate::rules::Rule;
use crate::types::{Position, Range};

/// Body of an analysis request.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest<'a> {
    pub filename: &'a str,
    pub file_encoding: &'static str,
    pub language: &'a str,
    pub code_base64: String,
    pub rules: &'a [Rule],
    pub log_output: bool,
}

/// Body of an analysis response.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    #[serde(default)]
    pub rule_responses: Vec<RuleResponse>,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Findings of one rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResponse {
    /// Rule id, `<ruleset>/<rule>`.
    pub identifier: String,
    #[serde(default)]
    pub violations: Vec<Violation>,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub execution_time_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub start: AnalyzerPosition,
    pub end: AnalyzerPosition,
    pub message: String,
    pub severity: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixes: Option<Vec<RosieFix>>,
}

impl Violation {
    /// Editor range of the violation.
    pub fn range(&self) -> Range {
        Range::new(self.start.to_editor(), self.end.to_editor())
    }
}

/// 1-based position as reported by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalyzerPosition {
    pub line: i64,
    pub col: i64,
}

impl AnalyzerPosition {
    pub fn new(line: i64, col: i64) -> Self {
        Self { line, col }
    }

    /// 0-based line and column, possibly negative.
    pub fn zero_based(&self) -> (i64, i64) {
        (self.line - 1, self.col - 1)
    }

    /// 0-based editor position, or `None` if either coordinate is negative.
    pub fn to_editor_checked(&self) -> Option<Position> {
        let (line, col) = self.zero_based();
        Some(Position::new(u32::try_from(line).ok()?, u32::try_from(col).ok()?))
    }

    /// 0-based editor position, clamping negative coordinates to zero.
    pub fn to_editor(&self) -> Position {
        let (line, col) = self.zero_based();
        Position::new(clamp_to_u32(line), clamp_to_u32(col))
    }
}

fn clamp_to_u32(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// A fix proposed by the analyzer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosieFix {
    pub description: String,
    #[serde(default)]
    pub edits: Vec<RosieFixEdit>,
}

/// One edit of a fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosieFixEdit {
    pub start: AnalyzerPosition,
    pub end: AnalyzerPosition,
    pub edit_type: EditType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditType {
    Add,
    Update,
    Remove,
    /// Any type this server does not know how to apply.
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_analysis_response() {
        let body = r#"{
            "ruleResponses": [{
                "identifier": "python-security/no-eval",
                "violations": [{
                    "start": {"line": 2, "col": 6},
                    "end": {"line": 2, "col": 11},
                    "message": "do not use eval",
                    "severity": "WARNING",
                    "fixes": [{
                        "description": "Remove eval",
                        "edits": [{
                            "start": {"line": 2, "col": 6},
                            "end": {"line": 2, "col": 11},
                            "editType": "update",
                            "content": "literal_eval"
                        }]
                    }]
                }],
                "errors": [],
                "executionTimeMs": 12
            }]
        }"#;

        let response: AnalysisResponse = serde_json::from_str(body).unwrap();
        let rule_response = &response.rule_responses[0];
        assert_eq!(rule_response.identifier, "python-security/no-eval");

        let violation = &rule_response.violations[0];
        assert_eq!(violation.range(), Range::from_coords(1, 5, 1, 10));

        let fix = &violation.fixes.as_ref().unwrap()[0];
        assert_eq!(fix.edits[0].edit_type, EditType::Update);
        assert_eq!(fix.edits[0].content.as_deref(), Some("literal_eval"));
    }

    #[test]
    fn test_unknown_edit_type() {
        let edit: RosieFixEdit = serde_json::from_str(
            r#"{"start":{"line":1,"col":1},"end":{"line":1,"col":1},"editType":"move"}"#,
        )
        .unwrap();
        assert_eq!(edit.edit_type, EditType::Unknown);
        assert!(edit.content.is_none());
    }

    #[test]
    fn test_request_serialization() {
        let request = AnalysisRequest {
            filename: "/main.py",
            file_encoding: "utf-8",
            language: "python",
            code_base64: "YQ==".to_string(),
            rules: &[],
            log_output: false,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["fileEncoding"], "utf-8");
        assert_eq!(json["codeBase64"], "YQ==");
        assert_eq!(json["logOutput"], false);
    }

    #[test]
    fn test_position_conversion() {
        assert_eq!(AnalyzerPosition::new(1, 5).to_editor_checked(), Some(Position::new(0, 4)));
        assert_eq!(AnalyzerPosition::new(0, 5).to_editor_checked(), None);
        assert_eq!(AnalyzerPosition::new(1, 0).to_editor_checked(), None);
        assert_eq!(AnalyzerPosition::new(0, 0).to_editor(), Position::new(0, 0));
    }
}
