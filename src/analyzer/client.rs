// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! HTTP client for the analyzer.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::Client;

use crate::config::ServerSettings;
use crate::error::AnalyzerError;
use crate::rules::Rule;

use super::types::{AnalysisRequest, AnalysisResponse, RuleResponse};
use super::Analyzer;

const FILE_ENCODING: &str = "utf-8";

/// Analyzer reached over JSON/HTTP.
pub struct RosieClient {
    client: Client,
    endpoint: String,
    user_agent: String,
}

impl RosieClient {
    pub fn new(settings: &ServerSettings) -> Self {
        Self {
            client: Client::new(),
            endpoint: settings.analyzer_endpoint.clone(),
            user_agent: settings.user_agent(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Base64 of the document text as sent to the analyzer.
pub fn encode_source(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

#[async_trait]
impl Analyzer for RosieClient {
    async fn analyze(
        &self,
        filename: &str,
        language: &str,
        code_base64: &str,
        rules: &[Rule],
    ) -> Result<Vec<RuleResponse>, AnalyzerError> {
        let request = AnalysisRequest {
            filename,
            file_encoding: FILE_ENCODING,
            language,
            code_base64: code_base64.to_string(),
            rules,
            log_output: false,
        };

        tracing::debug!(
            "Analyzing {} ({}) with {} rules",
            filename,
            language,
            rules.len()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("User-Agent", &self.user_agent)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AnalyzerError::api(
                format!("Analyzer returned {}: {}", status, body),
                status.as_u16(),
            ));
        }

        if body.trim().is_empty() {
            return Ok(Vec::new());
        }

        let response: AnalysisResponse = serde_json::from_str(&body)
            .map_err(|e| AnalyzerError::ParseError(format!("Invalid analyzer response: {}", e)))?;

        for error in &response.errors {
            tracing::debug!("Analyzer reported: {}", error);
        }

        Ok(response.rule_responses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_source() {
        assert_eq!(encode_source("print(1)\n"), "cHJpbnQoMSkK");
        assert_eq!(encode_source(""), "");
    }

    #[test]
    fn test_client_uses_configured_endpoint() {
        let settings = ServerSettings {
            analyzer_endpoint: "http://localhost:8080/analyze".to_string(),
            ..ServerSettings::default()
        };
        let client = RosieClient::new(&settings);
        assert_eq!(client.endpoint(), "http://localhost:8080/analyze");
    }
}
