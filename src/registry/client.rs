// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! GraphQL client for the rule registry.

use std::sync::{PoisonError, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{is_usable_api_token, ServerSettings};
use crate::error::RegistryError;
use crate::rules::{EntityChecked, Rule, RuleType, VersionToken};

use super::queries::{
    FingerprintVariables, GraphQlRequest, GraphQlResponse, LastUpdatedTimestampData,
    RulesetVariables, RulesetsForClientData, GET_RULESETS_FOR_CLIENT,
    GET_RULESETS_LAST_UPDATED_TIMESTAMP, USE_RULE_FIX,
};
use super::RuleRegistry;

const USER_AGENT_HEADER: &str = "User-Agent";
const API_TOKEN_HEADER: &str = "X-Api-Token";

/// Rule registry reached over GraphQL.
pub struct GraphQlRegistryClient {
    client: Client,
    endpoint: String,
    fingerprint: String,
    user_agent: RwLock<String>,
    api_token: RwLock<Option<String>>,
}

impl GraphQlRegistryClient {
    pub fn new(settings: &ServerSettings) -> Self {
        Self {
            client: Client::new(),
            endpoint: settings.graphql_endpoint.clone(),
            fingerprint: settings.fingerprint.clone(),
            user_agent: RwLock::new(settings.user_agent()),
            api_token: RwLock::new(settings.api_token.clone()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn user_agent(&self) -> String {
        self.user_agent
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Token sent with requests, if it is long enough to be a real one.
    fn usable_token(&self) -> Option<String> {
        self.api_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .filter(|token| is_usable_api_token(token))
    }

    async fn request<V, T>(&self, query: &str, variables: V) -> Result<T, RegistryError>
    where
        V: Serialize + Send,
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .post(&self.endpoint)
            .header(USER_AGENT_HEADER, self.user_agent())
            .header("Content-Type", "application/json");
        if let Some(token) = self.usable_token() {
            request = request.header(API_TOKEN_HEADER, token);
        }

        let response = request
            .json(&GraphQlRequest { query, variables })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(RegistryError::api(
                format!("Registry returned {}: {}", status, body),
                status.as_u16(),
            ));
        }

        let response: GraphQlResponse<T> = serde_json::from_str(&body)
            .map_err(|e| RegistryError::ParseError(format!("Invalid registry response: {}", e)))?;

        if !response.errors.is_empty() {
            let messages: Vec<_> = response.errors.into_iter().map(|e| e.message).collect();
            return Err(RegistryError::GraphQlError(messages.join("; ")));
        }

        response
            .data
            .ok_or_else(|| RegistryError::ParseError("Registry response has no data".to_string()))
    }
}

/// Flatten registry rulesets into rules. Rules of an unknown type are skipped.
pub(crate) fn rules_from_response(data: RulesetsForClientData) -> Vec<Rule> {
    let mut rules = Vec::new();
    for ruleset in data.rule_sets_for_client {
        for rule in ruleset.rules {
            let Some(rule_type) = RuleType::parse(&rule.rule_type) else {
                tracing::debug!(
                    "Skipping rule {}/{} with unknown type {}",
                    ruleset.name,
                    rule.name,
                    rule.rule_type
                );
                continue;
            };

            let mut converted =
                Rule::new(&ruleset.name, rule.name, rule.language, rule_type, rule.content);
            converted.entity_checked = rule
                .element_checked
                .as_deref()
                .and_then(EntityChecked::from_element_checked);
            converted.pattern = rule.pattern;
            rules.push(converted);
        }
    }
    rules
}

fn log_failure(operation: &str, error: &RegistryError) {
    // Anonymous users are expected to hit this.
    if error.is_user_not_logged() {
        tracing::debug!("{} failed: {}", operation, error);
    } else {
        tracing::warn!("{} failed: {}", operation, error);
    }
}

#[async_trait]
impl RuleRegistry for GraphQlRegistryClient {
    async fn fetch_rules(&self, ruleset_names: &[String]) -> Result<Vec<Rule>, RegistryError> {
        let variables = RulesetVariables {
            fingerprint: &self.fingerprint,
            names: ruleset_names,
        };
        let data: RulesetsForClientData = self
            .request(GET_RULESETS_FOR_CLIENT, variables)
            .await
            .inspect_err(|e| log_failure("Fetching rules", e))?;

        let rules = rules_from_response(data);
        tracing::debug!("Fetched {} rules for {:?}", rules.len(), ruleset_names);
        Ok(rules)
    }

    async fn fetch_version_token(
        &self,
        ruleset_names: &[String],
    ) -> Result<Option<VersionToken>, RegistryError> {
        let variables = RulesetVariables {
            fingerprint: &self.fingerprint,
            names: ruleset_names,
        };
        let data: LastUpdatedTimestampData = self
            .request(GET_RULESETS_LAST_UPDATED_TIMESTAMP, variables)
            .await
            .inspect_err(|e| log_failure("Fetching ruleset timestamp", e))?;

        Ok(VersionToken::from_json(&data.rule_sets_last_updated_timestamp))
    }

    async fn record_rule_fix(&self) -> Result<(), RegistryError> {
        let variables = FingerprintVariables {
            fingerprint: &self.fingerprint,
        };
        let _: serde_json::Value = self
            .request(USE_RULE_FIX, variables)
            .await
            .inspect_err(|e| log_failure("Recording rule fix", e))?;
        Ok(())
    }

    fn set_api_token(&self, token: Option<String>) {
        *self.api_token.write().unwrap_or_else(PoisonError::into_inner) = token;
    }

    fn set_client_info(&self, name: &str, version: &str) {
        *self.user_agent.write().unwrap_or_else(PoisonError::into_inner) =
            format!("{}/{}", name, version);
    }
}
