// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Server-wide settings.
//!
//! Settings come from defaults, then command-line options, then the editor's
//! `codiga.api.token` setting at runtime.

use std::time::Duration;

use uuid::Uuid;

/// Production rule registry endpoint.
pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://api.codiga.io/graphql";

/// Production analyzer endpoint.
pub const DEFAULT_ANALYZER_ENDPOINT: &str = "https://analysis.codiga.io/analyze";

/// Staging analyzer endpoint.
pub const STAGING_ANALYZER_ENDPOINT: &str = "https://analysis-staging.codiga.io/analyze";

/// Delay between the last edit of a document and its analysis.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Interval between two rule cache refreshes.
pub const RULES_POLLING_INTERVAL: Duration = Duration::from_secs(10);

/// Time after which an unrefreshed cache entry is garbage collected.
pub const RULES_MAX_TIME_IN_CACHE: Duration = Duration::from_secs(10 * 60);

/// Editor inactivity after which rule refreshes are skipped.
pub const ACTIVITY_WINDOW: Duration = Duration::from_secs(10 * 60);

/// API tokens at or below this length are never sent.
pub const MIN_API_TOKEN_LENGTH: usize = 20;

/// Length of generated fingerprints.
pub const FINGERPRINT_LENGTH: usize = 10;

/// Editor setting holding the API token.
pub const API_TOKEN_SETTING: &str = "codiga.api.token";

/// Client identity reported to the registry.
pub const CLIENT_NAME: &str = "codiga-ls";

/// Command-line overrides.
#[derive(Debug, Clone, Default)]
pub struct CliOptions {
    pub fingerprint: Option<String>,
    pub graphql_endpoint: Option<String>,
    pub analyzer_endpoint: Option<String>,
    pub api_token: Option<String>,
    pub staging: bool,
}

/// Resolved settings shared by the server components.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub graphql_endpoint: String,
    pub analyzer_endpoint: String,
    pub api_token: Option<String>,
    pub fingerprint: String,
    pub client_name: String,
    pub client_version: String,
    pub debounce: Duration,
    pub polling_interval: Duration,
    pub cache_ttl: Duration,
    pub activity_window: Duration,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            graphql_endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            analyzer_endpoint: DEFAULT_ANALYZER_ENDPOINT.to_string(),
            api_token: None,
            fingerprint: generate_fingerprint(),
            client_name: CLIENT_NAME.to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            debounce: DEBOUNCE_DELAY,
            polling_interval: RULES_POLLING_INTERVAL,
            cache_ttl: RULES_MAX_TIME_IN_CACHE,
            activity_window: ACTIVITY_WINDOW,
        }
    }
}

impl ServerSettings {
    /// Apply command-line options over the defaults.
    pub fn from_cli(cli: CliOptions) -> Self {
        let mut settings = Self::default();

        if let Some(fingerprint) = cli.fingerprint.filter(|f| !f.is_empty()) {
            settings.fingerprint = fingerprint;
        }
        if cli.staging {
            settings.analyzer_endpoint = STAGING_ANALYZER_ENDPOINT.to_string();
        }
        if let Some(endpoint) = cli.analyzer_endpoint {
            settings.analyzer_endpoint = endpoint;
        }
        if let Some(endpoint) = cli.graphql_endpoint {
            settings.graphql_endpoint = endpoint;
        }
        settings.api_token = cli.api_token.filter(|t| !t.is_empty());

        settings
    }

    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = fingerprint.into();
        self
    }

    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = interval;
        self
    }

    /// `User-Agent` value sent with every request.
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.client_name, self.client_version)
    }
}

/// Random alphanumeric fingerprint, used when the client does not provide one.
pub fn generate_fingerprint() -> String {
    Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(FINGERPRINT_LENGTH)
        .collect()
}

/// Whether a token is long enough to be sent to the registry.
pub fn is_usable_api_token(token: &str) -> bool {
    token.len() > MIN_API_TOKEN_LENGTH
}
