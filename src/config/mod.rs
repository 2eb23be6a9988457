// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Configuration for the language server.
//!
//! Two sources are handled here:
//! - Workspace config: `codiga.yml` at the root of each workspace folder
//! - Server settings: defaults, command-line options and the editor's API token setting

mod loader;
mod settings;
mod types;

pub use loader::{load_config_file, parse_config, parse_config_str, CODIGA_RULES_FILE};

pub use settings::{
    generate_fingerprint, is_usable_api_token, CliOptions, ServerSettings, ACTIVITY_WINDOW,
    API_TOKEN_SETTING, CLIENT_NAME, DEBOUNCE_DELAY, DEFAULT_ANALYZER_ENDPOINT,
    DEFAULT_GRAPHQL_ENDPOINT, FINGERPRINT_LENGTH, MIN_API_TOKEN_LENGTH, RULES_MAX_TIME_IN_CACHE,
    RULES_POLLING_INTERVAL, STAGING_ANALYZER_ENDPOINT,
};

pub use types::{is_valid_ruleset_name, RuleIgnore, RulesetIgnore, WorkspaceConfig};
