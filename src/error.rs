// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types for the Codiga language server.
//!
//! This module provides strongly-typed errors for the remote collaborators and the
//! local configuration, using `thiserror` for ergonomic error definitions and `anyhow`
//! for error propagation at the binary boundary.
//!
//! None of these errors ever reach the editor: the rule cache and the analysis
//! coordinator log them and degrade to "no rules" or "no diagnostics".

use thiserror::Error;

/// Errors that can occur while talking to the rule registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("GraphQL error: {0}")]
    GraphQlError(String),

    #[error("Response parsing error: {0}")]
    ParseError(String),
}

impl RegistryError {
    /// Create an API error with status code.
    pub fn api(message: impl Into<String>, status_code: u16) -> Self {
        Self::ApiError {
            message: message.into(),
            status_code: Some(status_code),
        }
    }

    /// The registry answers anonymous users with a `user-not-logged` error.
    ///
    /// Those are expected and not worth reporting above debug level.
    pub fn is_user_not_logged(&self) -> bool {
        matches!(self, Self::GraphQlError(message) if message.contains("user-not-logged"))
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}

/// Errors that can occur while calling the analyzer.
#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error: {message}")]
    ApiError {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Response parsing error: {0}")]
    ParseError(String),
}

impl AnalyzerError {
    /// Create an API error with status code.
    pub fn api(message: impl Into<String>, status_code: u16) -> Self {
        Self::ApiError {
            message: message.into(),
            status_code: Some(status_code),
        }
    }
}

impl From<reqwest::Error> for AnalyzerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::NetworkError(err.to_string())
        }
    }
}

/// Errors that can occur while reading a workspace configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(String),

    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    #[error("IO error reading config: {0}")]
    IoError(String),

    #[error("YAML parsing error: {0}")]
    YamlError(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            _ => Self::IoError(err.to_string()),
        }
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::YamlError(err.to_string())
    }
}

/// Result type alias using anyhow for flexible error handling.
pub type Result<T> = anyhow::Result<T>;
