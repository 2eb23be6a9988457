// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Logging for the language server.
//!
//! Initialize once at startup:
//!
//! ```rust,ignore
//! use codiga_ls::telemetry::{init_telemetry, TelemetryConfig};
//!
//! init_telemetry(&TelemetryConfig::default())?;
//! ```
//!
//! Components log with the `tracing` macros. Use trace for per-keystroke details,
//! debug for per-request details, info for lifecycle events, and warn/error for
//! failures that degrade results.

mod init;

pub use init::{init_telemetry, parse_level, TelemetryConfig};
