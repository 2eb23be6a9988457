// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! codiga-ls entry point: parse options, set up logging, serve LSP on stdio.

use clap::Parser;

use codiga_ls::config::{CliOptions, ServerSettings};
use codiga_ls::server::serve_stdio;
use codiga_ls::telemetry::{init_telemetry, parse_level, TelemetryConfig};

/// Codiga language server.
#[derive(Parser)]
#[command(name = "codiga-ls")]
#[command(author, version, about = "Codiga static analysis language server", long_about = None)]
struct Cli {
    /// User fingerprint sent to the rule registry. Generated when absent.
    #[arg(long)]
    fingerprint: Option<String>,

    /// Rule registry GraphQL endpoint
    #[arg(long, env = "CODIGA_GRAPHQL_ENDPOINT")]
    graphql_endpoint: Option<String>,

    /// Analyzer endpoint
    #[arg(long, env = "CODIGA_ANALYZER_ENDPOINT")]
    analyzer_endpoint: Option<String>,

    /// Use the staging analyzer
    #[arg(long)]
    staging: bool,

    /// API token, until the editor provides `codiga.api.token`
    #[arg(long, env = "CODIGA_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log filter directive such as `codiga_ls=debug,reqwest=warn`. RUST_LOG wins.
    #[arg(long)]
    log_filter: Option<String>,

    /// Communicate over stdio. Accepted for editor compatibility; stdio is the only transport.
    #[arg(long)]
    stdio: bool,

    /// Extra arguments. A single `fingerprint=<value>` is used as the fingerprint.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    extra: Vec<String>,
}

impl Cli {
    fn fingerprint(&self) -> Option<String> {
        if self.fingerprint.is_some() {
            return self.fingerprint.clone();
        }
        fingerprint_from_args(&self.extra)
    }

    fn into_options(self) -> CliOptions {
        CliOptions {
            fingerprint: self.fingerprint(),
            graphql_endpoint: self.graphql_endpoint,
            analyzer_endpoint: self.analyzer_endpoint,
            api_token: self.api_token,
            staging: self.staging,
        }
    }
}

/// Value of the only `fingerprint=` argument. Ambiguous or missing gives `None`.
fn fingerprint_from_args(args: &[String]) -> Option<String> {
    let mut matching = args
        .iter()
        .filter_map(|arg| arg.strip_prefix("fingerprint="));
    match (matching.next(), matching.next()) {
        (Some(value), None) => Some(value.to_string()),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> codiga_ls::Result<()> {
    let cli = Cli::parse();

    let level = parse_level(&cli.log_level).unwrap_or(tracing::Level::INFO);
    let mut telemetry = TelemetryConfig::default().with_level(level);
    if let Some(filter) = cli.log_filter.clone() {
        telemetry = telemetry.with_filter(filter);
    }
    init_telemetry(&telemetry)?;

    let settings = ServerSettings::from_cli(cli.into_options());
    tracing::info!(
        "Starting codiga-ls {} (registry {}, analyzer {})",
        env!("CARGO_PKG_VERSION"),
        settings.graphql_endpoint,
        settings.analyzer_endpoint
    );

    serve_stdio(settings).await;
    tracing::info!("Client disconnected");
    Ok(())
}
