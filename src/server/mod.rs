// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! LSP wiring: capability negotiation, document sync, code actions and commands.

mod backend;
mod capabilities;
mod convert;

use tower_lsp::{LspService, Server};

pub use backend::Backend;
pub use capabilities::{server_capabilities, ClientFeatures};
pub use convert::{
    from_lsp_diagnostic, from_lsp_range, to_content_change, to_lsp_code_action,
    to_lsp_diagnostic, to_lsp_range, to_workspace_edit,
};

use crate::config::ServerSettings;

/// Run the language server on stdin/stdout until the client disconnects.
pub async fn serve_stdio(settings: ServerSettings) {
    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(|client| Backend::new(client, settings));
    Server::new(stdin, stdout, socket).serve(service).await;
}
