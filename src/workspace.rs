// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Workspace folders announced by the editor.
//!
//! Folders are kept as URI strings. Some clients only send a single `rootUri`, so the
//! server never depends on the richer workspace folder objects.

use std::path::Path;
use std::sync::{PoisonError, RwLock};

use url::Url;

use crate::config::CODIGA_RULES_FILE;

/// The set of workspace folder URIs known to the server.
#[derive(Debug, Default)]
pub struct WorkspaceFolders {
    folders: RwLock<Vec<String>>,
}

impl WorkspaceFolders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from an initial list of folder URIs.
    pub fn with_folders(folders: Vec<String>) -> Self {
        Self {
            folders: RwLock::new(folders),
        }
    }

    /// Replace all folders.
    pub fn set(&self, folders: Vec<String>) {
        *self.folders.write().unwrap_or_else(PoisonError::into_inner) = folders;
    }

    /// Apply a folder change event from the editor.
    pub fn update(&self, added: Vec<String>, removed: &[String]) {
        let mut folders = self.folders.write().unwrap_or_else(PoisonError::into_inner);
        folders.retain(|folder| !removed.contains(folder));
        for folder in added {
            if !folders.contains(&folder) {
                folders.push(folder);
            }
        }
    }

    pub fn all(&self) -> Vec<String> {
        self.folders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The single folder that owns `file_uri`.
    ///
    /// Returns `None` when no folder or more than one folder is a prefix of the URI.
    pub fn owning_folder(&self, file_uri: &str) -> Option<String> {
        let folders = self.folders.read().unwrap_or_else(PoisonError::into_inner);
        let mut matching = folders.iter().filter(|folder| file_uri.starts_with(folder.as_str()));
        match (matching.next(), matching.next()) {
            (Some(folder), None) => Some(folder.clone()),
            _ => None,
        }
    }

    /// Name under which a file is sent to the analyzer.
    ///
    /// The URI path relative to the owning folder, or the full URI path when no single
    /// folder owns the file.
    pub fn analysis_path(&self, file_uri: &str) -> String {
        let file_path = uri_path(file_uri);
        match self.owning_folder(file_uri) {
            Some(folder) => file_path.replacen(&uri_path(&folder), "", 1),
            None => file_path,
        }
    }
}

/// Path of `file_uri` relative to `folder_uri`, always with forward slashes.
///
/// The folder path is removed textually from the file path, so the result keeps its
/// leading separator (`/src/main.py`).
pub fn relative_path(file_uri: &str, folder_uri: &str) -> String {
    let file_path = fs_path(file_uri);
    let folder_path = fs_path(folder_uri);
    file_path.replacen(&folder_path, "", 1).replace('\\', "/")
}

/// Location of the `codiga.yml` file of a workspace folder.
pub fn rules_file_path(folder_uri: &str) -> std::path::PathBuf {
    Path::new(&fs_path(folder_uri)).join(CODIGA_RULES_FILE)
}

/// File system path of a URI. Non-file URIs fall back to their decoded path component.
fn fs_path(uri: &str) -> String {
    match Url::parse(uri) {
        Ok(url) => match url.to_file_path() {
            Ok(path) => path.to_string_lossy().into_owned(),
            Err(()) => url.path().to_string(),
        },
        Err(_) => uri.to_string(),
    }
}

/// Path component of a URI, as written in the URI.
fn uri_path(uri: &str) -> String {
    Url::parse(uri)
        .map(|url| url.path().to_string())
        .unwrap_or_else(|_| uri.to_string())
}
