// Copyright 2026 Layne Penney
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Language detection and per-language lookup tables.
//!
//! The language of a document is derived from its file name, not from the editor's
//! language id, so that every client resolves the same file to the same rules.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Languages known to the rule registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Apex,
    C,
    Coldfusion,
    Cpp,
    Csharp,
    Css,
    Dart,
    Docker,
    Go,
    Haskell,
    Html,
    Java,
    Javascript,
    Json,
    Kotlin,
    Markdown,
    #[serde(rename = "objective-c")]
    Objectivec,
    Perl,
    Php,
    Python,
    Ruby,
    Rust,
    Sass,
    Scala,
    Scss,
    Shell,
    Solidity,
    Sql,
    Swift,
    Terraform,
    Twig,
    Typescript,
    Yaml,
    Unknown,
}

/// File extension to language table.
///
/// Extensions are matched lowercased, so `.M` falls through to `.m`.
const EXTENSION_TO_LANGUAGE: &[(&str, Language)] = &[
    ("bash", Language::Shell),
    ("cls", Language::Apex),
    ("c", Language::C),
    ("css", Language::Css),
    ("cs", Language::Csharp),
    ("cpp", Language::Cpp),
    ("cfc", Language::Coldfusion),
    ("cfm", Language::Coldfusion),
    ("dockerfile", Language::Docker),
    ("dart", Language::Dart),
    ("go", Language::Go),
    ("hs", Language::Haskell),
    ("html", Language::Html),
    ("html5", Language::Html),
    ("htm", Language::Html),
    ("java", Language::Java),
    ("json", Language::Json),
    ("js", Language::Javascript),
    ("jsx", Language::Javascript),
    ("kt", Language::Kotlin),
    ("m", Language::Objectivec),
    ("mm", Language::Objectivec),
    ("md", Language::Markdown),
    ("php4", Language::Php),
    ("php5", Language::Php),
    ("php", Language::Php),
    ("ipynb", Language::Python),
    ("py", Language::Python),
    ("py3", Language::Python),
    ("pm", Language::Perl),
    ("pl", Language::Perl),
    ("rs", Language::Rust),
    ("rb", Language::Ruby),
    ("rhtml", Language::Ruby),
    ("sass", Language::Sass),
    ("scala", Language::Scala),
    ("scss", Language::Scss),
    ("sh", Language::Shell),
    ("sol", Language::Solidity),
    ("swift", Language::Swift),
    ("sql", Language::Sql),
    ("tf", Language::Terraform),
    ("ts", Language::Typescript),
    ("tsx", Language::Typescript),
    ("twig", Language::Twig),
    ("yml", Language::Yaml),
    ("yaml", Language::Yaml),
];

impl Language {
    /// Resolve the language of a file from its name.
    ///
    /// Any file whose name starts with `docker` (case-insensitive) is a Dockerfile.
    pub fn for_file(path: &str) -> Self {
        let path = Path::new(path);

        let is_docker = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.to_lowercase().starts_with("docker"));
        if is_docker {
            return Self::Docker;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .and_then(|ext| {
                EXTENSION_TO_LANGUAGE
                    .iter()
                    .find(|(candidate, _)| *candidate == ext)
                    .map(|(_, language)| *language)
            })
            .unwrap_or(Self::Unknown)
    }

    /// Lowercase name as used by the registry.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Apex => "apex",
            Self::C => "c",
            Self::Coldfusion => "coldfusion",
            Self::Cpp => "cpp",
            Self::Csharp => "csharp",
            Self::Css => "css",
            Self::Dart => "dart",
            Self::Docker => "docker",
            Self::Go => "go",
            Self::Haskell => "haskell",
            Self::Html => "html",
            Self::Java => "java",
            Self::Javascript => "javascript",
            Self::Json => "json",
            Self::Kotlin => "kotlin",
            Self::Markdown => "markdown",
            Self::Objectivec => "objective-c",
            Self::Perl => "perl",
            Self::Php => "php",
            Self::Python => "python",
            Self::Ruby => "ruby",
            Self::Rust => "rust",
            Self::Sass => "sass",
            Self::Scala => "scala",
            Self::Scss => "scss",
            Self::Shell => "shell",
            Self::Solidity => "solidity",
            Self::Sql => "sql",
            Self::Swift => "swift",
            Self::Terraform => "terraform",
            Self::Twig => "twig",
            Self::Typescript => "typescript",
            Self::Yaml => "yaml",
            Self::Unknown => "unknown",
        }
    }

    /// Language tag sent in analysis requests. `None` when the analyzer does not
    /// accept the language.
    pub fn analyzer_tag(&self) -> Option<&'static str> {
        match self {
            Self::Python => Some("python"),
            Self::Javascript => Some("javascript"),
            Self::Typescript => Some("typescript"),
            Self::C => Some("c"),
            Self::Csharp => Some("c#"),
            Self::Java => Some("java"),
            _ => None,
        }
    }

    /// Rule languages applicable to documents of this language.
    ///
    /// TypeScript documents also run the JavaScript rules.
    pub fn rule_languages(&self) -> &'static [Language] {
        match self {
            Self::Python => &[Self::Python],
            Self::Javascript => &[Self::Javascript],
            Self::Typescript => &[Self::Javascript, Self::Typescript],
            _ => &[],
        }
    }

    /// Line comment leader used when inserting a `codiga-disable` comment.
    pub fn comment_sign(&self) -> &'static str {
        match self {
            Self::Python | Self::Shell | Self::Perl | Self::Yaml => "#",
            Self::Coldfusion => "<!---",
            Self::Haskell => "--",
            Self::Twig => "{#",
            _ => "//",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_for_file() {
        assert_eq!(Language::for_file("/src/main.py"), Language::Python);
        assert_eq!(Language::for_file("app.jsx"), Language::Javascript);
        assert_eq!(Language::for_file("/web/App.TSX"), Language::Typescript);
        assert_eq!(Language::for_file("lib.rs"), Language::Rust);
        assert_eq!(Language::for_file("notes.txt"), Language::Unknown);
        assert_eq!(Language::for_file("Makefile"), Language::Unknown);
    }

    #[test]
    fn test_language_for_dockerfile() {
        assert_eq!(Language::for_file("/project/Dockerfile"), Language::Docker);
        assert_eq!(Language::for_file("docker-compose.yml"), Language::Docker);
        assert_eq!(Language::for_file("build.dockerfile"), Language::Docker);
    }

    #[test]
    fn test_analyzer_support() {
        assert_eq!(Language::Java.analyzer_tag(), Some("java"));
        assert_eq!(Language::Unknown.analyzer_tag(), None);
        assert_eq!(Language::Python.analyzer_tag(), Some("python"));
        assert_eq!(Language::Csharp.analyzer_tag(), Some("c#"));
        assert_eq!(Language::Rust.analyzer_tag(), None);
    }

    #[test]
    fn test_rule_languages() {
        assert_eq!(
            Language::Typescript.rule_languages(),
            &[Language::Javascript, Language::Typescript]
        );
        assert_eq!(Language::Python.rule_languages(), &[Language::Python]);
        assert!(Language::Java.rule_languages().is_empty());
    }

    #[test]
    fn test_comment_sign() {
        assert_eq!(Language::Python.comment_sign(), "#");
        assert_eq!(Language::Typescript.comment_sign(), "//");
        assert_eq!(Language::Haskell.comment_sign(), "--");
        assert_eq!(Language::Coldfusion.comment_sign(), "<!---");
        assert_eq!(Language::Twig.comment_sign(), "{#");
        assert_eq!(Language::Unknown.comment_sign(), "//");
    }
}
