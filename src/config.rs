//! # Configuration Module
//!
//! Where the pages tree lives, which URL prefix it is served under and
//! which file names count as pages, layouts and not-found pages.
//!
//! ## Sources
//!
//! 1. Defaults ([`PagesConfig::default`])
//! 2. An optional YAML (`.yaml`/`.yml`) or TOML (`.toml`) file
//! 3. Environment overrides: `RSC_PAGES_ROOT`, `RSC_PAGES_BASE_PATH`
//!
//! ## Example
//!
//! ```yaml
//! root: ./app
//! base_path: /docs
//! patterns:
//!   page: ["**/page.{tsx,mdx}"]
//! ```
//!
//! Pattern lists are globs matched against the path of a file relative to
//! the root, with `/` separators: `*` and `?` stay within one segment, `**`
//! spans directories and `{ts,tsx}` picks any of the listed alternatives.
//! A pattern without a `/` matches the file name at any depth, so `page.mdx`
//! is read as `**/page.mdx`. A leading `./` or `/` anchors a pattern to the
//! root.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions recognised by the default file patterns.
pub const DEFAULT_EXTENSIONS: [&str; 4] = ["js", "jsx", "ts", "tsx"];

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid TOML in {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("unsupported config format for {} (expected .yaml, .yml or .toml)", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("invalid {kind} file pattern `{pattern}`: {reason}")]
    Pattern {
        kind: &'static str,
        pattern: String,
        reason: String,
    },
    #[error("base path must start with `/`, got `{0}`")]
    BasePath(String),
}

fn default_patterns(stem: &str) -> Vec<String> {
    vec![format!("**/{stem}.{{{}}}", DEFAULT_EXTENSIONS.join(","))]
}

fn default_page() -> Vec<String> {
    default_patterns("page")
}

fn default_layout() -> Vec<String> {
    default_patterns("layout")
}

fn default_not_found() -> Vec<String> {
    default_patterns("not-found")
}

fn default_root() -> PathBuf {
    PathBuf::from("./app")
}

fn default_base_path() -> String {
    "/".to_string()
}

/// Glob patterns for each kind of routing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePatterns {
    #[serde(default = "default_page")]
    pub page: Vec<String>,
    #[serde(default = "default_layout")]
    pub layout: Vec<String>,
    #[serde(default = "default_not_found")]
    pub not_found: Vec<String>,
}

impl Default for FilePatterns {
    fn default() -> Self {
        Self {
            page: default_page(),
            layout: default_layout(),
            not_found: default_not_found(),
        }
    }
}

/// Which routing file a path denotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRole {
    Page,
    Layout,
    NotFound,
}

/// [`FilePatterns`] compiled for matching.
#[derive(Debug, Clone)]
pub struct CompiledPatterns {
    page: GlobSet,
    layout: GlobSet,
    not_found: GlobSet,
}

impl CompiledPatterns {
    /// Role of the file at `relative` (a path under the pages root), if any.
    /// Pages are checked first, then layouts, then not-found pages.
    #[must_use]
    pub fn classify(&self, relative: &Path) -> Option<FileRole> {
        if self.page.is_match(relative) {
            Some(FileRole::Page)
        } else if self.layout.is_match(relative) {
            Some(FileRole::Layout)
        } else if self.not_found.is_match(relative) {
            Some(FileRole::NotFound)
        } else {
            None
        }
    }
}

impl FilePatterns {
    /// Compile every pattern.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Pattern`] for the first malformed pattern.
    pub fn compile(&self) -> Result<CompiledPatterns, ConfigError> {
        Ok(CompiledPatterns {
            page: compile_set("page", &self.page)?,
            layout: compile_set("layout", &self.layout)?,
            not_found: compile_set("not-found", &self.not_found)?,
        })
    }
}

fn compile_set(kind: &'static str, raw: &[String]) -> Result<GlobSet, ConfigError> {
    let invalid = |pattern: &str, reason: String| ConfigError::Pattern {
        kind,
        pattern: pattern.to_string(),
        reason,
    };
    let mut builder = GlobSetBuilder::new();
    for pattern in raw {
        let glob = GlobBuilder::new(&expand_pattern(pattern))
            .literal_separator(true)
            .build()
            .map_err(|e| invalid(pattern, e.kind().to_string()))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| invalid(&raw.join(", "), e.to_string()))
}

/// Root-relative form of a pattern. A leading `./` or `/` anchors it to the
/// root; otherwise a bare file-name pattern gains a `**/` prefix.
fn expand_pattern(pattern: &str) -> String {
    if let Some(anchored) = pattern
        .strip_prefix("./")
        .or_else(|| pattern.strip_prefix('/'))
    {
        anchored.to_string()
    } else if pattern.contains('/') {
        pattern.to_string()
    } else {
        format!("**/{pattern}")
    }
}

/// Pages configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagesConfig {
    /// Root directory of the pages tree
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// URL prefix every route is served under
    #[serde(default = "default_base_path")]
    pub base_path: String,
    #[serde(default)]
    pub patterns: FilePatterns,
}

impl Default for PagesConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            base_path: default_base_path(),
            patterns: FilePatterns::default(),
        }
    }
}

impl PagesConfig {
    /// Load a config file, choosing the parser by extension.
    ///
    /// Environment overrides are not applied; see [`PagesConfig::with_env`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let config: Self = match extension.as_deref() {
            Some("yaml" | "yml") => {
                serde_yaml::from_str(&contents).map_err(|source| ConfigError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            Some("toml") => toml::from_str(&contents).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            })?,
            _ => return Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::default().with_env()
    }

    /// Apply `RSC_PAGES_ROOT` and `RSC_PAGES_BASE_PATH`.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|key| env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        if let Some(root) = lookup("RSC_PAGES_ROOT") {
            self.root = PathBuf::from(root);
        }
        if let Some(base_path) = lookup("RSC_PAGES_BASE_PATH") {
            self.base_path = base_path;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check the base path shape and that every file pattern compiles.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_path.starts_with('/') {
            return Err(ConfigError::BasePath(self.base_path.clone()));
        }
        self.patterns.compile()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn write_config(name: &str, contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn test_defaults() {
        let config = PagesConfig::default();
        assert_eq!(config.root, PathBuf::from("./app"));
        assert_eq!(config.base_path, "/");
        assert_eq!(config.patterns.page, vec!["**/page.{js,jsx,ts,tsx}"]);
        assert_eq!(config.patterns.not_found, vec!["**/not-found.{js,jsx,ts,tsx}"]);
    }

    #[test]
    fn test_load_yaml_partial() {
        let (_dir, path) = write_config(
            "pages.yaml",
            "root: ./src/app\nbase_path: /docs\npatterns:\n  page: [\"**/page.mdx\"]\n",
        );
        let config = PagesConfig::load(&path).unwrap();
        assert_eq!(config.root, PathBuf::from("./src/app"));
        assert_eq!(config.base_path, "/docs");
        assert_eq!(config.patterns.page, vec!["**/page.mdx"]);
        assert_eq!(config.patterns.layout, default_layout());
    }

    #[test]
    fn test_load_toml() {
        let (_dir, path) = write_config("pages.toml", "base_path = \"/shop\"\n");
        let config = PagesConfig::load(&path).unwrap();
        assert_eq!(config.base_path, "/shop");
        assert_eq!(config.root, default_root());
    }

    #[test]
    fn test_load_rejects_unknown_extension() {
        let (_dir, path) = write_config("pages.json", "{}");
        assert!(matches!(
            PagesConfig::load(&path),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = PagesConfig::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let (_dir, path) = write_config("pages.yaml", "patterns:\n  layout: [\"layout.{tsx\"]\n");
        let err = PagesConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Pattern { kind: "layout", .. }));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> =
            [("RSC_PAGES_ROOT", "/srv/pages"), ("RSC_PAGES_BASE_PATH", "/base")]
                .into_iter()
                .collect();
        let config = PagesConfig::default()
            .with_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.root, PathBuf::from("/srv/pages"));
        assert_eq!(config.base_path, "/base");
    }

    #[test]
    fn test_relative_base_path_rejected() {
        let err = PagesConfig::default()
            .with_overrides(|k| (k == "RSC_PAGES_BASE_PATH").then(|| "docs".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::BasePath(_)));
    }

    #[test]
    fn test_classify() {
        let compiled = FilePatterns::default().compile().unwrap();
        let role = |p: &str| compiled.classify(Path::new(p));
        assert_eq!(role("page.tsx"), Some(FileRole::Page));
        assert_eq!(role("blog/[slug]/page.jsx"), Some(FileRole::Page));
        assert_eq!(role("layout.js"), Some(FileRole::Layout));
        assert_eq!(role("admin/not-found.ts"), Some(FileRole::NotFound));
        assert_eq!(role("page.css"), None);
        assert_eq!(role("blog/mypage.tsx"), None);
    }

    #[test]
    fn test_path_globs() {
        let patterns = FilePatterns {
            page: vec!["**/page.mdx".into(), "docs/*.md".into()],
            layout: vec!["**/_layout.t?x".into()],
            not_found: vec!["./404.tsx".into()],
        }
        .compile()
        .unwrap();
        let role = |p: &str| patterns.classify(Path::new(p));
        assert_eq!(role("page.mdx"), Some(FileRole::Page));
        assert_eq!(role("blog/post/page.mdx"), Some(FileRole::Page));
        assert_eq!(role("docs/intro.md"), Some(FileRole::Page));
        assert_eq!(role("docs/guide/intro.md"), None);
        assert_eq!(role("blog/_layout.tsx"), Some(FileRole::Layout));
        assert_eq!(role("_layout.ts"), None);
        assert_eq!(role("404.tsx"), Some(FileRole::NotFound));
        assert_eq!(role("shop/404.tsx"), None);
    }

    #[test]
    fn test_bare_file_names_match_at_any_depth() {
        let patterns = FilePatterns {
            page: vec!["index.{md,mdx}".into()],
            ..FilePatterns::default()
        }
        .compile()
        .unwrap();
        assert_eq!(patterns.classify(Path::new("index.md")), Some(FileRole::Page));
        assert_eq!(
            patterns.classify(Path::new("guide/setup/index.mdx")),
            Some(FileRole::Page)
        );
        assert_eq!(patterns.classify(Path::new("guide/index.m")), None);
    }

    #[test]
    fn test_malformed_globs_rejected() {
        for bad in ["page.{ts", "[page.ts", "docs/page.{md"] {
            let patterns = FilePatterns {
                page: vec![bad.into()],
                ..FilePatterns::default()
            };
            assert!(
                matches!(patterns.compile(), Err(ConfigError::Pattern { kind: "page", .. })),
                "{bad} should be rejected"
            );
        }
    }
}
