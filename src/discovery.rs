//! Scans a pages directory for routing files.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::{FileRole, PagesConfig};
use crate::routes::{build_route_tables, DiscoveredFiles, ModuleRegistry, RouteSource, RouteTables};

/// Walk `config.root` and sort every file into pages, layouts and not-found
/// pages by matching its root-relative path against the configured globs.
///
/// Results are ordered by path so repeated scans of the same tree produce the
/// same tables. Hidden entries and `node_modules` are skipped.
pub fn discover(config: &PagesConfig) -> Result<DiscoveredFiles> {
    let patterns = config.patterns.compile()?;
    let root = config
        .root
        .canonicalize()
        .with_context(|| format!("pages root {} is not accessible", config.root.display()))?;

    let mut files = DiscoveredFiles::default();
    let walker = WalkDir::new(&root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_ignored(e.path()));

    for entry in walker {
        let entry = entry.with_context(|| format!("failed to scan {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(&root) else {
            continue;
        };
        let Some(role) = patterns.classify(relative) else {
            continue;
        };
        let Some(source) = RouteSource::from_file(&root, entry.path()) else {
            continue;
        };
        debug!(file = %source.file.display(), directory = %source.directory, role = ?role, "Discovered routing file");
        match role {
            FileRole::Page => files.pages.push(source),
            FileRole::Layout => files.layouts.push(source),
            FileRole::NotFound => files.not_found.push(source),
        }
    }

    info!(
        root = %root.display(),
        pages = files.pages.len(),
        layouts = files.layouts.len(),
        not_found = files.not_found.len(),
        "Pages discovered"
    );
    Ok(files)
}

/// Discover and build both tables in one step.
pub fn load_route_tables(config: &PagesConfig, registry: &dyn ModuleRegistry) -> Result<RouteTables> {
    let files = discover(config)?;
    Ok(build_route_tables(&files, registry, &config.base_path))
}

fn is_ignored(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with('.') || name == "node_modules")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "export default function () {}").unwrap();
    }

    #[test]
    fn test_discover_sorts_files_by_role() {
        let dir = tempfile::tempdir().unwrap();
        for file in [
            "page.tsx",
            "layout.tsx",
            "not-found.tsx",
            "blog/page.ts",
            "blog/[slug]/page.jsx",
            "blog/styles.css",
            ".cache/page.tsx",
            "node_modules/pkg/page.js",
        ] {
            touch(dir.path(), file);
        }
        let config = PagesConfig {
            root: dir.path().to_path_buf(),
            ..PagesConfig::default()
        };

        let files = discover(&config).unwrap();
        let dirs = |sources: &[RouteSource]| -> Vec<String> {
            sources.iter().map(|s| s.directory.clone()).collect()
        };
        assert_eq!(dirs(&files.pages), vec!["blog/[slug]", "blog", ""]);
        assert_eq!(dirs(&files.layouts), vec![""]);
        assert_eq!(dirs(&files.not_found), vec![""]);
        assert!(files.pages.iter().all(|s| s.file.is_absolute()));
    }

    #[test]
    fn test_path_patterns_select_subtrees() {
        let dir = tempfile::tempdir().unwrap();
        for file in ["page.mdx", "blog/page.mdx", "blog/page.tsx", "docs/intro/page.mdx"] {
            touch(dir.path(), file);
        }
        let mut config = PagesConfig {
            root: dir.path().to_path_buf(),
            ..PagesConfig::default()
        };
        config.patterns.page = vec!["blog/**/page.mdx".into()];

        let files = discover(&config).unwrap();
        let dirs: Vec<&str> = files.pages.iter().map(|s| s.directory.as_str()).collect();
        assert_eq!(dirs, vec!["blog"]);
    }

    #[test]
    fn test_missing_root_is_an_error() {
        let config = PagesConfig {
            root: "/no/such/pages/root".into(),
            ..PagesConfig::default()
        };
        let err = discover(&config).unwrap_err();
        assert!(err.to_string().contains("not accessible"));
    }
}
