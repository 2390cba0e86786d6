//! # Hot Reload Module
//!
//! Rebuilds the route tables when the pages tree changes, without restarting
//! the process.
//!
//! ## Overview
//!
//! [`watch_pages`] watches the pages root recursively. When a routing file
//! or directory is created, removed or renamed, or a routing file is
//! modified, it:
//!
//! 1. **Discovers** the tree again
//! 2. **Builds** fresh page and not-found tables
//! 3. **Swaps** them into the [`PageResolver`]
//! 4. **Notifies** the caller through the reload callback
//!
//! ## Error Handling
//!
//! If discovery fails (for example the root was deleted), the error is logged
//! and the previous tables stay active.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use rsc_pages::config::PagesConfig;
//! use rsc_pages::hot_reload::watch_pages;
//! use rsc_pages::resolver::PageResolver;
//! use rsc_pages::routes::FileModules;
//! use std::sync::Arc;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = PagesConfig::from_env()?;
//! let registry = Arc::new(FileModules::new(&config.root));
//! let resolver = Arc::new(PageResolver::new());
//!
//! let _watcher = watch_pages(config, registry, resolver, |tables| {
//!     println!("reloaded {} pages", tables.pages.len());
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! The watcher stops when the returned value is dropped.

use anyhow::Context;
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::config::{CompiledPatterns, PagesConfig};
use crate::discovery::load_route_tables;
use crate::resolver::PageResolver;
use crate::routes::{ModuleRegistry, RouteTables};

/// Watch `config.root` and swap rebuilt tables into `resolver` on change.
///
/// `on_reload` runs after every successful swap with the new tables.
pub fn watch_pages<F>(
    config: PagesConfig,
    registry: Arc<dyn ModuleRegistry>,
    resolver: Arc<PageResolver>,
    mut on_reload: F,
) -> anyhow::Result<RecommendedWatcher>
where
    F: FnMut(&RouteTables) + Send + 'static,
{
    let patterns = config.patterns.compile()?;
    let root = config.root.clone();
    let roots = watched_roots(&root);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<Event, notify::Error>| match res {
            Ok(event) => {
                if !needs_rebuild(&event, &roots, &patterns) {
                    return;
                }
                debug!(kind = ?event.kind, paths = ?event.paths, "Pages tree changed");
                match load_route_tables(&config, registry.as_ref()) {
                    Ok(tables) => {
                        info!(
                            pages = tables.pages.len(),
                            not_found = tables.not_found.len(),
                            "hot-reload: applying route updates"
                        );
                        resolver.set_tables(tables.clone());
                        on_reload(&tables);
                    }
                    Err(e) => {
                        error!(error = %format!("{e:#}"), "hot-reload: rebuild failed, keeping previous routes");
                    }
                }
            }
            Err(e) => warn!(error = %e, "hot-reload: watch error"),
        },
        Config::default(),
    )
    .context("failed to create file watcher")?;

    watcher
        .watch(&root, RecursiveMode::Recursive)
        .with_context(|| format!("failed to watch {}", root.display()))?;
    info!(root = %root.display(), "Watching pages tree");
    Ok(watcher)
}

/// The root as configured plus its canonical form, since watchers may report
/// either.
fn watched_roots(root: &Path) -> Vec<PathBuf> {
    let mut roots = vec![root.to_path_buf()];
    if let Ok(canonical) = root.canonicalize() {
        if canonical != root {
            roots.push(canonical);
        }
    }
    roots
}

/// Whether `event` can change the route tables.
///
/// Creations, removals and renames can add or drop whole directories, so
/// they always count. Other modifications only count for routing files.
pub(crate) fn needs_rebuild(event: &Event, roots: &[PathBuf], patterns: &CompiledPatterns) -> bool {
    match event.kind {
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_)) => {
            true
        }
        EventKind::Modify(_) => event.paths.iter().any(|path| {
            roots
                .iter()
                .find_map(|root| path.strip_prefix(root).ok())
                .is_some_and(|relative| patterns.classify(relative).is_some())
        }),
        _ => false,
    }
}
