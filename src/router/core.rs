//! Router core module - hot path for request routing.
//!
//! A [`Router`] owns the active [`RouteTable`] of one kind together with the
//! lazily built [`RouterIndex`] for it. Both live in one immutable
//! `TableVersion` held behind an [`ArcSwap`]:
//!
//! - lookups load the current version without locking and build its index
//!   on first use (exactly once per version, racing callers wait for the
//!   first builder);
//! - [`Router::set_routes`] swaps in a fresh version, which drops the old
//!   index once in-flight lookups release it.
//!
//! A lookup therefore always sees one complete table, old or new.

#![deny(clippy::inefficient_to_string)]
#![deny(clippy::format_push_string)]
#![deny(clippy::unnecessary_to_owned)]

use arc_swap::ArcSwap;
use once_cell::sync::{Lazy, OnceCell};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

use super::radix::RouterIndex;
use crate::routes::{RouteEntry, RouteKind, RouteTable};

/// Synthetic origin request paths are resolved against.
pub const LOCAL_ORIGIN: &str = "http://rsc.local";

/// [`LOCAL_ORIGIN`] parsed once. `None` only if the constant is not an
/// absolute URL.
pub(crate) static LOCAL_BASE: Lazy<Option<Url>> = Lazy::new(|| Url::parse(LOCAL_ORIGIN).ok());

/// Maximum number of path parameters before heap allocation.
pub const MAX_INLINE_PARAMS: usize = 8;

/// Captured parameters in path order.
///
/// Param names are shared with the route tree (`Arc<str>`); values are owned
/// per request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

const SLOW_MATCH: Duration = Duration::from_millis(1);

/// Result of successfully matching a path.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The matched entry, shared with the table
    pub entry: Arc<RouteEntry>,
    /// Captured parameters in path order
    pub params: ParamVec,
}

impl RouteMatch {
    /// Get a parameter by name. Last occurrence wins.
    #[inline]
    #[must_use]
    pub fn get_param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parameters as an owned map. Allocates.
    #[must_use]
    pub fn params_map(&self) -> BTreeMap<String, String> {
        self.params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// One generation of routes; never mutated after creation apart from the
/// one-time index initialisation.
struct TableVersion {
    table: RouteTable,
    index: OnceCell<RouterIndex>,
}

impl TableVersion {
    fn new(table: RouteTable) -> Self {
        Self {
            table,
            index: OnceCell::new(),
        }
    }

    fn index(&self, kind: RouteKind) -> &RouterIndex {
        self.index.get_or_init(|| {
            let started = Instant::now();
            let index = RouterIndex::new(&self.table);
            debug!(
                kind = %kind,
                routes_count = index.routes_count(),
                duration_us = started.elapsed().as_micros(),
                "Router index built"
            );
            index
        })
    }
}

/// Matches request paths against one route table.
pub struct Router {
    kind: RouteKind,
    current: ArcSwap<TableVersion>,
}

impl Router {
    /// Create a router with an empty table.
    #[must_use]
    pub fn new(kind: RouteKind) -> Self {
        Self::with_routes(kind, RouteTable::default())
    }

    /// Create a router serving `table`.
    #[must_use]
    pub fn with_routes(kind: RouteKind, table: RouteTable) -> Self {
        Self {
            kind,
            current: ArcSwap::from_pointee(TableVersion::new(table)),
        }
    }

    #[must_use]
    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    /// Replace the active table. The index is rebuilt on the next lookup.
    pub fn set_routes(&self, table: RouteTable) {
        let patterns: Vec<&str> = table.patterns().into_iter().take(10).collect();
        info!(
            kind = %self.kind,
            routes_count = table.len(),
            routes_summary = ?patterns,
            "Routing table replaced"
        );
        self.current.store(Arc::new(TableVersion::new(table)));
    }

    /// Snapshot of the active table.
    #[must_use]
    pub fn routes(&self) -> RouteTable {
        self.current.load().table.clone()
    }

    /// Whether the active table's index has been built yet.
    #[must_use]
    pub fn is_index_built(&self) -> bool {
        self.current.load().index.get().is_some()
    }

    /// Print the active table to stdout, in match-priority order.
    pub fn dump_routes(&self) {
        let version = self.current.load();
        println!("[routes] kind={} count={}", self.kind, version.table.len());
        for entry in version.table.iter() {
            println!(
                "[route] {} -> {} (layouts: {})",
                entry.pattern,
                entry.page.path().display(),
                entry.layouts.len()
            );
        }
    }

    /// Match `path` against the active table.
    ///
    /// `path` may be relative, absolute or a full URL; it is normalised with
    /// [`normalize_path`] first.
    ///
    /// # Returns
    ///
    /// * `Some(RouteMatch)` - the entry reached and its captured params
    /// * `None` - no branch of the tree leads to an entry
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<RouteMatch> {
        let normalized = normalize_path(path);
        debug!(kind = %self.kind, path = %path, normalized = %normalized, "Route match attempt");

        let match_start = Instant::now();
        let version = self.current.load();
        let result = version.index(self.kind).lookup(&normalized);
        let match_duration = match_start.elapsed();

        match result {
            Some((entry, params)) => {
                if match_duration > SLOW_MATCH {
                    warn!(
                        kind = %self.kind,
                        path = %normalized,
                        route_pattern = %entry.pattern,
                        duration_us = match_duration.as_micros(),
                        "Slow route matching detected"
                    );
                } else {
                    debug!(
                        kind = %self.kind,
                        path = %normalized,
                        route_pattern = %entry.pattern,
                        path_params = ?params,
                        duration_us = match_duration.as_micros(),
                        "Route matched"
                    );
                }
                Some(RouteMatch { entry, params })
            }
            None => {
                debug!(
                    kind = %self.kind,
                    path = %normalized,
                    duration_us = match_duration.as_micros(),
                    "No route matched"
                );
                None
            }
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let version = self.current.load();
        f.debug_struct("Router")
            .field("kind", &self.kind)
            .field("routes", &version.table.len())
            .field("index_built", &version.index.get().is_some())
            .finish()
    }
}

/// Normalise a request path for matching.
///
/// Resolves against [`LOCAL_ORIGIN`] (so `blog`, `/blog?x=1` and
/// `http://host/blog` all become `/blog`), then strips one trailing `/`
/// unless the result is the root. Paths that cannot be resolved are used as
/// given.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let mut pathname = match LOCAL_BASE.as_ref().and_then(|base| base.join(path).ok()) {
        Some(url) => url.path().to_string(),
        None => path.to_string(),
    };
    if pathname.len() > 1 && pathname.ends_with('/') {
        pathname.pop();
    }
    if pathname.is_empty() {
        pathname.push('/');
    }
    pathname
}
