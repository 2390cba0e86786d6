//! # Router Module
//!
//! Path matching against a compiled route table.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Indexing a [`RouteTable`](crate::routes::RouteTable) in a radix tree
//! - Matching normalised request paths against it
//! - Extracting `:name` and `**:name` parameters
//! - Swapping in new tables atomically when the pages tree changes
//!
//! ## Architecture
//!
//! 1. **Table**: a build pass hands a sorted table to [`Router::set_routes`].
//!
//! 2. **Index**: the first lookup afterwards builds a [`RouterIndex`] from
//!    the table and caches it for the lifetime of that table.
//!
//! 3. **Matching**: each lookup walks the tree segment by segment, preferring
//!    literal over dynamic over catch-all children.
//!
//! ## Example
//!
//! ```rust
//! use rsc_pages::router::Router;
//! use rsc_pages::routes::{Module, ModuleLoader, RouteEntry, RouteKind, RouteTable};
//!
//! let page = ModuleLoader::ready("app/blog/[slug]/page.tsx", Module::default());
//! let table = RouteTable::new(vec![RouteEntry::new("/blog/:slug", page, Vec::new())]);
//!
//! let router = Router::new(RouteKind::Page);
//! router.set_routes(table);
//!
//! let matched = router.match_path("/blog/hello/").expect("route matches");
//! assert_eq!(matched.get_param("slug"), Some("hello"));
//! ```

mod core;
mod radix;

pub use core::{normalize_path, ParamVec, RouteMatch, Router, LOCAL_ORIGIN, MAX_INLINE_PARAMS};
pub(crate) use core::LOCAL_BASE;
pub use radix::{RouterIndex, ANONYMOUS_WILDCARD_PARAM};
