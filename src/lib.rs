//! # rsc-pages
//!
//! **rsc-pages** turns a directory of page, layout and not-found files into a
//! radix-tree router, and resolves incoming requests to element trees where
//! each page is wrapped in its layouts.
//!
//! ## Overview
//!
//! A directory's position in the tree is its URL: `blog/[slug]/page.tsx`
//! serves `/blog/:slug`, `docs/[...path]/page.tsx` serves `/docs/**:path`,
//! and `(marketing)/about/page.tsx` serves `/about` because parenthesised
//! group directories are left out of the URL. A `layout.tsx` wraps every
//! page at or below its directory; a `not-found.tsx` answers every unmatched
//! URL at or below its directory.
//!
//! ## Architecture
//!
//! - **[`config`]** - pages root, base path and file glob patterns
//! - **[`discovery`]** - directory scan producing the discovered files
//! - **[`routes`]** - pattern compiler, layout resolver and table builder
//! - **[`router`]** - lazily indexed radix router with atomic table swaps
//! - **[`resolver`]** - request to element tree, with not-found fallbacks
//! - **[`hot_reload`]** - rebuild tables when the tree changes
//! - **[`otel`]** - tracing subscriber setup
//! - **[`cli`]** - `routes`, `resolve` and `watch` commands
//!
//! ### Request flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Resolver as resolver::PageResolver
//!     participant Pages as router::Router (pages)
//!     participant NotFound as router::Router (not found)
//!     participant Loader as routes::ModuleLoader
//!
//!     Client->>Resolver: resolve_element_for_request(req)
//!     Resolver->>Pages: match_path(path)
//!     alt page matched
//!         Pages-->>Resolver: RouteMatch
//!     else no page
//!         Resolver->>NotFound: match_path(path)
//!     end
//!     Resolver->>Loader: load() page, then each layout
//!     Loader-->>Resolver: Module
//!     Resolver-->>Client: Element (outermost layout first)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rsc_pages::config::PagesConfig;
//! use rsc_pages::discovery::load_route_tables;
//! use rsc_pages::resolver::PageResolver;
//! use rsc_pages::routes::FileModules;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = PagesConfig::from_env()?;
//! let registry = FileModules::new(&config.root);
//! let resolver = PageResolver::from_tables(load_route_tables(&config, &registry)?);
//!
//! let request = http::Request::get("/blog/hello").body(())?;
//! let element = resolver.resolve_element_for_request(&request).await?;
//! println!("{}", serde_json::to_string_pretty(&element)?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod discovery;
pub mod hot_reload;
pub mod otel;
pub mod resolver;
pub mod router;
pub mod routes;

pub use config::{ConfigError, PagesConfig};
pub use resolver::{as_redirect, redirect, Element, PageResolver, Redirect};
pub use router::{RouteMatch, Router};
pub use routes::{build_route_tables, ModuleLoader, ModuleRegistry, RouteEntry, RouteTable};
