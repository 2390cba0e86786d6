//! # CLI Module
//!
//! Command-line tools for inspecting a pages tree without a renderer.
//! Modules are loaded with [`FileModules`](crate::routes::FileModules), so
//! every page renders as a component named after its file.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print both tables in match-priority order:
//!
//! ```bash
//! rsc-pages --root ./app routes
//! ```
//!
//! ### `resolve`
//!
//! Resolve a URL and print the element tree as JSON:
//!
//! ```bash
//! rsc-pages --root ./app resolve '/blog/hello?ref=home' -H 'accept: text/html' --pretty
//! ```
//!
//! ### `watch`
//!
//! Rebuild the tables whenever the tree changes and log the result:
//!
//! ```bash
//! RSC_PAGES_LOG_LEVEL=debug rsc-pages --config pages.yaml watch
//! ```
//!
//! ## Global options
//!
//! - `--config <FILE>` - YAML or TOML config (also `RSC_PAGES_CONFIG`)
//! - `--root <DIR>` - pages root
//! - `--base-path <PATH>` - URL prefix

mod commands;


pub use commands::{resolve_json, run_cli, Cli, Commands};
