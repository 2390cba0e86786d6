//! # Routes Module
//!
//! Turns discovered files into route tables.
//!
//! ## Overview
//!
//! A pages tree such as
//!
//! ```text
//! app/
//! ├── layout.tsx
//! ├── page.tsx
//! ├── not-found.tsx
//! ├── (marketing)/about/page.tsx
//! └── blog/
//!     ├── layout.tsx
//!     ├── page.tsx
//!     └── [slug]/page.tsx
//! ```
//!
//! is compiled into two tables:
//!
//! | Kind      | Pattern       | Layouts                          |
//! |-----------|---------------|----------------------------------|
//! | page      | `/blog/:slug` | `layout.tsx`, `blog/layout.tsx`  |
//! | page      | `/about`      | `layout.tsx`                     |
//! | page      | `/blog`       | `layout.tsx`, `blog/layout.tsx`  |
//! | page      | `/`           | `layout.tsx`                     |
//! | not found | `**`          | `layout.tsx`                     |
//!
//! - [`pattern`] compiles a directory into a pattern
//! - [`layout`] resolves the root-first layout chain of a directory
//! - `table` assembles and sorts the tables
//! - [`module`] is the seam to whatever actually loads page modules

pub mod layout;
pub mod module;
pub mod pattern;
mod table;
mod types;

pub use layout::LayoutMap;
pub use module::{Component, FileModules, Module, ModuleLoader, ModuleRegistry, StaticModules};
pub use pattern::{to_route_pattern, PatternMode};
pub use table::build_route_tables;
pub use types::{DiscoveredFiles, RouteEntry, RouteKind, RouteSource, RouteTable, RouteTables};
