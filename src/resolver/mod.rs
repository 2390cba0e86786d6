//! # Resolver Module
//!
//! Turns a request into an element tree ready for rendering.
//!
//! ## Fallback chain
//!
//! Each step runs only when the previous one found nothing:
//!
//! 1. **Page** - match the page router, load the page, wrap it in its layouts
//! 2. **Not found** - match the not-found router, same composition
//! 3. **Built-in** - the generic not-found element, wrapped in the layouts of
//!    whatever the not-found router (then the page router) matches for `/`
//!
//! Layouts are applied innermost first, so the root layout ends up as the
//! outermost element. Every page and layout receives the same
//! [`PageProps`]: params, query parameters, headers and the full URL.
//!
//! ## Errors
//!
//! An unmatched request is never an error. Module load failures, including
//! [`Redirect`] signals, are returned to the caller unchanged.

mod core;
mod element;
mod redirect;

pub use core::{PageResolver, ResolvedBy};
pub use element::{Element, ElementKind, PageProps};
pub use redirect::{as_redirect, is_redirect, redirect, Redirect, DEFAULT_REDIRECT_STATUS};
