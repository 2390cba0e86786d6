//! Directory path → route pattern compilation.
//!
//! | Directory segment | Pattern segment |
//! |-------------------|-----------------|
//! | `blog`            | `blog`          |
//! | `[slug]`          | `:slug`         |
//! | `[...rest]`       | `**:rest`       |
//! | `(marketing)`     | *(dropped)*     |
//!
//! Anything that does not fit the bracket forms exactly is kept as a literal;
//! no validation is performed.

use std::borrow::Cow;

/// How a directory is compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternMode {
    /// Exact pattern for a page
    Page,
    /// Pattern for a not-found file: the directory and everything below it
    Global,
}

/// Compile `dir` (relative to the pages root) into a route pattern under
/// `base_path`.
///
/// ```
/// use rsc_pages::routes::{to_route_pattern, PatternMode};
///
/// assert_eq!(to_route_pattern("/", "", PatternMode::Page), "/");
/// assert_eq!(to_route_pattern("/", "blog/[slug]", PatternMode::Page), "/blog/:slug");
/// assert_eq!(to_route_pattern("/", "(shop)/[...rest]", PatternMode::Page), "/**:rest");
/// assert_eq!(to_route_pattern("/", "admin", PatternMode::Global), "/admin**");
/// assert_eq!(to_route_pattern("/", "", PatternMode::Global), "**");
/// ```
#[must_use]
pub fn to_route_pattern(base_path: &str, dir: &str, mode: PatternMode) -> String {
    let segments: Vec<Cow<'_, str>> = if dir.is_empty() || dir == "." {
        Vec::new()
    } else {
        dir.split('/')
            .filter(|seg| !is_group(seg))
            .map(compile_segment)
            .collect()
    };

    let prefix = if base_path == "/" { "" } else { base_path };
    let mut pattern = String::with_capacity(prefix.len() + dir.len() + 4);
    pattern.push_str(prefix);
    if segments.is_empty() {
        pattern.push('/');
    } else {
        for seg in &segments {
            pattern.push('/');
            pattern.push_str(seg);
        }
    }

    if mode == PatternMode::Global {
        if pattern.ends_with('/') {
            pattern.pop();
        }
        pattern.push_str("**");
    }

    pattern
}

/// `(name)` with a non-empty name.
fn is_group(seg: &str) -> bool {
    seg.len() > 2 && seg.starts_with('(') && seg.ends_with(')')
}

fn compile_segment(seg: &str) -> Cow<'_, str> {
    if let Some(inner) = seg.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        if let Some(name) = inner.strip_prefix("...").filter(|n| !n.is_empty()) {
            return Cow::Owned(format!("**:{name}"));
        }
        if !inner.is_empty() {
            return Cow::Owned(format!(":{inner}"));
        }
    }
    Cow::Borrowed(seg)
}
