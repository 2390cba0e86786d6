//! Radix tree index over a route table
//!
//! Patterns are split into `/`-separated segments and inserted into a tree
//! where each node represents one path segment. Lookup walks the request path
//! one segment at a time, so its cost depends on the path, not on the number
//! of routes.
//!
//! ## Segment kinds
//!
//! | Pattern segment | Matches                                           |
//! |-----------------|---------------------------------------------------|
//! | `users`         | exactly `users`                                   |
//! | `:id`           | any single segment, captured as `id`              |
//! | `**:rest`       | one or more remaining segments, captured as `rest` |
//! | `**`            | zero or more remaining segments, captured as `_`  |
//! | `admin**`       | `admin`, then zero or more remaining segments     |
//!
//! A catch-all must be the last segment. A pattern with segments after its
//! catch-all, such as `/docs/**:path/edit`, is left out of the tree and
//! never matches.
//!
//! At every node literal children are tried first, then dynamic children,
//! then the catch-all. A branch that dead-ends is abandoned and the next
//! candidate is tried, so `/users/new` prefers `/users/new` over `/users/:id`
//! but still falls back to `/users/:id/**:rest` shapes when needed.

use std::sync::Arc;
use tracing::warn;

use super::core::ParamVec;
use crate::routes::{RouteEntry, RouteTable};

/// Parameter name used for an anonymous `**` capture.
pub const ANONYMOUS_WILDCARD_PARAM: &str = "_";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Static(&'a str),
    Param(&'a str),
    CatchAll(Option<&'a str>),
}

/// Split a pattern into segment tokens.
fn tokenize(pattern: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for segment in pattern.split('/').filter(|s| !s.is_empty()) {
        push_segment(segment, &mut tokens);
    }
    tokens
}

fn push_segment<'a>(segment: &'a str, tokens: &mut Vec<Token<'a>>) {
    if segment == "**" {
        tokens.push(Token::CatchAll(None));
    } else if let Some(name) = segment.strip_prefix("**:") {
        // `**:rest**` (a not-found file inside a catch-all directory) is the
        // same capture as `**:rest`.
        let name = name.strip_suffix("**").unwrap_or(name);
        tokens.push(Token::CatchAll(Some(name).filter(|n| !n.is_empty())));
    } else if let Some(prefix) = segment.strip_suffix("**") {
        push_segment(prefix, tokens);
        tokens.push(Token::CatchAll(None));
    } else if let Some(name) = segment.strip_prefix(':').filter(|n| !n.is_empty()) {
        tokens.push(Token::Param(name));
    } else {
        tokens.push(Token::Static(segment));
    }
}

#[derive(Debug, Clone)]
struct CatchAll {
    /// `None` for an anonymous `**`, which also matches zero segments
    name: Option<Arc<str>>,
    entry: Arc<RouteEntry>,
}

/// Node in the radix tree
#[derive(Debug, Clone, Default)]
struct RadixNode {
    /// The path segment this node represents (empty for the root and params)
    segment: String,
    /// Route terminating exactly at this node
    entry: Option<Arc<RouteEntry>>,
    /// Parameter name if this node is a `:name` segment
    param_name: Option<Arc<str>>,
    /// Literal children
    children: Vec<RadixNode>,
    /// Dynamic children, one per distinct parameter name at this position
    param_children: Vec<RadixNode>,
    /// Catch-all terminating below this node
    catch_all: Option<CatchAll>,
}

impl RadixNode {
    fn new(segment: &str) -> Self {
        Self {
            segment: segment.to_string(),
            ..Self::default()
        }
    }

    fn new_param(param_name: &str) -> Self {
        Self {
            param_name: Some(Arc::from(param_name)),
            ..Self::default()
        }
    }

    /// Insert a route. A later insert for the same pattern replaces the
    /// earlier one.
    fn insert(&mut self, tokens: &[Token<'_>], entry: Arc<RouteEntry>) {
        let Some((token, remaining)) = tokens.split_first() else {
            self.entry = Some(entry);
            return;
        };

        match *token {
            Token::CatchAll(_) if !remaining.is_empty() => {
                warn!(
                    pattern = %entry.pattern,
                    trailing_segments = remaining.len(),
                    "Catch-all segment is not last, route will never match"
                );
            }
            Token::CatchAll(name) => {
                self.catch_all = Some(CatchAll {
                    name: name.map(Arc::from),
                    entry,
                });
            }
            Token::Param(name) => {
                for param_child in &mut self.param_children {
                    if param_child.param_name.as_deref() == Some(name) {
                        param_child.insert(remaining, entry);
                        return;
                    }
                }
                let mut child = RadixNode::new_param(name);
                child.insert(remaining, entry);
                self.param_children.push(child);
            }
            Token::Static(segment) => {
                for child in &mut self.children {
                    if child.segment == segment {
                        child.insert(remaining, entry);
                        return;
                    }
                }
                let mut child = RadixNode::new(segment);
                child.insert(remaining, entry);
                self.children.push(child);
            }
        }
    }

    /// Search for the route matching `segments`, recording captures in
    /// `params`. Captures pushed by abandoned branches are removed again.
    fn search(&self, segments: &[&str], params: &mut ParamVec) -> Option<Arc<RouteEntry>> {
        let Some((segment, remaining)) = segments.split_first() else {
            if let Some(entry) = &self.entry {
                return Some(Arc::clone(entry));
            }
            return self
                .catch_all
                .as_ref()
                .filter(|c| c.name.is_none())
                .map(|c| Arc::clone(&c.entry));
        };

        for child in &self.children {
            if child.segment == *segment {
                if let Some(entry) = child.search(remaining, params) {
                    return Some(entry);
                }
            }
        }

        for param_child in &self.param_children {
            if let Some(name) = &param_child.param_name {
                params.push((Arc::clone(name), (*segment).to_string()));
                if let Some(entry) = param_child.search(remaining, params) {
                    return Some(entry);
                }
                params.pop();
            }
        }

        if let Some(catch_all) = &self.catch_all {
            let name = catch_all
                .name
                .clone()
                .unwrap_or_else(|| Arc::from(ANONYMOUS_WILDCARD_PARAM));
            params.push((name, segments.join("/")));
            return Some(Arc::clone(&catch_all.entry));
        }

        None
    }
}

/// Immutable lookup index built from one [`RouteTable`].
#[derive(Debug, Clone)]
pub struct RouterIndex {
    root: RadixNode,
    routes: usize,
}

impl RouterIndex {
    /// Build the tree, inserting entries in table order.
    #[must_use]
    pub fn new(table: &RouteTable) -> Self {
        let mut root = RadixNode::new("");
        for entry in table.iter() {
            let tokens = tokenize(&entry.pattern);
            root.insert(&tokens, Arc::clone(entry));
        }
        Self {
            root,
            routes: table.len(),
        }
    }

    /// Number of table entries, duplicates and unmatchable patterns included.
    #[must_use]
    pub fn routes_count(&self) -> usize {
        self.routes
    }

    /// Look up an already normalised path.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<(Arc<RouteEntry>, ParamVec)> {
        let segments: Vec<&str> = path
            .trim_start_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let mut params = ParamVec::new();
        let entry = self.root.search(&segments, &mut params)?;
        Some((entry, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::{Module, ModuleLoader};
    use std::path::Path;

    fn entry(pattern: &str, file: &str) -> RouteEntry {
        RouteEntry::new(pattern, ModuleLoader::ready(file, Module::default()), Vec::new())
    }

    fn index(routes: &[(&str, &str)]) -> RouterIndex {
        let table = RouteTable::new(routes.iter().map(|(p, f)| entry(p, f)).collect());
        RouterIndex::new(&table)
    }

    fn hit(index: &RouterIndex, path: &str) -> Option<(String, Vec<(String, String)>)> {
        index.lookup(path).map(|(entry, params)| {
            (
                entry.page.path().display().to_string(),
                params
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            )
        })
    }

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_tokenize() {
        assert_eq!(tokenize("/"), vec![]);
        assert_eq!(
            tokenize("/blog/:slug"),
            vec![Token::Static("blog"), Token::Param("slug")]
        );
        assert_eq!(tokenize("/**:rest"), vec![Token::CatchAll(Some("rest"))]);
        assert_eq!(tokenize("**"), vec![Token::CatchAll(None)]);
        assert_eq!(
            tokenize("/admin**"),
            vec![Token::Static("admin"), Token::CatchAll(None)]
        );
        assert_eq!(
            tokenize("/blog/:slug**"),
            vec![Token::Static("blog"), Token::Param("slug"), Token::CatchAll(None)]
        );
        assert_eq!(tokenize("/docs/**:rest**"), vec![Token::Static("docs"), Token::CatchAll(Some("rest"))]);
        assert_eq!(tokenize("/:"), vec![Token::Static(":")]);
    }

    #[test]
    fn test_static_and_root() {
        let idx = index(&[("/", "root"), ("/blog", "blog")]);
        assert_eq!(hit(&idx, "/").unwrap().0, "root");
        assert_eq!(hit(&idx, "/blog").unwrap().0, "blog");
        assert!(hit(&idx, "/nope").is_none());
    }

    #[test]
    fn test_param_capture() {
        let idx = index(&[("/blog/:slug", "slug")]);
        assert_eq!(hit(&idx, "/blog/hello"), Some(("slug".into(), params(&[("slug", "hello")]))));
        assert!(hit(&idx, "/blog").is_none());
        assert!(hit(&idx, "/blog/a/b").is_none());
    }

    #[test]
    fn test_literal_beats_dynamic() {
        let idx = index(&[("/users/:id", "dynamic"), ("/users/new", "literal")]);
        assert_eq!(hit(&idx, "/users/new").unwrap().0, "literal");
        assert_eq!(hit(&idx, "/users/42").unwrap().0, "dynamic");
    }

    #[test]
    fn test_dynamic_beats_catch_all() {
        let idx = index(&[("/docs/**:path", "catch"), ("/docs/:page", "page")]);
        assert_eq!(hit(&idx, "/docs/intro"), Some(("page".into(), params(&[("page", "intro")]))));
        assert_eq!(
            hit(&idx, "/docs/a/b/c"),
            Some(("catch".into(), params(&[("path", "a/b/c")])))
        );
    }

    #[test]
    fn test_backtracking_drops_stale_params() {
        let idx = index(&[("/a/:x/edit", "edit"), ("/a/**:rest", "rest")]);
        assert_eq!(
            hit(&idx, "/a/1/view"),
            Some(("rest".into(), params(&[("rest", "1/view")])))
        );
        assert_eq!(hit(&idx, "/a/1/edit"), Some(("edit".into(), params(&[("x", "1")]))));
    }

    #[test]
    fn test_literal_dead_end_falls_back_to_param() {
        let idx = index(&[("/users/new/step", "wizard"), ("/users/:id", "user")]);
        assert_eq!(hit(&idx, "/users/new"), Some(("user".into(), params(&[("id", "new")]))));
    }

    #[test]
    fn test_named_catch_all_requires_a_segment() {
        let idx = index(&[("/blog/**:rest", "rest")]);
        assert!(hit(&idx, "/blog").is_none());
        assert_eq!(hit(&idx, "/blog/x").unwrap().1, params(&[("rest", "x")]));
    }

    #[test]
    fn test_anonymous_wildcard_matches_zero_or_more() {
        let idx = index(&[("/admin**", "admin"), ("**", "root")]);
        assert_eq!(hit(&idx, "/admin"), Some(("admin".into(), vec![])));
        assert_eq!(
            hit(&idx, "/admin/anything/deep"),
            Some(("admin".into(), params(&[("_", "anything/deep")])))
        );
        assert_eq!(hit(&idx, "/adminx").unwrap().0, "root");
        assert_eq!(hit(&idx, "/").unwrap().0, "root");
    }

    #[test]
    fn test_different_param_names_same_position() {
        let idx = index(&[("/users/:user_id/posts", "posts"), ("/users/:id/comments", "comments")]);
        assert_eq!(
            hit(&idx, "/users/1/posts"),
            Some(("posts".into(), params(&[("user_id", "1")])))
        );
        assert_eq!(
            hit(&idx, "/users/2/comments"),
            Some(("comments".into(), params(&[("id", "2")])))
        );
    }

    #[test]
    fn test_duplicate_pattern_last_inserted_wins() {
        let idx = index(&[("/blog", "first"), ("/blog", "second")]);
        assert_eq!(hit(&idx, "/blog").unwrap().0, "second");
        assert_eq!(idx.routes_count(), 2);
    }

    #[test]
    fn test_empty_segments_ignored() {
        let idx = index(&[("/a/b", "ab")]);
        assert_eq!(hit(&idx, "/a//b").unwrap().0, "ab");
        assert_eq!(
            idx.lookup("a/b").map(|(e, _)| e.page.path().to_path_buf()),
            Some(Path::new("ab").to_path_buf())
        );
    }

    #[test]
    fn test_catch_all_before_other_segments_never_matches() {
        let idx = index(&[("/docs/**:path/edit", "edit")]);
        assert!(hit(&idx, "/docs/x").is_none());
        assert!(hit(&idx, "/docs/x/edit").is_none());
        assert!(hit(&idx, "/docs").is_none());
        assert_eq!(idx.routes_count(), 1);
    }

    #[test]
    fn test_unmatchable_catch_all_keeps_sibling_catch_all() {
        let idx = index(&[("/docs/**:path", "docs"), ("/docs/**:path/edit", "edit")]);
        assert_eq!(
            hit(&idx, "/docs/x/edit"),
            Some(("docs".into(), params(&[("path", "x/edit")])))
        );
        assert_eq!(hit(&idx, "/docs/x").unwrap().0, "docs");
    }
}
