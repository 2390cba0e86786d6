use anyhow::Context;
use http::{HeaderMap, Request};
use std::collections::BTreeMap;
use tracing::{debug, warn};
use url::Url;

use super::element::{Element, PageProps};
use crate::router::{Router, LOCAL_BASE, LOCAL_ORIGIN};
use crate::routes::module::PAGE_EXPORT;
use crate::routes::{ModuleLoader, RouteKind, RouteTable, RouteTables};

/// Which fallback tier produced an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBy {
    /// A page route matched
    Page,
    /// A not-found route matched
    NotFound,
    /// Nothing matched; the built-in not-found element was used
    BuiltinNotFound,
}

/// Resolves requests to composed element trees.
///
/// Holds the page router and the not-found router. Both are updated
/// independently by the build pass and read concurrently by requests.
#[derive(Debug)]
pub struct PageResolver {
    pages: Router,
    not_found: Router,
}

impl Default for PageResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PageResolver {
    #[must_use]
    pub fn new() -> Self {
        Self {
            pages: Router::new(RouteKind::Page),
            not_found: Router::new(RouteKind::NotFound),
        }
    }

    #[must_use]
    pub fn from_tables(tables: RouteTables) -> Self {
        Self {
            pages: Router::with_routes(RouteKind::Page, tables.pages),
            not_found: Router::with_routes(RouteKind::NotFound, tables.not_found),
        }
    }

    #[must_use]
    pub fn pages(&self) -> &Router {
        &self.pages
    }

    #[must_use]
    pub fn not_found(&self) -> &Router {
        &self.not_found
    }

    pub fn set_page_routes(&self, table: RouteTable) {
        self.pages.set_routes(table);
    }

    pub fn set_not_found_routes(&self, table: RouteTable) {
        self.not_found.set_routes(table);
    }

    /// Replace both tables. Each router swaps independently.
    pub fn set_tables(&self, tables: RouteTables) {
        self.set_page_routes(tables.pages);
        self.set_not_found_routes(tables.not_found);
    }

    /// Resolve `request` to an element tree.
    ///
    /// Always produces an element: a matched page, else a matched not-found
    /// page, else the built-in not-found element. Errors come only from
    /// module loaders and are returned unmodified (see
    /// [`as_redirect`](super::as_redirect)).
    pub async fn resolve_element_for_request<B>(
        &self,
        request: &Request<B>,
    ) -> anyhow::Result<Element> {
        let uri = request.uri().to_string();
        let (element, _) = self.resolve(&uri, request.headers()).await?;
        Ok(element)
    }

    /// Resolve a raw URL (path, path + query, or absolute URL) with headers,
    /// also reporting which tier answered.
    pub async fn resolve(
        &self,
        raw_url: &str,
        headers: &HeaderMap,
    ) -> anyhow::Result<(Element, ResolvedBy)> {
        let url = request_url(raw_url)?;
        let base_props = PageProps {
            params: BTreeMap::new(),
            search_params: url.query_pairs().into_owned().collect(),
            headers: header_map(headers),
            url: url.to_string(),
        };

        if let Some(matched) = self.pages.match_path(url.path()) {
            debug!(url = %url, route_pattern = %matched.entry.pattern, "Resolved by page route");
            let props = PageProps {
                params: matched.params_map(),
                ..base_props
            };
            let element = compose(&matched.entry.page, &matched.entry.layouts, props, true).await?;
            return Ok((element, ResolvedBy::Page));
        }

        if let Some(matched) = self.not_found.match_path(url.path()) {
            debug!(url = %url, route_pattern = %matched.entry.pattern, "Resolved by not-found route");
            let props = PageProps {
                params: matched.params_map(),
                ..base_props
            };
            let element =
                compose(&matched.entry.page, &matched.entry.layouts, props, false).await?;
            return Ok((element, ResolvedBy::NotFound));
        }

        let layouts = self
            .not_found
            .match_path("/")
            .or_else(|| self.pages.match_path("/"))
            .map(|m| m.entry.layouts.clone())
            .unwrap_or_default();
        debug!(url = %url, layouts = layouts.len(), "Resolved by built-in not-found element");
        let element = insert_layouts(Element::not_found(), &layouts, &base_props).await?;
        Ok((element, ResolvedBy::BuiltinNotFound))
    }
}

/// Load the page and wrap it in its layouts. Pages without a default export
/// fall back to their `Page` export; not-found pages only use the default.
async fn compose(
    page: &ModuleLoader,
    layouts: &[ModuleLoader],
    props: PageProps,
    allow_named_page: bool,
) -> anyhow::Result<Element> {
    let module = page.load().await?;
    let component = module.default.as_ref().or_else(|| {
        if allow_named_page {
            module.export(PAGE_EXPORT)
        } else {
            None
        }
    });
    let element = Element::from_component(component, props.clone());
    insert_layouts(element, layouts, &props).await
}

/// Wrap `element` in `layouts`, innermost first, loading one layout at a time.
async fn insert_layouts(
    mut element: Element,
    layouts: &[ModuleLoader],
    props: &PageProps,
) -> anyhow::Result<Element> {
    for layout in layouts.iter().rev() {
        let module = layout.load().await?;
        element = element.wrap_in(module.default.as_ref(), props.clone());
    }
    Ok(element)
}

fn request_url(raw: &str) -> anyhow::Result<Url> {
    let base = LOCAL_BASE
        .as_ref()
        .with_context(|| format!("local origin {LOCAL_ORIGIN} is not an absolute URL"))?;
    match base.join(raw) {
        Ok(url) => Ok(url),
        Err(e) => {
            warn!(url = %raw, error = %e, "Unparseable request URL, resolving as root");
            Ok(base.clone())
        }
    }
}

/// Header names are already lowercase. Repeated headers are joined with
/// `", "` in arrival order.
fn header_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .keys()
        .map(|name| {
            let joined = headers
                .get_all(name)
                .iter()
                .map(|value| String::from_utf8_lossy(value.as_bytes()))
                .collect::<Vec<_>>()
                .join(", ");
            (name.as_str().to_string(), joined)
        })
        .collect()
}
