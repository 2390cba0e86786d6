use serde::Serialize;
use std::collections::BTreeMap;

use crate::routes::Component;

/// Props handed to pages and layouts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageProps {
    /// Route parameters captured by the match
    pub params: BTreeMap<String, String>,
    /// Query string, last value wins for repeated keys
    pub search_params: BTreeMap<String, String>,
    /// Request headers, lowercase names
    pub headers: BTreeMap<String, String>,
    /// Full request URL resolved against the local origin
    pub url: String,
}

/// What an element renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ElementKind {
    /// A component exported by a page or layout module
    Component { name: String },
    /// Stand-in for a module without a usable export; renders its children only
    Fragment,
    /// The built-in "page could not be found" component
    NotFound,
}

/// In-memory element tree handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub kind: ElementKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<PageProps>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Element>,
}

impl Element {
    /// Element for `component`, or an empty fragment when the module had no
    /// usable export.
    pub fn from_component(component: Option<&Component>, props: PageProps) -> Self {
        let kind = match component {
            Some(c) => ElementKind::Component {
                name: c.name().to_string(),
            },
            None => ElementKind::Fragment,
        };
        Self {
            kind,
            props: Some(props),
            children: Vec::new(),
        }
    }

    /// The built-in not-found element. It takes no props.
    #[must_use]
    pub fn not_found() -> Self {
        Self {
            kind: ElementKind::NotFound,
            props: None,
            children: Vec::new(),
        }
    }

    /// Wrap `self` as the only child of a layout element.
    #[must_use]
    pub fn wrap_in(self, layout: Option<&Component>, props: PageProps) -> Self {
        let mut wrapper = Self::from_component(layout, props);
        wrapper.children.push(self);
        wrapper
    }

    /// Component name, if this element renders a component.
    #[must_use]
    pub fn component_name(&self) -> Option<&str> {
        match &self.kind {
            ElementKind::Component { name } => Some(name.as_str()),
            _ => None,
        }
    }

    /// Kinds from this element down through first children, outermost first.
    #[must_use]
    pub fn nesting(&self) -> Vec<&ElementKind> {
        let mut kinds = vec![&self.kind];
        let mut current = self;
        while let Some(child) = current.children.first() {
            kinds.push(&child.kind);
            current = child;
        }
        kinds
    }

    /// Innermost element along the first-child chain.
    #[must_use]
    pub fn innermost(&self) -> &Element {
        let mut current = self;
        while let Some(child) = current.children.first() {
            current = child;
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_nesting() {
        let page = Element::from_component(Some(&Component::new("Page")), PageProps::default());
        let tree = page
            .wrap_in(Some(&Component::new("Inner")), PageProps::default())
            .wrap_in(None, PageProps::default());
        assert_eq!(
            tree.nesting(),
            vec![
                &ElementKind::Fragment,
                &ElementKind::Component { name: "Inner".into() },
                &ElementKind::Component { name: "Page".into() },
            ]
        );
        assert_eq!(tree.innermost().component_name(), Some("Page"));
    }

    #[test]
    fn test_serialize_shape() {
        let tree = Element::not_found().wrap_in(Some(&Component::new("Root")), PageProps::default());
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["kind"]["type"], "component");
        assert_eq!(json["kind"]["name"], "Root");
        assert_eq!(json["children"][0]["kind"]["type"], "not_found");
        assert!(json["children"][0].get("props").is_none());
    }
}
