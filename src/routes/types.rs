use super::module::ModuleLoader;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

/// One discovered page, layout or not-found file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSource {
    /// Directory relative to the pages root, `/`-separated, `""` for the root
    pub directory: String,
    /// Absolute path of the file
    pub file: PathBuf,
}

impl RouteSource {
    pub fn new(directory: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        let directory = directory.into();
        let directory = if directory == "." { String::new() } else { directory };
        Self {
            directory,
            file: file.into(),
        }
    }

    /// Build a source for `file` located somewhere below `root`.
    ///
    /// Returns `None` when `file` is not inside `root`.
    pub fn from_file(root: &Path, file: &Path) -> Option<Self> {
        let relative = file.strip_prefix(root).ok()?;
        let directory = relative
            .parent()
            .map(posix_directory)
            .unwrap_or_default();
        Some(Self {
            directory,
            file: file.to_path_buf(),
        })
    }
}

/// Join the normal components of a relative directory with `/`.
pub(crate) fn posix_directory(dir: &Path) -> String {
    dir.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// The kind of table a route belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    Page,
    NotFound,
}

impl RouteKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Page => "page",
            RouteKind::NotFound => "not_found",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A compiled route: pattern, page loader and root-first layout chain.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    pub pattern: String,
    pub page: ModuleLoader,
    pub layouts: Vec<ModuleLoader>,
}

impl RouteEntry {
    pub fn new(pattern: impl Into<String>, page: ModuleLoader, layouts: Vec<ModuleLoader>) -> Self {
        Self {
            pattern: pattern.into(),
            page,
            layouts,
        }
    }
}

/// Route entries of one kind, ordered by descending pattern length.
///
/// The order is also the index insertion order, so among entries sharing a
/// pattern the one appearing last wins.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<Arc<RouteEntry>>,
}

impl RouteTable {
    /// Build a table, sorting `entries` by descending pattern length.
    ///
    /// The sort is stable: entries of equal length keep their relative order.
    pub fn new(entries: Vec<RouteEntry>) -> Self {
        let mut entries: Vec<Arc<RouteEntry>> = entries.into_iter().map(Arc::new).collect();
        entries.sort_by(|a, b| b.pattern.len().cmp(&a.pattern.len()));
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<RouteEntry>> {
        self.entries.iter()
    }

    /// Patterns in table order.
    #[must_use]
    pub fn patterns(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.pattern.as_str()).collect()
    }
}

/// Files found by one discovery pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredFiles {
    pub pages: Vec<RouteSource>,
    pub layouts: Vec<RouteSource>,
    pub not_found: Vec<RouteSource>,
}

/// Both tables produced by one build pass.
#[derive(Debug, Clone, Default)]
pub struct RouteTables {
    pub pages: RouteTable,
    pub not_found: RouteTable,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::module::Module;

    fn entry(pattern: &str, file: &str) -> RouteEntry {
        RouteEntry::new(pattern, ModuleLoader::ready(file, Module::default()), Vec::new())
    }

    #[test]
    fn test_table_sorted_by_descending_length_and_stable() {
        let table = RouteTable::new(vec![
            entry("/", "root"),
            entry("/a/:b", "first"),
            entry("/blog", "blog"),
            entry("/a/:b", "second"),
        ]);
        assert_eq!(table.patterns(), vec!["/a/:b", "/a/:b", "/blog", "/"]);
        let files: Vec<_> = table.iter().map(|e| e.page.path().to_path_buf()).collect();
        assert_eq!(files[0], PathBuf::from("first"));
        assert_eq!(files[1], PathBuf::from("second"));
    }

    #[test]
    fn test_route_source_from_file() {
        let root = Path::new("/srv/app");
        let src = RouteSource::from_file(root, Path::new("/srv/app/blog/[slug]/page.tsx")).unwrap();
        assert_eq!(src.directory, "blog/[slug]");

        let src = RouteSource::from_file(root, Path::new("/srv/app/page.tsx")).unwrap();
        assert_eq!(src.directory, "");

        assert!(RouteSource::from_file(root, Path::new("/elsewhere/page.tsx")).is_none());
    }

    #[test]
    fn test_route_source_dot_directory_is_root() {
        assert_eq!(RouteSource::new(".", "/app/page.tsx").directory, "");
    }
}
