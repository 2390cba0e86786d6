use std::collections::HashMap;

/// Directory → layout registry, one layout per exact directory key.
///
/// Keys are `/`-separated directories relative to the pages root with `""`
/// for the root (`"."` is accepted and stored as `""`).
#[derive(Debug, Clone)]
pub struct LayoutMap<T> {
    layouts: HashMap<String, T>,
}

impl<T> Default for LayoutMap<T> {
    fn default() -> Self {
        Self {
            layouts: HashMap::new(),
        }
    }
}

impl<T: Clone> LayoutMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `layout` for `directory`.
    ///
    /// A second registration for the same directory replaces the first and
    /// returns it.
    pub fn insert(&mut self, directory: &str, layout: T) -> Option<T> {
        let key = if directory == "." { "" } else { directory };
        self.layouts.insert(key.to_string(), layout)
    }

    #[must_use]
    pub fn get(&self, directory: &str) -> Option<&T> {
        self.layouts.get(directory)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }

    /// Layouts wrapping a page in `leaf_dir`, root first.
    ///
    /// Walks every prefix of `leaf_dir` from the root down to `leaf_dir`
    /// itself; prefixes without a layout contribute nothing.
    #[must_use]
    pub fn collect(&self, leaf_dir: &str) -> Vec<T> {
        let parts: Vec<&str> = if leaf_dir.is_empty() || leaf_dir == "." {
            Vec::new()
        } else {
            leaf_dir.split('/').collect()
        };

        let mut chain = Vec::new();
        for depth in 0..=parts.len() {
            let dir = parts[..depth].join("/");
            if let Some(layout) = self.layouts.get(&dir) {
                chain.push(layout.clone());
            }
        }
        chain
    }
}
