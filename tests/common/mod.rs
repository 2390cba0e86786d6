#![allow(dead_code)]

pub mod page_tree {
    use rsc_pages::config::PagesConfig;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// A pages tree on disk, removed when dropped.
    pub struct PageTree {
        dir: TempDir,
        root: PathBuf,
    }

    impl PageTree {
        pub fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let root = dir.path().canonicalize().unwrap();
            Self { dir, root }
        }

        /// Tree with a file at each of `files`.
        pub fn with_files(files: &[&str]) -> Self {
            let tree = Self::new();
            for file in files {
                tree.write(file);
            }
            tree
        }

        pub fn write(&self, relative: &str) -> PathBuf {
            let path = self.root.join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, "export default function Component() {}\n").unwrap();
            path
        }

        pub fn remove(&self, relative: &str) {
            fs::remove_file(self.root.join(relative)).unwrap();
        }

        pub fn root(&self) -> &Path {
            &self.root
        }

        pub fn path(&self, relative: &str) -> PathBuf {
            self.root.join(relative)
        }

        pub fn config(&self) -> PagesConfig {
            PagesConfig {
                root: self.root.clone(),
                ..PagesConfig::default()
            }
        }
    }

    /// The blog tree: root and blog layouts, a grouped marketing page, a
    /// docs catch-all and not-found pages at the root and under `admin`.
    pub fn blog_tree() -> PageTree {
        PageTree::with_files(&[
            "layout.tsx",
            "page.tsx",
            "not-found.tsx",
            "blog/layout.tsx",
            "blog/page.tsx",
            "blog/[slug]/page.tsx",
            "(marketing)/about/page.tsx",
            "docs/[...path]/page.tsx",
            "admin/not-found.tsx",
            "components/button.tsx",
        ])
    }
}
