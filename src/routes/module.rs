//! Module loading seam.
//!
//! Every page, layout and not-found file is represented at runtime by a
//! [`ModuleLoader`]: an async function value that yields a [`Module`] when
//! called. Loaders are produced by a [`ModuleRegistry`] from the absolute file
//! path found during discovery and are stored directly inside each
//! [`RouteEntry`](super::RouteEntry), so the router never needs to know how a
//! module is compiled or fetched.

use anyhow::Context;
use futures::future::{BoxFuture, FutureExt};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Name of the named export consulted for pages without a default export.
pub const PAGE_EXPORT: &str = "Page";

/// A renderable component exported by a module.
///
/// Rendering happens outside this crate, so a component is identified by
/// name only; the element tree carries that name to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Component {
    name: String,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A loaded module: an optional default export plus named exports.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    /// Default-exported component, if any
    pub default: Option<Component>,
    /// Named component exports
    pub exports: HashMap<String, Component>,
}

impl Module {
    /// Module whose default export is `component`.
    pub fn with_default(component: Component) -> Self {
        Self {
            default: Some(component),
            exports: HashMap::new(),
        }
    }

    /// Add a named export.
    #[must_use]
    pub fn with_export(mut self, name: impl Into<String>, component: Component) -> Self {
        self.exports.insert(name.into(), component);
        self
    }

    #[must_use]
    pub fn export(&self, name: &str) -> Option<&Component> {
        self.exports.get(name)
    }
}

type LoadFn = dyn Fn() -> BoxFuture<'static, anyhow::Result<Module>> + Send + Sync;

/// Deferred, asynchronous access to the module behind one file.
///
/// Cloning is cheap (the load function is shared); every call to
/// [`ModuleLoader::load`] invokes the function again, so caching, if any, is
/// the registry's business.
#[derive(Clone)]
pub struct ModuleLoader {
    path: PathBuf,
    load: Arc<LoadFn>,
}

impl ModuleLoader {
    /// Wrap an async function as a loader for `path`.
    pub fn new<F, Fut>(path: impl Into<PathBuf>, load: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Module>> + Send + 'static,
    {
        Self {
            path: path.into(),
            load: Arc::new(move || load().boxed()),
        }
    }

    /// Loader that always resolves to a clone of `module`.
    pub fn ready(path: impl Into<PathBuf>, module: Module) -> Self {
        let module = Arc::new(module);
        Self::new(path, move || {
            let module = Arc::clone(&module);
            async move { Ok(Module::clone(&module)) }
        })
    }

    /// Loader that always fails with `message`.
    pub fn failing(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        let message: Arc<str> = Arc::from(message.into());
        Self::new(path, move || {
            let message = Arc::clone(&message);
            async move { Err(anyhow::anyhow!("{message}")) }
        })
    }

    /// File this loader was created for.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the module. Errors are returned exactly as the load function
    /// produced them.
    pub async fn load(&self) -> anyhow::Result<Module> {
        (self.load)().await
    }
}

impl fmt::Debug for ModuleLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleLoader")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Produces loaders for discovered files.
pub trait ModuleRegistry: Send + Sync {
    /// Return the loader for the module at `file`.
    ///
    /// Must not fail: a file that cannot be loaded yields a loader whose
    /// [`load`](ModuleLoader::load) returns the error.
    fn loader_for(&self, file: &Path) -> ModuleLoader;
}

impl<F> ModuleRegistry for F
where
    F: Fn(&Path) -> ModuleLoader + Send + Sync,
{
    fn loader_for(&self, file: &Path) -> ModuleLoader {
        self(file)
    }
}

/// In-memory registry of pre-built modules keyed by file path.
///
/// Unregistered paths get a loader that fails at load time.
#[derive(Debug, Clone, Default)]
pub struct StaticModules {
    modules: HashMap<PathBuf, Module>,
}

impl StaticModules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `module` for `path`, replacing any previous registration.
    pub fn register(&mut self, path: impl Into<PathBuf>, module: Module) -> &mut Self {
        self.modules.insert(path.into(), module);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl ModuleRegistry for StaticModules {
    fn loader_for(&self, file: &Path) -> ModuleLoader {
        match self.modules.get(file) {
            Some(module) => ModuleLoader::ready(file, module.clone()),
            None => ModuleLoader::failing(
                file,
                format!("module not registered: {}", file.display()),
            ),
        }
    }
}

/// Registry backed by the files themselves.
///
/// Loading checks that the file still exists and exports a default component
/// named after the file's path relative to `root`, without its extension
/// (`blog/[slug]/page`). Useful for inspecting a pages tree without a module
/// runtime, which is what the CLI does.
#[derive(Debug, Clone)]
pub struct FileModules {
    root: PathBuf,
}

impl FileModules {
    /// Registry for files below `root`. The root is canonicalised when it
    /// exists, matching the absolute paths discovery produces.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = root.canonicalize().unwrap_or(root);
        Self { root }
    }

    fn component_name(&self, file: &Path) -> String {
        let relative = file.strip_prefix(&self.root).unwrap_or(file);
        let stemmed = relative.with_extension("");
        stemmed
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl ModuleRegistry for FileModules {
    fn loader_for(&self, file: &Path) -> ModuleLoader {
        let name = self.component_name(file);
        let path = file.to_path_buf();
        ModuleLoader::new(file, move || {
            let name = name.clone();
            let path = path.clone();
            async move {
                tokio::fs::metadata(&path)
                    .await
                    .with_context(|| format!("failed to load module {}", path.display()))?;
                Ok(Module::with_default(Component::new(name)))
            }
        })
    }
}
