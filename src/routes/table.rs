use super::layout::LayoutMap;
use super::module::{ModuleLoader, ModuleRegistry};
use super::pattern::{to_route_pattern, PatternMode};
use super::types::{DiscoveredFiles, RouteEntry, RouteSource, RouteTable, RouteTables};
use tracing::{debug, info};

/// Build the page and not-found tables for one discovery pass.
///
/// Pages compile in [`PatternMode::Page`], not-found files in
/// [`PatternMode::Global`]; both get the layout chain of their own directory.
/// Nothing is rejected: duplicate patterns are all kept and left to the
/// index, where the one inserted last wins.
pub fn build_route_tables(
    files: &DiscoveredFiles,
    registry: &dyn ModuleRegistry,
    base_path: &str,
) -> RouteTables {
    let mut layouts: LayoutMap<ModuleLoader> = LayoutMap::new();
    for source in &files.layouts {
        let loader = registry.loader_for(&source.file);
        if let Some(previous) = layouts.insert(&source.directory, loader) {
            debug!(
                directory = %source.directory,
                replaced = %previous.path().display(),
                layout = %source.file.display(),
                "Layout registered twice for directory, keeping the later one"
            );
        }
    }

    let pages = build_table(&files.pages, &layouts, registry, base_path, PatternMode::Page);
    let not_found = build_table(
        &files.not_found,
        &layouts,
        registry,
        base_path,
        PatternMode::Global,
    );

    info!(
        pages_count = pages.len(),
        not_found_count = not_found.len(),
        layouts_count = layouts.len(),
        base_path = %base_path,
        "Route tables built"
    );

    RouteTables { pages, not_found }
}

fn build_table(
    sources: &[RouteSource],
    layouts: &LayoutMap<ModuleLoader>,
    registry: &dyn ModuleRegistry,
    base_path: &str,
    mode: PatternMode,
) -> RouteTable {
    let entries = sources
        .iter()
        .map(|source| {
            let pattern = to_route_pattern(base_path, &source.directory, mode);
            let chain = layouts.collect(&source.directory);
            debug!(
                pattern = %pattern,
                file = %source.file.display(),
                layouts = chain.len(),
                "Compiled route"
            );
            RouteEntry::new(pattern, registry.loader_for(&source.file), chain)
        })
        .collect();
    RouteTable::new(entries)
}
