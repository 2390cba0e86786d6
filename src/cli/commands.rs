use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use crate::config::PagesConfig;
use crate::discovery::load_route_tables;
use crate::hot_reload::watch_pages;
use crate::resolver::{as_redirect, PageResolver};
use crate::routes::FileModules;

/// Command-line interface for inspecting a pages tree
#[derive(Parser, Debug)]
#[command(name = "rsc-pages")]
#[command(about = "File-system page routing inspector", long_about = None)]
pub struct Cli {
    /// Config file (YAML or TOML)
    #[arg(long, global = true, env = "RSC_PAGES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Pages root, overrides the config file and environment
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// URL prefix, overrides the config file and environment
    #[arg(long, global = true)]
    pub base_path: Option<String>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the page and not-found tables in match-priority order
    Routes,
    /// Resolve a URL and print the element tree as JSON
    Resolve {
        /// Path or URL to resolve, e.g. `/blog/hello?ref=home`
        url: String,

        /// Request header as `name: value`; may be repeated
        #[arg(short = 'H', long = "header", value_parser = parse_header)]
        headers: Vec<(String, String)>,

        /// Pretty-print the JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Watch the pages tree and log every rebuild until interrupted
    Watch,
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `name: value`, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in `{raw}`"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

impl Cli {
    /// Effective configuration: file (or defaults), then environment, then
    /// command-line flags.
    pub fn pages_config(&self) -> Result<PagesConfig> {
        let base = match &self.config {
            Some(path) => PagesConfig::load(path)?,
            None => PagesConfig::default(),
        };
        let mut config = base.with_env()?;
        if let Some(root) = &self.root {
            config.root = root.clone();
        }
        if let Some(base_path) = &self.base_path {
            config.base_path = base_path.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

fn header_map(headers: &[(String, String)]) -> Result<HeaderMap> {
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .with_context(|| format!("invalid header name `{name}`"))?;
        let value = HeaderValue::from_str(value)
            .with_context(|| format!("invalid value for header `{name}`"))?;
        map.append(name, value);
    }
    Ok(map)
}

/// Resolve `url` and describe the outcome as JSON.
///
/// A redirect raised by a page is reported as `{"redirect": .., "status": ..}`
/// rather than as an error.
pub async fn resolve_json(
    resolver: &PageResolver,
    url: &str,
    headers: &HeaderMap,
) -> Result<serde_json::Value> {
    match resolver.resolve(url, headers).await {
        Ok((element, tier)) => Ok(json!({
            "resolved_by": format!("{tier:?}"),
            "element": element,
        })),
        Err(err) => match as_redirect(&err) {
            Some(redirect) => Ok(json!({
                "redirect": redirect.location,
                "status": redirect.status.as_u16(),
            })),
            None => Err(err),
        },
    }
}

/// Run the parsed command line.
pub async fn run_cli(cli: Cli) -> Result<()> {
    let config = cli.pages_config()?;
    let registry = Arc::new(FileModules::new(&config.root));

    match cli.command {
        Commands::Routes => {
            let tables = load_route_tables(&config, registry.as_ref())?;
            let resolver = PageResolver::from_tables(tables);
            resolver.pages().dump_routes();
            resolver.not_found().dump_routes();
            Ok(())
        }
        Commands::Resolve {
            url,
            headers,
            pretty,
        } => {
            let tables = load_route_tables(&config, registry.as_ref())?;
            let resolver = PageResolver::from_tables(tables);
            let output = resolve_json(&resolver, &url, &header_map(&headers)?).await?;
            let text = if pretty {
                serde_json::to_string_pretty(&output)?
            } else {
                serde_json::to_string(&output)?
            };
            println!("{text}");
            Ok(())
        }
        Commands::Watch => {
            let tables = load_route_tables(&config, registry.as_ref())?;
            let resolver = Arc::new(PageResolver::from_tables(tables));
            let _watcher = watch_pages(config, registry, Arc::clone(&resolver), |tables| {
                info!(
                    pages = ?tables.pages.patterns(),
                    not_found = ?tables.not_found.patterns(),
                    "Routes reloaded"
                );
            })?;
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for ctrl-c")?;
            info!("Stopping watcher");
            Ok(())
        }
    }
}
