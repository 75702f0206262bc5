//! Repository cache maintenance
//!
//! Each repository caches under `<cache root>/<repository name>`.

use std::fs;
use std::path::{Component, Path, PathBuf};
use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use log::{debug, info};

use crate::command::{CommandContext, CommandDescriptor, CommandError};
use crate::display::format_compact_table;
use crate::plugin::traits::ApplicationPlugin;

/// Module path the plugin is exported under
pub const MODULE: &str = "quire.plugins.cache";

/// Attribute naming the plugin inside [`MODULE`]
pub const ATTRIBUTE: &str = "CachePlugin";

/// Contributes the `cache list` and `cache clear` commands
#[derive(Debug, Default)]
pub struct CachePlugin;

impl CachePlugin {
    pub fn new() -> Self {
        Self
    }
}

impl ApplicationPlugin for CachePlugin {
    fn commands(&self) -> Vec<CommandDescriptor> {
        vec![
            CommandDescriptor::from_fn("cache list", "List repository caches.", list_caches)
                .with_help("Shows every repository cache directory under the configured cache root."),
            CommandDescriptor::from_fn("cache clear", "Clears a repository cache.", clear_cache)
                .with_help("Usage: cache clear [--all] <repository>\n\nRemoves the cache of the named repository."),
        ]
    }
}

/// Cache directories under `root`, sorted by name
fn cache_entries(root: &Path) -> Result<Vec<(String, u64)>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(root).with_context(|| format!("Failed to read cache root {}", root.display()))? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            let files = fs::read_dir(entry.path())?.count() as u64;
            entries.push((entry.file_name().to_string_lossy().into_owned(), files));
        }
    }
    entries.sort();
    Ok(entries)
}

/// Cache directory of `name`, when `name` is a plain entry directly under `root`
fn cache_path(root: &Path, name: &str) -> Option<PathBuf> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Some(root.join(name)),
        _ => None,
    }
}

fn list_caches(ctx: &mut CommandContext<'_>) -> Result<i32> {
    let root = ctx.settings().cache_dir();
    let entries = cache_entries(&root)?;
    debug!("Found {} repository caches under {}", entries.len(), root.display());

    if ctx.flags().disable_cache {
        ctx.line("Repository caches are disabled for this invocation.");
    }

    if entries.is_empty() {
        ctx.line(&format!("No repository caches in {}", root.display()));
        return Ok(0);
    }

    let rows: Vec<Vec<String>> = entries
        .into_iter()
        .map(|(name, files)| vec![name.clone(), root.join(&name).display().to_string(), files.to_string()])
        .collect();
    ctx.io().write(&format_compact_table(&["Repository", "Path", "Entries"], &rows));
    Ok(0)
}

fn clear_arguments() -> Command {
    Command::new("cache clear")
        .no_binary_name(true)
        .disable_help_flag(true)
        .arg(Arg::new("repository").required_unless_present("all"))
        .arg(Arg::new("all").long("all").action(ArgAction::SetTrue))
}

fn clear_cache(ctx: &mut CommandContext<'_>) -> Result<i32> {
    let matches = clear_arguments()
        .try_get_matches_from(ctx.args())
        .map_err(|e| CommandError::invalid_arguments(e.to_string().trim_end()))?;

    let root = ctx.settings().cache_dir();
    let targets: Vec<String> = if matches.get_flag("all") {
        cache_entries(&root)?.into_iter().map(|(name, _)| name).collect()
    } else {
        matches.get_one::<String>("repository").into_iter().cloned().collect()
    };

    let mut missing = Vec::new();
    for name in targets {
        let path = match cache_path(&root, &name) {
            Some(path) if path.is_dir() => path,
            _ => {
                missing.push(name);
                continue;
            }
        };
        fs::remove_dir_all(&path)
            .with_context(|| format!("Failed to remove cache {}", path.display()))?;
        info!("Cleared cache for repository '{}'", name);
        ctx.line(&format!("Cleared cache for repository \"{}\".", name));
    }

    if missing.is_empty() {
        return Ok(0);
    }

    for name in missing {
        ctx.line_error(&format!("No cache found for repository \"{}\".", name));
    }
    Ok(1)
}
