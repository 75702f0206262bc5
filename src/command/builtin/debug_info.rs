//! `debug info`: version, project and repository pool

use anyhow::Result;

use crate::command::{CommandContext, CommandDescriptor};
use crate::display::{format_compact_table, format_key_values};

pub(super) fn descriptor() -> CommandDescriptor {
    CommandDescriptor::from_fn("debug info", "Shows debug information.", run)
        .with_help("Loads the current project and shows the repositories it resolves packages from.")
}

fn run(ctx: &mut CommandContext<'_>) -> Result<i32> {
    let version = ctx.app_info().version.clone();
    let config_file = ctx
        .settings()
        .config_file_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "none".to_string());
    let plugins = if ctx.flags().disable_plugins { "disabled" } else { "enabled" };

    let project = ctx.project()?;
    let summary = format_key_values(&[
        ("Version", version),
        ("Config", config_file),
        ("Plugins", plugins.to_string()),
        ("Project", project.name().to_string()),
        ("Root", project.root().display().to_string()),
    ]);

    let rows: Vec<Vec<String>> = project
        .repositories()
        .map(|repository| {
            let cache = if repository.is_cache_disabled() { "disabled" } else { "enabled" };
            vec![repository.name().to_string(), repository.url().to_string(), cache.to_string()]
        })
        .collect();
    let repositories = format_compact_table(&["Repository", "URL", "Cache"], &rows);

    ctx.io().write(&summary);
    ctx.line("");
    if repositories.is_empty() {
        ctx.line("No repositories configured.");
    } else {
        ctx.io().write(&repositories);
    }
    Ok(0)
}
