use anyhow::Result;

use crate::command::{CommandContext, CommandDescriptor};
use crate::display::{format_compact_table, ColourManager};

pub(super) fn descriptor() -> CommandDescriptor {
    CommandDescriptor::from_fn("plugin show", "Shows activated plugins and their commands.", run)
}

fn run(ctx: &mut CommandContext<'_>) -> Result<i32> {
    let colours = ColourManager::for_io(ctx.io());
    let report = ctx.plugins().clone();

    if !report.enabled {
        ctx.line("Plugins are disabled for this invocation.");
        return Ok(0);
    }

    if report.activated.is_empty() {
        ctx.line("No plugins activated.");
    } else {
        let rows: Vec<Vec<String>> = report
            .activated
            .iter()
            .map(|plugin| vec![plugin.name.clone(), plugin.target.clone(), plugin.commands.join(", ")])
            .collect();
        ctx.io().write(&format_compact_table(&["Plugin", "Entry point", "Commands"], &rows));
    }

    if !report.failures.is_empty() {
        ctx.line("");
        ctx.line(&colours.warning("Failed plugins:").to_string());
        for failure in &report.failures {
            ctx.line(&format!("  {} ({}): {}", failure.name, failure.target, failure.error));
        }
    }
    Ok(0)
}
