use anyhow::Result;

use crate::cli::HelpFormatter;
use crate::command::{CommandContext, CommandDescriptor};
use crate::display::ColourManager;

pub(super) fn descriptor() -> CommandDescriptor {
    CommandDescriptor::from_fn(super::LIST_COMMAND, "Lists commands.", run)
        .with_help("Lists all commands, grouped by namespace.")
}

fn run(ctx: &mut CommandContext<'_>) -> Result<i32> {
    let formatter = HelpFormatter::new(ColourManager::for_io(ctx.io()));
    let listing = formatter.format_command_list(ctx.app_info(), ctx.registry());
    ctx.io().write(&listing);
    Ok(0)
}
