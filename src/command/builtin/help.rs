use anyhow::Result;

use crate::cli::HelpFormatter;
use crate::command::{CommandContext, CommandDescriptor};
use crate::display::ColourManager;

pub(super) fn descriptor() -> CommandDescriptor {
    CommandDescriptor::from_fn(super::HELP_COMMAND, "Displays help for a command.", run)
        .with_help("Displays help for the given command, e.g. `help debug info`.\n\nUse `list` to see every available command.")
}

fn run(ctx: &mut CommandContext<'_>) -> Result<i32> {
    let formatter = HelpFormatter::new(ColourManager::for_io(ctx.io()));
    let name = if ctx.args().is_empty() {
        super::HELP_COMMAND.to_string()
    } else {
        ctx.args().join(" ")
    };

    let help = formatter.format_command_help(ctx.registry().lookup(&name)?);
    ctx.io().write(&help);
    Ok(0)
}
