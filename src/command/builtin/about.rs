use anyhow::Result;

use crate::command::{CommandContext, CommandDescriptor};

pub(super) fn descriptor() -> CommandDescriptor {
    CommandDescriptor::from_fn("about", "Shows a short information about Quire.", run)
}

fn run(ctx: &mut CommandContext<'_>) -> Result<i32> {
    let name = ctx.app_info().name.clone();
    ctx.line(&format!("{} - Dependency Manager", name));
    ctx.line(&format!(
        "{} resolves the dependencies of your projects from an ordered pool of package repositories.",
        name
    ));
    ctx.line("Run `list` to see the available commands.");
    Ok(0)
}
