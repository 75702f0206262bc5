//! Built-in commands
//!
//! Registered before plugin activation, so plugins can never take their names.

mod about;
mod debug_info;
mod help;
mod list;
mod plugin_show;

use super::error::CommandResult;
use super::registry::CommandRegistry;

/// Name of the command run when no command is given
pub const LIST_COMMAND: &str = "list";

/// Name of the command rendering per-command help
pub const HELP_COMMAND: &str = "help";

/// Register every built-in command
pub fn register_builtins(registry: &mut CommandRegistry) -> CommandResult<()> {
    registry.register(about::descriptor())?;
    registry.register(debug_info::descriptor())?;
    registry.register(help::descriptor())?;
    registry.register(list::descriptor())?;
    registry.register(plugin_show::descriptor())?;
    Ok(())
}
