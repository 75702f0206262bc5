//! Core Plugin Traits
//!
//! A plugin contributes commands either imperatively through `activate` or
//! declaratively through `commands`; both meet in one trait.

use super::error::PluginResult;
use crate::command::{CommandDescriptor, CommandRegistry};

/// Capability every application plugin exposes
pub trait ApplicationPlugin: Send + Sync {
    /// Commands this plugin contributes declaratively
    fn commands(&self) -> Vec<CommandDescriptor> {
        Vec::new()
    }

    /// Register this plugin's commands
    ///
    /// The default registers every entry of [`ApplicationPlugin::commands`].
    fn activate(&self, registry: &mut CommandRegistry) -> PluginResult<()> {
        for command in self.commands() {
            registry.register(command)?;
        }
        Ok(())
    }
}

/// Plugin made of nothing but a list of commands
pub struct DeclarativePlugin {
    commands: Vec<CommandDescriptor>,
}

impl DeclarativePlugin {
    pub fn new(commands: Vec<CommandDescriptor>) -> Self {
        Self { commands }
    }
}

impl ApplicationPlugin for DeclarativePlugin {
    fn commands(&self) -> Vec<CommandDescriptor> {
        self.commands.clone()
    }
}
