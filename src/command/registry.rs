//! Command Registry
//!
//! One namespace shared by built-in and plugin commands. Lookups are exact
//! and case-sensitive; a name can only be registered once.

use std::collections::HashMap;
use log::debug;

use super::descriptor::{CommandDescriptor, CommandOrigin};
use super::error::{CommandError, CommandResult};

/// Registry of every command available to the current invocation
#[derive(Debug, Default)]
pub struct CommandRegistry {
    /// Commands in registration order
    commands: Vec<CommandDescriptor>,

    /// Name -> position in `commands`
    index: HashMap<String, usize>,
}

impl CommandRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command
    pub fn register(&mut self, command: CommandDescriptor) -> CommandResult<()> {
        validate_name(command.name())?;

        if let Some(existing) = self.get(command.name()) {
            return Err(CommandError::already_registered(
                command.name(),
                existing.origin().clone(),
            ));
        }

        debug!("Registering command '{}' ({})", command.name(), command.origin());
        self.index.insert(command.name().to_string(), self.commands.len());
        self.commands.push(command);
        Ok(())
    }

    /// Move every command of `other` into this registry, tagged with `origin`
    ///
    /// Either all commands are accepted or none are.
    pub fn merge(&mut self, other: CommandRegistry, origin: CommandOrigin) -> CommandResult<Vec<String>> {
        for command in &other.commands {
            if let Some(existing) = self.get(command.name()) {
                return Err(CommandError::already_registered(
                    command.name(),
                    existing.origin().clone(),
                ));
            }
        }

        let mut names = Vec::with_capacity(other.commands.len());
        for mut command in other.commands {
            command.set_origin(origin.clone());
            names.push(command.name().to_string());
            self.register(command)?;
        }

        Ok(names)
    }

    /// Look up a command by exact name
    pub fn lookup(&self, name: &str) -> CommandResult<&CommandDescriptor> {
        self.get(name).ok_or_else(|| CommandError::not_found(name))
    }

    /// Get a command by exact name
    pub fn get(&self, name: &str) -> Option<&CommandDescriptor> {
        self.index.get(name).map(|&position| &self.commands[position])
    }

    /// Check if a command is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Iterate commands in registration order
    pub fn iter(&self) -> impl Iterator<Item = &CommandDescriptor> {
        self.commands.iter()
    }

    /// Commands sorted by name, as shown in listings
    pub fn sorted(&self) -> Vec<&CommandDescriptor> {
        let mut commands: Vec<&CommandDescriptor> = self.commands.iter().collect();
        commands.sort_by(|a, b| a.name().cmp(b.name()));
        commands
    }

    /// Names contributed by a given origin
    pub fn names_from(&self, origin: &CommandOrigin) -> Vec<&str> {
        self.commands
            .iter()
            .filter(|command| command.origin() == origin)
            .map(|command| command.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

/// Names are words separated by single spaces and never look like options
fn validate_name(name: &str) -> CommandResult<()> {
    if name.is_empty() {
        return Err(CommandError::invalid_name(name, "name cannot be empty"));
    }

    if name.starts_with('-') {
        return Err(CommandError::invalid_name(name, "name cannot start with '-'"));
    }

    if name.split(' ').any(|word| word.is_empty() || word.chars().any(char::is_whitespace)) {
        return Err(CommandError::invalid_name(
            name,
            "words must be separated by single spaces",
        ));
    }

    Ok(())
}
