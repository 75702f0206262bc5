//! Command Error Types

use thiserror::Error;

use super::descriptor::CommandOrigin;

/// Result type for command registry operations
pub type CommandResult<T> = Result<T, CommandError>;

/// Errors raised while registering, resolving or invoking commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// No command with this exact name is registered
    #[error("The command \"{name}\" does not exist.")]
    NotFound { name: String },

    /// The name is already taken in the shared namespace
    #[error("Command \"{name}\" is already registered by {owner}")]
    AlreadyRegistered { name: String, owner: CommandOrigin },

    /// The name cannot be typed on a command line
    #[error("Invalid command name \"{name}\": {reason}")]
    InvalidName { name: String, reason: String },

    /// The command rejected its own arguments
    #[error("{message}")]
    InvalidArguments { message: String },
}

impl CommandError {
    /// Create a not found error
    pub fn not_found<S: Into<String>>(name: S) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an already registered error
    pub fn already_registered<S: Into<String>>(name: S, owner: CommandOrigin) -> Self {
        Self::AlreadyRegistered { name: name.into(), owner }
    }

    /// Create an invalid name error
    pub fn invalid_name<S: Into<String>, R: Into<String>>(name: S, reason: R) -> Self {
        Self::InvalidName { name: name.into(), reason: reason.into() }
    }

    /// Create an invalid arguments error
    pub fn invalid_arguments<S: Into<String>>(message: S) -> Self {
        Self::InvalidArguments { message: message.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let error = CommandError::not_found("foo");
        assert_eq!(error.to_string(), "The command \"foo\" does not exist.");
    }

    #[test]
    fn test_already_registered_names_owner() {
        let error = CommandError::already_registered("list", CommandOrigin::Builtin);
        assert_eq!(error.to_string(), "Command \"list\" is already registered by the application");

        let error = CommandError::already_registered("foo", CommandOrigin::plugin("my-plugin"));
        assert_eq!(error.to_string(), "Command \"foo\" is already registered by plugin \"my-plugin\"");
    }
}
