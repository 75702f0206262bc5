//! Plugin Error Types
//!
//! Error handling for plugin discovery, resolution and activation.

use thiserror::Error;

use crate::command::{CommandError, CommandOrigin};

/// Result type for plugin operations
pub type PluginResult<T> = Result<T, PluginError>;

/// Error types for plugin operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PluginError {
    /// The entry point source could not be enumerated
    #[error("Plugin discovery failed: {message}")]
    DiscoveryFailed { message: String },

    /// A plugin manifest exists but cannot be understood
    #[error("Invalid plugin manifest {path}: {message}")]
    ManifestInvalid { path: String, message: String },

    /// The entry point names a module that is not linked in
    #[error("Plugin module not found: {module}")]
    ModuleNotFound { module: String },

    /// The module exists but does not export the attribute
    #[error("Plugin attribute '{attribute}' not found in module '{module}'")]
    AttributeNotFound { module: String, attribute: String },

    /// The plugin's own activation reported a failure
    #[error("Plugin '{plugin}' failed to activate: {message}")]
    ActivationFailed { plugin: String, message: String },

    /// The plugin tried to claim a name already in use
    #[error("Plugin '{plugin}' cannot register command \"{command}\": already registered by {owner}")]
    CommandConflict { plugin: String, command: String, owner: CommandOrigin },

    /// The registry rejected a command for another reason
    #[error("Command registration failed: {message}")]
    Registration { message: String },
}

impl PluginError {
    /// Create a discovery error
    pub fn discovery_failed<S: Into<String>>(message: S) -> Self {
        Self::DiscoveryFailed { message: message.into() }
    }

    /// Create a manifest error
    pub fn manifest_invalid<P: Into<String>, S: Into<String>>(path: P, message: S) -> Self {
        Self::ManifestInvalid { path: path.into(), message: message.into() }
    }

    /// Create a module not found error
    pub fn module_not_found<S: Into<String>>(module: S) -> Self {
        Self::ModuleNotFound { module: module.into() }
    }

    /// Create an attribute not found error
    pub fn attribute_not_found<M: Into<String>, A: Into<String>>(module: M, attribute: A) -> Self {
        Self::AttributeNotFound { module: module.into(), attribute: attribute.into() }
    }

    /// Create an activation error
    pub fn activation_failed<P: Into<String>, S: Into<String>>(plugin: P, message: S) -> Self {
        Self::ActivationFailed { plugin: plugin.into(), message: message.into() }
    }

    /// Check if error means the plugin source itself is broken
    ///
    /// Only these abort an invocation; everything else is isolated to one plugin.
    pub fn is_discovery_error(&self) -> bool {
        matches!(self,
            PluginError::DiscoveryFailed { .. } |
            PluginError::ManifestInvalid { .. }
        )
    }

    /// Check if error came from resolving an entry point
    pub fn is_resolution_error(&self) -> bool {
        matches!(self,
            PluginError::ModuleNotFound { .. } |
            PluginError::AttributeNotFound { .. }
        )
    }

    /// Attribute a registry failure to the plugin that caused it
    pub fn from_command_error(plugin: &str, error: CommandError) -> Self {
        match error {
            CommandError::AlreadyRegistered { name, owner } => PluginError::CommandConflict {
                plugin: plugin.to_string(),
                command: name,
                owner,
            },
            other => PluginError::activation_failed(plugin, other.to_string()),
        }
    }
}

impl From<CommandError> for PluginError {
    fn from(err: CommandError) -> Self {
        PluginError::Registration { message: err.to_string() }
    }
}
