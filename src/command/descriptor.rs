//! Command descriptors and the context handlers run in

use std::fmt;
use std::sync::Arc;
use anyhow::Result;

use crate::cli::GlobalFlags;
use crate::config::ConfigManager;
use crate::io::Io;
use crate::plugin::PluginReport;
use crate::project::{ProjectContext, ProjectError, ProjectLoader, ProjectSlot};
use super::registry::CommandRegistry;

/// Where a command came from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CommandOrigin {
    /// Registered by the application itself
    Builtin,
    /// Contributed by the named plugin
    Plugin(String),
}

impl CommandOrigin {
    /// Create a plugin origin
    pub fn plugin<S: Into<String>>(name: S) -> Self {
        Self::Plugin(name.into())
    }

    /// Check if the command was contributed by a plugin
    pub fn is_plugin(&self) -> bool {
        matches!(self, CommandOrigin::Plugin(_))
    }
}

impl fmt::Display for CommandOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOrigin::Builtin => write!(f, "the application"),
            CommandOrigin::Plugin(name) => write!(f, "plugin \"{}\"", name),
        }
    }
}

/// Executable part of a command
///
/// The returned status becomes the process exit code. An `Err` is rendered
/// on the error stream and mapped to status 1.
pub trait CommandHandler: Send + Sync {
    fn handle(&self, ctx: &mut CommandContext<'_>) -> Result<i32>;
}

/// Adapter turning a closure into a [`CommandHandler`]
struct FnHandler<F>(F);

impl<F> CommandHandler for FnHandler<F>
where
    F: Fn(&mut CommandContext<'_>) -> Result<i32> + Send + Sync,
{
    fn handle(&self, ctx: &mut CommandContext<'_>) -> Result<i32> {
        (self.0)(ctx)
    }
}

/// A named, described command and its handler
#[derive(Clone)]
pub struct CommandDescriptor {
    name: String,
    description: String,
    help: Option<String>,
    origin: CommandOrigin,
    handler: Arc<dyn CommandHandler>,
}

impl CommandDescriptor {
    /// Create a command from a handler implementation
    pub fn new<N, D, H>(name: N, description: D, handler: H) -> Self
    where
        N: Into<String>,
        D: Into<String>,
        H: CommandHandler + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            help: None,
            origin: CommandOrigin::Builtin,
            handler: Arc::new(handler),
        }
    }

    /// Create a command from a closure
    pub fn from_fn<N, D, F>(name: N, description: D, handler: F) -> Self
    where
        N: Into<String>,
        D: Into<String>,
        F: Fn(&mut CommandContext<'_>) -> Result<i32> + Send + Sync + 'static,
    {
        Self::new(name, description, FnHandler(handler))
    }

    /// Attach long help text shown by `help <command>`
    pub fn with_help<S: Into<String>>(mut self, help: S) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn origin(&self) -> &CommandOrigin {
        &self.origin
    }

    pub(crate) fn set_origin(&mut self, origin: CommandOrigin) {
        self.origin = origin;
    }

    /// First word of a multi-word name
    pub fn namespace(&self) -> Option<&str> {
        self.name.split_once(' ').map(|(namespace, _)| namespace)
    }

    /// Shared handle to the handler
    pub fn handler(&self) -> Arc<dyn CommandHandler> {
        Arc::clone(&self.handler)
    }
}

impl fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Name and version of the running application
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppInfo {
    pub name: String,
    pub version: String,
}

impl AppInfo {
    pub fn new<N: Into<String>, V: Into<String>>(name: N, version: V) -> Self {
        Self { name: name.into(), version: version.into() }
    }

    /// `Quire (version 0.1.0)` style banner
    pub fn long_version(&self) -> String {
        format!("{} (version {})", self.name, self.version)
    }
}

impl Default for AppInfo {
    fn default() -> Self {
        Self::new("Quire", env!("CARGO_PKG_VERSION"))
    }
}

/// Everything a running command may touch
pub struct CommandContext<'a> {
    pub(crate) name: &'a str,
    pub(crate) args: &'a [String],
    pub(crate) flags: &'a GlobalFlags,
    pub(crate) io: &'a mut dyn Io,
    pub(crate) registry: &'a CommandRegistry,
    pub(crate) plugins: &'a PluginReport,
    pub(crate) settings: &'a ConfigManager,
    pub(crate) app_info: &'a AppInfo,
    pub(crate) project: &'a mut ProjectSlot,
    pub(crate) project_loader: &'a dyn ProjectLoader,
}

impl<'a> CommandContext<'a> {
    /// Name the command was invoked as
    pub fn name(&self) -> &str {
        self.name
    }

    /// Arguments following the command name
    pub fn args(&self) -> &[String] {
        self.args
    }

    pub fn flags(&self) -> &GlobalFlags {
        self.flags
    }

    pub fn io(&mut self) -> &mut dyn Io {
        &mut *self.io
    }

    /// Write a line to the output stream
    pub fn line(&mut self, text: &str) {
        self.io.write_line(text);
    }

    /// Write a line to the error stream
    pub fn line_error(&mut self, text: &str) {
        self.io.write_error_line(text);
    }

    pub fn registry(&self) -> &CommandRegistry {
        self.registry
    }

    pub fn plugins(&self) -> &PluginReport {
        self.plugins
    }

    pub fn settings(&self) -> &ConfigManager {
        self.settings
    }

    pub fn app_info(&self) -> &AppInfo {
        self.app_info
    }

    /// Project context, constructed on first use with the invocation's cache flag
    pub fn project(&mut self) -> Result<&ProjectContext, ProjectError> {
        self.project.get_or_load(self.project_loader, self.flags)
    }
}
