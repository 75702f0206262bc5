//! Command Module
//!
//! Command descriptors, the registry shared by built-in and plugin commands,
//! and the commands every invocation has available.

pub mod builtin;
pub mod descriptor;
pub mod error;
pub mod registry;

pub use descriptor::{AppInfo, CommandContext, CommandDescriptor, CommandHandler, CommandOrigin};
pub use error::{CommandError, CommandResult};
pub use registry::CommandRegistry;
