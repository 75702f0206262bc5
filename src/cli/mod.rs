//! CLI module containing argument parsing and related functionality

pub mod args;
pub mod global_flags;
pub mod help_formatter;

pub use args::{parse_invocation, validate_args, CliError, GlobalArgs, GlobalFlags, Invocation};
pub use global_flags::{split_global_flags, SplitArgs};
pub use help_formatter::HelpFormatter;
