use clap::{ArgAction, Parser};
use std::path::PathBuf;
use log::debug;
use thiserror::Error;

use super::global_flags::split_global_flags;

/// Errors produced while turning raw arguments into an [`Invocation`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    /// clap rejected the global arguments
    #[error("{message}")]
    InvalidArguments { message: String },

    /// Global arguments parsed but do not make sense together
    #[error("{message}")]
    Conflict { message: String },

    /// An option was given where a command name was expected
    #[error("The \"{option}\" option does not exist.")]
    UnknownOption { option: String },
}

impl CliError {
    /// Create an invalid arguments error
    pub fn invalid_arguments<S: Into<String>>(message: S) -> Self {
        Self::InvalidArguments { message: message.into() }
    }

    /// Create a conflict error
    pub fn conflict<S: Into<String>>(message: S) -> Self {
        Self::Conflict { message: message.into() }
    }
}

/// Application-level flags, accepted anywhere on the command line
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "quire")]
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
pub struct GlobalArgs {
    /// Disables plugins
    #[arg(long = "no-plugins")]
    pub no_plugins: bool,

    /// Disables repository caches
    #[arg(long = "no-cache")]
    pub no_cache: bool,

    /// Display help for the given command
    #[arg(short = 'h', long = "help", action = ArgAction::SetTrue)]
    pub help: bool,

    /// Display this application version
    #[arg(short = 'V', long = "version", action = ArgAction::SetTrue)]
    pub version: bool,

    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Log format: text or json
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL")]
    pub log_file_level: Option<String>,
}

/// Flags that steer plugin activation and project construction
///
/// Built once per invocation and never mutated afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GlobalFlags {
    pub disable_plugins: bool,
    pub disable_cache: bool,
}

impl From<&GlobalArgs> for GlobalFlags {
    fn from(args: &GlobalArgs) -> Self {
        Self {
            disable_plugins: args.no_plugins,
            disable_cache: args.no_cache,
        }
    }
}

/// A fully parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub globals: GlobalArgs,
    pub flags: GlobalFlags,
    /// Command name tokens followed by the command's own arguments
    pub command: Vec<String>,
}

impl Invocation {
    /// Whether a command name was given at all
    pub fn has_command(&self) -> bool {
        !self.command.is_empty()
    }
}

/// Parse an invocation, excluding the program name
pub fn parse_invocation<I, S>(args: I) -> Result<Invocation, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    let split = split_global_flags(&args);
    debug!("Global tokens: {:?}, command tokens: {:?}", split.global, split.command);
    let leading_operand = split.is_operand(0);

    let globals = GlobalArgs::try_parse_from(
        std::iter::once("quire".to_string()).chain(split.global),
    )
    .map_err(|e| CliError::invalid_arguments(e.to_string().trim_end()))?;

    validate_args(&globals)?;

    if let Some(option) = split.command.first().filter(|token| token.starts_with('-')) {
        if !leading_operand {
            return Err(CliError::UnknownOption { option: option.clone() });
        }
    }

    let flags = GlobalFlags::from(&globals);
    debug!("Parsed global flags: {:?}", flags);

    Ok(Invocation {
        globals,
        flags,
        command: split.command,
    })
}

/// Validate global argument combinations
pub fn validate_args(args: &GlobalArgs) -> Result<(), CliError> {
    let log_flags_count = [args.verbose, args.quiet, args.debug]
        .iter()
        .filter(|&&flag| flag)
        .count();

    if log_flags_count > 1 {
        return Err(CliError::conflict(
            "Conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
        ));
    }

    if args.color && args.no_color {
        return Err(CliError::conflict("--color and --no-color cannot be used together"));
    }

    if let Some(ref format) = args.log_format {
        match format.to_lowercase().as_str() {
            "text" | "json" => {},
            _ => return Err(CliError::conflict(format!(
                "Invalid log format '{}'. Valid options: text, json", format
            ))),
        }
    }

    if let Some(ref level) = args.log_file_level {
        match level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {},
            _ => return Err(CliError::conflict(format!(
                "Invalid log file level '{}'. Valid levels: error, warn, info, debug, trace", level
            ))),
        }
    }

    if args.log_file_level.is_some() && args.log_file.is_none() {
        return Err(CliError::conflict(
            "--log-file-level requires --log-file to be specified"
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plugin_command_with_disabled_plugins() {
        let invocation = parse_invocation(["foo", "--no-plugins"]).unwrap();

        assert!(invocation.flags.disable_plugins);
        assert!(!invocation.flags.disable_cache);
        assert_eq!(invocation.command, vec!["foo".to_string()]);
    }

    #[test]
    fn test_parse_empty_invocation() {
        let invocation = parse_invocation(Vec::<String>::new()).unwrap();

        assert!(!invocation.has_command());
        assert_eq!(invocation.flags, GlobalFlags::default());
    }

    #[test]
    fn test_parse_no_cache_anywhere() {
        let before = parse_invocation(["--no-cache", "debug", "info"]).unwrap();
        let after = parse_invocation(["debug", "info", "--no-cache"]).unwrap();

        assert!(before.flags.disable_cache);
        assert_eq!(before.flags, after.flags);
        assert_eq!(before.command, after.command);
    }

    #[test]
    fn test_parse_value_flags() {
        let invocation = parse_invocation([
            "--config-file", "custom.toml", "list", "--log-format=json",
        ]).unwrap();

        assert_eq!(invocation.globals.config_file, Some(PathBuf::from("custom.toml")));
        assert_eq!(invocation.globals.log_format.as_deref(), Some("json"));
        assert_eq!(invocation.command, vec!["list".to_string()]);
    }

    #[test]
    fn test_missing_value_is_rejected() {
        let result = parse_invocation(["list", "--config-file"]);

        assert!(matches!(result, Err(CliError::InvalidArguments { .. })));
    }

    #[test]
    fn test_option_like_command_after_end_of_options() {
        let invocation = parse_invocation(["--no-cache", "--", "--foo", "bar"]).unwrap();

        assert!(invocation.flags.disable_cache);
        assert_eq!(invocation.command, vec!["--foo", "bar"]);
    }

    #[test]
    fn test_unknown_leading_option() {
        let result = parse_invocation(["--frobnicate", "list"]);

        assert_eq!(
            result.unwrap_err().to_string(),
            "The \"--frobnicate\" option does not exist."
        );
    }

    #[test]
    fn test_validate_args_conflicting_flags() {
        let args = GlobalArgs {
            verbose: true,
            quiet: true,
            ..GlobalArgs::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_color_conflict() {
        let args = GlobalArgs {
            color: true,
            no_color: true,
            ..GlobalArgs::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_invalid_log_format() {
        let args = GlobalArgs {
            log_format: Some("xml".to_string()),
            ..GlobalArgs::default()
        };
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_validate_args_log_file_level_without_file() {
        let args = GlobalArgs {
            log_file_level: Some("debug".to_string()),
            ..GlobalArgs::default()
        };
        assert!(validate_args(&args).is_err());

        let args = GlobalArgs {
            log_file_level: Some("debug".to_string()),
            log_file: Some(PathBuf::from("quire.log")),
            ..GlobalArgs::default()
        };
        assert!(validate_args(&args).is_ok());
    }
}
