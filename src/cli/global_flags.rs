//! Global flag separation
//!
//! Global flags may be written anywhere on the command line, before or after
//! the command name. This module splits an invocation into the tokens that
//! belong to the application and the tokens that belong to the command.

use std::collections::HashSet;

/// Marker that ends global flag recognition
const END_OF_OPTIONS: &str = "--";

/// List of all global flags recognised by the application
pub fn get_global_flags() -> HashSet<&'static str> {
    let mut flags = HashSet::new();

    // Plugin and cache behaviour
    flags.insert("--no-plugins");
    flags.insert("--no-cache");

    // Help and version
    flags.insert("--help");
    flags.insert("-h");
    flags.insert("--version");
    flags.insert("-V");

    // Logging flags
    flags.insert("--verbose");
    flags.insert("-v");
    flags.insert("--quiet");
    flags.insert("-q");
    flags.insert("--debug");
    flags.insert("--log-format");
    flags.insert("--log-file");
    flags.insert("--log-file-level");

    // Color flags
    flags.insert("--color");
    flags.insert("--no-color");

    // Configuration flags
    flags.insert("--config-file");

    flags
}

/// Check if a flag takes a value
fn is_flag_with_value(flag: &str) -> bool {
    matches!(flag,
        "--log-format" | "--log-file" | "--log-file-level" |
        "--config-file"
    )
}

/// Name part of a token, without any `=value` suffix
fn flag_name(arg: &str) -> &str {
    match arg.split_once('=') {
        Some((name, _)) if name.starts_with("--") => name,
        _ => arg,
    }
}

/// Tokens of one invocation, separated by owner
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitArgs {
    /// Global flags and their values, in command line order
    pub global: Vec<String>,
    /// Command name tokens followed by the command's own arguments
    pub command: Vec<String>,
    /// Position in `command` where tokens after `--` begin
    pub separator: Option<usize>,
}

impl SplitArgs {
    /// Whether the command token at `index` came after `--`
    pub fn is_operand(&self, index: usize) -> bool {
        self.separator.is_some_and(|start| index >= start)
    }
}

/// Separate global flags from command tokens
///
/// A value-taking flag consumes the following token unless it was written
/// with `=value`. A value-taking flag at the very end is kept alone so the
/// parser can report the missing value.
pub fn split_global_flags(args: &[String]) -> SplitArgs {
    let global_flags = get_global_flags();
    let mut split = SplitArgs::default();
    let mut i = 0;

    while i < args.len() {
        let arg = &args[i];

        if arg == END_OF_OPTIONS {
            split.separator = Some(split.command.len());
            split.command.extend(args[i + 1..].iter().cloned());
            break;
        }

        let name = flag_name(arg);
        if global_flags.contains(name) {
            split.global.push(arg.clone());
            if is_flag_with_value(name) && name == arg && i + 1 < args.len() {
                split.global.push(args[i + 1].clone());
                i += 2;
            } else {
                i += 1;
            }
        } else {
            split.command.push(arg.clone());
            i += 1;
        }
    }

    split
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_flags_after_command_name() {
        let split = split_global_flags(&strings(&["foo", "--no-plugins"]));

        assert_eq!(split.global, strings(&["--no-plugins"]));
        assert_eq!(split.command, strings(&["foo"]));
    }

    #[test]
    fn test_multi_word_command_with_cache_flag() {
        let split = split_global_flags(&strings(&["debug", "info", "--no-cache"]));

        assert_eq!(split.global, strings(&["--no-cache"]));
        assert_eq!(split.command, strings(&["debug", "info"]));
    }

    #[test]
    fn test_flags_with_values() {
        let split = split_global_flags(&strings(&[
            "--config-file", "quire.toml",
            "cache", "clear", "central",
            "--log-format=json",
        ]));

        assert_eq!(split.global, strings(&["--config-file", "quire.toml", "--log-format=json"]));
        assert_eq!(split.command, strings(&["cache", "clear", "central"]));
    }

    #[test]
    fn test_trailing_value_flag_kept_alone() {
        let split = split_global_flags(&strings(&["list", "--log-file"]));

        assert_eq!(split.global, strings(&["--log-file"]));
        assert_eq!(split.command, strings(&["list"]));
    }

    #[test]
    fn test_end_of_options_marker() {
        let split = split_global_flags(&strings(&["--no-cache", "help", "--", "--no-plugins"]));

        assert_eq!(split.global, strings(&["--no-cache"]));
        assert_eq!(split.command, strings(&["help", "--no-plugins"]));
        assert_eq!(split.separator, Some(1));
        assert!(!split.is_operand(0));
        assert!(split.is_operand(1));
    }

    #[test]
    fn test_leading_end_of_options_marker() {
        let split = split_global_flags(&strings(&["--", "--foo"]));

        assert!(split.global.is_empty());
        assert_eq!(split.command, strings(&["--foo"]));
        assert!(split.is_operand(0));
        assert!(!split_global_flags(&strings(&["--foo"])).is_operand(0));
    }

    #[test]
    fn test_command_flags_untouched() {
        let args = strings(&["cache", "clear", "--all", "-x"]);

        assert_eq!(split_global_flags(&args).command, args);
    }
}
