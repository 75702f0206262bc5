//! Help formatter for the command listing and per-command help
//!
//! Colour is applied through the [`ColourManager`], so undecorated output is
//! plain text suitable for matching in tests.

use crate::command::{AppInfo, CommandDescriptor, CommandRegistry};
use crate::display::ColourManager;

/// Global options shown in the listing, in display order
const GLOBAL_OPTIONS: &[(&str, &str)] = &[
    ("-h, --help", "Display help for the given command. When no command is given display help for the list command"),
    ("-V, --version", "Display this application version"),
    ("-v, --verbose", "Verbose output (debug level logging)"),
    ("-q, --quiet", "Quiet output (error level logging only)"),
    ("    --debug", "Debug output (trace level logging)"),
    ("    --color", "Force colored output"),
    ("    --no-color", "Disable colored output"),
    ("    --no-plugins", "Disables plugins"),
    ("    --no-cache", "Disables repository caches"),
    ("    --config-file FILE", "Configuration file path"),
    ("    --log-format FORMAT", "Log format: text or json"),
    ("    --log-file FILE", "Log file path for file output"),
    ("    --log-file-level LEVEL", "Log level for file output"),
];

/// Help formatter for CLI output
pub struct HelpFormatter {
    colour_manager: ColourManager,
}

impl HelpFormatter {
    pub fn new(colour_manager: ColourManager) -> Self {
        Self { colour_manager }
    }

    /// Banner, usage, global options and every registered command
    pub fn format_command_list(&self, app_info: &AppInfo, registry: &CommandRegistry) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n\n", self.colour_manager.info(&app_info.long_version())));

        self.push_heading(&mut output, "Usage:");
        output.push_str("  command [options] [arguments]\n\n");

        self.push_heading(&mut output, "Options:");
        let option_width = GLOBAL_OPTIONS.iter().map(|(flags, _)| flags.len()).max().unwrap_or(0);
        for (flags, description) in GLOBAL_OPTIONS {
            self.push_row(&mut output, flags, description, option_width);
        }
        output.push('\n');

        self.push_heading(&mut output, "Available commands:");
        let commands = registry.sorted();
        let name_width = commands.iter().map(|command| command.name().len()).max().unwrap_or(0);

        // Top-level commands first, then one block per namespace
        for command in commands.iter().filter(|command| command.namespace().is_none()) {
            self.push_row(&mut output, command.name(), command.description(), name_width);
        }

        let mut current_namespace: Option<&str> = None;
        for command in commands.iter().filter(|command| command.namespace().is_some()) {
            if command.namespace() != current_namespace {
                current_namespace = command.namespace();
                if let Some(namespace) = current_namespace {
                    output.push_str(&format!(" {}\n", self.colour_manager.highlight(namespace)));
                }
            }
            self.push_row(&mut output, command.name(), command.description(), name_width);
        }

        output
    }

    /// Description, usage and long help of a single command
    pub fn format_command_help(&self, command: &CommandDescriptor) -> String {
        let mut output = String::new();

        self.push_heading(&mut output, "Description:");
        output.push_str(&format!("  {}\n\n", command.description()));

        self.push_heading(&mut output, "Usage:");
        output.push_str(&format!("  {} [options] [--] [<arguments>...]\n", command.name()));

        if let Some(help) = command.help() {
            output.push('\n');
            self.push_heading(&mut output, "Help:");
            for line in help.lines() {
                if !line.is_empty() {
                    output.push_str("  ");
                    output.push_str(line);
                }
                output.push('\n');
            }
        }

        output
    }

    fn push_heading(&self, output: &mut String, heading: &str) {
        output.push_str(&format!("{}\n", self.colour_manager.highlight(heading)));
    }

    fn push_row(&self, output: &mut String, name: &str, description: &str, width: usize) {
        let padded = format!("{:<width$}", name, width = width);
        output.push_str(&format!("  {}  {}\n", self.colour_manager.command(&padded), description));
    }
}
