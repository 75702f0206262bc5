//! Core colour management for CLI output
//!
//! Colour is decided once per invocation from the output stream and the
//! `--color` / `--no-color` flags; everything else asks the manager.

use colored::{ColoredString, Colorize};

use crate::io::Io;

/// Manages colour output for the CLI application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColourManager {
    enabled: bool,
}

impl ColourManager {
    /// Create a ColourManager with explicit colour control
    pub fn with_colours(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Colour exactly when the stream is decorated
    pub fn for_io(io: &dyn Io) -> Self {
        Self::with_colours(io.is_decorated())
    }

    /// Resolve decoration from the colour flags and terminal detection
    ///
    /// `--no-color` wins over `--color`; either overrides the colored crate's
    /// own environment detection.
    pub fn resolve_decoration(color_flag: bool, no_color_flag: bool, is_terminal: bool) -> bool {
        if no_color_flag {
            colored::control::set_override(false);
            false
        } else if color_flag {
            colored::control::set_override(true);
            true
        } else {
            is_terminal && std::env::var_os("NO_COLOR").is_none()
        }
    }

    /// Check if colours are enabled
    pub fn colours_enabled(&self) -> bool {
        self.enabled
    }

    /// Format text as an error
    pub fn error(&self, text: &str) -> ColoredString {
        self.paint(text, |t| t.white().on_red())
    }

    /// Format text as a warning
    pub fn warning(&self, text: &str) -> ColoredString {
        self.paint(text, |t| t.yellow())
    }

    /// Format text as info
    pub fn info(&self, text: &str) -> ColoredString {
        self.paint(text, |t| t.green())
    }

    /// Format text as a section heading
    pub fn highlight(&self, text: &str) -> ColoredString {
        self.paint(text, |t| t.yellow())
    }

    /// Format text as a command name
    pub fn command(&self, text: &str) -> ColoredString {
        self.paint(text, |t| t.green())
    }

    /// Format secondary text
    pub fn comment(&self, text: &str) -> ColoredString {
        self.paint(text, |t| t.bright_black())
    }

    fn paint<F>(&self, text: &str, style: F) -> ColoredString
    where
        F: Fn(&str) -> ColoredString,
    {
        if self.enabled {
            style(text)
        } else {
            text.normal()
        }
    }
}

impl Default for ColourManager {
    fn default() -> Self {
        Self::with_colours(false)
    }
}
