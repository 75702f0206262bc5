//! Command Output Streams
//!
//! Commands never print directly. Everything a command or the framework
//! writes goes through an [`Io`] so the process streams can be swapped for
//! in-memory buffers when the application is driven from tests.

use std::io::{self, IsTerminal, Write};

/// Output and error streams available to a running command
pub trait Io {
    /// Write text to the output stream
    fn write(&mut self, text: &str);

    /// Write text to the error stream
    fn write_error(&mut self, text: &str);

    /// Whether the output stream accepts ANSI decoration
    fn is_decorated(&self) -> bool;

    /// Write a line to the output stream
    fn write_line(&mut self, text: &str) {
        self.write(text);
        self.write("\n");
    }

    /// Write a line to the error stream
    fn write_error_line(&mut self, text: &str) {
        self.write_error(text);
        self.write_error("\n");
    }
}

/// Process stdout/stderr
#[derive(Debug)]
pub struct ConsoleIo {
    decorated: bool,
}

impl ConsoleIo {
    /// Create console streams, decorating only when stdout is a terminal
    pub fn new() -> Self {
        Self {
            decorated: io::stdout().is_terminal(),
        }
    }

    /// Create console streams with explicit decoration
    pub fn with_decoration(decorated: bool) -> Self {
        Self { decorated }
    }
}

impl Default for ConsoleIo {
    fn default() -> Self {
        Self::new()
    }
}

impl Io for ConsoleIo {
    fn write(&mut self, text: &str) {
        let mut stdout = io::stdout().lock();
        // A closed pipe is not worth a panic
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn write_error(&mut self, text: &str) {
        let mut stderr = io::stderr().lock();
        let _ = stderr.write_all(text.as_bytes());
        let _ = stderr.flush();
    }

    fn is_decorated(&self) -> bool {
        self.decorated
    }
}

/// In-memory streams capturing everything written
#[derive(Debug, Default, Clone)]
pub struct BufferedIo {
    output: String,
    error: String,
    decorated: bool,
}

impl BufferedIo {
    /// Create empty, undecorated buffers
    pub fn new() -> Self {
        Self::default()
    }

    /// Create buffers that report themselves as decorated
    pub fn decorated() -> Self {
        Self {
            decorated: true,
            ..Self::default()
        }
    }

    /// Everything written to the output stream so far
    pub fn fetch_output(&self) -> &str {
        &self.output
    }

    /// Everything written to the error stream so far
    pub fn fetch_error(&self) -> &str {
        &self.error
    }

    /// Drop captured content from both streams
    pub fn clear(&mut self) {
        self.output.clear();
        self.error.clear();
    }
}

impl Io for BufferedIo {
    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn write_error(&mut self, text: &str) {
        self.error.push_str(text);
    }

    fn is_decorated(&self) -> bool {
        self.decorated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffered_io_separates_streams() {
        let mut io = BufferedIo::new();
        io.write_line("out");
        io.write_error_line("err");

        assert_eq!(io.fetch_output(), "out\n");
        assert_eq!(io.fetch_error(), "err\n");
    }

    #[test]
    fn test_buffered_io_clear() {
        let mut io = BufferedIo::new();
        io.write("partial");
        io.write_error("partial");
        io.clear();

        assert!(io.fetch_output().is_empty());
        assert!(io.fetch_error().is_empty());
    }

    #[test]
    fn test_decoration() {
        assert!(!BufferedIo::new().is_decorated());
        assert!(BufferedIo::decorated().is_decorated());
        assert!(ConsoleIo::with_decoration(true).is_decorated());
    }
}
