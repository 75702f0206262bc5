//! Quire: plugin-aware command orchestration
//!
//! Plugins discovered from entry points contribute commands to a shared
//! registry; an [`app::Application`] parses global flags, activates plugins
//! unless `--no-plugins` is given and dispatches one command per invocation.

pub mod app;
pub mod cli;
pub mod command;
pub mod config;
pub mod display;
pub mod io;
pub mod logging;
pub mod plugin;
pub mod project;
