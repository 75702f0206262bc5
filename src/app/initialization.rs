//! Application initialization and configuration

use anyhow::{Context, Result};
use log::{debug, LevelFilter};
use std::str::FromStr;

use crate::app::{Application, ApplicationBuilder};
use crate::cli::GlobalArgs;
use crate::config::ConfigManager;
use crate::logging::{self, LogConfig, LogDestination, LogFormat};
use crate::plugin::ManifestPluginSource;

pub fn load_configuration(args: &GlobalArgs) -> Result<ConfigManager> {
    if let Some(config_file) = &args.config_file {
        debug!("Loading configuration from explicit file: {}", config_file.display());
        ConfigManager::load_from_file(config_file.clone())
    } else {
        ConfigManager::load()
    }
}

/// Logging configuration from flags, falling back to the config file
///
/// Precedence for the console level: `--debug`, `--verbose`, `--quiet`,
/// `[base] console-level`, then warn.
pub fn log_config(args: &GlobalArgs, config: &ConfigManager) -> Result<LogConfig> {
    let console_level = if args.debug {
        LevelFilter::Trace
    } else if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Error
    } else {
        config.get_log_level("base", "console-level")?.unwrap_or(LevelFilter::Warn)
    };

    let format = match args.log_format.as_deref().or(config.get_value_root("log-format").map(String::as_str)) {
        Some(format) => LogFormat::from_str(format).map_err(|e| anyhow::anyhow!(e))?,
        None => LogFormat::Text,
    };

    let log_file = args.log_file.clone().or_else(|| config.get_path("base", "log-file"));

    let file_level = match (&log_file, &args.log_file_level) {
        (None, _) => None,
        (Some(_), Some(level)) => Some(logging::parse_log_level(level)?),
        (Some(_), None) => Some(
            config.get_log_level("base", "file-log-level")?.unwrap_or(console_level),
        ),
    };

    Ok(LogConfig {
        console_level,
        file_level,
        format,
        destination: LogDestination::for_file(log_file),
    })
}

pub fn configure_logging(args: &GlobalArgs, config: &ConfigManager) -> Result<()> {
    let log_config = log_config(args, config)?;
    logging::init_logger(log_config.clone())
        .context("Failed to initialize logging")?;
    debug!("Logging configured: {:?}", log_config);
    Ok(())
}

/// Application wired with the bundled plugins, configured plugin
/// directories and the `quire.toml` project loader
pub fn build_application(settings: ConfigManager) -> Result<Application> {
    let plugin_directories = settings.plugin_directories();
    debug!("Plugin manifest directories: {:?}", plugin_directories);

    let mut builder = ApplicationBuilder::new().with_bundled_plugins();
    if !plugin_directories.is_empty() {
        builder = builder.plugin_source(ManifestPluginSource::new(plugin_directories));
    }

    builder
        .settings(settings)
        .build()
        .context("Failed to build application")
}
