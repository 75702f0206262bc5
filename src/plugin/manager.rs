//! Plugin activation pass
//!
//! Walks discovered entry points in order, isolating every failure to the
//! plugin that caused it.

use log::warn;

use super::discovery::EntryPointDescriptor;
use super::error::PluginError;
use super::resolver::PluginResolver;
use crate::command::CommandRegistry;

/// A plugin that registered successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivatedPlugin {
    pub name: String,
    pub target: String,
    pub commands: Vec<String>,
}

/// A plugin that could not be resolved or activated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginFailure {
    pub name: String,
    pub target: String,
    pub error: PluginError,
}

/// Outcome of one activation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PluginReport {
    /// False when plugins were disabled for the invocation
    pub enabled: bool,
    pub activated: Vec<ActivatedPlugin>,
    pub failures: Vec<PluginFailure>,
}

impl PluginReport {
    /// Report for an invocation that skipped plugins
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn activated_names(&self) -> Vec<&str> {
        self.activated.iter().map(|plugin| plugin.name.as_str()).collect()
    }
}

/// Resolve and activate every entry point, in discovery order
pub fn activate_plugins<I>(
    entry_points: I,
    resolver: &PluginResolver,
    registry: &mut CommandRegistry,
) -> PluginReport
where
    I: IntoIterator<Item = EntryPointDescriptor>,
{
    let mut report = PluginReport {
        enabled: true,
        ..PluginReport::default()
    };

    for entry_point in entry_points {
        let outcome = resolver
            .resolve(&entry_point)
            .and_then(|loaded| resolver.activate(&loaded, registry));

        match outcome {
            Ok(commands) => report.activated.push(ActivatedPlugin {
                name: entry_point.name.clone(),
                target: entry_point.target(),
                commands,
            }),
            Err(error) => {
                warn!("Skipping plugin '{}' ({}): {}", entry_point.name, entry_point.target(), error);
                report.failures.push(PluginFailure {
                    name: entry_point.name.clone(),
                    target: entry_point.target(),
                    error,
                });
            }
        }
    }

    report
}
