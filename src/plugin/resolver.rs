//! Plugin Resolution
//!
//! Plugins are trusted code linked into the process. The catalog maps the
//! `module:attribute` targets that entry points name onto that code; the
//! resolver turns a discovered entry point into a live plugin and activates
//! it against the command registry.

use std::collections::BTreeMap;
use std::sync::Arc;
use log::{debug, info};

use super::discovery::EntryPointDescriptor;
use super::error::{PluginError, PluginResult};
use super::traits::{ApplicationPlugin, DeclarativePlugin};
use crate::command::{CommandDescriptor, CommandOrigin, CommandRegistry};

/// Constructor for a plugin exported by a module
pub type PluginFactory = Arc<dyn Fn() -> Box<dyn ApplicationPlugin> + Send + Sync>;

/// Linkable plugin code, keyed by module path and attribute name
#[derive(Default, Clone)]
pub struct PluginCatalog {
    modules: BTreeMap<String, BTreeMap<String, PluginFactory>>,
}

impl PluginCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Export a plugin under `module:attribute`
    pub fn export<M, A, F>(&mut self, module: M, attribute: A, factory: F) -> &mut Self
    where
        M: Into<String>,
        A: Into<String>,
        F: Fn() -> Box<dyn ApplicationPlugin> + Send + Sync + 'static,
    {
        self.modules
            .entry(module.into())
            .or_default()
            .insert(attribute.into(), Arc::new(factory));
        self
    }

    /// Export a declarative command list under `module:attribute`
    pub fn export_commands<M, A, F>(&mut self, module: M, attribute: A, commands: F) -> &mut Self
    where
        M: Into<String>,
        A: Into<String>,
        F: Fn() -> Vec<CommandDescriptor> + Send + Sync + 'static,
    {
        self.export(module, attribute, move || {
            Box::new(DeclarativePlugin::new(commands())) as Box<dyn ApplicationPlugin>
        })
    }

    /// Check if a module is linked in
    pub fn has_module(&self, module: &str) -> bool {
        self.modules.contains_key(module)
    }

    /// All exported `module:attribute` targets
    pub fn targets(&self) -> Vec<String> {
        self.modules
            .iter()
            .flat_map(|(module, attributes)| {
                attributes.keys().map(move |attribute| format!("{}:{}", module, attribute))
            })
            .collect()
    }

    fn factory(&self, module: &str, attribute: &str) -> PluginResult<&PluginFactory> {
        let attributes = self.modules
            .get(module)
            .ok_or_else(|| PluginError::module_not_found(module))?;

        attributes
            .get(attribute)
            .ok_or_else(|| PluginError::attribute_not_found(module, attribute))
    }
}

/// A plugin resolved from its entry point
pub struct LoadedPlugin {
    name: String,
    plugin: Box<dyn ApplicationPlugin>,
}

impl LoadedPlugin {
    /// Entry point name the plugin was loaded from
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn plugin(&self) -> &dyn ApplicationPlugin {
        self.plugin.as_ref()
    }
}

/// Resolves entry points against a catalog and activates the result
#[derive(Default, Clone)]
pub struct PluginResolver {
    catalog: PluginCatalog,
}

impl PluginResolver {
    pub fn new(catalog: PluginCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &PluginCatalog {
        &self.catalog
    }

    /// Load the code an entry point refers to
    pub fn resolve(&self, entry_point: &EntryPointDescriptor) -> PluginResult<LoadedPlugin> {
        debug!("Resolving plugin entry point {}", entry_point);
        let factory = self.catalog.factory(&entry_point.module_ref, &entry_point.attr_ref)?;

        Ok(LoadedPlugin {
            name: entry_point.name.clone(),
            plugin: factory(),
        })
    }

    /// Let a plugin register its commands
    ///
    /// The plugin activates against an empty staging registry which is then
    /// merged as a whole. A plugin that fails or collides contributes nothing.
    pub fn activate(&self, loaded: &LoadedPlugin, registry: &mut CommandRegistry) -> PluginResult<Vec<String>> {
        let mut staged = CommandRegistry::new();
        loaded.plugin.activate(&mut staged).map_err(|e| match e {
            PluginError::Registration { message } => PluginError::activation_failed(&loaded.name, message),
            other => other,
        })?;

        let names = registry
            .merge(staged, CommandOrigin::plugin(&loaded.name))
            .map_err(|e| PluginError::from_command_error(&loaded.name, e))?;

        info!("Activated plugin '{}' ({} command(s))", loaded.name, names.len());
        Ok(names)
    }
}
