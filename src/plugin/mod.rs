//! Plugin System Module
//!
//! Plugins are discovered as entry points of a fixed group, resolved against
//! the catalog of linked plugin code and activated against the command
//! registry. One plugin failing never stops the others.
//!
//! # Example Usage
//!
//! ```no_run
//! use quire::command::{CommandDescriptor, CommandRegistry};
//! use quire::plugin::{
//!     activate_plugins, EntryPointDescriptor, EntryPointLoader, PluginCatalog, PluginResolver,
//!     StaticPluginSource, APPLICATION_PLUGIN_GROUP,
//! };
//!
//! let mut catalog = PluginCatalog::new();
//! catalog.export_commands("acme.plugins", "Greeter", || {
//!     vec![CommandDescriptor::from_fn("greet", "Says hello.", |ctx| {
//!         ctx.line("hello");
//!         Ok(0)
//!     })]
//! });
//!
//! let source = StaticPluginSource::new().with_entry_point(EntryPointDescriptor::new(
//!     APPLICATION_PLUGIN_GROUP, "greeter", "acme.plugins", "Greeter",
//! ));
//! let entry_points = EntryPointLoader::new(source).discover(APPLICATION_PLUGIN_GROUP)?;
//!
//! let mut registry = CommandRegistry::new();
//! let report = activate_plugins(entry_points, &PluginResolver::new(catalog), &mut registry);
//! assert!(report.is_clean());
//! # Ok::<(), quire::plugin::PluginError>(())
//! ```

pub mod bundled;
pub mod discovery;
pub mod error;
pub mod manager;
pub mod resolver;
pub mod traits;

#[cfg(test)]
pub mod tests;

// Re-export core types for easier access
pub use discovery::{
    CompositePluginSource, EntryPointDescriptor, EntryPointLoader, EntryPoints, ManifestPluginSource,
    PluginSource, StaticPluginSource, APPLICATION_PLUGIN_GROUP,
};
pub use error::{PluginError, PluginResult};
pub use manager::{activate_plugins, ActivatedPlugin, PluginFailure, PluginReport};
pub use resolver::{LoadedPlugin, PluginCatalog, PluginFactory, PluginResolver};
pub use traits::{ApplicationPlugin, DeclarativePlugin};
