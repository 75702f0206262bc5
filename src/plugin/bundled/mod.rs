//! Plugins shipped with the binary
//!
//! Bundled plugins are linked in through the catalog like any other plugin
//! and announced through a static entry point source, so `--no-plugins`
//! removes them along with everything else.

pub mod cache;

use super::discovery::{EntryPointDescriptor, StaticPluginSource, APPLICATION_PLUGIN_GROUP};
use super::resolver::PluginCatalog;

pub use cache::CachePlugin;

/// Export every bundled plugin into the catalog
pub fn export_bundled(catalog: &mut PluginCatalog) {
    catalog.export(cache::MODULE, cache::ATTRIBUTE, || Box::new(CachePlugin::new()));
}

/// Entry points announcing the bundled plugins
pub fn bundled_entry_points() -> StaticPluginSource {
    StaticPluginSource::new().with_entry_point(EntryPointDescriptor::new(
        APPLICATION_PLUGIN_GROUP,
        "cache",
        cache::MODULE,
        cache::ATTRIBUTE,
    ))
}
