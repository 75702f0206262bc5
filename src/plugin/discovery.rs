//! Plugin Discovery System
//!
//! Entry points are discovered through a [`PluginSource`]: an in-process
//! registration list, manifest files on disk, or a chain of both. Discovery
//! only describes plugins; nothing is loaded until the resolver runs.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use super::error::{PluginError, PluginResult};

/// Entry point group application plugins register under
pub const APPLICATION_PLUGIN_GROUP: &str = "quire.application.plugin";

/// Reference to pluggable code, not yet resolved
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryPointDescriptor {
    pub group: String,
    pub name: String,
    pub module_ref: String,
    pub attr_ref: String,
}

impl EntryPointDescriptor {
    pub fn new<G, N, M, A>(group: G, name: N, module_ref: M, attr_ref: A) -> Self
    where
        G: Into<String>,
        N: Into<String>,
        M: Into<String>,
        A: Into<String>,
    {
        Self {
            group: group.into(),
            name: name.into(),
            module_ref: module_ref.into(),
            attr_ref: attr_ref.into(),
        }
    }

    /// Parse a `module.path:Attribute` target into a descriptor
    pub fn parse<G: Into<String>, N: Into<String>>(group: G, name: N, target: &str) -> Option<Self> {
        let captures = entry_point_pattern().captures(target.trim())?;
        Some(Self::new(group, name, &captures["module"], &captures["attr"]))
    }

    /// The `module.path:Attribute` target of this entry point
    pub fn target(&self) -> String {
        format!("{}:{}", self.module_ref, self.attr_ref)
    }
}

impl fmt::Display for EntryPointDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.target())
    }
}

fn entry_point_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?P<module>[A-Za-z_][\w]*(?:\.[A-Za-z_][\w]*)*)\s*:\s*(?P<attr>[A-Za-z_][\w]*(?:\.[A-Za-z_][\w]*)*)$")
            .expect("entry point pattern is valid")
    })
}

/// Source of registered entry points
pub trait PluginSource {
    /// Short name used in log messages
    fn source_name(&self) -> &str;

    /// All entry points registered under `group`, in registration order
    ///
    /// An empty result means "no plugins". A source that cannot be read
    /// must return an error instead.
    fn entry_points(&self, group: &str) -> PluginResult<Vec<EntryPointDescriptor>>;
}

/// In-process registration list
#[derive(Debug, Default, Clone)]
pub struct StaticPluginSource {
    entry_points: Vec<EntryPointDescriptor>,
}

impl StaticPluginSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entry point
    pub fn with_entry_point(mut self, entry_point: EntryPointDescriptor) -> Self {
        self.entry_points.push(entry_point);
        self
    }

    /// Register an entry point
    pub fn register(&mut self, entry_point: EntryPointDescriptor) {
        self.entry_points.push(entry_point);
    }
}

impl PluginSource for StaticPluginSource {
    fn source_name(&self) -> &str {
        "static"
    }

    fn entry_points(&self, group: &str) -> PluginResult<Vec<EntryPointDescriptor>> {
        Ok(self.entry_points
            .iter()
            .filter(|entry_point| entry_point.group == group)
            .cloned()
            .collect())
    }
}

/// On-disk plugin manifest
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct PluginManifest {
    name: String,
    #[serde(default = "default_group")]
    group: String,
    entry_point: String,
}

fn default_group() -> String {
    APPLICATION_PLUGIN_GROUP.to_string()
}

/// Manifest files in one or more plugin directories
#[derive(Debug, Clone)]
pub struct ManifestPluginSource {
    directories: Vec<PathBuf>,
}

impl ManifestPluginSource {
    /// Create a source over the given directories
    pub fn new<I, P>(directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            directories: directories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Manifest files of a directory, sorted by path
    fn manifest_files(&self, dir: &Path) -> PluginResult<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(PluginError::discovery_failed(format!(
                "Plugin directory does not exist or is not a directory: {}",
                dir.display()
            )));
        }

        let entries = fs::read_dir(dir)
            .map_err(|e| PluginError::discovery_failed(format!("Failed to read directory {}: {}", dir.display(), e)))?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| PluginError::discovery_failed(format!("Failed to read directory entry: {}", e)))?
                .path();

            let is_manifest = matches!(
                path.extension().and_then(|s| s.to_str()),
                Some("yaml") | Some("yml")
            );
            if path.is_file() && is_manifest {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }

    /// Parse one manifest file
    fn parse_manifest(&self, path: &Path) -> PluginResult<EntryPointDescriptor> {
        let display = path.display().to_string();
        let content = fs::read_to_string(path)
            .map_err(|e| PluginError::manifest_invalid(&display, e.to_string()))?;

        let manifest: PluginManifest = serde_yaml::from_str(&content)
            .map_err(|e| PluginError::manifest_invalid(&display, e.to_string()))?;

        if manifest.name.trim().is_empty() {
            return Err(PluginError::manifest_invalid(&display, "plugin name cannot be empty"));
        }

        EntryPointDescriptor::parse(manifest.group, manifest.name, &manifest.entry_point)
            .ok_or_else(|| PluginError::manifest_invalid(
                &display,
                format!("entry point '{}' is not of the form module.path:Attribute", manifest.entry_point),
            ))
    }
}

impl PluginSource for ManifestPluginSource {
    fn source_name(&self) -> &str {
        "manifest"
    }

    fn entry_points(&self, group: &str) -> PluginResult<Vec<EntryPointDescriptor>> {
        let mut entry_points = Vec::new();

        for dir in &self.directories {
            for path in self.manifest_files(dir)? {
                let entry_point = self.parse_manifest(&path)?;
                debug!("Found plugin manifest {} ({})", path.display(), entry_point);
                if entry_point.group == group {
                    entry_points.push(entry_point);
                }
            }
        }

        Ok(entry_points)
    }
}

/// Several sources consulted in order
#[derive(Default)]
pub struct CompositePluginSource {
    sources: Vec<Box<dyn PluginSource>>,
}

impl CompositePluginSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source<S: PluginSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn push(&mut self, source: Box<dyn PluginSource>) {
        self.sources.push(source);
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl PluginSource for CompositePluginSource {
    fn source_name(&self) -> &str {
        "composite"
    }

    fn entry_points(&self, group: &str) -> PluginResult<Vec<EntryPointDescriptor>> {
        let mut entry_points = Vec::new();
        for source in &self.sources {
            entry_points.extend(source.entry_points(group)?);
        }
        Ok(entry_points)
    }
}

/// Entry points produced by one discovery pass
#[derive(Debug)]
pub struct EntryPoints {
    inner: std::vec::IntoIter<EntryPointDescriptor>,
}

impl Iterator for EntryPoints {
    type Item = EntryPointDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

/// Enumerates entry points of a group from a plugin source
pub struct EntryPointLoader {
    source: Box<dyn PluginSource>,
}

impl EntryPointLoader {
    pub fn new<S: PluginSource + 'static>(source: S) -> Self {
        Self { source: Box::new(source) }
    }

    pub fn from_boxed(source: Box<dyn PluginSource>) -> Self {
        Self { source }
    }

    /// Loader over a source that never yields anything
    pub fn empty() -> Self {
        Self::new(StaticPluginSource::new())
    }

    /// Discover the entry points registered under `group`
    pub fn discover(&self, group: &str) -> PluginResult<EntryPoints> {
        let entry_points = self.source.entry_points(group)?;
        debug!(
            "Discovered {} entry point(s) in group '{}' from {} source",
            entry_points.len(),
            group,
            self.source.source_name()
        );
        Ok(EntryPoints { inner: entry_points.into_iter() })
    }
}

impl Default for EntryPointLoader {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, file: &str, content: &str) {
        fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn test_parse_entry_point_target() {
        let entry_point = EntryPointDescriptor::parse(
            APPLICATION_PLUGIN_GROUP,
            "my-plugin",
            "tests.console.test_application:AddCommandPlugin",
        ).unwrap();

        assert_eq!(entry_point.module_ref, "tests.console.test_application");
        assert_eq!(entry_point.attr_ref, "AddCommandPlugin");
        assert_eq!(entry_point.to_string(), "my-plugin = tests.console.test_application:AddCommandPlugin");
    }

    #[test]
    fn test_parse_rejects_malformed_targets() {
        for target in ["", "module", ":Attr", "module:", "mod ule:Attr", "module:Attr:Extra", "1mod:Attr"] {
            assert!(
                EntryPointDescriptor::parse(APPLICATION_PLUGIN_GROUP, "p", target).is_none(),
                "target {:?} should be rejected", target
            );
        }
        assert!(EntryPointDescriptor::parse(APPLICATION_PLUGIN_GROUP, "p", " pkg.mod : Attr ").is_some());
    }

    #[test]
    fn test_static_source_filters_by_group() {
        let source = StaticPluginSource::new()
            .with_entry_point(EntryPointDescriptor::new(APPLICATION_PLUGIN_GROUP, "a", "mod", "A"))
            .with_entry_point(EntryPointDescriptor::new("other.group", "b", "mod", "B"))
            .with_entry_point(EntryPointDescriptor::new(APPLICATION_PLUGIN_GROUP, "c", "mod", "C"));

        let names: Vec<String> = source.entry_points(APPLICATION_PLUGIN_GROUP).unwrap()
            .into_iter().map(|e| e.name).collect();

        assert_eq!(names, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_loader_over_empty_source() {
        let loader = EntryPointLoader::empty();
        assert_eq!(loader.discover(APPLICATION_PLUGIN_GROUP).unwrap().count(), 0);
    }

    #[test]
    fn test_manifest_source_reads_sorted_manifests() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "b.yaml", "name: second\nentry-point: pkg.b:Plugin\n");
        write_manifest(dir.path(), "a.yml", "name: first\nentry-point: pkg.a:Plugin\n");
        write_manifest(dir.path(), "notes.txt", "not a manifest");
        write_manifest(dir.path(), "c.yaml", "name: other\ngroup: other.group\nentry-point: pkg.c:Plugin\n");

        let source = ManifestPluginSource::new([dir.path()]);
        let entry_points = source.entry_points(APPLICATION_PLUGIN_GROUP).unwrap();

        let names: Vec<&str> = entry_points.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(entry_points[0].module_ref, "pkg.a");
        assert_eq!(entry_points[0].attr_ref, "Plugin");
    }

    #[test]
    fn test_missing_directory_is_a_discovery_error() {
        let dir = TempDir::new().unwrap();
        let source = ManifestPluginSource::new([dir.path().join("missing")]);

        let error = source.entry_points(APPLICATION_PLUGIN_GROUP).unwrap_err();
        assert!(error.is_discovery_error());
    }

    #[test]
    fn test_corrupt_manifest_is_a_discovery_error() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "broken.yaml", "name: [unterminated\n");

        let source = ManifestPluginSource::new([dir.path()]);
        let error = source.entry_points(APPLICATION_PLUGIN_GROUP).unwrap_err();

        assert!(matches!(error, PluginError::ManifestInvalid { .. }));
        assert!(error.is_discovery_error());
    }

    #[test]
    fn test_bad_entry_point_is_a_discovery_error() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "bad.yaml", "name: bad\nentry-point: not-a-target\n");

        let source = ManifestPluginSource::new([dir.path()]);
        assert!(source.entry_points(APPLICATION_PLUGIN_GROUP).unwrap_err().is_discovery_error());
    }

    #[test]
    fn test_composite_source_preserves_order() {
        let dir = TempDir::new().unwrap();
        write_manifest(dir.path(), "disk.yaml", "name: disk\nentry-point: pkg.disk:Plugin\n");

        let source = CompositePluginSource::new()
            .with_source(StaticPluginSource::new()
                .with_entry_point(EntryPointDescriptor::new(APPLICATION_PLUGIN_GROUP, "bundled", "pkg.bundled", "Plugin")))
            .with_source(ManifestPluginSource::new([dir.path()]));

        let loader = EntryPointLoader::new(source);
        let names: Vec<String> = loader.discover(APPLICATION_PLUGIN_GROUP).unwrap().map(|e| e.name).collect();

        assert_eq!(names, vec!["bundled".to_string(), "disk".to_string()]);
    }

    #[test]
    fn test_composite_source_propagates_failures() {
        let dir = TempDir::new().unwrap();
        let source = CompositePluginSource::new()
            .with_source(StaticPluginSource::new())
            .with_source(ManifestPluginSource::new([dir.path().join("gone")]));

        assert!(EntryPointLoader::new(source).discover(APPLICATION_PLUGIN_GROUP).is_err());
    }
}
