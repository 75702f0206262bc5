//! Project Loading
//!
//! A project is described by `quire.toml` at its root:
//!
//! ```toml
//! [project]
//! name = "demo"
//!
//! [[source]]
//! name = "internal"
//! url = "https://pkg.example.com/simple"
//! secondary = true
//! ```

use std::collections::HashSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use log::{debug, info};
use serde::Deserialize;

use super::context::ProjectContext;
use super::error::ProjectError;
use super::repository::{RemoteRepository, RepositoryPool};
use crate::config::ConfigManager;

/// File name of the project manifest
pub const PROJECT_MANIFEST: &str = "quire.toml";

/// Name given to the repository configured under `repositories.default-url`
pub const CENTRAL_REPOSITORY: &str = "central";

/// Builds the project context on demand
pub trait ProjectLoader {
    fn load(&self) -> Result<ProjectContext, ProjectError>;
}

impl<F> ProjectLoader for F
where
    F: Fn() -> Result<ProjectContext, ProjectError>,
{
    fn load(&self) -> Result<ProjectContext, ProjectError> {
        self()
    }
}

#[derive(Debug, Deserialize)]
struct ProjectManifest {
    project: ProjectSection,
    #[serde(default, rename = "source")]
    sources: Vec<SourceSection>,
}

#[derive(Debug, Deserialize)]
struct ProjectSection {
    name: String,
}

#[derive(Debug, Deserialize)]
struct SourceSection {
    name: String,
    url: String,
    #[serde(default)]
    default: bool,
    #[serde(default)]
    secondary: bool,
}

/// Loads `quire.toml` from a directory or the nearest ancestor holding one
#[derive(Debug, Clone)]
pub struct FileProjectLoader {
    start: Option<PathBuf>,
    cache_root: PathBuf,
    default_url: String,
}

impl FileProjectLoader {
    /// Search from the current directory, using repository settings from `settings`
    pub fn new(settings: &ConfigManager) -> Self {
        Self {
            start: None,
            cache_root: settings.cache_dir(),
            default_url: settings.default_repository_url(),
        }
    }

    /// Search from `start` instead of the current directory
    pub fn starting_at<P: Into<PathBuf>>(mut self, start: P) -> Self {
        self.start = Some(start.into());
        self
    }

    fn find_manifest(&self) -> Result<PathBuf, ProjectError> {
        let start = match &self.start {
            Some(start) => start.clone(),
            None => env::current_dir()?,
        };

        start
            .ancestors()
            .map(|dir| dir.join(PROJECT_MANIFEST))
            .find(|candidate| candidate.is_file())
            .ok_or(ProjectError::ManifestNotFound { start })
    }

    fn build_pool(&self, sources: Vec<SourceSection>) -> RepositoryPool {
        let mut pool = RepositoryPool::new();
        let remote = |source: &SourceSection| {
            Box::new(RemoteRepository::new(source.name.as_str(), source.url.as_str(), &self.cache_root))
        };

        // Default source first, or the central repository when none is declared
        match sources.iter().find(|source| source.default) {
            Some(source) => {
                pool.add_repository(remote(source));
            }
            None => {
                pool.add_repository(Box::new(RemoteRepository::new(
                    CENTRAL_REPOSITORY,
                    self.default_url.as_str(),
                    &self.cache_root,
                )));
            }
        }

        for source in sources.iter().filter(|s| !s.default && !s.secondary) {
            pool.add_repository(remote(source));
        }
        for source in sources.iter().filter(|s| !s.default && s.secondary) {
            pool.add_repository(remote(source));
        }

        pool
    }
}

impl ProjectLoader for FileProjectLoader {
    fn load(&self) -> Result<ProjectContext, ProjectError> {
        let manifest_path = self.find_manifest()?;
        debug!("Loading project manifest {}", manifest_path.display());

        let content = fs::read_to_string(&manifest_path)?;
        let manifest: ProjectManifest = toml::from_str(&content)
            .map_err(|e| ProjectError::manifest_invalid(&manifest_path, e.to_string()))?;

        let defaults = manifest.sources.iter().filter(|source| source.default).count();
        if defaults > 1 {
            return Err(ProjectError::manifest_invalid(
                &manifest_path,
                "only one source may be marked default",
            ));
        }

        let mut seen = HashSet::new();
        if defaults == 0 {
            seen.insert(CENTRAL_REPOSITORY);
        }
        if let Some(duplicate) = manifest.sources.iter().find(|source| !seen.insert(source.name.as_str())) {
            return Err(ProjectError::manifest_invalid(
                &manifest_path,
                format!("repository \"{}\" is declared more than once", duplicate.name),
            ));
        }

        let root = manifest_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let pool = self.build_pool(manifest.sources);

        info!("Loaded project '{}' from {}", manifest.project.name, root.display());
        Ok(ProjectContext::new(manifest.project.name, root, pool))
    }
}
