//! Project Context
//!
//! The project is built lazily, at most once per invocation, and only after
//! the global flags are known.

use std::path::{Path, PathBuf};
use log::debug;

use super::error::ProjectError;
use super::loader::ProjectLoader;
use super::repository::{Repository, RepositoryPool};
use crate::cli::GlobalFlags;

/// A loaded project and the repositories it resolves packages from
#[derive(Debug)]
pub struct ProjectContext {
    name: String,
    root: PathBuf,
    pool: RepositoryPool,
}

impl ProjectContext {
    pub fn new<N: Into<String>, P: Into<PathBuf>>(name: N, root: P, pool: RepositoryPool) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            pool,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Directory containing the project manifest
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn repository_pool(&self) -> &RepositoryPool {
        &self.pool
    }

    pub fn repositories(&self) -> impl Iterator<Item = &dyn Repository> {
        self.pool.repositories()
    }
}

/// Lazily constructed project for one invocation
#[derive(Debug, Default)]
pub enum ProjectSlot {
    #[default]
    Pending,
    Ready(ProjectContext),
}

impl ProjectSlot {
    /// Whether the project has been constructed
    pub fn is_constructed(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Constructed project, if any
    pub fn get(&self) -> Option<&ProjectContext> {
        match self {
            Self::Ready(project) => Some(project),
            Self::Pending => None,
        }
    }

    /// Build the project on first access and return it
    ///
    /// The cache flag is applied to every repository in the pool before the
    /// project becomes visible. A failed load leaves the slot pending.
    pub fn get_or_load(&mut self, loader: &dyn ProjectLoader, flags: &GlobalFlags) -> Result<&ProjectContext, ProjectError> {
        if let Self::Pending = self {
            let mut project = loader.load()?;
            project.pool.apply_cache_policy(flags.disable_cache);
            debug!(
                "Constructed project '{}' with {} repositories (cache disabled: {})",
                project.name,
                project.pool.len(),
                flags.disable_cache
            );
            *self = Self::Ready(project);
        }

        match self {
            Self::Ready(project) => Ok(project),
            Self::Pending => Err(ProjectError::invalid_state("project construction did not complete")),
        }
    }
}
