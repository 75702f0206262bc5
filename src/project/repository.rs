//! Package Repositories
//!
//! A project resolves packages from an ordered pool of repositories. Every
//! repository can have its local cache switched off.

use std::fmt;
use std::path::{Path, PathBuf};
use log::debug;

/// A source of packages
pub trait Repository: fmt::Debug + Send + Sync {
    fn name(&self) -> &str;

    fn url(&self) -> &str;

    /// Whether lookups bypass the local cache
    fn is_cache_disabled(&self) -> bool;

    fn set_cache_disabled(&mut self, disabled: bool);

    /// Directory holding this repository's cache, when it has one
    fn cache_path(&self) -> Option<&Path> {
        None
    }
}

/// Repository reached over HTTP, cached under `<cache root>/<name>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteRepository {
    name: String,
    url: String,
    cache_path: PathBuf,
    cache_disabled: bool,
}

impl RemoteRepository {
    pub fn new<N: Into<String>, U: Into<String>>(name: N, url: U, cache_root: &Path) -> Self {
        let name = name.into();
        let cache_path = cache_root.join(&name);
        Self {
            name,
            url: url.into(),
            cache_path,
            cache_disabled: false,
        }
    }
}

impl Repository for RemoteRepository {
    fn name(&self) -> &str {
        &self.name
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn is_cache_disabled(&self) -> bool {
        self.cache_disabled
    }

    fn set_cache_disabled(&mut self, disabled: bool) {
        self.cache_disabled = disabled;
    }

    fn cache_path(&self) -> Option<&Path> {
        Some(&self.cache_path)
    }
}

/// Ordered collection of repositories, searched first to last
#[derive(Debug, Default)]
pub struct RepositoryPool {
    repositories: Vec<Box<dyn Repository>>,
}

impl RepositoryPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a repository; a name already in the pool is ignored
    pub fn add_repository(&mut self, repository: Box<dyn Repository>) -> bool {
        if self.has_repository(repository.name()) {
            debug!("Repository '{}' already in pool", repository.name());
            return false;
        }
        self.repositories.push(repository);
        true
    }

    pub fn repositories(&self) -> impl Iterator<Item = &dyn Repository> {
        self.repositories.iter().map(|repository| repository.as_ref())
    }

    pub fn repository(&self, name: &str) -> Option<&dyn Repository> {
        self.repositories()
            .find(|repository| repository.name() == name)
    }

    pub fn has_repository(&self, name: &str) -> bool {
        self.repository(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.repositories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }

    /// Apply the invocation's cache policy to every repository
    pub(crate) fn apply_cache_policy(&mut self, disable_cache: bool) {
        for repository in &mut self.repositories {
            repository.set_cache_disabled(disable_cache);
        }
    }
}
