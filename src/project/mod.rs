//! Project Module
//!
//! Project manifest loading, the lazily built project context and the
//! repository pool it resolves packages from.

pub mod context;
pub mod error;
pub mod loader;
pub mod repository;

pub use context::{ProjectContext, ProjectSlot};
pub use error::ProjectError;
pub use loader::{FileProjectLoader, ProjectLoader, PROJECT_MANIFEST};
pub use repository::{RemoteRepository, Repository, RepositoryPool};
