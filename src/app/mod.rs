//! Application orchestration module

pub mod application;
pub mod initialization;

pub use application::{Application, ApplicationBuilder, ApplicationError, ApplicationState};
pub use initialization::{build_application, configure_logging, load_configuration, log_config};
