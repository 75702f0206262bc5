//! Application orchestrator
//!
//! One [`Application`] serves exactly one invocation:
//! `Created → FlagsParsed → PluginsResolved | PluginsSkipped → CommandResolved → Executed → Terminated`.
//! Flags are fixed before plugins activate or the project is built, and a
//! plugin's code never runs when plugins are disabled.

use std::fmt;
use log::{debug, info};
use thiserror::Error;

use crate::cli::{parse_invocation, GlobalFlags, Invocation};
use crate::command::builtin::{register_builtins, HELP_COMMAND, LIST_COMMAND};
use crate::command::{AppInfo, CommandContext, CommandError, CommandRegistry};
use crate::config::ConfigManager;
use crate::io::Io;
use crate::plugin::bundled::{bundled_entry_points, export_bundled};
use crate::plugin::{
    activate_plugins, CompositePluginSource, EntryPointLoader, PluginCatalog, PluginError, PluginReport,
    PluginResolver, PluginSource, APPLICATION_PLUGIN_GROUP,
};
use crate::project::{FileProjectLoader, ProjectContext, ProjectError, ProjectLoader, ProjectSlot};

/// Errors that abort an invocation before any command runs
#[derive(Error, Debug)]
pub enum ApplicationError {
    /// The plugin entry point source could not be enumerated
    #[error(transparent)]
    Discovery(#[from] PluginError),

    #[error("Invalid application state: {message}")]
    InvalidState { message: String },
}

impl ApplicationError {
    /// Create an invalid state error
    pub fn invalid_state<S: Into<String>>(message: S) -> Self {
        Self::InvalidState { message: message.into() }
    }
}

/// Phase an application has reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationState {
    Created,
    FlagsParsed,
    PluginsResolved,
    PluginsSkipped,
    CommandResolved,
    Executed,
    Terminated,
}

impl fmt::Display for ApplicationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Assembles an [`Application`] from its collaborators
pub struct ApplicationBuilder {
    app_info: AppInfo,
    settings: ConfigManager,
    sources: CompositePluginSource,
    catalog: PluginCatalog,
    project_loader: Option<Box<dyn ProjectLoader>>,
}

impl ApplicationBuilder {
    pub fn new() -> Self {
        Self {
            app_info: AppInfo::default(),
            settings: ConfigManager::default(),
            sources: CompositePluginSource::new(),
            catalog: PluginCatalog::new(),
            project_loader: None,
        }
    }

    pub fn app_info(mut self, app_info: AppInfo) -> Self {
        self.app_info = app_info;
        self
    }

    pub fn settings(mut self, settings: ConfigManager) -> Self {
        self.settings = settings;
        self
    }

    /// Add a source of plugin entry points; sources are consulted in order
    pub fn plugin_source<S: PluginSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Replace the catalog of linkable plugin code
    pub fn catalog(mut self, catalog: PluginCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Link in and announce the plugins shipped with the binary
    pub fn with_bundled_plugins(mut self) -> Self {
        export_bundled(&mut self.catalog);
        self.sources.push(Box::new(bundled_entry_points()));
        self
    }

    /// Use `loader` instead of searching for `quire.toml`
    pub fn project_loader<L: ProjectLoader + 'static>(mut self, loader: L) -> Self {
        self.project_loader = Some(Box::new(loader));
        self
    }

    pub fn build(self) -> Result<Application, ApplicationError> {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry)
            .map_err(|e| ApplicationError::invalid_state(format!("built-in commands: {}", e)))?;

        let project_loader = match self.project_loader {
            Some(loader) => loader,
            None => Box::new(FileProjectLoader::new(&self.settings)),
        };

        Ok(Application {
            app_info: self.app_info,
            settings: self.settings,
            entry_points: EntryPointLoader::from_boxed(Box::new(self.sources)),
            resolver: PluginResolver::new(self.catalog),
            project_loader,
            registry,
            flags: None,
            plugins: PluginReport::disabled(),
            project: ProjectSlot::default(),
            state: ApplicationState::Created,
            exit_code: None,
        })
    }
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Plugin-aware command dispatcher for a single invocation
pub struct Application {
    app_info: AppInfo,
    settings: ConfigManager,
    entry_points: EntryPointLoader,
    resolver: PluginResolver,
    project_loader: Box<dyn ProjectLoader>,
    registry: CommandRegistry,
    flags: Option<GlobalFlags>,
    plugins: PluginReport,
    project: ProjectSlot,
    state: ApplicationState,
    exit_code: Option<i32>,
}

impl Application {
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::new()
    }

    /// Parse `args` (without the program name) and execute the invocation
    ///
    /// Malformed global arguments are reported on the error stream and
    /// yield status 1.
    pub fn run<I, S>(&mut self, args: I, io: &mut dyn Io) -> Result<i32, ApplicationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_state(ApplicationState::Created)?;

        match parse_invocation(args) {
            Ok(invocation) => self.execute(invocation, io),
            Err(e) => {
                render_error(io, &e.to_string());
                Ok(self.terminate(1))
            }
        }
    }

    /// Execute a parsed invocation
    ///
    /// Only a broken plugin source aborts with `Err`; every other failure is
    /// reported on the error stream and reflected in the returned status.
    pub fn execute(&mut self, invocation: Invocation, io: &mut dyn Io) -> Result<i32, ApplicationError> {
        self.ensure_state(ApplicationState::Created)?;

        let flags = invocation.flags;
        self.flags = Some(flags);
        self.transition(ApplicationState::FlagsParsed);

        if invocation.globals.version {
            io.write_line(&self.app_info.long_version());
            return Ok(self.terminate(0));
        }

        if flags.disable_plugins {
            info!("Plugins disabled for this invocation");
            self.plugins = PluginReport::disabled();
            self.transition(ApplicationState::PluginsSkipped);
        } else {
            let entry_points = match self.entry_points.discover(APPLICATION_PLUGIN_GROUP) {
                Ok(entry_points) => entry_points,
                Err(e) => {
                    self.terminate(1);
                    return Err(ApplicationError::Discovery(e));
                }
            };
            self.plugins = activate_plugins(entry_points, &self.resolver, &mut self.registry);
            self.transition(ApplicationState::PluginsResolved);
        }

        let tokens = command_tokens(&invocation);
        let (name, args) = match resolve_command(&self.registry, &tokens) {
            Ok(resolved) => resolved,
            Err(e) => {
                render_error(io, &e.to_string());
                return Ok(self.terminate(1));
            }
        };
        self.transition(ApplicationState::CommandResolved);

        let handler = self.registry.lookup(&name)
            .map_err(|e| ApplicationError::invalid_state(e.to_string()))?
            .handler();

        let result = {
            let mut ctx = CommandContext {
                name: &name,
                args: &args,
                flags: &flags,
                io: &mut *io,
                registry: &self.registry,
                plugins: &self.plugins,
                settings: &self.settings,
                app_info: &self.app_info,
                project: &mut self.project,
                project_loader: self.project_loader.as_ref(),
            };
            handler.handle(&mut ctx)
        };
        self.transition(ApplicationState::Executed);

        let code = match result {
            Ok(code) => code,
            Err(e) => {
                debug!("Command '{}' failed: {:#}", name, e);
                render_error(io, &e.to_string());
                1
            }
        };

        Ok(self.terminate(code))
    }

    /// Project context, constructed on first access with the invocation's cache flag
    pub fn project(&mut self) -> Result<&ProjectContext, ProjectError> {
        let flags = self.flags
            .ok_or_else(|| ProjectError::invalid_state("global flags have not been parsed"))?;
        self.project.get_or_load(self.project_loader.as_ref(), &flags)
    }

    /// Whether the project context has been constructed
    pub fn has_project(&self) -> bool {
        self.project.is_constructed()
    }

    pub fn state(&self) -> ApplicationState {
        self.state
    }

    /// Flags of the current invocation, once parsed
    pub fn flags(&self) -> Option<GlobalFlags> {
        self.flags
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn plugins(&self) -> &PluginReport {
        &self.plugins
    }

    pub fn app_info(&self) -> &AppInfo {
        &self.app_info
    }

    /// Status of a terminated invocation
    pub fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    fn ensure_state(&self, expected: ApplicationState) -> Result<(), ApplicationError> {
        if self.state != expected {
            return Err(ApplicationError::invalid_state(format!(
                "expected {}, application is {}; an application serves a single invocation",
                expected, self.state
            )));
        }
        Ok(())
    }

    fn transition(&mut self, next: ApplicationState) {
        debug!("Application state: {} -> {}", self.state, next);
        self.state = next;
    }

    fn terminate(&mut self, code: i32) -> i32 {
        self.transition(ApplicationState::Terminated);
        self.exit_code = Some(code);
        code
    }
}

/// Command tokens after applying `--help` and the default command
fn command_tokens(invocation: &Invocation) -> Vec<String> {
    if invocation.globals.help {
        if invocation.has_command() {
            return std::iter::once(HELP_COMMAND.to_string())
                .chain(invocation.command.iter().cloned())
                .collect();
        }
        return vec![LIST_COMMAND.to_string()];
    }

    if invocation.has_command() {
        invocation.command.clone()
    } else {
        vec![LIST_COMMAND.to_string()]
    }
}

/// Split tokens into a registered command name and its arguments
///
/// The longest run of leading words naming a command wins, so `debug info`
/// resolves before `debug`. Unknown names report the first word.
fn resolve_command(registry: &CommandRegistry, tokens: &[String]) -> Result<(String, Vec<String>), CommandError> {
    let words = tokens.iter().take_while(|token| !token.starts_with('-')).count();

    for length in (1..=words).rev() {
        let candidate = tokens[..length].join(" ");
        if registry.contains(&candidate) {
            debug!("Resolved command '{}'", candidate);
            return Ok((candidate, tokens[length..].to_vec()));
        }
    }

    let name = tokens.first().cloned().unwrap_or_default();
    Err(CommandError::not_found(name))
}

/// Framework errors are framed by blank lines on the error stream
fn render_error(io: &mut dyn Io, message: &str) {
    io.write_error(&format!("\n{}\n", message));
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;
    use crate::command::CommandDescriptor;
    use crate::io::BufferedIo;
    use crate::plugin::tests::mock_plugins::{mock_catalog, mock_entry_point};
    use crate::plugin::StaticPluginSource;
    use crate::project::{RemoteRepository, RepositoryPool};
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn tokens(words: &[&str]) -> Vec<String> {
        words.iter().map(|word| word.to_string()).collect()
    }

    fn registry() -> CommandRegistry {
        let mut registry = CommandRegistry::new();
        register_builtins(&mut registry).unwrap();
        registry.register(CommandDescriptor::from_fn("debug", "Debug root.", |_| Ok(0))).unwrap();
        registry
    }

    fn application_with_foo(counter: Arc<AtomicUsize>) -> Application {
        Application::builder()
            .catalog(mock_catalog(counter))
            .plugin_source(StaticPluginSource::new().with_entry_point(mock_entry_point("counted", "Counted")))
            .project_loader(|| -> Result<ProjectContext, ProjectError> {
                Ok(ProjectContext::new("demo", "/work", RepositoryPool::new()))
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_resolve_longest_name() {
        let (name, args) = resolve_command(&registry(), &tokens(&["debug", "info", "--x"])).unwrap();
        assert_eq!(name, "debug info");
        assert_eq!(args, tokens(&["--x"]));

        let (name, args) = resolve_command(&registry(), &tokens(&["debug", "other"])).unwrap();
        assert_eq!(name, "debug");
        assert_eq!(args, tokens(&["other"]));
    }

    #[test]
    fn test_resolve_unknown_reports_first_word() {
        let error = resolve_command(&registry(), &tokens(&["frob", "nicate"])).unwrap_err();
        assert_eq!(error.to_string(), "The command \"frob\" does not exist.");
    }

    #[test]
    fn test_help_flag_rewrites_tokens() {
        let invocation = parse_invocation(["--help", "debug", "info"]).unwrap();
        assert_eq!(command_tokens(&invocation), tokens(&["help", "debug", "info"]));

        let invocation = parse_invocation(["-h"]).unwrap();
        assert_eq!(command_tokens(&invocation), tokens(&["list"]));

        let invocation = parse_invocation(Vec::<String>::new()).unwrap();
        assert_eq!(command_tokens(&invocation), tokens(&["list"]));
    }

    #[test]
    fn test_states_when_plugins_skipped() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut app = application_with_foo(Arc::clone(&counter));
        let mut io = BufferedIo::new();

        assert_eq!(app.state(), ApplicationState::Created);
        assert_eq!(app.run(["--no-plugins", "about"], &mut io).unwrap(), 0);

        assert_eq!(app.state(), ApplicationState::Terminated);
        assert_eq!(app.exit_code(), Some(0));
        assert!(!app.plugins().enabled);
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_plugin_activated_once() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut app = application_with_foo(Arc::clone(&counter));
        let mut io = BufferedIo::new();

        assert_eq!(app.run(["counted"], &mut io).unwrap(), 0);

        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(io.fetch_output(), "counted called\n");
        assert_eq!(app.plugins().activated_names(), vec!["counted"]);
    }

    #[test]
    fn test_application_rejects_reuse() {
        let mut app = application_with_foo(Arc::new(AtomicUsize::new(0)));
        let mut io = BufferedIo::new();

        app.run(["about"], &mut io).unwrap();
        let error = app.run(["about"], &mut io).unwrap_err();

        assert!(matches!(error, ApplicationError::InvalidState { .. }));
    }

    #[test]
    fn test_project_requires_parsed_flags() {
        let mut app = application_with_foo(Arc::new(AtomicUsize::new(0)));

        assert!(matches!(app.project(), Err(ProjectError::InvalidState { .. })));
        assert!(!app.has_project());
    }

    #[test]
    fn test_project_built_once_with_cache_flag() {
        let loads = Rc::new(Cell::new(0));
        let counted = Rc::clone(&loads);
        let mut app = Application::builder()
            .project_loader(move || -> Result<ProjectContext, ProjectError> {
                counted.set(counted.get() + 1);
                let mut pool = RepositoryPool::new();
                pool.add_repository(Box::new(RemoteRepository::new("a", "https://a", Path::new("/c"))));
                pool.add_repository(Box::new(RemoteRepository::new("b", "https://b", Path::new("/c"))));
                Ok(ProjectContext::new("demo", "/work", pool))
            })
            .build()
            .unwrap();
        let mut io = BufferedIo::new();

        assert_eq!(app.run(["--no-cache", "debug", "info"], &mut io).unwrap(), 0);
        assert!(app.has_project());

        let project = app.project().unwrap();
        assert!(project.repositories().all(|repository| repository.is_cache_disabled()));
        assert_eq!(loads.get(), 1);
    }

    #[test]
    fn test_version_skips_plugins() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut app = application_with_foo(Arc::clone(&counter));
        let mut io = BufferedIo::new();

        assert_eq!(app.run(["--version", "counted"], &mut io).unwrap(), 0);

        assert_eq!(io.fetch_output(), format!("Quire (version {})\n", env!("CARGO_PKG_VERSION")));
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handler_error_is_rendered() {
        let mut io = BufferedIo::new();
        let mut app = Application::builder().build().unwrap();

        assert_eq!(app.run(["help", "nope"], &mut io).unwrap(), 1);

        assert_eq!(io.fetch_output(), "");
        assert_eq!(io.fetch_error(), "\nThe command \"nope\" does not exist.\n");
    }

    #[test]
    fn test_invalid_global_arguments() {
        let mut io = BufferedIo::new();
        let mut app = Application::builder().build().unwrap();

        assert_eq!(app.run(["--color", "--no-color"], &mut io).unwrap(), 1);
        assert!(io.fetch_error().starts_with('\n'));
        assert_eq!(app.state(), ApplicationState::Terminated);
    }
}
