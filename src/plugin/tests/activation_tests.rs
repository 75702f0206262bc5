//! Plugin Activation Tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use crate::command::{CommandDescriptor, CommandOrigin, CommandRegistry};
use crate::plugin::error::PluginError;
use crate::plugin::manager::activate_plugins;
use crate::plugin::resolver::PluginResolver;
use crate::plugin::tests::mock_plugins::*;

fn resolver() -> PluginResolver {
    PluginResolver::new(mock_catalog(Arc::new(AtomicUsize::new(0))))
}

#[test]
fn test_activation_in_discovery_order() {
    let mut registry = CommandRegistry::new();

    let report = activate_plugins(
        vec![mock_entry_point("bar-plugin", "Bar"), mock_entry_point("foo-plugin", "Foo")],
        &resolver(),
        &mut registry,
    );

    assert!(report.enabled);
    assert!(report.is_clean());
    assert_eq!(report.activated_names(), vec!["bar-plugin", "foo-plugin"]);
    assert_eq!(report.activated[0].commands, vec!["bar".to_string(), "bar baz".to_string()]);
    assert_eq!(report.activated[1].target, "tests.mock_plugins:Foo");
    assert_eq!(registry.get("foo").unwrap().origin(), &CommandOrigin::plugin("foo-plugin"));
}

#[test]
fn test_failure_does_not_stop_later_plugins() {
    let mut registry = CommandRegistry::new();

    let report = activate_plugins(
        vec![
            mock_entry_point("broken", "Failing"),
            mock_entry_point("missing", "DoesNotExist"),
            mock_entry_point("foo-plugin", "Foo"),
        ],
        &resolver(),
        &mut registry,
    );

    assert_eq!(report.activated_names(), vec!["foo-plugin"]);
    assert_eq!(report.failures.len(), 2);
    assert!(matches!(report.failures[0].error, PluginError::ActivationFailed { .. }));
    assert!(report.failures[1].error.is_resolution_error());
    assert!(registry.contains("foo"));
    assert!(!registry.contains("never"));
}

#[test]
fn test_plugin_cannot_shadow_builtin() {
    let mut registry = CommandRegistry::new();
    registry.register(CommandDescriptor::from_fn("foo", "Built-in foo", |_| Ok(0))).unwrap();

    let report = activate_plugins(vec![mock_entry_point("foo-plugin", "Foo")], &resolver(), &mut registry);

    assert!(report.activated.is_empty());
    assert!(matches!(
        report.failures[0].error,
        PluginError::CommandConflict { owner: CommandOrigin::Builtin, .. }
    ));
    assert_eq!(registry.get("foo").unwrap().description(), "Built-in foo");
}

#[test]
fn test_first_plugin_keeps_contested_name() {
    let mut registry = CommandRegistry::new();

    let report = activate_plugins(
        vec![mock_entry_point("first", "Foo"), mock_entry_point("second", "FooAgain")],
        &resolver(),
        &mut registry,
    );

    assert_eq!(report.activated_names(), vec!["first"]);
    assert_eq!(report.failures[0].name, "second");
    assert_eq!(registry.get("foo").unwrap().origin(), &CommandOrigin::plugin("first"));
}

#[test]
fn test_each_entry_point_activates_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let resolver = PluginResolver::new(mock_catalog(Arc::clone(&counter)));
    let mut registry = CommandRegistry::new();

    activate_plugins(vec![mock_entry_point("counted", "Counted")], &resolver, &mut registry);

    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert!(registry.contains("counted"));
}

#[test]
fn test_no_entry_points() {
    let mut registry = CommandRegistry::new();
    let report = activate_plugins(Vec::new(), &resolver(), &mut registry);

    assert!(report.enabled);
    assert!(report.activated.is_empty());
    assert!(registry.is_empty());
}
