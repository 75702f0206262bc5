// Integration tests for the quire binary
// Runs the built executable with an isolated configuration.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn quire(config_dir: &Path, args: &[&str]) -> Output {
    let config_file = config_dir.join("config.toml");
    let cache_dir = config_dir.join("cache");
    let plugin_dir = config_dir.join("plugins");
    fs::create_dir_all(&plugin_dir).unwrap();
    fs::write(
        &config_file,
        format!(
            "[plugins]\ndirectories = \"{}\"\n\n[repositories]\ncache-dir = \"{}\"\n",
            plugin_dir.display(),
            cache_dir.display()
        ),
    ).unwrap();

    Command::new(env!("CARGO_BIN_EXE_quire"))
        .args(args)
        .env("QUIRE_CONFIG", &config_file)
        .env("NO_COLOR", "1")
        .current_dir(config_dir)
        .output()
        .expect("Failed to execute quire")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn test_version() {
    let temp = TempDir::new().unwrap();
    let output = quire(temp.path(), &["--version"]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), format!("Quire (version {})\n", env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_bundled_plugin_listed() {
    let temp = TempDir::new().unwrap();

    let enabled = quire(temp.path(), &["list"]);
    assert_eq!(enabled.status.code(), Some(0));
    assert!(stdout(&enabled).contains("cache list"));

    let disabled = quire(temp.path(), &["--no-plugins", "list"]);
    assert_eq!(disabled.status.code(), Some(0));
    assert!(!stdout(&disabled).contains("cache list"));
}

#[test]
fn test_bundled_plugin_disabled() {
    let temp = TempDir::new().unwrap();
    let output = quire(temp.path(), &["--no-plugins", "cache", "list"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert_eq!(stderr(&output), "\nThe command \"cache\" does not exist.\n");
}

#[test]
fn test_cache_list_and_clear() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("cache").join("central")).unwrap();

    let list = quire(temp.path(), &["cache", "list"]);
    assert_eq!(list.status.code(), Some(0));
    assert!(stdout(&list).contains("central"));

    let clear = quire(temp.path(), &["cache", "clear", "central"]);
    assert_eq!(clear.status.code(), Some(0));
    assert!(!temp.path().join("cache").join("central").exists());

    let missing = quire(temp.path(), &["cache", "clear", "central"]);
    assert_eq!(missing.status.code(), Some(1));
    assert!(stderr(&missing).contains("No cache found for repository \"central\"."));
}

#[test]
fn test_cache_clear_stays_inside_cache_root() {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("cache").join("central")).unwrap();
    let outside = temp.path().join("victim");
    fs::create_dir_all(outside.join("data")).unwrap();
    fs::write(outside.join("data").join("keep.txt"), b"keep").unwrap();

    let absolute = outside.display().to_string();
    for target in [absolute.as_str(), "../victim"] {
        let output = quire(temp.path(), &["cache", "clear", target]);

        assert_eq!(output.status.code(), Some(1));
        assert_eq!(stdout(&output), "");
        assert!(stderr(&output).contains(&format!("No cache found for repository \"{}\".", target)));
        assert!(outside.join("data").join("keep.txt").is_file());
    }
    assert!(temp.path().join("cache").join("central").is_dir());
}

#[test]
fn test_unknown_command() {
    let temp = TempDir::new().unwrap();
    let output = quire(temp.path(), &["frobnicate"]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(stdout(&output), "");
    assert_eq!(stderr(&output), "\nThe command \"frobnicate\" does not exist.\n");
}

#[test]
fn test_debug_info_with_project() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("quire.toml"),
        "[project]\nname = \"demo\"\n\n[[source]]\nname = \"internal\"\nurl = \"https://internal.example.com/simple\"\n",
    ).unwrap();

    let output = quire(temp.path(), &["--no-cache", "debug", "info"]);

    assert_eq!(output.status.code(), Some(0));
    let out = stdout(&output);
    assert!(out.contains("demo"));
    assert!(out.contains("central"));
    assert!(out.contains("internal"));
    for line in out.lines().filter(|line| line.contains("https://")) {
        assert!(line.trim_end().ends_with("disabled"), "cache not disabled: {}", line);
    }
}

#[test]
fn test_debug_info_without_project() {
    let temp = TempDir::new().unwrap();
    let output = quire(temp.path(), &["debug", "info"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("No quire.toml found"));
}
