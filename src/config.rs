use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use anyhow::{Context, Result};
use toml::Value;
use log::{debug, info};

/// Configuration storage - section_name -> key -> value
pub type Configuration = HashMap<String, HashMap<String, String>>;

/// Repository used when a project declares no default source
pub const DEFAULT_REPOSITORY_URL: &str = "https://packages.quire.dev/simple";

/// Configuration manager
#[derive(Debug, Clone, Default)]
pub struct ConfigManager {
    config: Configuration,
    config_file_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create a new ConfigManager from a Configuration (primarily for testing)
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config,
            config_file_path: None,
        }
    }

    /// Load configuration using discovery hierarchy
    pub fn load() -> Result<Self> {
        debug!("Starting configuration discovery");

        for path in discover_config_files() {
            debug!("Attempting to load config from: {}", path.display());
            if path.exists() {
                return Self::load_from_file(path);
            }
        }

        debug!("No configuration file found, using empty configuration");
        Ok(Self::default())
    }

    /// Load configuration from explicit file path
    pub fn load_from_file(path: PathBuf) -> Result<Self> {
        debug!("Loading configuration from file: {}", path.display());

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config = parse_toml_config(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        info!("Loaded configuration from: {}", path.display());
        Ok(Self {
            config,
            config_file_path: Some(path),
        })
    }

    /// File the configuration was read from, if any
    pub fn config_file_path(&self) -> Option<&PathBuf> {
        self.config_file_path.as_ref()
    }

    /// Get value from configuration with base section fallback
    pub fn get_value(&self, section: &str, key: &str) -> Option<&String> {
        if let Some(value) = self.config.get(section).and_then(|s| s.get(key)) {
            return Some(value);
        }

        self.config.get("base").and_then(|s| s.get(key))
    }

    /// Get a top-level key (stored as its own single-value section)
    pub fn get_value_root(&self, key: &str) -> Option<&String> {
        self.config.get(key).and_then(|s| s.get("value"))
    }

    /// Get boolean value with type conversion
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        match self.get_value(section, key) {
            Some(value) => match value.to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(anyhow::anyhow!("Invalid boolean value for {}.{}: {}", section, key, value)),
            },
            None => Ok(None),
        }
    }

    /// Get log level value with type conversion
    pub fn get_log_level(&self, section: &str, key: &str) -> Result<Option<log::LevelFilter>> {
        match self.get_value(section, key) {
            Some(value) => Ok(Some(crate::logging::parse_log_level(value)?)),
            None => Ok(None),
        }
    }

    /// Get path value with type conversion
    pub fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_value(section, key).map(PathBuf::from)
    }

    /// Get a list value, written either as a TOML array or comma-separated
    pub fn get_list(&self, section: &str, key: &str) -> Vec<String> {
        let Some(value) = self.get_value(section, key) else {
            return Vec::new();
        };

        // Arrays were flattened to their TOML text; reparse them as a value
        let parsed = toml::from_str::<toml::Table>(&format!("v = {}", value))
            .ok()
            .and_then(|mut table| table.remove("v"));
        let items: Vec<String> = match parsed {
            Some(Value::Array(items)) => items.iter().map(toml_value_to_string).collect(),
            _ => value.split(',').map(str::to_string).collect(),
        };

        items
            .into_iter()
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect()
    }

    /// Directories scanned for plugin manifests
    ///
    /// Falls back to `<config dir>/quire/plugins` when it exists.
    pub fn plugin_directories(&self) -> Vec<PathBuf> {
        let configured = self.get_list("plugins", "directories");
        if !configured.is_empty() {
            return configured.into_iter().map(PathBuf::from).collect();
        }

        dirs::config_dir()
            .map(|dir| dir.join("quire").join("plugins"))
            .filter(|dir| dir.is_dir())
            .into_iter()
            .collect()
    }

    /// Root under which each repository keeps its cache
    pub fn cache_dir(&self) -> PathBuf {
        self.get_path("repositories", "cache-dir")
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("quire")))
            .unwrap_or_else(|| PathBuf::from(".quire-cache"))
    }

    /// URL of the central repository
    pub fn default_repository_url(&self) -> String {
        self.get_value("repositories", "default-url")
            .cloned()
            .unwrap_or_else(|| DEFAULT_REPOSITORY_URL.to_string())
    }
}

/// Discover configuration files in order of precedence
fn discover_config_files() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // 1. Environment variable $QUIRE_CONFIG
    if let Ok(env_path) = env::var("QUIRE_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }

    // 2. XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("quire").join("config.toml"));
    }

    // 3. Home directory
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".quire.toml"));
    }

    // 4. Project local
    paths.push(PathBuf::from("./.quire.toml"));

    debug!("Config discovery paths: {:?}", paths);
    paths
}

/// Parse TOML content to string-based configuration
fn parse_toml_config(content: &str) -> Result<Configuration> {
    let toml_value: Value = content.parse()
        .context("Failed to parse TOML content")?;

    let mut config = Configuration::new();

    if let Value::Table(table) = toml_value {
        flatten_toml_table(&table, String::new(), &mut config);
    }

    debug!("Parsed configuration: {:?}", config);
    Ok(config)
}

/// Recursively flatten TOML tables into section.subsection format
fn flatten_toml_table(table: &toml::Table, prefix: String, config: &mut Configuration) {
    for (key, value) in table {
        let section_name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            Value::Table(subtable) => {
                if subtable.values().all(|v| !matches!(v, Value::Table(_))) {
                    let section_map = subtable
                        .iter()
                        .map(|(subkey, subvalue)| (subkey.clone(), toml_value_to_string(subvalue)))
                        .collect();
                    config.insert(section_name, section_map);
                } else {
                    flatten_toml_table(subtable, section_name, config);
                }
            }
            _ => {
                // Top-level key, e.g. `log-format = "json"`
                let mut section_map = HashMap::new();
                section_map.insert("value".to_string(), toml_value_to_string(value));
                config.insert(section_name, section_map);
            }
        }
    }
}

/// Convert TOML Value to string representation
fn toml_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Datetime(d) => d.to_string(),
        Value::Array(_) | Value::Table(_) => value.to_string(),
    }
}
