//! Configuration loading and discovery for `particles.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::FieldConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name searched for during discovery
pub const CONFIG_FILE_NAME: &str = "particles.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse particles.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// TOML serialization error
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override population size
    pub count: Option<usize>,
    /// Override particle-to-particle threshold
    pub edge_threshold: Option<f64>,
    /// Override particle-to-pointer threshold
    pub pointer_threshold: Option<f64>,
    /// Override resize quiet period
    pub debounce_ms: Option<u32>,
}

/// Find particles.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for particles.toml
/// 2. Check XDG_CONFIG_HOME/particle-field/particles.toml (or ~/.config/...)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find particles.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("particle-field").join(CONFIG_FILE_NAME);
    config_path.exists().then_some(config_path)
}

/// Find particles.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// If a path is provided, loads from that file. Otherwise uses
/// [`find_config`]; when nothing is found the stock configuration is
/// returned.
///
/// # Example
/// ```ignore
/// let config = load_config(None)?;
/// let config = load_config(Some(Path::new("site/particles.toml")))?;
/// ```
pub fn load_config(path: Option<&Path>) -> Result<FieldConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => {
            log::debug!("Loading config from {}", p.display());
            load_config_file(&p)
        }
        None => {
            log::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
            Ok(FieldConfig::default())
        }
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<FieldConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(contents: &str) -> Result<FieldConfig, ConfigError> {
    let config: FieldConfig = toml::from_str(contents)?;
    validated(config)
}

fn validated(config: FieldConfig) -> Result<FieldConfig, ConfigError> {
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(config)
}

/// Render the stock configuration as TOML, for `pfx init`.
pub fn default_config_toml() -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(&FieldConfig::default())?)
}

/// Merge CLI overrides into a configuration and re-validate.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(
    mut config: FieldConfig,
    overrides: &CliOverrides,
) -> Result<FieldConfig, ConfigError> {
    if let Some(count) = overrides.count {
        config.particles.count = count;
    }
    if let Some(threshold) = overrides.edge_threshold {
        config.edges.threshold = threshold;
    }
    if let Some(threshold) = overrides.pointer_threshold {
        config.pointer.threshold = threshold;
    }
    if let Some(debounce_ms) = overrides.debounce_ms {
        config.resize.debounce_ms = debounce_ms;
    }
    validated(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let config_path = dir.join(CONFIG_FILE_NAME);
        File::create(&config_path)
            .expect("should create config file")
            .write_all(content.as_bytes())
            .expect("should write config content");
        config_path
    }

    #[test]
    fn test_find_config_in_current_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "[particles]\ncount = 10");

        let found = find_config_from(temp.path().to_path_buf());
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_find_config_in_parent_dir() {
        let temp = TempDir::new().expect("should create temp dir");
        let config_path = write_config(temp.path(), "");

        let subdir = temp.path().join("site").join("assets");
        fs::create_dir_all(&subdir).expect("should create subdirectories");

        let found = find_config_from(subdir);
        assert_eq!(found, Some(config_path));
    }

    #[test]
    fn test_load_config_from_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = write_config(
            temp.path(),
            r#"
[particles]
count = 42

[resize]
debounce_ms = 50
"#,
        );

        let config = load_config(Some(&path)).expect("should load config");
        assert_eq!(config.particles.count, 42);
        assert_eq!(config.resize.debounce_ms, 50);
        assert_eq!(config.edges.threshold, 120.0);
    }

    #[test]
    fn test_load_config_missing_file() {
        let temp = TempDir::new().expect("should create temp dir");
        let result = load_config(Some(&temp.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = write_config(temp.path(), "[particles\ncount = ");
        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_config_validation_error() {
        let temp = TempDir::new().expect("should create temp dir");
        let path = write_config(temp.path(), "[edges]\nthreshold = -1.0\n");
        match load_config(Some(&path)) {
            Err(ConfigError::Validation(errors)) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].contains("edges.threshold"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_default_config_toml_roundtrip() {
        let text = default_config_toml().unwrap();
        assert!(text.contains("[particles]"));
        let parsed = parse_config(&text).unwrap();
        assert_eq!(parsed, FieldConfig::default());
    }

    #[test]
    fn test_merge_cli_overrides() {
        let overrides = CliOverrides {
            count: Some(50),
            pointer_threshold: Some(90.0),
            ..Default::default()
        };
        let config = merge_cli_overrides(FieldConfig::default(), &overrides).unwrap();
        assert_eq!(config.particles.count, 50);
        assert_eq!(config.pointer.threshold, 90.0);
        assert_eq!(config.edges.threshold, 120.0);
        assert_eq!(config.resize.debounce_ms, 100);
    }

    #[test]
    fn test_merge_cli_overrides_revalidates() {
        let overrides = CliOverrides { count: Some(10_000), ..Default::default() };
        let result = merge_cli_overrides(FieldConfig::default(), &overrides);
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
