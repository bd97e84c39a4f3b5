//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServerConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load a TOML file without validating it; CLI overrides apply afterwards.
pub fn read_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Build the effective configuration: file (or defaults), then `overrides`,
/// then validation.
pub fn load_config(
    path: Option<&Path>,
    overrides: impl FnOnce(&mut ServerConfig),
) -> Result<ServerConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => ServerConfig::default(),
    };
    overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("request-bin-{}-{}.toml", name, std::process::id()));
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_valid_file() {
        let path = write_temp("valid", "[listener]\nport = 9001\n[capture]\nmax_requests = 4\n");
        let config = load_config(Some(&path), |_| {}).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.listener.port, 9001);
        assert_eq!(config.capture.max_requests, 4);
    }

    #[test]
    fn reports_parse_errors() {
        let path = write_temp("broken", "[listener\nport = ");
        let err = load_config(Some(&path), |_| {}).unwrap_err();
        fs::remove_file(&path).ok();

        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn reports_validation_errors() {
        let path = write_temp("overlap", "[capture]\nmount = \"/logs/in\"\n");
        let err = load_config(Some(&path), |_| {}).unwrap_err();
        fs::remove_file(&path).ok();

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn overrides_apply_before_validation() {
        let path = write_temp("override", "[capture]\nmount = \"/logs/in\"\n");
        let config = load_config(Some(&path), |config| config.capture.mount = "/hooks".into()).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.capture.mount, "/hooks");
    }

    #[test]
    fn no_file_uses_defaults() {
        let config = load_config(None, |_| {}).unwrap();
        assert_eq!(config.listener.port, 8000);
        assert_eq!(config.capture.mount, "/bin");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Some(Path::new("/definitely/not/here.toml")), |_| {}).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
