use std::fs;
use std::path::{Path, PathBuf};

use crate::model::config::Config;

/// Name of the data directory looked up from the working directory
pub const DATA_DIR_NAME: &str = ".nestodo";

/// Error type for config loading
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid namespace {0:?}: must be a plain file name")]
    InvalidNamespace(String),
}

/// A namespace names `<namespace>.json` inside the data directory, so it
/// must not contain path separators or be a relative path component.
pub fn validate_namespace(namespace: &str) -> Result<(), ConfigError> {
    let bad = namespace.is_empty()
        || namespace == "."
        || namespace == ".."
        || namespace.contains(['/', '\\', '\0']);
    if bad {
        return Err(ConfigError::InvalidNamespace(namespace.to_string()));
    }
    Ok(())
}

/// Walk up from `start` looking for a `.nestodo/` directory.
/// Falls back to `start/.nestodo` when none exists yet.
pub fn discover_data_dir(start: &Path) -> PathBuf {
    let mut current = start.to_path_buf();
    loop {
        let candidate = current.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return candidate;
        }
        if !current.pop() {
            return start.join(DATA_DIR_NAME);
        }
    }
}

/// Read `config.toml` from the data directory. A missing file gives defaults.
pub fn read_config(data_dir: &Path) -> Result<Config, ConfigError> {
    read_config_file(&data_dir.join("config.toml"))
}

/// Read a config file by path. A missing file gives defaults.
pub fn read_config_file(path: &Path) -> Result<Config, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
        Err(e) => {
            return Err(ConfigError::ReadError {
                path: path.to_path_buf(),
                source: e,
            });
        }
    };
    toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })
}
