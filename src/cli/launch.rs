use std::path::{Path, PathBuf};

use crate::io::config_io::{self, ConfigError};
use crate::model::Config;

use super::commands::Cli;

/// Everything the TUI needs to start
#[derive(Debug)]
pub struct Launch {
    pub data_dir: PathBuf,
    pub namespace: String,
    pub config: Config,
}

/// Resolve the data directory, config and namespace from the command line,
/// relative to `cwd`
pub fn resolve(cli: &Cli, cwd: &Path) -> Result<Launch, ConfigError> {
    let data_dir = match &cli.data_dir {
        Some(dir) => cwd.join(dir),
        None => config_io::discover_data_dir(cwd),
    };

    let config = match &cli.config {
        Some(path) => config_io::read_config_file(&cwd.join(path))?,
        None => config_io::read_config(&data_dir)?,
    };

    let namespace = cli
        .namespace
        .clone()
        .unwrap_or_else(|| config.store.namespace.clone());
    config_io::validate_namespace(&namespace)?;

    Ok(Launch {
        data_dir,
        namespace,
        config,
    })
}
