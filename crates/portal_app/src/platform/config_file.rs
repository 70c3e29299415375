use std::fs;
use std::path::{Path, PathBuf};

use portal_core::{ProbeConfig, DEFAULT_TIMEOUT_MS};
use portal_logging::portal_info;
use ron::extensions::Extensions;
use serde::Deserialize;
use thiserror::Error;

use super::cli::Cli;

#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("missing required setting `{0}` (config file or --{1})")]
    Missing(&'static str, &'static str),
}

/// On-disk shape. Every field is optional so flags can fill the gaps; values
/// are written bare (`timeout_ms: 1500`), without `Some(..)`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    target: Option<String>,
    redirect_url: Option<String>,
    timeout_ms: Option<u64>,
    backend_ping_url: Option<String>,
    auto_start: Option<bool>,
}

fn load(path: &Path) -> Result<ConfigFile, ConfigFileError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigFileError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: ConfigFile = ron::Options::default()
        .with_default_extension(Extensions::IMPLICIT_SOME)
        .from_str(&content)
        .map_err(|err| ConfigFileError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
    portal_info!("Loaded probe config from {:?}", path);
    Ok(file)
}

/// Builds the probe configuration from the optional file with flags on top.
pub fn resolve(cli: &Cli) -> Result<ProbeConfig, ConfigFileError> {
    let file = match cli.config.as_deref() {
        Some(path) => load(path)?,
        None => ConfigFile::default(),
    };

    let target = cli
        .target
        .clone()
        .or(file.target)
        .ok_or(ConfigFileError::Missing("target", "target"))?;
    let redirect_url = cli
        .redirect_url
        .clone()
        .or(file.redirect_url)
        .ok_or(ConfigFileError::Missing("redirect_url", "redirect-url"))?;

    let mut config = ProbeConfig::new(target, redirect_url)
        .with_timeout_ms(cli.timeout_ms.or(file.timeout_ms).unwrap_or(DEFAULT_TIMEOUT_MS))
        .with_auto_start(!cli.no_auto_start && file.auto_start.unwrap_or(true));
    if let Some(backend) = cli.backend_ping_url.clone().or(file.backend_ping_url) {
        config = config.with_backend_ping_url(backend);
    }
    Ok(config)
}
