use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use projctl_core::{Environment, EnvironmentSet, ProjectError};
use serde::{Deserialize, Serialize};

/// Contents of `~/.projctl/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Platform base URL.
    #[serde(default)]
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default)]
    pub environments: Vec<Environment>,
}

impl Config {
    /// Flags and environment variables win over the file.
    pub fn apply_overrides(&mut self, target: Option<&str>, token: Option<&str>) {
        if let Some(target) = target {
            self.target = target.to_string();
        }
        if let Some(token) = token {
            self.token = Some(token.to_string());
        }
    }

    /// The environment catalog, validated.
    pub fn catalog(&self) -> projctl_core::Result<EnvironmentSet> {
        if self.environments.is_empty() {
            return Err(ProjectError::configuration("no environments defined"));
        }
        EnvironmentSet::new(self.environments.clone())
    }

    pub fn require_target(&self) -> projctl_core::Result<&str> {
        let target = self.target.trim();
        if target.is_empty() {
            return Err(ProjectError::configuration(
                "no target defined, run: projctl config set-target <url>",
            ));
        }
        Ok(target)
    }
}

pub fn default_path() -> Result<PathBuf> {
    Ok(dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".projctl")
        .join("config.toml"))
}

/// `--config` / `PROJCTL_CONFIG` if given, otherwise the default location.
pub fn resolve_path(cli_path: Option<&Path>) -> Result<PathBuf> {
    match cli_path {
        Some(path) => Ok(path.to_path_buf()),
        None => default_path(),
    }
}

/// Reads the file. A missing or unparseable file is a configuration error.
pub fn load(path: &Path) -> projctl_core::Result<Config> {
    let content = fs::read_to_string(path)
        .map_err(|e| ProjectError::configuration(format!("{}: {e}", path.display())))?;
    let config: Config = toml::from_str(&content)
        .map_err(|e| ProjectError::configuration(format!("{}: {e}", path.display())))?;
    tracing::debug!(path = %path.display(), environments = config.environments.len(), "loaded config");
    Ok(config)
}

/// Like [`load`], but a missing file yields an empty config.
pub fn load_or_default(path: &Path) -> projctl_core::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    load(path)
}

pub fn save(path: &Path, config: &Config) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    let content = toml::to_string_pretty(config).context("Failed to serialize config")?;
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
