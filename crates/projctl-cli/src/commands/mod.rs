pub mod config;
pub mod env;
pub mod envvar;
pub mod project;

use std::path::PathBuf;

use anyhow::Result;
use projctl_core::EnvironmentSet;

use crate::cli::Cli;
use crate::client::PlatformClient;
use crate::config::{self as settings, Config};

/// Everything a command needs to talk to the platform.
pub struct Session {
    pub environments: EnvironmentSet,
    pub client: PlatformClient,
}

/// Loads the config file and applies `--target` / `--token`.
pub fn load_config(cli: &Cli) -> Result<(PathBuf, Config)> {
    let path = settings::resolve_path(cli.config.as_deref())?;
    let mut config = settings::load(&path)?;
    config.apply_overrides(cli.target.as_deref(), cli.token.as_deref());
    Ok((path, config))
}

pub fn open_session(cli: &Cli) -> Result<Session> {
    let (_, config) = load_config(cli)?;
    let environments = config.catalog()?;
    let client = PlatformClient::new(config.require_target()?, config.token.clone())?;
    Ok(Session {
        environments,
        client,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn session_uses_config_file_and_overrides() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
target = "https://platform.example.com"

[[environments]]
name = "dev"
address_suffix = "dev.example.com"

[[environments]]
name = "prod"
address_suffix = "example.com"
"#,
        )
        .expect("write config");
        let path_arg = path.to_string_lossy().to_string();

        let cli = Cli::try_parse_from([
            "projctl",
            "--config",
            path_arg.as_str(),
            "--target",
            "http://localhost:8080",
            "project-list",
        ])
        .unwrap();

        let (_, config) = load_config(&cli).unwrap();
        assert_eq!(config.target, "http://localhost:8080");
        let session = open_session(&cli).unwrap();
        assert_eq!(session.environments.names(), vec!["dev", "prod"]);
    }

    #[test]
    fn missing_config_file_is_reported() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path_arg = dir.path().join("absent.toml").to_string_lossy().to_string();
        let cli = Cli::try_parse_from(["projctl", "--config", path_arg.as_str(), "env-list"]).unwrap();

        let err = open_session(&cli).err().expect("missing config");
        assert!(
            err.to_string()
                .starts_with("unable to load environments file")
        );
    }
}
