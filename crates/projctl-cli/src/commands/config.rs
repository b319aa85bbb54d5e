use anyhow::Result;
use colored::Colorize;

use crate::cli::Cli;
use crate::commands::load_config;
use crate::config as settings;
use crate::output::print_success;

pub fn show(cli: &Cli) -> Result<()> {
    let (path, config) = load_config(cli)?;
    println!("{}: {}", "Config".cyan(), path.display());
    println!(
        "{}: {}",
        "Target".cyan(),
        if config.target.is_empty() {
            "(not set)"
        } else {
            config.target.as_str()
        }
    );
    println!(
        "{}: {}",
        "Registry".cyan(),
        config.registry.as_deref().unwrap_or("(not set)")
    );
    println!(
        "{}: {}",
        "Token".cyan(),
        if config.token.is_some() { "(set)" } else { "(not set)" }
    );
    let names: Vec<&str> = config.environments.iter().map(|e| e.name.as_str()).collect();
    println!("{}: {}", "Environments".cyan(), names.join(", "));
    Ok(())
}

/// Writes the target into the config file, creating the file if needed.
pub fn set_target(cli: &Cli, url: &str) -> Result<()> {
    let path = settings::resolve_path(cli.config.as_deref())?;
    let mut config = settings::load_or_default(&path)?;
    config.target = url.trim_end_matches('/').to_string();
    settings::save(&path, &config)?;
    print_success(&format!("Target set to {}", config.target));
    Ok(())
}
