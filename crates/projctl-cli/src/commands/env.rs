use anyhow::Result;

use crate::cli::Cli;
use crate::commands::load_config;
use crate::output::render_environments;

pub fn list(cli: &Cli) -> Result<()> {
    let (_, config) = load_config(cli)?;
    println!("{}", render_environments(&config.catalog()?));
    Ok(())
}
