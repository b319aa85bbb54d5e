mod cli;
mod client;
mod commands;
mod config;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands, ConfigCommands};
use output::print_error;

#[tokio::main]
async fn main() {
    observability::init_tracing();
    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::EnvList => commands::env::list(&cli)?,
        Commands::Config(args) => match &args.command {
            ConfigCommands::Show => commands::config::show(&cli)?,
            ConfigCommands::SetTarget { url } => commands::config::set_target(&cli, url)?,
        },
        Commands::ProjectCreate(args) => {
            let session = commands::open_session(&cli)?;
            commands::project::create(&session, args).await?;
        }
        Commands::ProjectUpdate(args) => {
            let session = commands::open_session(&cli)?;
            commands::project::update(&session, args).await?;
        }
        Commands::ProjectRemove(args) => {
            let session = commands::open_session(&cli)?;
            commands::project::remove(&session, args).await?;
        }
        Commands::ProjectInfo(args) => {
            let session = commands::open_session(&cli)?;
            commands::project::info(&session, args).await?;
        }
        Commands::ProjectEnvInfo(args) => {
            let session = commands::open_session(&cli)?;
            commands::project::env_info(&session, args).await?;
        }
        Commands::ProjectDeployList(args) => {
            let session = commands::open_session(&cli)?;
            commands::project::deploy_list(&session, args).await?;
        }
        Commands::ProjectList => {
            let session = commands::open_session(&cli)?;
            commands::project::list(&session).await?;
        }
        Commands::EnvvarSet(args) => {
            let session = commands::open_session(&cli)?;
            commands::envvar::set(&session, args).await?;
        }
        Commands::EnvvarGet(args) => {
            let session = commands::open_session(&cli)?;
            commands::envvar::get(&session, args).await?;
        }
        Commands::EnvvarUnset(args) => {
            let session = commands::open_session(&cli)?;
            commands::envvar::unset(&session, args).await?;
        }
    }

    Ok(())
}
