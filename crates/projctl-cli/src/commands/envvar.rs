use std::io;

use anyhow::Result;
use projctl_core::EnvVarPropagator;

use crate::cli::{EnvVarGetArgs, EnvVarSetArgs, EnvVarUnsetArgs};
use crate::commands::Session;

pub async fn set(session: &Session, args: &EnvVarSetArgs) -> Result<()> {
    EnvVarPropagator::new(&session.client, &session.environments)
        .set(
            &args.name,
            &args.envs,
            &args.vars,
            args.private,
            !args.no_restart,
            &mut io::stdout(),
        )
        .await?;
    Ok(())
}

pub async fn get(session: &Session, args: &EnvVarGetArgs) -> Result<()> {
    EnvVarPropagator::new(&session.client, &session.environments)
        .get(&args.name, &args.envs, &mut io::stdout())
        .await?;
    Ok(())
}

pub async fn unset(session: &Session, args: &EnvVarUnsetArgs) -> Result<()> {
    EnvVarPropagator::new(&session.client, &session.environments)
        .unset(
            &args.name,
            &args.envs,
            &args.vars,
            !args.no_restart,
            &mut io::stdout(),
        )
        .await?;
    Ok(())
}
