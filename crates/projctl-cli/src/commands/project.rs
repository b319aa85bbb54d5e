use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use projctl_core::{
    BulkRemover, MetadataUpdate, ProjectLister, ProjectSummaryBuilder, ProvisionOrchestrator,
    ProvisionRequest, ReconcileOrchestrator, ReconcileRequest,
};

use crate::cli::{
    ProjectCreateArgs, ProjectDeployListArgs, ProjectEnvArgs, ProjectNameArgs, ProjectRemoveArgs,
    ProjectUpdateArgs,
};
use crate::commands::Session;
use crate::output::{
    print_success, render_deployments, render_environment_detail, render_project_list,
    render_summary,
};

pub async fn create(session: &Session, args: &ProjectCreateArgs) -> Result<()> {
    let request = ProvisionRequest {
        project: args.name.clone(),
        platform: args.platform.clone(),
        team: args.team.clone(),
        plan: args.plan.clone(),
        description: args.description.clone(),
        environments: args.envs.clone(),
    };
    let created = ProvisionOrchestrator::new(&session.client, &session.environments)
        .provision(&request)
        .await?;
    println!("successfully created the project {:?}!", args.name);
    if let Some(url) = created.first().and_then(|r| r.repository_url.as_deref()) {
        println!("Git repository: {url}");
    }
    Ok(())
}

pub async fn update(session: &Session, args: &ProjectUpdateArgs) -> Result<()> {
    let request = ReconcileRequest {
        project: args.name.clone(),
        changes: MetadataUpdate {
            description: args.description.clone(),
            team: args.team.clone(),
            plan: args.plan.clone(),
        },
        add_environments: args.add_envs.clone(),
        remove_environments: args.remove_envs.clone(),
    };
    let outcome = ReconcileOrchestrator::new(&session.client, &session.environments)
        .reconcile(&request, &mut io::stdout())
        .await?;
    for added in &outcome.added {
        println!("Added env {:?} at {}", added.environment, added.address);
    }
    print_success(&format!("successfully updated the project {:?}!", args.name));
    Ok(())
}

pub async fn remove(session: &Session, args: &ProjectRemoveArgs) -> Result<()> {
    if !args.yes {
        let question = format!(
            "Are you sure you want to remove the project {:?}?",
            args.name
        );
        if !confirm(&question, &mut io::stdin().lock(), &mut io::stdout())? {
            return Ok(());
        }
    }
    BulkRemover::new(&session.client, &session.environments)
        .remove(&args.name, &mut io::stdout())
        .await?;
    print_success(&format!("successfully removed the project {:?}", args.name));
    Ok(())
}

pub async fn info(session: &Session, args: &ProjectNameArgs) -> Result<()> {
    let summary = ProjectSummaryBuilder::new(&session.client, &session.environments)
        .build(&args.name)
        .await?;
    print!("{}", render_summary(&summary));
    Ok(())
}

pub async fn env_info(session: &Session, args: &ProjectEnvArgs) -> Result<()> {
    let detail = ProjectSummaryBuilder::new(&session.client, &session.environments)
        .environment(&args.name, &args.env)
        .await?;
    print!("{}", render_environment_detail(&detail));
    Ok(())
}

pub async fn deploy_list(session: &Session, args: &ProjectDeployListArgs) -> Result<()> {
    let records = ProjectSummaryBuilder::new(&session.client, &session.environments)
        .deployments(&args.target.name, &args.target.env, args.limit)
        .await?;
    println!("{}", render_deployments(&records));
    Ok(())
}

pub async fn list(session: &Session) -> Result<()> {
    let projects = ProjectLister::new(&session.client, &session.environments)
        .list()
        .await?;
    println!("{}", render_project_list(&projects));
    Ok(())
}

/// Asks a yes/no question; anything but `y` or `yes` is a no.
fn confirm<R: BufRead, W: Write>(question: &str, input: &mut R, out: &mut W) -> Result<bool> {
    write!(out, "{question} (y/N) ")?;
    out.flush()?;
    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}
