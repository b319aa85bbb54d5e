use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "projctl")]
#[command(about = "projctl: manage projects across deployment environments")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ~/.projctl/config.toml)
    #[arg(long, global = true, env = "PROJCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Platform base URL (overrides the config file)
    #[arg(long, global = true, env = "PROJCTL_TARGET")]
    pub target: Option<String>,

    /// API token (overrides the config file)
    #[arg(long, global = true, env = "PROJCTL_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List currently available environments
    EnvList,
    /// Create a project in one or more environments
    ProjectCreate(ProjectCreateArgs),
    /// Change a project's environments or metadata
    ProjectUpdate(ProjectUpdateArgs),
    /// Remove a project from every environment
    ProjectRemove(ProjectRemoveArgs),
    /// Show a project's details and deployments
    ProjectInfo(ProjectNameArgs),
    /// Show a project's details in one environment
    ProjectEnvInfo(ProjectEnvArgs),
    /// List a project's latest deployments in one environment
    ProjectDeployList(ProjectDeployListArgs),
    /// List all projects
    ProjectList,
    /// Set configuration variables
    EnvvarSet(EnvVarSetArgs),
    /// Show configuration variables
    EnvvarGet(EnvVarGetArgs),
    /// Unset configuration variables
    EnvvarUnset(EnvVarUnsetArgs),
    /// Manage projctl configuration
    Config(ConfigArgs),
}

#[derive(clap::Args)]
pub struct ProjectCreateArgs {
    /// Project name
    #[arg(short, long, default_value_t)]
    pub name: String,
    /// Platform (language runtime)
    #[arg(short = 'l', long, default_value_t)]
    pub platform: String,
    /// Team owner
    #[arg(short, long, default_value_t)]
    pub team: String,
    /// Plan
    #[arg(short, long, default_value_t)]
    pub plan: String,
    /// Description
    #[arg(short, long, default_value_t)]
    pub description: String,
    /// Comma-separated environments (defaults to all)
    #[arg(short, long = "envs", value_delimiter = ',')]
    pub envs: Vec<String>,
}

#[derive(clap::Args)]
pub struct ProjectUpdateArgs {
    /// Project name
    #[arg(short, long, default_value_t)]
    pub name: String,
    /// New description
    #[arg(short, long)]
    pub description: Option<String>,
    /// New team owner
    #[arg(short, long)]
    pub team: Option<String>,
    /// New plan
    #[arg(short, long)]
    pub plan: Option<String>,
    /// Comma-separated environments to add
    #[arg(long, value_delimiter = ',')]
    pub add_envs: Vec<String>,
    /// Comma-separated environments to remove
    #[arg(long, value_delimiter = ',')]
    pub remove_envs: Vec<String>,
}

#[derive(clap::Args)]
pub struct ProjectRemoveArgs {
    /// Project name
    #[arg(short, long, default_value_t)]
    pub name: String,
    /// Don't ask for confirmation
    #[arg(short = 'y', long = "assume-yes")]
    pub yes: bool,
}

#[derive(clap::Args)]
pub struct ProjectNameArgs {
    /// Project name
    #[arg(short, long, default_value_t)]
    pub name: String,
}

#[derive(clap::Args)]
pub struct ProjectEnvArgs {
    /// Project name
    #[arg(short, long, default_value_t)]
    pub name: String,
    /// Environment
    #[arg(short, long = "env", default_value_t)]
    pub env: String,
}

#[derive(clap::Args)]
pub struct ProjectDeployListArgs {
    #[command(flatten)]
    pub target: ProjectEnvArgs,
    /// Maximum number of deployments to show
    #[arg(short, long, default_value_t = 10)]
    pub limit: usize,
}

#[derive(clap::Args)]
pub struct EnvVarSetArgs {
    /// Project name
    #[arg(short, long, default_value_t)]
    pub name: String,
    /// Comma-separated environments (defaults to all)
    #[arg(short, long = "envs", value_delimiter = ',')]
    pub envs: Vec<String>,
    /// Hide the values from envvar-get
    #[arg(short, long)]
    pub private: bool,
    /// Don't restart the project after setting
    #[arg(long)]
    pub no_restart: bool,
    /// Variables as NAME=value
    #[arg(required = true)]
    pub vars: Vec<String>,
}

#[derive(clap::Args)]
pub struct EnvVarGetArgs {
    /// Project name
    #[arg(short, long, default_value_t)]
    pub name: String,
    /// Comma-separated environments (defaults to all)
    #[arg(short, long = "envs", value_delimiter = ',')]
    pub envs: Vec<String>,
}

#[derive(clap::Args)]
pub struct EnvVarUnsetArgs {
    /// Project name
    #[arg(short, long, default_value_t)]
    pub name: String,
    /// Comma-separated environments (defaults to all)
    #[arg(short, long = "envs", value_delimiter = ',')]
    pub envs: Vec<String>,
    /// Don't restart the project after unsetting
    #[arg(long)]
    pub no_restart: bool,
    /// Variable names
    #[arg(required = true)]
    pub vars: Vec<String>,
}

#[derive(clap::Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set the platform base URL
    SetTarget {
        /// Platform base URL
        url: String,
    },
}
