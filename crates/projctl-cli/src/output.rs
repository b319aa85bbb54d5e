use colored::Colorize;
use projctl_core::{
    DeploymentRecord, EnvironmentDetail, EnvironmentRow, EnvironmentSet, ProjectHeader,
    ProjectListing, ProjectSummary,
};
use tabled::builder::Builder;
use tabled::settings::Style;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub fn print_success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// `Mon, 05 Sep 2016 01:24:25 UTC`
pub fn format_deploy_date(at: OffsetDateTime) -> String {
    let format = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] UTC"
    );
    let utc = at.to_offset(UtcOffset::UTC);
    utc.format(&format).unwrap_or_else(|_| utc.to_string())
}

pub fn render_environments(environments: &EnvironmentSet) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Environment", "Address Suffix"]);
    for env in environments.iter() {
        builder.push_record([env.name.as_str(), env.address_suffix.as_str()]);
    }
    builder.build().with(Style::rounded()).to_string()
}

pub fn render_summary(summary: &ProjectSummary) -> String {
    let mut out = header_lines(&summary.header, &[]);
    out.push('\n');
    out.push_str(&rows_table(&summary.rows));
    out.push('\n');
    out
}

pub fn render_environment_detail(detail: &EnvironmentDetail) -> String {
    let mut out = header_lines(
        &detail.header,
        &[("Pool", detail.pool.as_str()), ("Plan", detail.plan.as_str())],
    );
    out.push('\n');
    out.push_str(&rows_table(std::slice::from_ref(&detail.row)));
    out.push('\n');
    if !detail.units.is_empty() {
        let mut builder = Builder::default();
        builder.push_record(["Unit", "Status"]);
        for unit in &detail.units {
            builder.push_record([unit.id.as_str(), unit.status.as_str()]);
        }
        out.push('\n');
        out.push_str(&builder.build().with(Style::rounded()).to_string());
        out.push('\n');
    }
    out
}

pub fn render_deployments(records: &[DeploymentRecord]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["ID", "Image", "Git hash/tag", "Deploy date"]);
    for record in records {
        builder.push_record([
            record.id.clone(),
            record.image_tag().to_string(),
            git_label(&record.commit),
            format_deploy_date(record.timestamp),
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}

fn header_lines(header: &ProjectHeader, extra: &[(&str, &str)]) -> String {
    let mut out = String::new();
    for (label, value) in [
        ("Project name", header.name.clone()),
        ("Description", header.description.clone()),
        ("Repository", header.repository.clone()),
        ("Platform", header.platform.clone()),
        ("Teams", header.teams.join(", ")),
        ("Owner", header.owner.clone()),
        ("Team owner", header.team_owner.clone()),
    ] {
        out.push_str(&format!("{label}: {value}\n"));
    }
    for (label, value) in extra {
        out.push_str(&format!("{label}: {value}\n"));
    }
    out
}

fn rows_table(rows: &[EnvironmentRow]) -> String {
    let mut builder = Builder::default();
    builder.push_record([
        "Environment",
        "Address",
        "Image",
        "Git hash/tag",
        "Deploy date",
        "Units",
    ]);
    for row in rows {
        builder.push_record([
            row.environment.clone(),
            row.address.clone(),
            row.image_tag.clone(),
            git_label(&row.commit),
            row.deployed_at.map(format_deploy_date).unwrap_or_default(),
            row.units.to_string(),
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}

fn git_label(commit: &str) -> String {
    if commit.is_empty() {
        String::new()
    } else {
        format!("(git) {commit}")
    }
}

pub fn render_project_list(projects: &[ProjectListing]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Project", "Environments", "Address"]);
    for project in projects {
        let (envs, addresses): (Vec<&str>, Vec<&str>) = project
            .environments
            .iter()
            .map(|(env, address)| (env.as_str(), address.as_str()))
            .unzip();
        builder.push_record([
            project.name.clone(),
            envs.join("\n"),
            addresses.join("\n"),
        ]);
    }
    builder.build().with(Style::rounded()).to_string()
}
