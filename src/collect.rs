use crate::cli::Cli;
use crate::error::{Result, TrailError};
use crate::git;
use crate::gitlab::{self, GitLabClient};
use crate::merge::merge;
use crate::model::{CanonicalEvent, EventSource, TimeWindow};
use crate::render;
use anyhow::Context;
use chrono::Utc;
use console::style;
use tracing::{info, warn};

const TOKEN_VAR: &str = "GITLAB_TOKEN";

struct RemoteConfig {
    url: String,
    token: String,
    project: String,
}

pub fn exec(cli: Cli) -> anyhow::Result<()> {
    // Configuration problems must surface before anything is fetched.
    let format = render::resolve_format(cli.format, &cli.output)?;
    let window = crate::window::resolve_window(
        cli.months,
        cli.since.as_deref(),
        cli.until.as_deref(),
        Utc::now(),
    )
    .context("Failed to resolve time window")?;

    let remote = remote_config(&cli);
    let mut remote_failed = false;
    let remote_events = match &remote {
        Some(config) => match fetch_remote(config, cli.insecure, &window) {
            Ok(events) => {
                info!(count = events.len(), "fetched remote events");
                events
            }
            Err(TrailError::RemoteUnavailable(reason)) => {
                warn!(%reason, "remote fetch failed, continuing with local data only");
                eprintln!(
                    "{} GitLab unreachable ({reason}); continuing with local data only",
                    style("warning:").red().bold()
                );
                remote_failed = true;
                Vec::new()
            }
            Err(other) => return Err(other.into()),
        },
        // Offline mode: no remote configuration, no attempt, no warning.
        None => Vec::new(),
    };

    let local_events = git::fetch_local_events(cli.repo.as_deref(), &window)
        .context("Failed to read local repository")?;

    let events = merge(&remote_events, &local_events, &window);
    render::write_report(&events, format, &cli.output)
        .with_context(|| format!("Failed to write {}", cli.output.display()))?;

    print_summary(&events, &window, &cli, remote.is_some(), remote_failed);
    Ok(())
}

/// Remote fetch happens only when URL, token and project are all known. The
/// token may come from the flag or from the environment; the adapter does not
/// care which.
fn remote_config(cli: &Cli) -> Option<RemoteConfig> {
    let url = cli.gitlab_url.clone()?;
    let project = match &cli.project {
        Some(project) => project.clone(),
        None => {
            info!("gitlab-url given without --project, skipping remote fetch");
            return None;
        }
    };
    let token = match cli.token.clone().or_else(token_from_env) {
        Some(token) => token,
        None => {
            info!("gitlab-url given without a token, skipping remote fetch");
            return None;
        }
    };
    Some(RemoteConfig { url, token, project })
}

fn token_from_env() -> Option<String> {
    dotenvy::dotenv().ok();
    std::env::var(TOKEN_VAR)
        .ok()
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

fn fetch_remote(
    config: &RemoteConfig,
    insecure: bool,
    window: &TimeWindow,
) -> Result<Vec<CanonicalEvent>> {
    let client = GitLabClient::new(&config.url, &config.token, insecure)?;
    gitlab::fetch_remote_events(&client, &config.project, window)
}

fn print_summary(
    events: &[CanonicalEvent],
    window: &TimeWindow,
    cli: &Cli,
    remote_configured: bool,
    remote_failed: bool,
) {
    println!("{}", style("Audit Trail Summary").bold());
    println!("{}", "─".repeat(50));
    println!(
        "Window: {} to {}",
        style(window.start.format("%Y-%m-%d %H:%M UTC")).dim(),
        style(window.end.format("%Y-%m-%d %H:%M UTC")).dim()
    );
    println!("Total events: {}", style(events.len()).cyan());

    for source in EventSource::ALL {
        let count = events.iter().filter(|event| event.source == source).count();
        if count > 0 {
            println!("  {:<14} {}", source.as_str(), style(count).cyan());
        }
    }

    println!("Report: {}", cli.output.display());

    if remote_failed {
        println!(
            "{}",
            style("Remote source unavailable, report is local-only.").yellow()
        );
    } else if !remote_configured {
        println!("{}", style("No GitLab configuration given, report is local-only.").dim());
    }
}
