use super::client::GitLabClient;
use crate::error::Result;
use crate::model::{CanonicalEvent, EventSource, TimeWindow};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};
use urlencoding::encode;

/// Raw GitLab record shapes, one per endpoint. They never leak past this
/// module; everything downstream sees canonical events only.
#[derive(Debug, Deserialize)]
pub struct RawProject {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct RawCommit {
    pub id: String,
    pub author_name: Option<String>,
    pub author_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub message: Option<String>,
    pub web_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawBranch {
    pub name: String,
    pub web_url: Option<String>,
    pub commit: Option<RawBranchTip>,
}

#[derive(Debug, Deserialize)]
pub struct RawBranchTip {
    pub id: Option<String>,
    pub committed_date: Option<DateTime<Utc>>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawMergeRequest {
    pub title: Option<String>,
    pub state: String,
    pub sha: Option<String>,
    pub source_branch: String,
    pub target_branch: String,
    pub updated_at: DateTime<Utc>,
    pub web_url: Option<String>,
    pub author: Option<RawUser>,
}

#[derive(Debug, Deserialize)]
pub struct RawUser {
    pub name: Option<String>,
}

/// Query the hosting API for commits, branches and merge activity inside
/// `window`, normalized into canonical events. Any failure surfaces as
/// `RemoteUnavailable`; the fallback controller decides what to do with it.
pub fn fetch_remote_events(
    client: &GitLabClient,
    project: &str,
    window: &TimeWindow,
) -> Result<Vec<CanonicalEvent>> {
    let project_id = resolve_project(client, project)?;

    let mut events = fetch_commits(client, &project_id, window)?;
    events.extend(fetch_branches(client, &project_id, window)?);
    events.extend(fetch_merge_requests(client, &project_id, window)?);

    // The API honors the since/until params with pagination granularity at
    // best; keep only what the window actually admits.
    events.retain(|event| window.contains(&event.timestamp));
    Ok(events)
}

/// Resolve a `group/subgroup/project` path to its numeric id. When the call
/// fails but the input already is a number, use it as-is; the next endpoint
/// call will surface a genuine outage.
fn resolve_project(client: &GitLabClient, project: &str) -> Result<String> {
    let path = format!("/api/v4/projects/{}", encode(project));
    match client.get_one::<RawProject>(&path) {
        Ok(found) => Ok(found.id.to_string()),
        Err(err) if project.parse::<u64>().is_ok() => {
            warn!(project, "project lookup failed, using the given numeric id: {err}");
            Ok(project.to_string())
        }
        Err(err) => Err(err),
    }
}

fn fetch_commits(
    client: &GitLabClient,
    project_id: &str,
    window: &TimeWindow,
) -> Result<Vec<CanonicalEvent>> {
    let query = [
        ("since", window.start.to_rfc3339()),
        ("until", window.end.to_rfc3339()),
    ];
    let commits: Vec<RawCommit> = client.get_paged(
        &format!("/api/v4/projects/{project_id}/repository/commits"),
        &query,
    )?;
    Ok(commits.into_iter().map(commit_event).collect())
}

fn fetch_branches(
    client: &GitLabClient,
    project_id: &str,
    window: &TimeWindow,
) -> Result<Vec<CanonicalEvent>> {
    // No time filter on this endpoint; filter on the tip commit date here.
    let branches: Vec<RawBranch> = client.get_paged(
        &format!("/api/v4/projects/{project_id}/repository/branches"),
        &[],
    )?;
    Ok(branches
        .into_iter()
        .filter_map(branch_event)
        .filter(|event| window.contains(&event.timestamp))
        .collect())
}

fn fetch_merge_requests(
    client: &GitLabClient,
    project_id: &str,
    window: &TimeWindow,
) -> Result<Vec<CanonicalEvent>> {
    let query = [
        ("state", "all".to_string()),
        ("updated_after", window.start.to_rfc3339()),
        ("updated_before", window.end.to_rfc3339()),
    ];
    let requests: Vec<RawMergeRequest> =
        client.get_paged(&format!("/api/v4/projects/{project_id}/merge_requests"), &query)?;
    Ok(requests.into_iter().map(merge_request_event).collect())
}

pub fn commit_event(raw: RawCommit) -> CanonicalEvent {
    CanonicalEvent {
        source: EventSource::GitlabCommit,
        action_type: "commit".into(),
        user_name: raw.author_name,
        user_email: raw.author_email,
        timestamp: raw.created_at,
        ref_name: None,
        commit_sha: Some(raw.id),
        message: raw.message,
        url: raw.web_url,
    }
}

/// Branches without a resolvable tip commit carry no usable timestamp and
/// are dropped.
pub fn branch_event(raw: RawBranch) -> Option<CanonicalEvent> {
    let tip = match raw.commit {
        Some(tip) => tip,
        None => {
            debug!(branch = %raw.name, "skipping branch without tip commit");
            return None;
        }
    };
    let timestamp = tip.committed_date?;

    Some(CanonicalEvent {
        source: EventSource::GitlabBranch,
        action_type: "branch".into(),
        user_name: None,
        user_email: None,
        timestamp,
        ref_name: Some(raw.name),
        commit_sha: tip.id,
        message: tip.message,
        url: raw.web_url,
    })
}

pub fn merge_request_event(raw: RawMergeRequest) -> CanonicalEvent {
    CanonicalEvent {
        source: EventSource::GitlabMerge,
        action_type: format!("merge_request_{}", raw.state),
        user_name: raw.author.and_then(|author| author.name),
        // The MR payload carries no author email.
        user_email: None,
        timestamp: raw.updated_at,
        ref_name: Some(format!("{}->{}", raw.source_branch, raw.target_branch)),
        commit_sha: raw.sha,
        message: raw.title,
        url: raw.web_url,
    }
}
