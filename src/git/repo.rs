use crate::error::{Result, TrailError};
use crate::model::{CanonicalEvent, EventSource, TimeWindow};
use chrono::{DateTime, Utc};
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Local repository reader. Always available when the path is valid, which
/// makes it the guaranteed source when the remote is down.
pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Commit history reachable from any ref (the `git log --all` view),
    /// restricted to `window`. The walk continues through out-of-window
    /// commits so in-window ancestors behind them are still reached.
    pub fn collect_commit_events(&self, window: &TimeWindow) -> Result<Vec<CanonicalEvent>> {
        let mut events = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from(self.ref_tips()?);

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Collecting commits...");

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let timestamp = commit_timestamp(commit.time()?.seconds)?;
            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();

            if window.contains(&timestamp) {
                let author = commit.author()?;
                events.push(CanonicalEvent {
                    source: EventSource::LocalCommit,
                    action_type: "commit".into(),
                    user_name: Some(author.name.to_string()),
                    user_email: Some(author.email.to_string()),
                    timestamp,
                    ref_name: None,
                    commit_sha: Some(commit_id.to_string()),
                    message: Some(full_message(&commit)?),
                    url: None,
                });
            }

            for pid in parents {
                stack.push_back(pid);
            }

            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(events)
    }

    /// One event per local branch whose tip commit falls inside `window`.
    pub fn collect_branch_events(&self, window: &TimeWindow) -> Result<Vec<CanonicalEvent>> {
        let platform = self
            .repo
            .references()
            .map_err(|e| TrailError::LocalRepo(e.to_string()))?;
        let branches = platform
            .local_branches()
            .map_err(|e| TrailError::LocalRepo(e.to_string()))?;

        let mut events = Vec::new();
        for branch in branches.filter_map(std::result::Result::ok) {
            let name = branch.name().shorten().to_string();
            let mut branch = branch;
            let tip = match branch.peel_to_id_in_place() {
                Ok(id) => id.detach(),
                Err(err) => {
                    debug!(branch = %name, "skipping unpeelable branch: {err}");
                    continue;
                }
            };

            let commit = self.repo.find_commit(tip)?;
            let timestamp = commit_timestamp(commit.time()?.seconds)?;
            if !window.contains(&timestamp) {
                continue;
            }

            events.push(CanonicalEvent {
                source: EventSource::LocalBranch,
                action_type: "branch".into(),
                user_name: None,
                user_email: None,
                timestamp,
                ref_name: Some(name),
                commit_sha: Some(tip.to_string()),
                message: Some(full_message(&commit)?),
                url: None,
            });
        }

        Ok(events)
    }

    /// HEAD's reflog as events: checkouts, merges, resets and the rest of the
    /// local operations git records. A repository without a HEAD reflog (fresh
    /// clone with reflogs disabled, bare mirror) simply yields nothing.
    pub fn collect_reflog_events(&self, window: &TimeWindow) -> Result<Vec<CanonicalEvent>> {
        let head = match self.repo.find_reference("HEAD") {
            Ok(reference) => reference,
            Err(_) => return Ok(Vec::new()),
        };

        let mut log = head.log_iter();
        let lines = match log.all().map_err(|e| TrailError::LocalRepo(e.to_string()))? {
            Some(lines) => lines,
            None => return Ok(Vec::new()),
        };

        let mut events = Vec::new();
        for line in lines.filter_map(std::result::Result::ok) {
            let time = match line.signature.time() {
                Ok(time) => time,
                Err(err) => {
                    debug!("skipping reflog line with unparseable time: {err}");
                    continue;
                }
            };
            let timestamp = commit_timestamp(time.seconds)?;
            if !window.contains(&timestamp) {
                continue;
            }

            events.push(CanonicalEvent {
                source: EventSource::LocalReflog,
                action_type: "reflog".into(),
                user_name: Some(line.signature.name.to_string()),
                user_email: Some(line.signature.email.to_string()),
                timestamp,
                ref_name: Some("HEAD".into()),
                commit_sha: Some(line.new_oid.to_string()),
                message: Some(line.message.to_string()),
                url: None,
            });
        }

        Ok(events)
    }

    /// Tips of every ref, skipping ones that do not peel to a commit
    /// (annotated tags on trees/blobs and the like).
    fn ref_tips(&self) -> Result<Vec<ObjectId>> {
        let platform = self
            .repo
            .references()
            .map_err(|e| TrailError::LocalRepo(e.to_string()))?;
        let refs = platform
            .all()
            .map_err(|e| TrailError::LocalRepo(e.to_string()))?;

        let mut tips = Vec::new();
        for reference in refs.filter_map(std::result::Result::ok) {
            let mut reference = reference;
            match reference.peel_to_id_in_place() {
                Ok(id) => {
                    let id = id.detach();
                    if self.repo.find_commit(id).is_ok() {
                        tips.push(id);
                    }
                }
                Err(err) => {
                    debug!(reference = %reference.name().as_bstr(), "skipping ref: {err}");
                }
            }
        }
        Ok(tips)
    }
}

/// Query the local repository and reference-change log for activity inside
/// `window`, normalized into canonical events. Fails with a fatal
/// `LocalRepo` error when `repo_path` is not a valid repository.
pub fn fetch_local_events(repo_path: Option<&Path>, window: &TimeWindow) -> Result<Vec<CanonicalEvent>> {
    let repo = GitRepo::open(repo_path)?;
    let mut events = repo.collect_commit_events(window)?;
    events.extend(repo.collect_branch_events(window)?);
    events.extend(repo.collect_reflog_events(window)?);
    Ok(events)
}

fn commit_timestamp(secs: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp(secs, 0)
        .ok_or_else(|| TrailError::LocalRepo(format!("invalid timestamp: {secs}")))
}

/// Reassemble the full commit message; subject and body both survive into
/// the report, newlines included.
fn full_message(commit: &gix::Commit<'_>) -> Result<String> {
    let message = commit.message()?;
    let mut text = message.title.to_string();
    if let Some(body) = message.body {
        text.push_str("\n\n");
        text.push_str(&body.to_string());
    }
    Ok(text)
}
