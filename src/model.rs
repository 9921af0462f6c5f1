use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin and kind of an event, never ambiguous. The derived `Ord` follows
/// declaration order and doubles as the sort tie-breaker in the merge engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventSource {
    GitlabCommit,
    GitlabBranch,
    GitlabMerge,
    LocalCommit,
    LocalBranch,
    LocalReflog,
}

impl EventSource {
    pub const ALL: [EventSource; 6] = [
        EventSource::GitlabCommit,
        EventSource::GitlabBranch,
        EventSource::GitlabMerge,
        EventSource::LocalCommit,
        EventSource::LocalBranch,
        EventSource::LocalReflog,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventSource::GitlabCommit => "gitlab_commit",
            EventSource::GitlabBranch => "gitlab_branch",
            EventSource::GitlabMerge => "gitlab_merge",
            EventSource::LocalCommit => "local_commit",
            EventSource::LocalBranch => "local_branch",
            EventSource::LocalReflog => "local_reflog",
        }
    }
}

/// One row of unified activity. Both adapters normalize into this shape;
/// nothing downstream of them knows source-specific record layouts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalEvent {
    pub source: EventSource,
    /// Coarse category: `commit`, `branch`, `merge_request_{state}`, `reflog`.
    pub action_type: String,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    /// Always UTC; adapters convert from source-native offsets before
    /// constructing an event, so comparison and sort never see a mixed zone.
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "ref")]
    pub ref_name: Option<String>,
    pub commit_sha: Option<String>,
    /// Free text, may contain newlines; renderers must keep them intact.
    pub message: Option<String>,
    /// Present only for remote-sourced events.
    pub url: Option<String>,
}

/// Half-open filtering window `[start, end)`, computed once per run and
/// immutable afterwards. Adapters pre-filter against it and the merge engine
/// re-applies it as a final defense.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        self.start <= *timestamp && *timestamp < self.end
    }
}
