//! Metrics computation

use chrono::{DateTime, Utc};
use common::models::{Comment, Commit, PrState, PullRequest};
use serde::Serialize;

/// How long a PR waited for its first sign of review
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "source", content = "minutes", rename_all = "snake_case")]
pub enum PickupTime {
    /// Minutes from creation to the first comment
    FirstComment(f64),
    /// No comments; minutes from creation to closing
    Closed(f64),
    /// Still open with no comments, nothing to measure yet
    Unknown,
}

impl PickupTime {
    /// Value used for bucketing. `Unknown` counts as zero minutes.
    pub fn minutes(&self) -> f64 {
        match self {
            Self::FirstComment(minutes) | Self::Closed(minutes) => *minutes,
            Self::Unknown => 0.0,
        }
    }
}

/// Per-PR scalars fed into the benchmark
#[derive(Debug, Clone, Serialize)]
pub struct PrMetrics {
    pub number: u64,
    pub title: String,
    pub state: PrState,
    pub coding_time_minutes: f64,
    pub pickup_time: PickupTime,
    pub size: u64,
}

impl PrMetrics {
    /// Compute every per-PR metric. Same ordering preconditions as
    /// [`coding_time_minutes`] and [`pickup_time`].
    pub fn compute(pr: &PullRequest, commits: &[Commit], comments: &[Comment]) -> Self {
        Self {
            number: pr.number,
            title: pr.title.clone(),
            state: pr.state,
            coding_time_minutes: coding_time_minutes(commits),
            pickup_time: pickup_time(pr, comments),
            size: pr_size(pr),
        }
    }

    pub fn is_revert(&self) -> bool {
        title_mentions(&self.title, "revert")
    }

    pub fn is_hotfix(&self) -> bool {
        title_mentions(&self.title, "hotfix")
    }
}

fn minutes_between(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    (end - start).num_seconds() as f64 / 60.0
}

fn title_mentions(title: &str, keyword: &str) -> bool {
    title.to_lowercase().contains(keyword)
}

/// Minutes between the first and the last commit.
///
/// `commits` must be in ascending chronological order, as the commits
/// endpoint returns them. The order is trusted: an out-of-order sequence
/// gives a negative duration rather than being re-sorted. Zero or one commit
/// gives 0.
pub fn coding_time_minutes(commits: &[Commit]) -> f64 {
    match (commits.first(), commits.last()) {
        (Some(first), Some(last)) => minutes_between(first.committed_at, last.committed_at),
        _ => 0.0,
    }
}

/// Time from PR creation to the first review engagement.
///
/// `comments` must be ordered earliest first; only the first element is
/// looked at. Falls back to the closing time for closed PRs without
/// comments, and to [`PickupTime::Unknown`] for open ones.
pub fn pickup_time(pr: &PullRequest, comments: &[Comment]) -> PickupTime {
    if let Some(first) = comments.first() {
        return PickupTime::FirstComment(minutes_between(pr.created_at, first.created_at));
    }

    match (pr.state, pr.closed_at) {
        (PrState::Closed, Some(closed_at)) => {
            PickupTime::Closed(minutes_between(pr.created_at, closed_at))
        }
        _ => PickupTime::Unknown,
    }
}

/// PRs per day across a batch.
///
/// `prs` must be ordered newest first: the span is measured from the last
/// element's creation to the first element's, in whole days (truncated).
/// The span is floored at one day, so a same-day burst of N PRs gives N.
pub fn merge_frequency(prs: &[PullRequest]) -> f64 {
    let (Some(newest), Some(oldest)) = (prs.first(), prs.last()) else {
        return 0.0;
    };

    let span_days = (newest.created_at - oldest.created_at).num_days();
    prs.len() as f64 / span_days.max(1) as f64
}

/// Lines changed. Missing counts are treated as zero.
pub fn pr_size(pr: &PullRequest) -> u64 {
    pr.additions.unwrap_or(0) + pr.deletions.unwrap_or(0)
}
