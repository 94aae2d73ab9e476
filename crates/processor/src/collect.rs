//! Collect one repository's PRs from GitHub and build its benchmark

use chrono::{DateTime, Duration, Utc};
use common::models::{Comment, Commit, PullRequest};
use github::{
    convert_all, ClientError, GitHubClient, GithubCommit, GithubPr, GithubReviewComment,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::benchmark::{BenchmarkBuilder, BenchmarkReport};
use crate::metrics::{merge_frequency, PrMetrics};

#[derive(Error, Debug)]
pub enum CollectError {
    #[error("GitHub API error: {0}")]
    GitHub(#[from] ClientError),
    #[error("Invalid record: {0}")]
    Record(#[from] common::Error),
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),
}

impl CollectError {
    fn from_client(e: ClientError) -> Self {
        match e {
            ClientError::RateLimited { retry_after } => Self::RateLimited(retry_after),
            other => Self::GitHub(other),
        }
    }
}

/// A PR left out of the report, with the reason
#[derive(Debug, Clone, Serialize)]
pub struct SkippedPr {
    pub number: u64,
    pub reason: String,
}

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct Collection {
    /// In evaluation order: open PRs first, then closed ones
    pub pull_requests: Vec<PrMetrics>,
    pub skipped: Vec<SkippedPr>,
    pub report: BenchmarkReport,
}

/// One PR's records as fetched from the API
#[derive(Debug, Clone)]
pub struct FetchedPr {
    pub details: GithubPr,
    pub comments: Vec<GithubReviewComment>,
    pub commits: Vec<GithubCommit>,
}

impl FetchedPr {
    /// Convert the wire records and compute the PR's metrics
    pub fn evaluate(self) -> common::Result<PrMetrics> {
        let pr = PullRequest::try_from(self.details)?;
        let comments: Vec<Comment> = convert_all(self.comments)?;
        let commits: Vec<Commit> = convert_all(self.commits)?;

        let metrics = PrMetrics::compute(&pr, &commits, &comments);
        debug!(
            "PR #{}: coding {:.2} min, pickup {:?}, size {}",
            metrics.number, metrics.coding_time_minutes, metrics.pickup_time, metrics.size
        );
        Ok(metrics)
    }
}

/// Folds per-PR fetch outcomes into a [`Collection`].
///
/// A PR whose fetch or conversion fails is skipped and counts toward nothing.
/// Rate limiting is handed back to the caller, which ends the run.
#[derive(Debug, Default)]
pub struct CollectionBuilder {
    builder: BenchmarkBuilder,
    pull_requests: Vec<PrMetrics>,
    skipped: Vec<SkippedPr>,
}

impl CollectionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        number: u64,
        fetched: Result<FetchedPr, CollectError>,
    ) -> Result<(), CollectError> {
        let outcome = fetched.and_then(|pr| pr.evaluate().map_err(CollectError::from));
        match outcome {
            Ok(metrics) => {
                self.builder.record(&metrics);
                self.pull_requests.push(metrics);
                Ok(())
            }
            Err(CollectError::RateLimited(retry_after)) => {
                warn!(
                    "Rate limited at PR #{}, aborting. Retry after {} seconds",
                    number, retry_after
                );
                Err(CollectError::RateLimited(retry_after))
            }
            Err(e) => {
                warn!("Skipping PR #{}: {}", number, e);
                self.skipped.push(SkippedPr {
                    number,
                    reason: e.to_string(),
                });
                Ok(())
            }
        }
    }

    pub fn finish(self, merge_frequency: f64) -> Collection {
        info!(
            "Collection complete: {} PRs evaluated, {} skipped, {:.2} PRs per day",
            self.builder.total(),
            self.skipped.len(),
            merge_frequency
        );
        Collection {
            pull_requests: self.pull_requests,
            skipped: self.skipped,
            report: self.builder.finish(merge_frequency),
        }
    }
}

/// Start of the closed-PR window, clamped to the earliest representable
/// instant when `days` reaches past it
pub fn closed_cutoff(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    Duration::try_days(i64::from(days))
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Fetches open PRs plus recently closed ones and evaluates them
pub struct Collector {
    client: GitHubClient,
    closed_since_days: u32,
}

impl Collector {
    pub fn new(client: GitHubClient, closed_since_days: u32) -> Self {
        Self {
            client,
            closed_since_days,
        }
    }

    pub async fn collect(&self, owner: &str, repo: &str) -> Result<Collection, CollectError> {
        self.collect_at(owner, repo, Utc::now()).await
    }

    /// Like [`Collector::collect`], with the closed-PR window anchored at `now`
    pub async fn collect_at(
        &self,
        owner: &str,
        repo: &str,
        now: DateTime<Utc>,
    ) -> Result<Collection, CollectError> {
        let cutoff = closed_cutoff(now, self.closed_since_days);
        info!(
            "Collecting {}/{} (closed since {}, {} days)",
            owner, repo, cutoff, self.closed_since_days
        );

        let open_prs = self
            .client
            .fetch_open_prs(owner, repo)
            .await
            .map_err(CollectError::from_client)?;
        let closed_prs = self
            .client
            .fetch_closed_prs_since(owner, repo, cutoff)
            .await
            .map_err(CollectError::from_client)?;

        let closed_models = closed_batch(&closed_prs);
        let frequency = merge_frequency(&closed_models);

        let total = open_prs.len() + closed_prs.len();
        info!("Processing {} PRs", total);

        let mut collection = CollectionBuilder::new();
        for (index, pr) in open_prs.iter().chain(closed_prs.iter()).enumerate() {
            let fetched = self.fetch_pr(owner, repo, pr.number).await;
            collection.push(pr.number, fetched)?;

            let processed = index + 1;
            if processed % 10 == 0 {
                info!("Progress: {}/{} PRs", processed, total);
            }
        }

        Ok(collection.finish(frequency))
    }

    async fn fetch_pr(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<FetchedPr, CollectError> {
        let details = self
            .client
            .get_pr(owner, repo, number)
            .await
            .map_err(CollectError::from_client)?;
        let comments = self
            .client
            .list_review_comments(owner, repo, number)
            .await
            .map_err(CollectError::from_client)?;
        let commits = self
            .client
            .fetch_commits(owner, repo, number)
            .await
            .map_err(CollectError::from_client)?;

        Ok(FetchedPr {
            details,
            comments,
            commits,
        })
    }
}

/// Closed PRs as models, newest first by creation.
///
/// The closed listing comes back sorted by update time, so it is re-sorted
/// here to meet [`merge_frequency`]'s ordering requirement. Records that fail
/// to convert are dropped with a warning.
pub fn closed_batch(prs: &[GithubPr]) -> Vec<PullRequest> {
    let mut models: Vec<PullRequest> = prs
        .iter()
        .cloned()
        .filter_map(|pr| {
            let number = pr.number;
            match PullRequest::try_from(pr) {
                Ok(model) => Some(model),
                Err(e) => {
                    warn!("Leaving PR #{} out of merge frequency: {}", number, e);
                    None
                }
            }
        })
        .collect();
    models.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    models
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use github::client::{GithubCommitDetail, GithubCommitSignature};

    fn wire(number: u64, created_at: &str, closed_at: Option<&str>) -> GithubPr {
        GithubPr {
            number,
            title: format!("PR {}", number),
            state: "closed".to_string(),
            created_at: created_at.to_string(),
            updated_at: closed_at.map(str::to_string),
            closed_at: closed_at.map(str::to_string),
            merged_at: None,
            additions: None,
            deletions: None,
        }
    }

    fn commit(sha: &str, date: &str) -> GithubCommit {
        GithubCommit {
            sha: sha.to_string(),
            commit: GithubCommitDetail {
                committer: GithubCommitSignature {
                    date: date.to_string(),
                },
            },
        }
    }

    fn fetched(number: u64, commit_date: &str) -> FetchedPr {
        FetchedPr {
            details: wire(number, "2026-01-05T10:00:00Z", Some("2026-01-05T12:00:00Z")),
            comments: vec![GithubReviewComment {
                id: number as i64,
                created_at: "2026-01-05T10:30:00Z".to_string(),
            }],
            commits: vec![commit("a", commit_date), commit("b", "2026-01-05T09:40:00Z")],
        }
    }

    #[test]
    fn test_closed_cutoff_subtracts_window() {
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        assert_eq!(
            closed_cutoff(now, 8),
            Utc.with_ymd_and_hms(2026, 1, 2, 12, 0, 0).unwrap()
        );
        assert_eq!(closed_cutoff(now, 0), now);
    }

    #[test]
    fn test_closed_cutoff_clamps_huge_window() {
        let now = Utc.with_ymd_and_hms(2026, 1, 10, 12, 0, 0).unwrap();
        assert_eq!(closed_cutoff(now, 200_000_000), DateTime::<Utc>::MIN_UTC);
        assert_eq!(closed_cutoff(now, u32::MAX), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_malformed_record_is_skipped_and_not_counted() {
        let mut collection = CollectionBuilder::new();
        collection.push(1, Ok(fetched(1, "2026-01-05T09:00:00Z"))).unwrap();
        collection.push(2, Ok(fetched(2, "2026-01-05 09:00"))).unwrap();
        collection.push(3, Ok(fetched(3, "2026-01-05T08:00:00Z"))).unwrap();
        let result = collection.finish(0.5);

        let numbers: Vec<_> = result.pull_requests.iter().map(|pr| pr.number).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].number, 2);
        assert!(result.skipped[0].reason.contains("commit.committer.date"));
        assert_eq!(result.report.total_pull_requests, 2);
        assert_eq!(result.report.merge_frequency, 0.5);
    }

    #[test]
    fn test_failed_fetch_is_skipped() {
        let mut collection = CollectionBuilder::new();
        let missing = CollectError::GitHub(ClientError::NotFound("pull 4".to_string()));
        collection.push(4, Err(missing)).unwrap();
        let result = collection.finish(0.0);

        assert!(result.pull_requests.is_empty());
        assert_eq!(result.skipped[0].number, 4);
        assert!(!result.report.has_data());
    }

    #[test]
    fn test_rate_limit_mid_run_aborts() {
        let mut collection = CollectionBuilder::new();
        collection.push(1, Ok(fetched(1, "2026-01-05T09:00:00Z"))).unwrap();

        let err = collection
            .push(2, Err(CollectError::RateLimited(60)))
            .unwrap_err();
        assert!(matches!(err, CollectError::RateLimited(60)));
    }

    #[test]
    fn test_bucket_totals_equal_evaluated_prs() {
        let mut collection = CollectionBuilder::new();
        for number in 1..=5 {
            let date = if number % 2 == 0 {
                "yesterday"
            } else {
                "2026-01-05T09:00:00Z"
            };
            collection.push(number, Ok(fetched(number, date))).unwrap();
        }
        let result = collection.finish(1.0);

        assert_eq!(result.pull_requests.len(), 3);
        assert_eq!(result.skipped.len(), 2);
        assert_eq!(result.report.total_pull_requests, 3);
        for dist in result.report.distributions() {
            assert_eq!(dist.total(), 3, "{}", dist.metric);
        }
    }

    #[test]
    fn test_closed_batch_sorted_newest_first() {
        let prs = vec![
            wire(1, "2026-01-01T10:00:00Z", Some("2026-01-09T10:00:00Z")),
            wire(2, "2026-01-05T10:00:00Z", Some("2026-01-06T10:00:00Z")),
            wire(3, "2026-01-03T10:00:00Z", Some("2026-01-08T10:00:00Z")),
        ];

        let batch = closed_batch(&prs);
        let numbers: Vec<_> = batch.iter().map(|pr| pr.number).collect();
        assert_eq!(numbers, vec![2, 3, 1]);
        assert_eq!(merge_frequency(&batch), 3.0 / 4.0);
    }

    #[test]
    fn test_closed_batch_drops_bad_records() {
        let prs = vec![
            wire(1, "2026-01-01T10:00:00Z", Some("2026-01-09T10:00:00Z")),
            wire(2, "not a timestamp", Some("2026-01-06T10:00:00Z")),
            wire(3, "2026-01-03T10:00:00Z", None),
        ];

        let batch = closed_batch(&prs);
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].number, 1);
    }

    #[test]
    fn test_rate_limit_is_lifted_out_of_client_error() {
        let err = CollectError::from_client(ClientError::RateLimited { retry_after: 30 });
        assert!(matches!(err, CollectError::RateLimited(30)));

        let err = CollectError::from_client(ClientError::NotFound("x".to_string()));
        assert!(matches!(err, CollectError::GitHub(ClientError::NotFound(_))));
    }
}
