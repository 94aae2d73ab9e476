//! Conversion from GitHub wire records into domain models

use common::models::{Comment, Commit, PrState, PullRequest};
use common::timestamp::{parse_optional_timestamp, parse_timestamp};
use common::{Error, Result};

use crate::client::{GithubCommit, GithubPr, GithubReviewComment};

impl TryFrom<GithubPr> for PullRequest {
    type Error = Error;

    fn try_from(pr: GithubPr) -> Result<Self> {
        let state = match pr.state.as_str() {
            "open" => PrState::Open,
            "closed" => PrState::Closed,
            other => {
                return Err(Error::InvalidState {
                    number: pr.number,
                    state: other.to_string(),
                })
            }
        };

        let created_at = parse_timestamp("created_at", &pr.created_at)?;
        let closed_at = parse_optional_timestamp("closed_at", pr.closed_at.as_deref())?;
        if state == PrState::Closed && closed_at.is_none() {
            return Err(Error::MissingField {
                field: "closed_at",
                number: pr.number,
            });
        }

        Ok(Self {
            number: pr.number,
            title: pr.title,
            state,
            created_at,
            closed_at,
            additions: pr.additions,
            deletions: pr.deletions,
        })
    }
}

impl TryFrom<GithubCommit> for Commit {
    type Error = Error;

    fn try_from(commit: GithubCommit) -> Result<Self> {
        Ok(Self {
            committed_at: parse_timestamp("commit.committer.date", &commit.commit.committer.date)?,
            sha: commit.sha,
        })
    }
}

impl TryFrom<GithubReviewComment> for Comment {
    type Error = Error;

    fn try_from(comment: GithubReviewComment) -> Result<Self> {
        Ok(Self {
            id: comment.id,
            created_at: parse_timestamp("created_at", &comment.created_at)?,
        })
    }
}

/// Convert a whole API listing, failing on the first bad record
pub fn convert_all<W, M>(records: Vec<W>) -> Result<Vec<M>>
where
    M: TryFrom<W, Error = Error>,
{
    records.into_iter().map(M::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{GithubCommitDetail, GithubCommitSignature};
    use chrono::{TimeZone, Utc};

    fn wire_pr(state: &str, closed_at: Option<&str>) -> GithubPr {
        GithubPr {
            number: 12,
            title: "Hotfix: null check".to_string(),
            state: state.to_string(),
            created_at: "2024-02-01T08:00:00Z".to_string(),
            updated_at: None,
            closed_at: closed_at.map(str::to_string),
            merged_at: None,
            additions: Some(10),
            deletions: None,
        }
    }

    fn wire_commit(date: &str) -> GithubCommit {
        GithubCommit {
            sha: "deadbeef".to_string(),
            commit: GithubCommitDetail {
                committer: GithubCommitSignature {
                    date: date.to_string(),
                },
            },
        }
    }

    #[test]
    fn test_open_pr_converts() {
        let pr = PullRequest::try_from(wire_pr("open", None)).unwrap();
        assert_eq!(pr.number, 12);
        assert_eq!(pr.state, PrState::Open);
        assert_eq!(
            pr.created_at,
            Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap()
        );
        assert_eq!(pr.closed_at, None);
        assert_eq!(pr.additions, Some(10));
        assert_eq!(pr.deletions, None);
    }

    #[test]
    fn test_closed_pr_converts() {
        let pr = PullRequest::try_from(wire_pr("closed", Some("2024-02-02T08:00:00Z"))).unwrap();
        assert_eq!(pr.state, PrState::Closed);
        assert_eq!(
            pr.closed_at,
            Some(Utc.with_ymd_and_hms(2024, 2, 2, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_closed_pr_without_closed_at_fails() {
        let err = PullRequest::try_from(wire_pr("closed", None)).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingField {
                field: "closed_at",
                number: 12
            }
        ));
    }

    #[test]
    fn test_unknown_state_fails() {
        let err = PullRequest::try_from(wire_pr("merged", None)).unwrap_err();
        assert!(matches!(
            &err,
            Error::InvalidState { number: 12, state } if state == "merged"
        ));
        assert_eq!(err.to_string(), "Unexpected state \"merged\" on pull request #12");
    }

    #[test]
    fn test_malformed_created_at_fails() {
        let mut pr = wire_pr("open", None);
        pr.created_at = "2024-02-01 08:00:00".to_string();
        assert!(matches!(
            PullRequest::try_from(pr),
            Err(Error::InvalidTimestamp {
                field: "created_at",
                ..
            })
        ));
    }

    #[test]
    fn test_commit_uses_committer_date() {
        let commit = Commit::try_from(wire_commit("2024-02-01T09:30:00Z")).unwrap();
        assert_eq!(commit.sha, "deadbeef");
        assert_eq!(
            commit.committed_at,
            Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_convert_all_stops_on_bad_record() {
        let commits = vec![
            wire_commit("2024-02-01T09:30:00Z"),
            wire_commit("yesterday"),
        ];
        let result: Result<Vec<Commit>> = convert_all(commits);
        assert!(matches!(
            result,
            Err(Error::InvalidTimestamp {
                field: "commit.committer.date",
                ..
            })
        ));
    }

    #[test]
    fn test_comment_converts() {
        let comment = Comment::try_from(GithubReviewComment {
            id: 5,
            created_at: "2024-02-01T10:00:00Z".to_string(),
        })
        .unwrap();
        assert_eq!(comment.id, 5);
    }
}
