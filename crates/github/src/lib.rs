//! GitHub API client for fetching PRs, commits and review comments

pub mod client;
pub mod convert;

pub use client::{ClientError, GitHubClient, GithubCommit, GithubPr, GithubReviewComment};
pub use convert::convert_all;
