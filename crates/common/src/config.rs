//! Application configuration

use std::env;

use crate::{Error, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub github_token: Option<String>,
    pub api_url: String,
    /// Closed PRs older than this many days are left out of the report
    pub closed_since_days: u32,
    /// Pagination safety limit per listing
    pub max_pages: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github_token: None,
            api_url: DEFAULT_API_URL.to_string(),
            closed_since_days: 8,
            max_pages: 50,
        }
    }
}

/// Unset and empty variables both read as `None`
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.is_empty())
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            github_token: non_empty_var("GITHUB_TOKEN"),
            api_url: non_empty_var("GITHUB_API_URL").unwrap_or(defaults.api_url),
            closed_since_days: env::var("CLOSED_SINCE_DAYS")
                .ok()
                .and_then(|d| d.parse().ok())
                .unwrap_or(defaults.closed_since_days),
            max_pages: env::var("MAX_PAGES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.max_pages),
        }
    }

    /// The token is mandatory for a report run
    pub fn require_token(&self) -> Result<&str> {
        self.github_token.as_deref().ok_or_else(|| {
            Error::Config("Please set your GitHub token in the GITHUB_TOKEN variable".to_string())
        })
    }
}
