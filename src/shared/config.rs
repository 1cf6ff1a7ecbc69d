//! Configuration read once from the environment at cold start.

use std::time::Duration;

use crate::error::{TroutslapError, TroutslapResult};

pub const DEFAULT_INSTALLATIONS_TABLE: &str = "troutslap-installations";
pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";

// Our first post sometimes beats the user's command to the channel, so hold
// back a little before starting and between posts.
const INITIAL_PAUSE: Duration = Duration::from_millis(500);
const PAUSE: Duration = Duration::from_secs(1);

/// Settings common to both functions.
#[derive(Debug, Clone)]
pub struct Config {
    /// Disables artificial delays and turns logging up to debug.
    pub debug: bool,
    /// DynamoDB table holding one installation per workspace.
    pub installations_table: String,
    /// Base URL for Slack Web API calls.
    pub slack_api_base: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            debug: lookup("TROUTSLAP_DEBUG")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            installations_table: lookup("INSTALLATIONS_TABLE")
                .unwrap_or_else(|| DEFAULT_INSTALLATIONS_TABLE.to_string()),
            slack_api_base: lookup("SLACK_API_BASE")
                .unwrap_or_else(|| DEFAULT_SLACK_API_BASE.to_string()),
        }
    }

    /// Delay before the first post of a combat.
    pub fn initial_pause(&self) -> Duration {
        if self.debug {
            Duration::ZERO
        } else {
            INITIAL_PAUSE
        }
    }

    /// Delay after each post.
    pub fn pause(&self) -> Duration {
        if self.debug {
            Duration::ZERO
        } else {
            PAUSE
        }
    }
}

/// Secrets the receiver needs to talk to Slack.
#[derive(Clone)]
pub struct SlackAppCredentials {
    pub signing_secret: String,
    pub client_id: String,
    pub client_secret: String,
}

impl std::fmt::Debug for SlackAppCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackAppCredentials")
            .field("signing_secret", &"[REDACTED]")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

impl SlackAppCredentials {
    pub fn from_env() -> TroutslapResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> TroutslapResult<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| TroutslapError::Config(format!("{} is not set", key)))
        };

        Ok(Self {
            signing_secret: required("SLACK_SIGNING_SECRET")?,
            client_id: required("SLACK_CLIENT_ID")?,
            client_secret: required("SLACK_CLIENT_SECRET")?,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1")
}
