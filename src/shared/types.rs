use serde::{Deserialize, Serialize};

/// Form payload Slack posts for a slash command.
///
/// Only the fields troutslap reads are kept; anything missing decodes as
/// an empty string.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct SlashCommand {
    pub team_id: String,
    pub channel_id: String,
    pub user_id: String,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Only visible to the user who invoked the command.
    Ephemeral,
    /// Visible to everyone in the channel.
    InChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackResponse {
    pub response_type: ResponseType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl SlackResponse {
    pub fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: ResponseType::Ephemeral,
            text: Some(text.into()),
        }
    }

    /// Bare acknowledgement that makes the invocation itself visible to the
    /// channel.
    pub fn in_channel() -> Self {
        Self {
            response_type: ResponseType::InChannel,
            text: None,
        }
    }
}

/// Everyone taking part in a combat, deduplicated in order of first
/// appearance. Always contains the initiator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantSet(Vec<String>);

impl ParticipantSet {
    pub fn new<I, S>(initiator: &str, mentioned: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut members: Vec<String> = Vec::new();
        let all = mentioned
            .into_iter()
            .map(Into::into)
            .chain(std::iter::once(initiator.to_string()));
        for user_id in all {
            if !members.contains(&user_id) {
                members.push(user_id);
            }
        }
        Self(members)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.0.iter().any(|member| member == user_id)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }
}

/// Queue payload handed from the receiver to the processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlapJob {
    pub team_id: String,
    pub channel_id: String,
    pub initiator: String,
    pub participants: ParticipantSet,
}

/// A workspace's stored OAuth installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    pub team_id: String,
    pub team_name: String,
    pub access_token: String,
}
