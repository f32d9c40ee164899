use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::form::{ChatForm, FormFields, GoalForm};

/// Server-side id of a stored chat exchange. The server emits an integer, but
/// templates may pass it through as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ConversationId(String);

impl ConversationId {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConversationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ConversationId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(value) => Self(value.to_string()),
            RawId::Text(value) => Self(value),
        })
    }
}

/// `/ai_chat` reply. Error replies carry only `error`, so everything else
/// is optional.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<ConversationId>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatReply {
    #[must_use]
    pub fn provider_label(&self) -> &str {
        self.provider
            .as_deref()
            .filter(|provider| !provider.trim().is_empty())
            .unwrap_or("Unknown")
    }

    #[must_use]
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("undefined")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RatingReply {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RatingSubmission {
    pub conversation_id: ConversationId,
    pub rating: u8,
}

impl RatingSubmission {
    #[must_use]
    pub fn to_fields(&self) -> FormFields {
        FormFields::new()
            .with("conversation_id", self.conversation_id.as_str())
            .with("rating", self.rating.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("network request failed: {0}")]
    Network(String),
    #[error("request failed with status {status}")]
    Http { status: u16 },
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// Maps a non-2xx status to an error, leaving 2xx alone.
    pub fn check_status(status: u16) -> Result<(), Self> {
        if (200..=299).contains(&status) {
            Ok(())
        } else {
            Err(Self::Http { status })
        }
    }
}

pub fn decode_json<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<T, ApiError> {
    serde_json::from_str(raw).map_err(|error| ApiError::Decode(error.to_string()))
}

/// The three form endpoints the pages post to.
///
/// Futures are `!Send`: implementations run on the browser event loop.
#[async_trait(?Send)]
pub trait OperatorApi {
    async fn ai_chat(&self, form: &ChatForm) -> Result<ChatReply, ApiError>;
    async fn create_goal(&self, form: &GoalForm) -> Result<(), ApiError>;
    async fn rate_response(&self, submission: &RatingSubmission) -> Result<RatingReply, ApiError>;
}
