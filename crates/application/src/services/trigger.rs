//! Trigger classification
//!
//! A lookup starts either from a chat message that uses the trigger phrase
//! or from a schedule. Any of these asks for Los Angeles, CA:
//!
//! ```text
//! The weather in Los Angeles, CA is...
//! The weather for Los Angeles, CA is...
//! The forecast for Los Angeles..
//! The forecast in Los Angeles...
//! ```

use std::sync::LazyLock;

use domain::PlaceName;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Trigger phrase; capture group 1 is the place name
static TRIGGER_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Infallible with a valid static pattern
    Regex::new(r"^\s*The\s+(?:weather|forecast)\s+(?:for|in)\s+(.*?)(?:\s+is)?\s?\.{2,}")
        .expect("Failed to compile trigger phrase")
});

/// A chat message as seen by the bot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    /// Nickname of the sender
    pub author: String,
    /// Channel the message was posted in
    pub channel: String,
    /// Message body
    pub text: String,
}

/// Why a lookup is being run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger {
    /// A chat message used the trigger phrase
    Message {
        /// Place named in the message
        place: PlaceName,
        /// Channel to answer in
        channel: String,
    },
    /// A configured schedule fired
    Scheduled {
        /// Configured place
        place: PlaceName,
        /// Configured channel
        channel: String,
    },
}

impl Trigger {
    /// Place to look up
    #[must_use]
    pub const fn place(&self) -> &PlaceName {
        match self {
            Self::Message { place, .. } | Self::Scheduled { place, .. } => place,
        }
    }

    /// Channel the report goes to
    #[must_use]
    pub fn channel(&self) -> &str {
        match self {
            Self::Message { channel, .. } | Self::Scheduled { channel, .. } => channel,
        }
    }
}

/// Decides whether a chat message asks for a forecast
#[derive(Debug, Clone, Default)]
pub struct TriggerMatcher {
    nickname: Option<String>,
}

impl TriggerMatcher {
    /// Match messages from anyone
    #[must_use]
    pub const fn new() -> Self {
        Self { nickname: None }
    }

    /// Only honour messages authored by `nickname`
    #[must_use]
    pub fn for_nickname(nickname: impl Into<String>) -> Self {
        Self {
            nickname: Some(nickname.into()),
        }
    }

    /// Extract the requested place from a message text
    #[must_use]
    pub fn extract_place(text: &str) -> Option<PlaceName> {
        let captures = TRIGGER_PHRASE.captures(text)?;
        let raw = captures.get(1)?.as_str();
        PlaceName::new(raw).ok()
    }

    /// Classify a message; `None` when it is not a forecast request
    #[must_use]
    pub fn classify(&self, message: &IncomingMessage) -> Option<Trigger> {
        if let Some(nickname) = &self.nickname {
            if message.author != *nickname {
                return None;
            }
        }

        let place = Self::extract_place(&message.text)?;
        debug!(%place, channel = %message.channel, "Message matched trigger phrase");
        Some(Trigger::Message {
            place,
            channel: message.channel.clone(),
        })
    }
}
