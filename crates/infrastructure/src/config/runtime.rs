//! Runtime configurations: state store, trigger, delivery, schedules.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

// ==============================
// State Store Configuration
// ==============================

/// Which state store backs the resolution cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StateBackend {
    /// Embedded redb file (default)
    #[default]
    Redb,
    /// Process memory, lost on exit
    Memory,
}

/// State store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Backend selection
    #[serde(default)]
    pub backend: StateBackend,

    /// Database file for the redb backend
    #[serde(default = "default_state_path")]
    pub path: PathBuf,
}

fn default_state_path() -> PathBuf {
    PathBuf::from("data/weathervane.redb")
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            backend: StateBackend::default(),
            path: default_state_path(),
        }
    }
}

// ==============================
// Trigger Configuration
// ==============================

/// Message trigger configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Only messages from this nickname are answered (any author if unset)
    #[serde(default)]
    pub nickname: Option<String>,
}

// ==============================
// Delivery Configuration
// ==============================

/// Where reports are posted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryKind {
    /// Print to stdout
    #[default]
    Console,
    /// POST to a chat relay webhook
    Webhook,
}

/// Delivery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryConfig {
    /// Delivery backend
    #[serde(default)]
    pub kind: DeliveryKind,

    /// Webhook endpoint (required for `kind = "webhook"`)
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Webhook request timeout in seconds
    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u64,

    /// Channel used when a lookup names none
    #[serde(default = "default_channel")]
    pub default_channel: String,
}

const fn default_webhook_timeout() -> u64 {
    10
}

fn default_channel() -> String {
    "weather".to_string()
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            kind: DeliveryKind::default(),
            webhook_url: None,
            timeout_secs: default_webhook_timeout(),
            default_channel: default_channel(),
        }
    }
}

// ==============================
// Schedule Configuration
// ==============================

/// A recurring lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Task name used in logs and statistics
    pub name: String,

    /// Six-field cron expression (`sec min hour day month weekday`)
    pub cron: String,

    /// Place to look up
    pub place: String,

    /// Channel to post to
    pub channel: String,
}
