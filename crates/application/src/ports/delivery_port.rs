//! Delivery port - hands a finished report to a communication channel

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::error::ApplicationError;
use crate::services::ForecastReport;

/// A report addressed to a channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Delivery {
    /// Target channel name (without any platform prefix such as `#`)
    pub channel: String,
    /// The report to post
    pub report: ForecastReport,
}

impl Delivery {
    /// Address a report to a channel, dropping a leading `#`
    #[must_use]
    pub fn new(channel: &str, report: ForecastReport) -> Self {
        Self {
            channel: channel.trim_start_matches('#').to_string(),
            report,
        }
    }
}

/// Port for posting reports
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DeliveryPort: Send + Sync {
    /// Post a report to its channel
    async fn deliver(&self, delivery: &Delivery) -> Result<(), ApplicationError>;
}
