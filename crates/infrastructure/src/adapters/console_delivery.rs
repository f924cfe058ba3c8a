//! Console delivery - writes reports to stdout

use std::fmt;
use std::io::{self, Write};

use application::error::ApplicationError;
use application::ports::{Delivery, DeliveryPort};
use application::services::format_report;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Delivers reports as `#<channel> <message>` lines
pub struct ConsoleDelivery {
    out: Mutex<Box<dyn Write + Send>>,
}

impl fmt::Debug for ConsoleDelivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsoleDelivery").finish_non_exhaustive()
    }
}

impl Default for ConsoleDelivery {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleDelivery {
    /// Deliver to stdout
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    /// Deliver to an arbitrary writer
    #[must_use]
    pub fn with_writer(out: Box<dyn Write + Send>) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }
}

#[async_trait]
impl DeliveryPort for ConsoleDelivery {
    async fn deliver(&self, delivery: &Delivery) -> Result<(), ApplicationError> {
        let line = format!("#{} {}", delivery.channel, format_report(&delivery.report));
        let mut out = self.out.lock();
        writeln!(out, "{line}")
            .and_then(|()| out.flush())
            .map_err(|e| ApplicationError::Delivery(e.to_string()))
    }
}
