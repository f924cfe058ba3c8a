//! Weather relay service
//!
//! Connects triggers to the forecast pipeline and posts the result.

use std::fmt;
use std::sync::Arc;

use domain::PlaceName;
use tracing::{debug, error, info, instrument};

use crate::error::ApplicationError;
use crate::ports::{Delivery, DeliveryPort};
use crate::services::{ForecastPipeline, ForecastReport, IncomingMessage, Trigger, TriggerMatcher};

/// Runs lookups for triggers and delivers the reports
pub struct WeatherRelayService {
    pipeline: Arc<ForecastPipeline>,
    matcher: TriggerMatcher,
    delivery: Arc<dyn DeliveryPort>,
}

impl fmt::Debug for WeatherRelayService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherRelayService")
            .field("pipeline", &self.pipeline)
            .field("matcher", &self.matcher)
            .finish_non_exhaustive()
    }
}

impl WeatherRelayService {
    /// Create a new relay service
    #[must_use]
    pub fn new(
        pipeline: Arc<ForecastPipeline>,
        matcher: TriggerMatcher,
        delivery: Arc<dyn DeliveryPort>,
    ) -> Self {
        Self {
            pipeline,
            matcher,
            delivery,
        }
    }

    /// Handle a chat message
    ///
    /// Returns `Ok(None)` when the message is not a forecast request.
    ///
    /// # Errors
    ///
    /// Returns an error if the report could not be delivered.
    #[instrument(skip(self, message), fields(author = %message.author, channel = %message.channel))]
    pub async fn handle_message(
        &self,
        message: &IncomingMessage,
    ) -> Result<Option<ForecastReport>, ApplicationError> {
        let Some(trigger) = self.matcher.classify(message) else {
            debug!("Message ignored");
            return Ok(None);
        };
        self.dispatch(&trigger).await.map(Some)
    }

    /// Handle a scheduled lookup
    ///
    /// # Errors
    ///
    /// Returns an error if the report could not be delivered.
    #[instrument(skip(self), fields(place = %place))]
    pub async fn handle_scheduled(
        &self,
        place: PlaceName,
        channel: &str,
    ) -> Result<ForecastReport, ApplicationError> {
        let trigger = Trigger::Scheduled {
            place,
            channel: channel.to_string(),
        };
        self.dispatch(&trigger).await
    }

    async fn dispatch(&self, trigger: &Trigger) -> Result<ForecastReport, ApplicationError> {
        let run = self.pipeline.lookup(trigger.place()).await;
        let delivery = Delivery::new(trigger.channel(), run.report);

        if let Err(e) = self.delivery.deliver(&delivery).await {
            error!(channel = %delivery.channel, error = %e, "Failed to deliver report");
            return Err(e);
        }

        info!(
            place = %delivery.report.place,
            channel = %delivery.channel,
            found = delivery.report.found,
            "Delivered report"
        );
        Ok(delivery.report)
    }
}

#[cfg(test)]
mod tests {
    use domain::{Coordinate, PipelineState, StationRef};

    use super::*;
    use crate::ports::{
        MockDeliveryPort, MockForecastPort, MockGeocodingPort, MockStateStorePort,
        MockStationPort,
    };

    fn warm_pipeline(forecast_calls: usize) -> Arc<ForecastPipeline> {
        let mut state = PipelineState::new();
        state.record_coordinate(
            PlaceName::new("Boise").unwrap(),
            Coordinate::from_encoded("43.6%2C-116.2"),
        );
        state.record_station(
            Coordinate::from_encoded("43.6%2C-116.2"),
            StationRef::from_raw("BOI/132,86"),
        );
        state.clear_dirty();

        let mut store = MockStateStorePort::new();
        store.expect_get().returning(move || Ok(Some(state.clone())));
        store.expect_set().never();

        let mut forecasts = MockForecastPort::new();
        forecasts
            .expect_forecast_for()
            .times(forecast_calls)
            .returning(|_| Ok(Some("Hot.".into())));

        Arc::new(ForecastPipeline::new(
            Arc::new(MockGeocodingPort::new()),
            Arc::new(MockStationPort::new()),
            Arc::new(forecasts),
            Arc::new(store),
        ))
    }

    fn message(text: &str) -> IncomingMessage {
        IncomingMessage {
            author: "relaybot".into(),
            channel: "#idaho".into(),
            text: text.into(),
        }
    }

    #[tokio::test]
    async fn matching_message_is_answered_in_its_channel() {
        let mut delivery = MockDeliveryPort::new();
        delivery
            .expect_deliver()
            .withf(|d| d.channel == "idaho" && d.report.forecast == "Hot.")
            .times(1)
            .returning(|_| Ok(()));

        let service = WeatherRelayService::new(
            warm_pipeline(1),
            TriggerMatcher::for_nickname("relaybot"),
            Arc::new(delivery),
        );

        let report = service
            .handle_message(&message("The weather in Boise is..."))
            .await
            .unwrap()
            .unwrap();
        assert!(report.found);
    }

    #[tokio::test]
    async fn unrelated_message_is_ignored() {
        let mut delivery = MockDeliveryPort::new();
        delivery.expect_deliver().never();

        let service = WeatherRelayService::new(
            warm_pipeline(0),
            TriggerMatcher::new(),
            Arc::new(delivery),
        );

        let result = service.handle_message(&message("hello there")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn scheduled_lookup_delivers() {
        let mut delivery = MockDeliveryPort::new();
        delivery
            .expect_deliver()
            .withf(|d| d.channel == "daily")
            .times(1)
            .returning(|_| Ok(()));

        let service = WeatherRelayService::new(
            warm_pipeline(1),
            TriggerMatcher::new(),
            Arc::new(delivery),
        );

        let report = service
            .handle_scheduled(PlaceName::new("Boise").unwrap(), "#daily")
            .await
            .unwrap();
        assert_eq!(report.forecast, "Hot.");
    }

    #[tokio::test]
    async fn delivery_failure_is_returned() {
        let mut delivery = MockDeliveryPort::new();
        delivery
            .expect_deliver()
            .returning(|_| Err(ApplicationError::Delivery("webhook down".into())));

        let service = WeatherRelayService::new(
            warm_pipeline(1),
            TriggerMatcher::new(),
            Arc::new(delivery),
        );

        let result = service
            .handle_scheduled(PlaceName::new("Boise").unwrap(), "daily")
            .await;
        assert!(matches!(result, Err(ApplicationError::Delivery(_))));
    }
}
