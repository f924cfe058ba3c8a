//! Task factories for configured `[[schedule]]` entries
//!
//! Each entry becomes a closure the scheduler calls once per tick. A tick
//! runs the full lookup for the entry's place and posts to its channel.

use std::sync::Arc;

use application::services::WeatherRelayService;
use domain::PlaceName;
use futures::future::BoxFuture;
use tracing::{debug, info, warn};

use crate::config::ScheduleEntry;
use crate::scheduler::{SchedulerError, TaskScheduler};

/// Create the closure that runs one scheduled lookup
pub fn create_scheduled_lookup_task(
    relay: Arc<WeatherRelayService>,
    place: PlaceName,
    channel: String,
) -> impl Fn() -> BoxFuture<'static, Result<(), String>> + Send + Sync + 'static {
    move || {
        let relay = Arc::clone(&relay);
        let place = place.clone();
        let channel = channel.clone();

        Box::pin(async move {
            debug!(%place, %channel, "Running scheduled lookup");
            let report = relay
                .handle_scheduled(place, &channel)
                .await
                .map_err(|e| e.to_string())?;
            if !report.found {
                warn!(place = %report.place, "Scheduled lookup found no forecast");
            }
            Ok(())
        })
    }
}

/// Register every schedule entry on the scheduler
///
/// Returns the number of tasks added.
///
/// # Errors
///
/// Fails on the first entry with an invalid place, an invalid cron
/// expression, or a name that is already scheduled.
pub async fn register_schedules(
    scheduler: &TaskScheduler,
    relay: &Arc<WeatherRelayService>,
    entries: &[ScheduleEntry],
) -> Result<usize, SchedulerError> {
    for entry in entries {
        let place = PlaceName::new(entry.place.clone()).map_err(|e| {
            SchedulerError::Internal(format!("schedule '{}': {e}", entry.name))
        })?;
        let task = create_scheduled_lookup_task(Arc::clone(relay), place, entry.channel.clone());
        scheduler.add_task(&entry.name, &entry.cron, task).await?;
    }

    info!(count = entries.len(), "Registered scheduled lookups");
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use application::ApplicationError;
    use application::ports::{Delivery, DeliveryPort};
    use application::services::{ForecastPipeline, TriggerMatcher};
    use async_trait::async_trait;
    use domain::{Coordinate, PipelineState, StationRef};
    use parking_lot::Mutex;

    use super::*;
    use crate::adapters::{NominatimGeocodingAdapter, NwsAdapter};
    use crate::persistence::InMemoryStateStore;
    use crate::scheduler::SchedulerConfig;

    #[derive(Default)]
    struct Recorder {
        sent: Mutex<Vec<(String, String)>>,
    }

    #[async_trait]
    impl DeliveryPort for Recorder {
        async fn deliver(&self, delivery: &Delivery) -> Result<(), ApplicationError> {
            self.sent
                .lock()
                .push((delivery.channel.clone(), delivery.report.forecast.clone()));
            Ok(())
        }
    }

    fn relay_with(recorder: Arc<Recorder>) -> Arc<WeatherRelayService> {
        // Boise is cached all the way to its station; the forecast call hits
        // a closed port, so every run ends in the fallback message.
        let nws = NwsAdapter::new(integration_weather::NwsConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 1,
            ..Default::default()
        })
        .unwrap();
        let nws = Arc::new(nws);

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

        let pipeline = ForecastPipeline::new(
            Arc::new(NominatimGeocodingAdapter::new(
                integration_weather::NominatimConfig {
                    base_url: "http://127.0.0.1:9".to_string(),
                    timeout_secs: 1,
                    min_interval_ms: 0,
                    ..Default::default()
                },
            )
            .unwrap()),
            nws.clone(),
            nws,
            Arc::new(InMemoryStateStore::with_state(state)),
        );
        Arc::new(WeatherRelayService::new(
            Arc::new(pipeline),
            TriggerMatcher::new(),
            recorder,
        ))
    }

    #[tokio::test]
    async fn task_runs_lookup_and_delivers() {
        let recorder = Arc::new(Recorder::default());
        let task = create_scheduled_lookup_task(
            relay_with(Arc::clone(&recorder)),
            PlaceName::new("Boise").unwrap(),
            "#boise".to_string(),
        );

        task().await.unwrap();
        task().await.unwrap();

        let sent = recorder.sent.lock();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].0, "boise");
        assert_eq!(sent[0].1, "Unable to find results for \"Boise\"!");
    }

    #[tokio::test]
    async fn register_adds_one_task_per_entry() {
        let recorder = Arc::new(Recorder::default());
        let relay = relay_with(recorder);
        let scheduler = TaskScheduler::new(SchedulerConfig {
            auto_start: false,
            ..Default::default()
        })
        .await
        .unwrap();

        let entries = vec![
            ScheduleEntry {
                name: "boise-morning".to_string(),
                cron: "0 0 7 * * *".to_string(),
                place: "Boise".to_string(),
                channel: "#boise".to_string(),
            },
            ScheduleEntry {
                name: "la-evening".to_string(),
                cron: "0 0 17 * * *".to_string(),
                place: "Los Angeles".to_string(),
                channel: "#la".to_string(),
            },
        ];

        let added = register_schedules(&scheduler, &relay, &entries).await.unwrap();
        assert_eq!(added, 2);
        assert_eq!(scheduler.task_count(), 2);
    }

    #[tokio::test]
    async fn register_rejects_blank_place() {
        let relay = relay_with(Arc::new(Recorder::default()));
        let scheduler = TaskScheduler::new(SchedulerConfig {
            auto_start: false,
            ..Default::default()
        })
        .await
        .unwrap();

        let entries = vec![ScheduleEntry {
            name: "blank".to_string(),
            cron: "0 0 7 * * *".to_string(),
            place: "   ".to_string(),
            channel: "#x".to_string(),
        }];

        let result = register_schedules(&scheduler, &relay, &entries).await;
        assert!(matches!(result, Err(SchedulerError::Internal(_))));
        assert_eq!(scheduler.task_count(), 0);
    }
}
