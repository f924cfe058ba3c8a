//! Builds the service graph from the loaded configuration

use std::sync::Arc;

use anyhow::Context;
use application::ports::{DeliveryPort, StateStorePort};
use application::services::{ForecastPipeline, TriggerMatcher, WeatherRelayService};
use infrastructure::{
    AccuWeatherAdapter, AppConfig, ConsoleDelivery, DeliveryConfig, DeliveryKind,
    InMemoryStateStore, NominatimGeocodingAdapter, NwsAdapter, RedbStateStore, StateBackend,
    StateConfig, WebhookConfig, WebhookDelivery,
};
use tracing::info;

/// Open the configured state store
pub fn build_store(config: &StateConfig) -> anyhow::Result<Arc<dyn StateStorePort>> {
    match config.backend {
        StateBackend::Redb => {
            let store = RedbStateStore::new(&config.path).with_context(|| {
                format!("Failed to open state store at {}", config.path.display())
            })?;
            info!(path = %config.path.display(), "Using redb state store");
            Ok(Arc::new(store))
        },
        StateBackend::Memory => {
            info!("Using in-memory state store");
            Ok(Arc::new(InMemoryStateStore::new()))
        },
    }
}

/// Create the configured delivery channel
pub fn build_delivery(config: &DeliveryConfig) -> anyhow::Result<Arc<dyn DeliveryPort>> {
    match config.kind {
        DeliveryKind::Console => Ok(Arc::new(ConsoleDelivery::new())),
        DeliveryKind::Webhook => {
            let url = config
                .webhook_url
                .clone()
                .context("delivery.webhook_url is not set")?;
            let webhook = WebhookDelivery::new(WebhookConfig {
                url,
                timeout_secs: config.timeout_secs,
            })?;
            Ok(Arc::new(webhook))
        },
    }
}

/// Wire the providers and the store into a pipeline
pub fn build_pipeline(
    config: &AppConfig,
    store: Arc<dyn StateStorePort>,
) -> anyhow::Result<ForecastPipeline> {
    let geocoder = NominatimGeocodingAdapter::new(config.geocoding.clone())?;
    let nws = Arc::new(NwsAdapter::new(config.nws.clone())?);

    let pipeline = ForecastPipeline::new(Arc::new(geocoder), nws.clone(), nws, store);

    match &config.accuweather {
        Some(accuweather) => {
            let adapter = AccuWeatherAdapter::new(accuweather.to_client_config(), accuweather.units)?;
            info!(units = ?accuweather.units, "Current conditions enabled");
            Ok(pipeline.with_conditions(Arc::new(adapter)))
        },
        None => Ok(pipeline),
    }
}

/// Build the relay service used by every lookup command
pub fn build_relay(config: &AppConfig) -> anyhow::Result<Arc<WeatherRelayService>> {
    let store = build_store(&config.state)?;
    let pipeline = build_pipeline(config, store)?;
    let delivery = build_delivery(&config.delivery)?;

    let matcher = config
        .trigger
        .nickname
        .as_deref()
        .map_or_else(TriggerMatcher::new, TriggerMatcher::for_nickname);

    Ok(Arc::new(WeatherRelayService::new(
        Arc::new(pipeline),
        matcher,
        delivery,
    )))
}
