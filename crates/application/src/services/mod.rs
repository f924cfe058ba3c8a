//! Application services - Use case implementations

mod forecast_pipeline;
mod report_formatter;
mod resolution_cache;
mod trigger;
mod weather_relay_service;

pub use forecast_pipeline::{ForecastPipeline, ForecastReport, PipelineRun, fallback_message};
pub use report_formatter::format_report;
pub use resolution_cache::ResolutionCache;
pub use trigger::{IncomingMessage, Trigger, TriggerMatcher};
pub use weather_relay_service::WeatherRelayService;
