//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer.
//! Contains the weather provider adapters, state stores, delivery channels,
//! configuration loading, tracing setup and the lookup scheduler.

pub mod adapters;
pub mod config;
pub mod persistence;
pub mod scheduled_tasks;
pub mod scheduler;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AccuWeatherAppConfig, AppConfig, DeliveryConfig, DeliveryKind, ScheduleEntry, StateBackend,
    StateConfig, TelemetryAppConfig, TriggerConfig,
};
pub use persistence::{InMemoryStateStore, RedbStateStore};
pub use scheduled_tasks::{create_scheduled_lookup_task, register_schedules};
pub use scheduler::{SchedulerConfig, SchedulerError, TaskScheduler, TaskStats};
pub use telemetry::{TelemetryError, init_tracing};
