//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod conditions_port;
mod delivery_port;
mod forecast_port;
mod geocoding_port;
mod state_store_port;
mod station_port;

#[cfg(test)]
pub use conditions_port::MockConditionsPort;
pub use conditions_port::{ConditionsPort, CurrentConditions, Reading};
#[cfg(test)]
pub use delivery_port::MockDeliveryPort;
pub use delivery_port::{Delivery, DeliveryPort};
#[cfg(test)]
pub use forecast_port::MockForecastPort;
pub use forecast_port::ForecastPort;
#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::GeocodingPort;
#[cfg(test)]
pub use state_store_port::MockStateStorePort;
pub use state_store_port::StateStorePort;
#[cfg(test)]
pub use station_port::MockStationPort;
pub use station_port::StationPort;
