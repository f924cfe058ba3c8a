//! Value Objects - Immutable, identity-less domain primitives

mod coordinate;
mod place_name;
mod provider_city_id;
mod station_ref;

pub use coordinate::Coordinate;
pub use place_name::PlaceName;
pub use provider_city_id::ProviderCityId;
pub use station_ref::StationRef;
