//! Check air quality - location resolution and DAQI banding
//!
//! This library turns a searched postcode or place into what a location
//! page shows: the nearest DAQI forecast and the closest monitoring sites
//! with their readings banded in English or Welsh.

pub mod api;
pub mod config;
pub mod error;
pub mod geo;
pub mod location;
pub mod logging;
pub mod models;
pub mod nearest;
pub mod pollutant;
pub mod upstream;
pub mod web;

// Re-export core types for public API
pub use config::AppConfig;
pub use error::{AirQualityError, LocateError, Outcome};
pub use geo::{
    convert_point_to_lon_lat, coordinates_total, get_near_location, os_grid_to_wgs84,
    points_in_range,
};
pub use location::{classify_postcode, get_id_match, parse_search_terms};
pub use logging::{DegradationLog, RecordingLog, TracingLog};
pub use models::{GazetteerMatch, GeoPoint, Lang, LocationType};
pub use nearest::{NearestLocationResolver, NearestLocationResult};
pub use pollutant::{pollutant_level, pollutant_level_cy};
pub use upstream::AirQualityClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AirQualityError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
