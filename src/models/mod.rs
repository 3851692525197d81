//! Data models for the Check air quality location core
//!
//! This module contains the domain models organized by concern:
//! - Location: gazetteer matches, grid points and WGS84 points
//! - Site: forecast and measurement sites as returned upstream
//! - Lang: the two page languages

pub mod lang;
pub mod location;
pub mod site;

// Re-export all public types for convenient access
pub use lang::Lang;
pub use location::{
    Coordinate, GazetteerEntry, GazetteerMatch, GeoPoint, GridPoint, LOCATION_TYPE_NI,
    LOCATION_TYPE_UK, LocationType,
};
pub use site::{
    ForecastDay, ForecastSite, Located, MeasurementSite, PollutantReading, ReadingTime,
    ReadingValue, SiteLocation,
};

/// Upstream numeric fields arrive as numbers or numeric strings.
pub(crate) mod lenient {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    pub fn option_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<NumberOrText>::deserialize(deserializer)?;
        Ok(match raw {
            Some(NumberOrText::Number(n)) => Some(n),
            Some(NumberOrText::Text(s)) => s.trim().parse().ok(),
            None => None,
        })
    }
}
