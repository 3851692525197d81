//! Location models: gazetteer matches and the points derived from them

use serde::{Deserialize, Serialize};
use std::fmt;

use super::lenient;

pub const LOCATION_TYPE_UK: &str = "uk-location";
pub const LOCATION_TYPE_NI: &str = "ni-location";

/// Which gazetteer a search was resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LocationType {
    #[default]
    #[serde(rename = "uk-location")]
    Uk,
    #[serde(rename = "ni-location")]
    Ni,
}

impl LocationType {
    /// Anything that is not the UK tag selects the NI result set.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        if tag == LOCATION_TYPE_UK {
            LocationType::Uk
        } else {
            LocationType::Ni
        }
    }

    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            LocationType::Uk => LOCATION_TYPE_UK,
            LocationType::Ni => LOCATION_TYPE_NI,
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// WGS84 point of a searched location
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// WGS84 point of a forecast or measurement site
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// A source coordinate in its native reference system
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridPoint {
    /// OS National Grid easting/northing in metres
    OsGrid { easting: f64, northing: f64 },
    /// Already geographic
    LonLat { lon: f64, lat: f64 },
}

impl GridPoint {
    /// NI entries carry either grid metres or plain degrees under the same
    /// field names; values inside degree bounds are taken as degrees.
    #[must_use]
    pub fn from_ni_pair(x: f64, y: f64) -> Self {
        if x.abs() <= 180.0 && y.abs() <= 90.0 {
            GridPoint::LonLat { lon: x, lat: y }
        } else {
            GridPoint::OsGrid {
                easting: x,
                northing: y,
            }
        }
    }
}

/// The gazetteer record inside a search result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GazetteerEntry {
    #[serde(rename = "ID", default)]
    pub id: String,
    #[serde(rename = "NAME1", default, skip_serializing_if = "Option::is_none")]
    pub name1: Option<String>,
    #[serde(rename = "NAME2", default, skip_serializing_if = "Option::is_none")]
    pub name2: Option<String>,
    #[serde(rename = "LOCAL_TYPE", default, skip_serializing_if = "Option::is_none")]
    pub local_type: Option<String>,
    #[serde(rename = "POSTCODE_DISTRICT", default, skip_serializing_if = "Option::is_none")]
    pub postcode_district: Option<String>,
    #[serde(rename = "DISTRICT_BOROUGH", default, skip_serializing_if = "Option::is_none")]
    pub district_borough: Option<String>,
    #[serde(rename = "COUNTY_UNITARY", default, skip_serializing_if = "Option::is_none")]
    pub county_unitary: Option<String>,
    #[serde(
        rename = "GEOMETRY_X",
        default,
        deserialize_with = "lenient::option_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub geometry_x: Option<f64>,
    #[serde(
        rename = "GEOMETRY_Y",
        default,
        deserialize_with = "lenient::option_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub geometry_y: Option<f64>,
    #[serde(
        rename = "LONGITUDE",
        default,
        deserialize_with = "lenient::option_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub longitude: Option<f64>,
    #[serde(
        rename = "LATITUDE",
        default,
        deserialize_with = "lenient::option_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub latitude: Option<f64>,
}

/// One search result from the UK or NI gazetteer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GazetteerMatch {
    #[serde(rename = "GAZETTEER_ENTRY", default)]
    pub gazetteer_entry: GazetteerEntry,
    #[serde(
        rename = "xCoordinate",
        default,
        deserialize_with = "lenient::option_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub x_coordinate: Option<f64>,
    #[serde(
        rename = "yCoordinate",
        default,
        deserialize_with = "lenient::option_f64",
        skip_serializing_if = "Option::is_none"
    )]
    pub y_coordinate: Option<f64>,
}

impl GazetteerMatch {
    #[must_use]
    pub fn id(&self) -> &str {
        &self.gazetteer_entry.id
    }

    /// Normalise the entry's coordinates for the given result set.
    ///
    /// UK entries use `GEOMETRY_X`/`GEOMETRY_Y` grid metres. NI entries use
    /// `xCoordinate`/`yCoordinate` when both are present, else the
    /// gazetteer `LONGITUDE`/`LATITUDE`.
    #[must_use]
    pub fn grid_point(&self, location_type: LocationType) -> Option<GridPoint> {
        let entry = &self.gazetteer_entry;
        match location_type {
            LocationType::Uk => Some(GridPoint::OsGrid {
                easting: entry.geometry_x?,
                northing: entry.geometry_y?,
            }),
            LocationType::Ni => {
                let (x, y) = match (self.x_coordinate, self.y_coordinate) {
                    (Some(x), Some(y)) => (x, y),
                    _ => (entry.longitude?, entry.latitude?),
                };
                Some(GridPoint::from_ni_pair(x, y))
            }
        }
    }
}
