//! Forecast and measurement sites as returned by the upstream air quality API

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Coordinate;

/// `location` block of a site; `coordinates` is `[lat, lon]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteLocation {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl SiteLocation {
    /// The `[lat, lon]` pair, if present and finite
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self.coordinates.as_slice() {
            [lat, lon, ..] if lat.is_finite() && lon.is_finite() => Some(Coordinate {
                latitude: *lat,
                longitude: *lon,
            }),
            _ => None,
        }
    }
}

/// Anything positioned by a site `location` block
pub trait Located {
    fn label(&self) -> &str;
    fn site_location(&self) -> &SiteLocation;

    fn coordinate(&self) -> Option<Coordinate> {
        self.site_location().coordinate()
    }
}

/// One day of a DAQI forecast, e.g. `{ "day": "Mon", "value": 3 }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub day: String,
    pub value: u8,
}

/// A forecast grid point
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSite {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: SiteLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default)]
    pub forecast: Vec<ForecastDay>,
}

impl Located for ForecastSite {
    fn label(&self) -> &str {
        &self.name
    }

    fn site_location(&self) -> &SiteLocation {
        &self.location
    }
}

/// Raw reading value; upstream sends numbers, numeric strings and sentinels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReadingValue {
    Number(f64),
    Text(String),
}

/// Sentinel the monitoring network uses for "no reading"
const MISSING_READING: f64 = -99.0;

impl ReadingValue {
    /// The concentration, unless it is a sentinel (`-99`, the string `"0"`)
    /// or not a finite number.
    #[must_use]
    pub fn usable(&self) -> Option<f64> {
        let value = match self {
            ReadingValue::Number(n) => *n,
            ReadingValue::Text(s) if s.trim() == "0" => return None,
            ReadingValue::Text(s) => s.trim().parse().ok()?,
        };
        #[allow(clippy::float_cmp)]
        let is_sentinel = value == MISSING_READING;
        (value.is_finite() && !is_sentinel).then_some(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReadingTime {
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollutantReading {
    #[serde(default)]
    pub value: Option<ReadingValue>,
    #[serde(default)]
    pub time: ReadingTime,
}

impl PollutantReading {
    #[must_use]
    pub fn usable_value(&self) -> Option<f64> {
        self.value.as_ref().and_then(ReadingValue::usable)
    }
}

/// A monitoring site with its latest readings keyed by pollutant code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementSite {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_type: Option<String>,
    #[serde(rename = "localSiteID", default, skip_serializing_if = "Option::is_none")]
    pub local_site_id: Option<String>,
    #[serde(default)]
    pub location: SiteLocation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde(default)]
    pub pollutants: BTreeMap<String, PollutantReading>,
}

impl Located for MeasurementSite {
    fn label(&self) -> &str {
        &self.name
    }

    fn site_location(&self) -> &SiteLocation {
        &self.location
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(json!(42.5), Some(42.5))]
    #[case(json!(0), Some(0.0))]
    #[case(json!("17.25"), Some(17.25))]
    #[case(json!(-99), None)]
    #[case(json!("-99"), None)]
    #[case(json!("0"), None)]
    #[case(json!("n/a"), None)]
    fn test_reading_value_usable(#[case] raw: serde_json::Value, #[case] expected: Option<f64>) {
        let value: ReadingValue = serde_json::from_value(raw).unwrap();
        assert_eq!(value.usable(), expected);
    }

    #[test]
    fn test_null_reading_is_unusable() {
        let reading: PollutantReading =
            serde_json::from_value(json!({ "value": null, "time": { "date": "2024-03-04 14:00:00" } }))
                .unwrap();
        assert_eq!(reading.usable_value(), None);
    }

    #[test]
    fn test_measurement_site_shape() {
        let site: MeasurementSite = serde_json::from_value(json!({
            "name": "London Marylebone Road",
            "area": "Greater London",
            "areaType": "Urban Traffic",
            "localSiteID": "MY1",
            "location": { "type": "Point", "coordinates": [51.52253, -0.15461] },
            "updated": "2024-03-04T14:00:00+00:00",
            "pollutants": {
                "NO2": { "value": 48, "time": { "date": "2024-03-04T14:00:00+00:00" } }
            }
        }))
        .unwrap();

        assert_eq!(site.local_site_id.as_deref(), Some("MY1"));
        assert_eq!(
            site.coordinate(),
            Some(Coordinate {
                latitude: 51.52253,
                longitude: -0.15461
            })
        );
        assert_eq!(site.pollutants["NO2"].usable_value(), Some(48.0));
    }

    #[test]
    fn test_short_coordinates_are_not_a_point() {
        let location = SiteLocation {
            kind: None,
            coordinates: vec![51.5],
        };
        assert_eq!(location.coordinate(), None);
    }
}
