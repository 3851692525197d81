//! Nearest-location resolution
//!
//! Turns a gazetteer match into the context a location page renders:
//! the forecast of the nearest forecast grid point, with today's value
//! first, and the closest monitoring sites with their readings banded
//! on the DAQI scale.
//!
//! Resolution never fails. Each step that cannot produce a value falls back
//! to an empty one, reports the reason to the injected
//! [`DegradationLog`] and records it on the result.

use chrono::{DateTime, Datelike, NaiveDateTime, Utc};
use chrono_tz::Europe::London;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{LocateError, Outcome};
use crate::geo::{
    convert_point_to_lon_lat, coordinates_total, distance_miles, get_near_location,
    order_by_distance, points_in_range,
};
use crate::logging::DegradationLog;
use crate::models::{
    Coordinate, ForecastSite, GazetteerMatch, GeoPoint, Lang, Located, LocationType,
    MeasurementSite, SiteLocation,
};
use crate::pollutant::{classify, month_name, pollutant_name};

/// How many of the closest monitoring points are considered
pub const NEAREST_MEASUREMENT_POINTS: usize = 3;

const TODAY: &str = "today";

/// One `{ label: value }` entry of a forecast row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForecastEntry {
    pub label: String,
    pub value: u8,
}

impl ForecastEntry {
    #[must_use]
    pub fn is_today(&self) -> bool {
        self.label == TODAY
    }
}

impl Serialize for ForecastEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.label, &self.value)?;
        map.end()
    }
}

/// Reading time split for display, in UK local time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReadingStamp {
    pub date: String,
    pub hour: String,
    pub day: String,
    pub month: String,
    pub year: String,
}

/// A usable reading with its DAQI classification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedPollutant {
    pub value: f64,
    pub polname: &'static str,
    pub daqi: u8,
    pub band: &'static str,
    pub time: ReadingStamp,
}

/// A monitoring site near the searched location
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbySite {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area_type: Option<String>,
    #[serde(rename = "localSiteID", skip_serializing_if = "Option::is_none")]
    pub local_site_id: Option<String>,
    pub location: SiteLocation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    /// Miles, one decimal place
    #[serde(serialize_with = "serialize_miles")]
    pub distance: f64,
    pub pollutants: BTreeMap<String, ClassifiedPollutant>,
}

fn serialize_miles<S: Serializer>(miles: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("{miles:.1}"))
}

/// Page context for a resolved location
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestLocationResult {
    /// One row per forecast site in the nearest grid cell; `None` (rendered
    /// as `0`) when there was nothing to resolve
    #[serde(serialize_with = "serialize_forecast_num")]
    pub forecast_num: Option<Vec<Vec<ForecastEntry>>>,
    /// Ascending by distance
    pub nearest_locations_range: Vec<NearbySite>,
    /// Rendered as `{}` when the location could not be converted
    #[serde(serialize_with = "serialize_latlon")]
    pub latlon: Option<GeoPoint>,
    #[serde(skip)]
    pub degradations: Vec<LocateError>,
}

fn serialize_forecast_num<S: Serializer>(
    forecast_num: &Option<Vec<Vec<ForecastEntry>>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match forecast_num {
        Some(rows) => rows.serialize(serializer),
        None => serializer.serialize_u8(0),
    }
}

fn serialize_latlon<S: Serializer>(
    latlon: &Option<GeoPoint>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match latlon {
        Some(point) => point.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}

impl NearestLocationResult {
    /// Result for a search with no matches
    #[must_use]
    pub fn empty() -> Self {
        Self {
            forecast_num: None,
            nearest_locations_range: Vec::new(),
            latlon: None,
            degradations: Vec::new(),
        }
    }
}

/// Resolves matched locations against forecast and measurement sites
pub struct NearestLocationResolver<'a> {
    log: &'a dyn DegradationLog,
    now: DateTime<Utc>,
}

impl<'a> NearestLocationResolver<'a> {
    #[must_use]
    pub fn new(log: &'a dyn DegradationLog) -> Self {
        Self {
            log,
            now: Utc::now(),
        }
    }

    /// Fix the clock used to decide which forecast day is today
    #[must_use]
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Resolve the match at `index` into forecast rows and nearby
    /// monitoring sites.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(
            matches = matches.len(),
            location_type = %location_type,
            index = index,
            lang = %lang
        )
    )]
    pub fn resolve(
        &self,
        matches: &[GazetteerMatch],
        forecasts: &[ForecastSite],
        measurements: &[MeasurementSite],
        location_type: LocationType,
        index: usize,
        lang: Lang,
    ) -> NearestLocationResult {
        if matches.is_empty() {
            return NearestLocationResult::empty();
        }

        let mut degradations = Vec::new();

        let latlon = self.settle(
            "convert_point",
            convert_point_to_lon_lat(matches, location_type, index),
            &mut degradations,
        );
        let forecast_coordinates = self.settle(
            "forecast_coordinates",
            coordinates_total(forecasts),
            &mut degradations,
        );
        let measurement_coordinates = self.settle(
            "measurement_coordinates",
            coordinates_total(measurements),
            &mut degradations,
        );
        let nearest_forecasts = self.settle(
            "nearest_forecast",
            get_near_location(latlon.as_ref(), &forecast_coordinates, forecasts),
            &mut degradations,
        );

        let nearest_locations_range = match &latlon {
            Some(point) => self.nearby_sites(
                point,
                &measurement_coordinates,
                measurements,
                lang,
                &mut degradations,
            ),
            None => Vec::new(),
        };

        let today = today_label(self.now);
        let forecast_num = nearest_forecasts
            .iter()
            .map(|site| forecast_row(site, &today))
            .collect();

        debug!(
            forecast_sites = nearest_forecasts.len(),
            nearby_sites = nearest_locations_range.len(),
            degraded = degradations.len(),
            "resolved nearest locations"
        );

        NearestLocationResult {
            forecast_num: Some(forecast_num),
            nearest_locations_range,
            latlon,
            degradations,
        }
    }

    fn settle<T>(
        &self,
        step: &'static str,
        outcome: Outcome<T>,
        degradations: &mut Vec<LocateError>,
    ) -> T {
        let (value, reason) = outcome.into_parts();
        if let Some(reason) = reason {
            self.log.degraded(step, &reason);
            degradations.push(reason);
        }
        value
    }

    /// Closest monitoring sites within range that have at least one usable
    /// reading, nearest first.
    fn nearby_sites(
        &self,
        point: &GeoPoint,
        coordinates: &[Coordinate],
        measurements: &[MeasurementSite],
        lang: Lang,
        degradations: &mut Vec<LocateError>,
    ) -> Vec<NearbySite> {
        let retained: Vec<Coordinate> = order_by_distance(point, coordinates)
            .into_iter()
            .take(NEAREST_MEASUREMENT_POINTS)
            .map(|(coordinate, _)| coordinate)
            .filter(|coordinate| points_in_range(point, coordinate))
            .collect();

        let mut sites = Vec::new();
        for site in measurements {
            let Some(coordinate) = site.coordinate() else {
                continue;
            };
            if !retained.contains(&coordinate) {
                continue;
            }
            if let Some(nearby) = self.annotate(site, point, &coordinate, lang, degradations) {
                sites.push(nearby);
            }
        }

        // Stable: equal distances keep upstream order
        sites.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        sites
    }

    fn annotate(
        &self,
        site: &MeasurementSite,
        point: &GeoPoint,
        coordinate: &Coordinate,
        lang: Lang,
        degradations: &mut Vec<LocateError>,
    ) -> Option<NearbySite> {
        let mut pollutants = BTreeMap::new();
        for (code, reading) in &site.pollutants {
            let Some(value) = reading.usable_value() else {
                continue;
            };
            let level = classify(value, code, lang);
            let time = self.settle(
                "reading_time",
                reading_stamp(reading.time.date.as_deref(), lang),
                degradations,
            );
            pollutants.insert(
                code.clone(),
                ClassifiedPollutant {
                    value,
                    polname: pollutant_name(code, lang),
                    daqi: level.daqi_index,
                    band: level.band,
                    time,
                },
            );
        }

        if pollutants.is_empty() {
            return None;
        }

        Some(NearbySite {
            name: site.name.clone(),
            area: site.area.clone(),
            area_type: site.area_type.clone(),
            local_site_id: site.local_site_id.clone(),
            location: site.location.clone(),
            updated: site.updated.clone(),
            distance: distance_miles(point, coordinate),
            pollutants,
        })
    }
}

/// Three-letter weekday in UK local time, e.g. `Mon`
#[must_use]
pub fn today_label(now: DateTime<Utc>) -> String {
    now.with_timezone(&London)
        .format("%a")
        .to_string()
        .chars()
        .take(3)
        .collect()
}

/// Forecast days with the first entry for `today` moved to the front as
/// `{ today: value }`; other days keep their order.
#[must_use]
pub fn forecast_row(site: &ForecastSite, today: &str) -> Vec<ForecastEntry> {
    let mut today_entry = None;
    let mut others = Vec::with_capacity(site.forecast.len());
    for day in &site.forecast {
        if today_entry.is_none() && day.day == today {
            today_entry = Some(ForecastEntry {
                label: TODAY.to_string(),
                value: day.value,
            });
        } else {
            others.push(ForecastEntry {
                label: day.day.clone(),
                value: day.value,
            });
        }
    }
    today_entry.into_iter().chain(others).collect()
}

fn parse_reading_time(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

/// Split a reading timestamp into hour (`2pm`), day, month name and year
/// in UK local time.
#[must_use]
pub fn reading_stamp(date: Option<&str>, lang: Lang) -> Outcome<ReadingStamp> {
    let raw = date.unwrap_or_default();
    let Some(parsed) = parse_reading_time(raw.trim()) else {
        return Outcome::degraded(
            ReadingStamp {
                date: raw.to_string(),
                ..ReadingStamp::default()
            },
            LocateError::ReadingTime(raw.to_string()),
        );
    };

    let local = parsed.with_timezone(&London);
    Outcome::Ok(ReadingStamp {
        date: raw.to_string(),
        hour: local.format("%-I%P").to_string(),
        day: local.day().to_string(),
        month: month_name(local.month(), lang).to_string(),
        year: local.year().to_string(),
    })
}
