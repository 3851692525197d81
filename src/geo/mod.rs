//! Coordinate conversion and proximity search
//!
//! Converts gazetteer matches to WGS84, flattens site collections to
//! coordinate lists and finds the sites closest to a searched point.
//! Every function degrades to an empty value instead of failing; the
//! [`Outcome`] says why.

pub mod os_grid;

use haversine::{Location as HaversineLocation, Units, distance};

use crate::error::{LocateError, Outcome};
use crate::models::{Coordinate, GazetteerMatch, GeoPoint, GridPoint, Located, LocationType};

pub use os_grid::os_grid_to_wgs84;

/// Measurement sites further than this from the searched point are ignored
pub const INCLUSION_RADIUS_METERS: f64 = 100_000.0;

pub const METERS_TO_MILES: f64 = 0.000_621_371_192;

/// Great-circle distance in metres
#[must_use]
pub fn distance_meters(from: &GeoPoint, to: &Coordinate) -> f64 {
    let from = HaversineLocation {
        latitude: from.lat,
        longitude: from.lon,
    };
    let to = HaversineLocation {
        latitude: to.latitude,
        longitude: to.longitude,
    };
    distance(from, to, Units::Kilometers) * 1000.0
}

/// Distance in miles rounded to one decimal place
#[must_use]
pub fn distance_miles(from: &GeoPoint, to: &Coordinate) -> f64 {
    (distance_meters(from, to) * METERS_TO_MILES * 10.0).round() / 10.0
}

/// True when `b` lies within the inclusion radius of `a`
#[must_use]
pub fn points_in_range(a: &GeoPoint, b: &Coordinate) -> bool {
    distance_meters(a, b) <= INCLUSION_RADIUS_METERS
}

/// Convert a grid point to WGS84.
pub fn grid_to_geo(point: GridPoint) -> Result<GeoPoint, LocateError> {
    match point {
        GridPoint::OsGrid { easting, northing } => os_grid_to_wgs84(easting, northing),
        GridPoint::LonLat { lon, lat } => {
            if lon.is_finite() && lat.is_finite() && lon.abs() <= 180.0 && lat.abs() <= 90.0 {
                Ok(GeoPoint::new(lat, lon))
            } else {
                Err(LocateError::InvalidLonLat { lon, lat })
            }
        }
    }
}

/// WGS84 point of the match at `index`, or `None` when it cannot be
/// converted.
#[must_use]
pub fn convert_point_to_lon_lat(
    matches: &[GazetteerMatch],
    location_type: LocationType,
    index: usize,
) -> Outcome<Option<GeoPoint>> {
    let Some(entry) = matches.get(index) else {
        return Outcome::degraded(
            None,
            LocateError::MatchIndexOutOfRange {
                index,
                available: matches.len(),
            },
        );
    };

    let Some(grid) = entry.grid_point(location_type) else {
        return Outcome::degraded(
            None,
            LocateError::MissingCoordinates {
                id: entry.id().to_string(),
            },
        );
    };

    match grid_to_geo(grid) {
        Ok(point) => Outcome::Ok(Some(point)),
        Err(reason) => Outcome::degraded(None, reason),
    }
}

/// Every site's `[lat, lon]` pair, in input order. One malformed site
/// empties the whole list.
#[must_use]
pub fn coordinates_total<S: Located>(sites: &[S]) -> Outcome<Vec<Coordinate>> {
    let mut coordinates = Vec::with_capacity(sites.len());
    for site in sites {
        match site.coordinate() {
            Some(coordinate) => coordinates.push(coordinate),
            None => {
                return Outcome::degraded(
                    Vec::new(),
                    LocateError::MalformedSiteCoordinates {
                        name: site.label().to_string(),
                    },
                );
            }
        }
    }
    Outcome::Ok(coordinates)
}

/// Coordinates paired with their distance from `point`, nearest first.
/// Equal distances keep input order.
#[must_use]
pub fn order_by_distance(point: &GeoPoint, coordinates: &[Coordinate]) -> Vec<(Coordinate, f64)> {
    let mut ordered: Vec<(Coordinate, f64)> = coordinates
        .iter()
        .map(|c| (*c, distance_meters(point, c)))
        .collect();
    ordered.sort_by(|a, b| a.1.total_cmp(&b.1));
    ordered
}

/// The coordinate closest to `point`; the first one wins a tie.
#[must_use]
pub fn find_nearest(point: &GeoPoint, coordinates: &[Coordinate]) -> Option<Coordinate> {
    coordinates
        .iter()
        .min_by(|a, b| distance_meters(point, a).total_cmp(&distance_meters(point, b)))
        .copied()
}

/// All sites sitting exactly on the coordinate nearest to `point`.
/// Several forecast sites can share one grid cell.
#[must_use]
pub fn get_near_location<S: Located + Clone>(
    point: Option<&GeoPoint>,
    coordinates: &[Coordinate],
    sites: &[S],
) -> Outcome<Vec<S>> {
    let Some(point) = point else {
        return Outcome::degraded(Vec::new(), LocateError::MissingQueryPoint);
    };
    let Some(nearest) = find_nearest(point, coordinates) else {
        return Outcome::degraded(Vec::new(), LocateError::NoCandidates);
    };

    Outcome::Ok(
        sites
            .iter()
            .filter(|site| site.coordinate() == Some(nearest))
            .cloned()
            .collect(),
    )
}
