//! OS National Grid to WGS84 conversion
//!
//! Inverse transverse Mercator on the Airy 1830 ellipsoid gives OSGB36
//! latitude/longitude, which a Helmert transform then shifts onto WGS84.
//! Accuracy after the Helmert step is a few metres, well inside what the
//! nearest-site search needs.

use std::f64::consts::PI;

use crate::error::LocateError;
use crate::models::GeoPoint;

struct Ellipsoid {
    a: f64,
    b: f64,
}

impl Ellipsoid {
    fn e2(&self) -> f64 {
        1.0 - (self.b * self.b) / (self.a * self.a)
    }
}

const AIRY_1830: Ellipsoid = Ellipsoid {
    a: 6_377_563.396,
    b: 6_356_256.909,
};

const WGS84: Ellipsoid = Ellipsoid {
    a: 6_378_137.0,
    b: 6_356_752.314_245,
};

// National Grid projection constants
const F0: f64 = 0.999_601_271_7;
const LAT0_DEG: f64 = 49.0;
const LON0_DEG: f64 = -2.0;
const N0: f64 = -100_000.0;
const E0: f64 = 400_000.0;

// OSGB36 -> WGS84 Helmert parameters (metres, ppm, arc-seconds)
const TX: f64 = 446.448;
const TY: f64 = -125.157;
const TZ: f64 = 542.060;
const SCALE_PPM: f64 = -20.4894;
const RX_SEC: f64 = 0.1502;
const RY_SEC: f64 = 0.2470;
const RZ_SEC: f64 = 0.8421;

// Grid extent in metres
const MAX_EASTING: f64 = 700_000.0;
const MAX_NORTHING: f64 = 1_300_000.0;

const MAX_ITERATIONS: usize = 64;

/// Convert an easting/northing pair to WGS84.
pub fn os_grid_to_wgs84(easting: f64, northing: f64) -> Result<GeoPoint, LocateError> {
    let (lat, lon) = os_grid_to_osgb36(easting, northing)?;
    let (x, y, z) = to_cartesian(lat, lon, &AIRY_1830);
    let (x, y, z) = helmert_osgb36_to_wgs84(x, y, z);
    let (lat, lon) = from_cartesian(x, y, z, &WGS84);
    Ok(GeoPoint::new(lat.to_degrees(), lon.to_degrees()))
}

/// Latitude/longitude on the OSGB36 datum, in radians.
pub(crate) fn os_grid_to_osgb36(easting: f64, northing: f64) -> Result<(f64, f64), LocateError> {
    let in_grid = easting.is_finite()
        && northing.is_finite()
        && (0.0..=MAX_EASTING).contains(&easting)
        && (0.0..=MAX_NORTHING).contains(&northing);
    if !in_grid {
        return Err(LocateError::GridOutOfRange { easting, northing });
    }

    let a = AIRY_1830.a;
    let b = AIRY_1830.b;
    let e2 = AIRY_1830.e2();
    let n = (a - b) / (a + b);
    let (n2, n3) = (n * n, n * n * n);
    let lat0 = LAT0_DEG.to_radians();
    let lon0 = LON0_DEG.to_radians();

    let meridional_arc = |lat: f64| {
        let ma = (1.0 + n + 1.25 * n2 + 1.25 * n3) * (lat - lat0);
        let mb = (3.0 * n + 3.0 * n2 + 2.625 * n3) * (lat - lat0).sin() * (lat + lat0).cos();
        let mc = (1.875 * n2 + 1.875 * n3) * (2.0 * (lat - lat0)).sin() * (2.0 * (lat + lat0)).cos();
        let md = (35.0 / 24.0) * n3 * (3.0 * (lat - lat0)).sin() * (3.0 * (lat + lat0)).cos();
        b * F0 * (ma - mb + mc - md)
    };

    let mut lat = lat0;
    let mut m = 0.0;
    for _ in 0..MAX_ITERATIONS {
        lat += (northing - N0 - m) / (a * F0);
        m = meridional_arc(lat);
        if (northing - N0 - m).abs() < 0.000_01 {
            break;
        }
    }

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let nu = a * F0 / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    let rho = a * F0 * (1.0 - e2) / (1.0 - e2 * sin_lat * sin_lat).powf(1.5);
    let eta2 = nu / rho - 1.0;

    let tan_lat = lat.tan();
    let tan2 = tan_lat * tan_lat;
    let tan4 = tan2 * tan2;
    let tan6 = tan4 * tan2;
    let sec_lat = 1.0 / cos_lat;
    let nu3 = nu.powi(3);
    let nu5 = nu.powi(5);
    let nu7 = nu.powi(7);

    let vii = tan_lat / (2.0 * rho * nu);
    let viii = tan_lat / (24.0 * rho * nu3) * (5.0 + 3.0 * tan2 + eta2 - 9.0 * tan2 * eta2);
    let ix = tan_lat / (720.0 * rho * nu5) * (61.0 + 90.0 * tan2 + 45.0 * tan4);
    let x = sec_lat / nu;
    let xi = sec_lat / (6.0 * nu3) * (nu / rho + 2.0 * tan2);
    let xii = sec_lat / (120.0 * nu5) * (5.0 + 28.0 * tan2 + 24.0 * tan4);
    let xiia = sec_lat / (5040.0 * nu7) * (61.0 + 662.0 * tan2 + 1320.0 * tan4 + 720.0 * tan6);

    let de = easting - E0;
    let (de2, de3) = (de * de, de * de * de);
    let (de4, de5) = (de2 * de2, de3 * de2);
    let (de6, de7) = (de4 * de2, de5 * de2);

    let lat = lat - vii * de2 + viii * de4 - ix * de6;
    let lon = lon0 + x * de - xi * de3 + xii * de5 - xiia * de7;
    Ok((lat, lon))
}

fn to_cartesian(lat: f64, lon: f64, ellipsoid: &Ellipsoid) -> (f64, f64, f64) {
    let e2 = ellipsoid.e2();
    let sin_lat = lat.sin();
    let nu = ellipsoid.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    (
        nu * lat.cos() * lon.cos(),
        nu * lat.cos() * lon.sin(),
        nu * (1.0 - e2) * sin_lat,
    )
}

fn helmert_osgb36_to_wgs84(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let arc_sec = PI / (180.0 * 3600.0);
    let s1 = SCALE_PPM / 1e6 + 1.0;
    let (rx, ry, rz) = (RX_SEC * arc_sec, RY_SEC * arc_sec, RZ_SEC * arc_sec);
    (
        TX + x * s1 - y * rz + z * ry,
        TY + x * rz + y * s1 - z * rx,
        TZ - x * ry + y * rx + z * s1,
    )
}

fn from_cartesian(x: f64, y: f64, z: f64, ellipsoid: &Ellipsoid) -> (f64, f64) {
    let e2 = ellipsoid.e2();
    let p = (x * x + y * y).sqrt();
    let mut lat = z.atan2(p * (1.0 - e2));
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = lat.sin();
        let nu = ellipsoid.a / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        let next = (z + e2 * nu * sin_lat).atan2(p);
        if (next - lat).abs() < 1e-12 {
            lat = next;
            break;
        }
        lat = next;
    }
    (lat, y.atan2(x))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from the OS guide to coordinate systems:
    // E 651409.903 N 313177.270 -> 52°39'27.2531"N 1°43'4.5177"E (OSGB36)
    #[test]
    fn test_osgb36_matches_os_worked_example() {
        let (lat, lon) = os_grid_to_osgb36(651_409.903, 313_177.270).unwrap();
        let expected_lat = 52.0 + 39.0 / 60.0 + 27.2531 / 3600.0;
        let expected_lon = 1.0 + 43.0 / 60.0 + 4.5177 / 3600.0;
        assert!((lat.to_degrees() - expected_lat).abs() < 1e-6);
        assert!((lon.to_degrees() - expected_lon).abs() < 1e-6);
    }

    #[test]
    fn test_wgs84_shift_is_small() {
        let point = os_grid_to_wgs84(651_409.903, 313_177.270).unwrap();
        assert!((point.lat - 52.6576).abs() < 0.01);
        assert!((point.lon - 1.7179).abs() < 0.01);
    }

    #[test]
    fn test_central_london() {
        let point = os_grid_to_wgs84(530_000.0, 180_000.0).unwrap();
        assert!((point.lat - 51.51).abs() < 0.05, "lat {}", point.lat);
        assert!((point.lon + 0.127).abs() < 0.05, "lon {}", point.lon);
    }

    #[test]
    fn test_conversion_is_deterministic() {
        let first = os_grid_to_wgs84(412_345.0, 298_765.0).unwrap();
        let second = os_grid_to_wgs84(412_345.0, 298_765.0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_out_of_grid_rejected() {
        assert!(matches!(
            os_grid_to_wgs84(-5.9, 54.6),
            Err(LocateError::GridOutOfRange { .. })
        ));
        assert!(os_grid_to_wgs84(f64::NAN, 100.0).is_err());
        assert!(os_grid_to_wgs84(800_000.0, 100_000.0).is_err());
    }
}
