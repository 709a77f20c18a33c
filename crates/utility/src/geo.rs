use std::f64::consts::{FRAC_PI_2, PI};

/// Mean earth radius used for every distance in this code base.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Slack added to each side of a bounding box, in degrees, so that points
/// lying exactly on the search radius survive floating point rounding.
const BOUNDING_BOX_MARGIN_DEG: f64 = 1e-9;

fn to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl BoundingBox {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }
}

/// Calculates a latitude/longitude box containing every point within
/// `radius_km` of the center.
///
/// Returns `None` if no such box exists in plain coordinates, i.e. the circle
/// contains a pole or crosses the antimeridian. Callers have to fall back to
/// scanning all points in that case.
pub fn calculate_bounding_box(
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> Option<BoundingBox> {
    let lat_rad = to_radians(lat);
    let lon_rad = to_radians(lon);
    let angular_radius = radius_km / EARTH_RADIUS_KM;

    // Latitude bounds
    let min_lat = lat_rad - angular_radius;
    let max_lat = lat_rad + angular_radius;
    if !(min_lat > -FRAC_PI_2 && max_lat < FRAC_PI_2) {
        return None;
    }

    // Longitude bounds, widest at the latitude where the circle touches the
    // meridians tangentially.
    let ratio = angular_radius.sin() / lat_rad.cos();
    if angular_radius >= FRAC_PI_2 || ratio >= 1.0 {
        return None;
    }
    let delta_lon = ratio.asin();
    let min_lon = lon_rad - delta_lon;
    let max_lon = lon_rad + delta_lon;
    if min_lon < -PI || max_lon > PI {
        return None;
    }

    Some(BoundingBox {
        min_latitude: to_degrees(min_lat) - BOUNDING_BOX_MARGIN_DEG,
        max_latitude: to_degrees(max_lat) + BOUNDING_BOX_MARGIN_DEG,
        min_longitude: to_degrees(min_lon) - BOUNDING_BOX_MARGIN_DEG,
        max_longitude: to_degrees(max_lon) + BOUNDING_BOX_MARGIN_DEG,
    })
}

/// Great-circle distance in kilometres between two points given in degrees.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lon1_rad = to_radians(longitude_1);
    let lat2_rad = to_radians(latitude_2);
    let lon2_rad = to_radians(longitude_2);

    let dlat = lat2_rad - lat1_rad;
    let dlon = lon2_rad - lon1_rad;

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64, tolerance: f64) {
        assert!(
            (actual - expected).abs() <= tolerance,
            "expected {expected} ± {tolerance}, got {actual}"
        );
    }

    #[test]
    fn distance_to_self_is_zero() {
        assert_eq!(haversine_distance(54.32, 10.13, 54.32, 10.13), 0.0);
        assert_eq!(haversine_distance(-90.0, 0.0, -90.0, 0.0), 0.0);
    }

    #[test]
    fn one_degree_along_the_meridian() {
        let expected = EARTH_RADIUS_KM * PI / 180.0;
        assert_close(haversine_distance(0.0, 0.0, 1.0, 0.0), expected, 1e-9);
        assert_close(haversine_distance(0.0, 0.0, 1.0, 0.0), 111.195, 1e-3);
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_distance(52.52, 13.405, 48.137, 11.575);
        let back = haversine_distance(48.137, 11.575, 52.52, 13.405);
        assert_close(there, back, 1e-9);
        // Berlin to Munich
        assert_close(there, 504.0, 2.0);
    }

    #[test]
    fn antipodes_are_half_the_circumference_apart() {
        assert_close(
            haversine_distance(0.0, 0.0, 0.0, 180.0),
            EARTH_RADIUS_KM * PI,
            1e-6,
        );
    }

    #[test]
    fn bounding_box_contains_circle() {
        let center = (54.32, 10.13);
        let radius_km = 25.0;
        let bbox = calculate_bounding_box(center.0, center.1, radius_km).unwrap();

        // points exactly `radius_km` away in each cardinal direction
        let delta_lat = to_degrees(radius_km / EARTH_RADIUS_KM);
        assert!(bbox.contains(center.0 + delta_lat, center.1));
        assert!(bbox.contains(center.0 - delta_lat, center.1));

        for step in 0..360 {
            let bearing = to_radians(step as f64);
            let (lat, lon) = destination(center.0, center.1, bearing, radius_km);
            assert!(bbox.contains(lat, lon), "({lat}, {lon}) outside {bbox:?}");
        }
    }

    #[test]
    fn bounding_box_is_not_defined_around_poles() {
        assert_eq!(calculate_bounding_box(89.9, 0.0, 50.0), None);
        assert_eq!(calculate_bounding_box(-89.9, 0.0, 50.0), None);
    }

    #[test]
    fn bounding_box_is_not_defined_across_antimeridian() {
        assert_eq!(calculate_bounding_box(0.0, 179.9, 50.0), None);
        assert_eq!(calculate_bounding_box(0.0, -179.9, 50.0), None);
    }

    #[test]
    fn bounding_box_is_not_defined_for_huge_radius() {
        assert_eq!(calculate_bounding_box(0.0, 0.0, 20_000.0), None);
        assert_eq!(calculate_bounding_box(0.0, 0.0, f64::INFINITY), None);
    }

    /// Point reached from the start by travelling `distance_km` along `bearing`.
    fn destination(lat: f64, lon: f64, bearing: f64, distance_km: f64) -> (f64, f64) {
        let lat1 = to_radians(lat);
        let lon1 = to_radians(lon);
        let angular = distance_km / EARTH_RADIUS_KM;
        let lat2 = (lat1.sin() * angular.cos()
            + lat1.cos() * angular.sin() * bearing.cos())
        .asin();
        let lon2 = lon1
            + (bearing.sin() * angular.sin() * lat1.cos())
                .atan2(angular.cos() - lat1.sin() * lat2.sin());
        (to_degrees(lat2), to_degrees(lon2))
    }
}
