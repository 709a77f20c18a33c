use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::{
    geo,
    id::{HasId, Id},
};

use crate::{company::Company, ExampleData};

/// A charging station owned by exactly one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub company_id: Id<Company>,
}

impl Station {
    pub fn new<S: Into<String>>(
        name: S,
        latitude: f64,
        longitude: f64,
        company_id: Id<Company>,
    ) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            company_id,
        }
    }

    /// Great-circle distance in kilometres from this station to the given point.
    pub fn distance_to(&self, latitude: f64, longitude: f64) -> f64 {
        geo::haversine_distance(latitude, longitude, self.latitude, self.longitude)
    }
}

impl HasId for Station {
    type IdType = i64;
}

impl ExampleData for Station {
    fn example_data() -> Self {
        Self {
            name: "Kiel Hauptbahnhof P+R".to_owned(),
            latitude: 54.3152,
            longitude: 10.1318,
            company_id: Id::new(1),
        }
    }
}

/// A circle on the earth's surface to search stations in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchArea {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
}

impl SearchArea {
    pub fn new(latitude: f64, longitude: f64, radius_km: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius_km,
        }
    }

    pub fn bounding_box(&self) -> Option<geo::BoundingBox> {
        geo::calculate_bounding_box(self.latitude, self.longitude, self.radius_km)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn serializes_camel_case() {
        let station = Station::new("Pier", 54.32, 10.14, Id::new(3));
        assert_eq!(
            serde_json::to_value(&station).unwrap(),
            json!({
                "name": "Pier",
                "latitude": 54.32,
                "longitude": 10.14,
                "companyId": 3
            })
        );
    }

    #[test]
    fn company_is_required() {
        let result = serde_json::from_str::<Station>(
            r#"{ "name": "Pier", "latitude": 1.0, "longitude": 2.0 }"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn search_area_uses_radius_km() {
        let area: SearchArea = serde_json::from_value(json!({
            "latitude": 1.5,
            "longitude": -2.0,
            "radiusKm": 10.0
        }))
        .unwrap();
        assert_eq!(area, SearchArea::new(1.5, -2.0, 10.0));
    }

    #[test]
    fn distance_to_own_location_is_zero() {
        let station = Station::new("Pier", 54.32, 10.14, Id::new(3));
        assert_eq!(station.distance_to(54.32, 10.14), 0.0);
        assert!((station.distance_to(54.33, 10.14) - 1.112).abs() < 1e-3);
    }
}
