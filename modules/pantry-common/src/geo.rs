use std::f64::consts::PI;

use crate::location::Coordinates;

const EARTH_RADIUS_MILES: f64 = 3958.8;
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance unit for haversine calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceUnit {
    Miles,
    Kilometers,
}

impl DistanceUnit {
    fn earth_radius(self) -> f64 {
        match self {
            Self::Miles => EARTH_RADIUS_MILES,
            Self::Kilometers => EARTH_RADIUS_KM,
        }
    }
}

/// Haversine great-circle distance between two points in the specified unit.
pub fn haversine_distance(from: Coordinates, to: Coordinates, unit: DistanceUnit) -> f64 {
    let to_rad = |deg: f64| deg * PI / 180.0;

    let dlat = to_rad(to.lat - from.lat);
    let dlng = to_rad(to.lng - from.lng);

    let a = (dlat / 2.0).sin().powi(2)
        + to_rad(from.lat).cos() * to_rad(to.lat).cos() * (dlng / 2.0).sin().powi(2);

    let c = 2.0 * a.sqrt().asin();
    unit.earth_radius() * c
}

pub fn haversine_distance_miles(from: Coordinates, to: Coordinates) -> f64 {
    haversine_distance(from, to, DistanceUnit::Miles)
}
