//! Real towns around Goiânia for realistic test fixtures.
//!
//! Coordinates are town centres taken from OpenStreetMap, rounded to four
//! decimal places.

#![allow(dead_code)]

use route_planner::geo::GeoPoint;

/// A named location with coordinates.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, lat: f64, lng: f64) -> Self {
        Self { name, lat, lng }
    }

    pub fn coords(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }

    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.lat,
            longitude: self.lng,
        }
    }
}

// ============================================================================
// Company warehouse (collector start point)
// ============================================================================

pub const WAREHOUSE: Location = Location::new("Depósito Setor Campinas", -16.6690, -49.2870);

// ============================================================================
// Metropolitan region of Goiânia
// ============================================================================

pub const METRO_TOWNS: &[Location] = &[
    Location::new("Goiânia", -16.6869, -49.2648),
    Location::new("Aparecida de Goiânia", -16.8198, -49.2469),
    Location::new("Trindade", -16.6514, -49.4926),
    Location::new("Senador Canedo", -16.7084, -49.0914),
    Location::new("Goianira", -16.4947, -49.4260),
    Location::new("Nerópolis", -16.4047, -49.2227),
    Location::new("Hidrolândia", -16.9626, -49.2265),
    Location::new("Abadia de Goiás", -16.7573, -49.4412),
];

// ============================================================================
// Interior towns (longer rural legs)
// ============================================================================

pub const INTERIOR_TOWNS: &[Location] = &[
    Location::new("Anápolis", -16.3281, -48.9530),
    Location::new("Inhumas", -16.3611, -49.4961),
    Location::new("Bela Vista de Goiás", -16.9728, -48.9533),
    Location::new("Guapó", -16.8297, -49.5319),
    Location::new("Itaberaí", -16.0206, -49.8103),
    Location::new("Pirenópolis", -15.8507, -48.9592),
    Location::new("Silvânia", -16.6600, -48.6083),
    Location::new("Leopoldo de Bulhões", -16.6190, -48.7436),
];

/// Every fixture town, metro first.
pub fn all_towns() -> Vec<Location> {
    METRO_TOWNS
        .iter()
        .chain(INTERIOR_TOWNS.iter())
        .cloned()
        .collect()
}

/// A spread of towns in every direction from the warehouse.
pub fn geographically_diverse_locations() -> Vec<Location> {
    vec![
        INTERIOR_TOWNS[5].clone(), // Pirenópolis (north-east)
        INTERIOR_TOWNS[4].clone(), // Itaberaí (north-west)
        INTERIOR_TOWNS[6].clone(), // Silvânia (east)
        INTERIOR_TOWNS[3].clone(), // Guapó (south-west)
        METRO_TOWNS[6].clone(),    // Hidrolândia (south)
        METRO_TOWNS[0].clone(),    // Goiânia (centre)
    ]
}
