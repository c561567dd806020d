//! Polyline representation for route overlays.
//!
//! A polyline is the ordered list of stop coordinates a route visits, kept
//! decoded. Encoding for a particular map surface happens inside the
//! [`MapProvider`](crate::traits::MapProvider) implementation.

use serde::{Deserialize, Serialize};

use crate::geo::{GeoBounds, GeoPoint};
use crate::haversine::path_length_km;

/// A polyline representing a route geometry as decoded coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    points: Vec<GeoPoint>,
}

impl Polyline {
    /// Creates a new Polyline from points in visiting order.
    pub fn new(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// Returns a reference to the coordinate points.
    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    /// Consumes the polyline and returns the owned coordinate points.
    pub fn into_points(self) -> Vec<GeoPoint> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// A polyline needs at least two points to draw a segment.
    pub fn is_drawable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Bounding box of all points, or `None` when empty.
    pub fn bounds(&self) -> Option<GeoBounds> {
        GeoBounds::from_points(self.points.iter().copied())
    }

    /// Great-circle length in kilometers.
    pub fn length_km(&self) -> f64 {
        path_length_km(&self.points)
    }
}
