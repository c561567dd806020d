//! Grid marker clustering for map surfaces without a native cluster layer.
//!
//! Points are projected to Web-Mercator pixels at the requested zoom and
//! bucketed into square cells of `radius_px`. Every point lands in exactly
//! one cluster.

use std::collections::HashMap;
use std::f64::consts::PI;

use crate::geo::GeoPoint;

/// Web-Mercator tile edge in pixels.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Web-Mercator cannot represent the poles; clamp to the usual limit.
const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_78;

#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    /// Mean position of the members.
    pub center: GeoPoint,
    /// Indexes into the input slice, ascending.
    pub members: Vec<usize>,
}

impl Cluster {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_single(&self) -> bool {
        self.members.len() == 1
    }
}

/// Pixel position of `point` in the world image at `zoom`.
pub fn project(point: GeoPoint, zoom: u8) -> (f64, f64) {
    let scale = TILE_SIZE_PX * f64::from(1u32 << zoom.min(30));
    let lat = point
        .latitude
        .clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE)
        .to_radians();

    let x = (point.longitude + 180.0) / 360.0 * scale;
    let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * scale;
    (x, y)
}

/// Group `points` into clusters, in order of each cluster's first member.
///
/// A `radius_px` of zero (or less) puts every point in its own cluster.
pub fn cluster_markers(points: &[GeoPoint], zoom: u8, radius_px: f64) -> Vec<Cluster> {
    if radius_px <= 0.0 {
        return points
            .iter()
            .enumerate()
            .map(|(index, point)| Cluster {
                center: *point,
                members: vec![index],
            })
            .collect();
    }

    let mut cells: HashMap<(i64, i64), usize> = HashMap::new();
    let mut clusters: Vec<Cluster> = Vec::new();

    for (index, point) in points.iter().enumerate() {
        let (x, y) = project(*point, zoom);
        let cell = ((x / radius_px).floor() as i64, (y / radius_px).floor() as i64);

        match cells.get(&cell) {
            Some(&slot) => clusters[slot].members.push(index),
            None => {
                cells.insert(cell, clusters.len());
                clusters.push(Cluster {
                    center: *point,
                    members: vec![index],
                });
            }
        }
    }

    for cluster in &mut clusters {
        cluster.center = mean(points, &cluster.members);
    }
    clusters
}

fn mean(points: &[GeoPoint], members: &[usize]) -> GeoPoint {
    let n = members.len() as f64;
    let (lat, lng) = members.iter().fold((0.0, 0.0), |(lat, lng), &index| {
        (lat + points[index].latitude, lng + points[index].longitude)
    });
    GeoPoint {
        latitude: lat / n,
        longitude: lng / n,
    }
}
