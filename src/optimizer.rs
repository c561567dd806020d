//! Greedy nearest-neighbor route builder.
//!
//! Starting from the collector's position, always travel next to the closest
//! unvisited stop. O(n²) in the number of stops, no improvement phase.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::entity::{geocode, CandidateFilter, Geocoded};
use crate::geo::GeoPoint;
use crate::haversine::{haversine_km, path_length_km};
use crate::polyline::Polyline;
use crate::traits::Customer;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeOptions {
    /// Remaining-stop count above which the nearest-stop scan runs on the
    /// rayon pool.
    pub parallel_threshold: usize,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            parallel_threshold: 512,
        }
    }
}

/// A transient visiting order starting from an external origin.
#[derive(Debug)]
pub struct Route<'a, C> {
    origin: GeoPoint,
    stops: Vec<Geocoded<'a, C>>,
}

impl<C> Clone for Route<'_, C> {
    fn clone(&self) -> Self {
        Self {
            origin: self.origin,
            stops: self.stops.clone(),
        }
    }
}

impl<'a, C> Route<'a, C> {
    pub fn origin(&self) -> GeoPoint {
        self.origin
    }

    pub fn stops(&self) -> &[Geocoded<'a, C>] {
        &self.stops
    }

    pub fn into_stops(self) -> Vec<Geocoded<'a, C>> {
        self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Distance in km of each stop from the previous position. The first leg
    /// starts at the origin.
    pub fn legs(&self) -> Vec<f64> {
        let mut previous = self.origin;
        self.stops
            .iter()
            .map(|stop| {
                let km = haversine_km(previous, stop.location());
                previous = stop.location();
                km
            })
            .collect()
    }

    /// Origin to last stop, in km.
    pub fn total_distance_km(&self) -> f64 {
        let points: Vec<GeoPoint> = std::iter::once(self.origin)
            .chain(self.stops.iter().map(|stop| stop.location()))
            .collect();
        path_length_km(&points)
    }

    /// Stop coordinates in visiting order, optionally prefixed by the origin.
    pub fn polyline(&self, include_origin: bool) -> Polyline {
        let origin = include_origin.then_some(self.origin);
        Polyline::new(
            origin
                .into_iter()
                .chain(self.stops.iter().map(|stop| stop.location()))
                .collect(),
        )
    }
}

impl<'a, C: Customer> Route<'a, C> {
    pub fn ids(&self) -> Vec<&'a C::Id> {
        self.stops.iter().map(|stop| stop.id()).collect()
    }
}

/// Order `stops` by repeatedly picking the nearest remaining stop.
///
/// Returns a permutation of `stops`. Equidistant candidates resolve to the
/// one that came first in `stops`, so the result depends on input order only
/// when ties occur.
pub fn optimize_route<'a, C: Customer>(
    origin: GeoPoint,
    stops: &[Geocoded<'a, C>],
    options: &OptimizeOptions,
) -> Route<'a, C> {
    let mut remaining: Vec<Geocoded<'a, C>> = stops.to_vec();
    let mut remaining_points: Vec<GeoPoint> = stops.iter().map(|stop| stop.location()).collect();
    let mut ordered = Vec::with_capacity(stops.len());
    let mut current = origin;

    while !remaining.is_empty() {
        let parallel = remaining_points.len() > options.parallel_threshold;
        let (index, km) = if parallel {
            nearest_parallel(current, &remaining_points)
        } else {
            nearest(current, &remaining_points)
        };

        // `remove` keeps input order for the tie-break on later steps.
        let stop = remaining.remove(index);
        remaining_points.remove(index);
        trace!(step = ordered.len(), id = ?stop.id(), km, "picked nearest stop");

        current = stop.location();
        ordered.push(stop);
    }

    let route = Route {
        origin,
        stops: ordered,
    };
    debug!(
        stops = route.len(),
        total_km = route.total_distance_km(),
        "built nearest-neighbor route"
    );
    route
}

/// Geocode `customers`, narrow them with `filter`, then build a route.
///
/// Customers without coordinates never reach the optimizer.
pub fn plan_route<'a, C: Customer>(
    origin: GeoPoint,
    customers: &'a [C],
    filter: &CandidateFilter,
    now: i64,
    window_days: i64,
    options: &OptimizeOptions,
) -> Route<'a, C> {
    let geocoded = geocode(customers);
    let candidates = filter.apply(&geocoded, now, window_days);
    optimize_route(origin, &candidates, options)
}

/// Index and distance of the closest point. `points` must not be empty.
fn nearest(from: GeoPoint, points: &[GeoPoint]) -> (usize, f64) {
    let mut best = (0, f64::INFINITY);
    for (index, point) in points.iter().enumerate() {
        let km = haversine_km(from, *point);
        if km < best.1 {
            best = (index, km);
        }
    }
    best
}

fn nearest_parallel(from: GeoPoint, points: &[GeoPoint]) -> (usize, f64) {
    points
        .par_iter()
        .enumerate()
        .map(|(index, point)| (index, haversine_km(from, *point)))
        .reduce_with(|a, b| {
            if b.1 < a.1 || (b.1 == a.1 && b.0 < a.0) {
                b
            } else {
                a
            }
        })
        .unwrap_or((0, f64::INFINITY))
}
