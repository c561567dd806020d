//! Core traits for the route planner.
//!
//! These are intentionally minimal. The host application implements
//! [`Customer`] for its own records and [`MapProvider`] for whichever map
//! surface it renders into.

use std::fmt::Debug;
use std::hash::Hash;
use std::time::Duration;

use crate::geo::{GeoBounds, GeoPoint};
use crate::map_view::{MapConfig, MapError, MarkerHandle, MarkerSpec, MarkerStyle};
use crate::polyline::Polyline;

/// Unique identifier for planner entities.
pub trait Id: Clone + Eq + Hash + Debug {}

impl<T> Id for T where T: Clone + Eq + Hash + Debug {}

/// A customer record as supplied by the customer-data collaborator.
///
/// The planner only reads these; it never mutates them.
pub trait Customer {
    type Id: Id;

    fn id(&self) -> &Self::Id;

    fn display_name(&self) -> &str;

    /// Latitude in decimal degrees, if the record has been geocoded.
    fn latitude(&self) -> Option<f64>;

    /// Longitude in decimal degrees, if the record has been geocoded.
    fn longitude(&self) -> Option<f64>;

    /// Last collection visit (unix timestamp, seconds).
    fn last_visited_at(&self) -> Option<i64>;

    /// Outstanding debt. Expected to be non-negative.
    fn debt_amount(&self) -> f64;

    fn address(&self) -> &str;

    fn city(&self) -> &str;

    /// Validated location, or `None` when either coordinate is missing or
    /// out of range.
    fn location(&self) -> Option<GeoPoint> {
        GeoPoint::from_parts(self.latitude(), self.longitude())
    }
}

/// The map surface a [`MapView`](crate::map_view::MapView) draws into.
///
/// Implementations own the base tile layer, a clustering marker layer and a
/// route layer. Every method that takes a collection replaces the layer's
/// previous contents.
pub trait MapProvider {
    /// Construct the surface: base tiles, cluster layer, route layer, max
    /// bounds and minimum zoom. Failure is fatal for the owning view.
    fn mount(&mut self, config: &MapConfig) -> Result<(), MapError>;

    fn set_view(&mut self, center: GeoPoint, zoom: u8);

    /// Move the viewport so that `bounds` is visible with `padding_px` on
    /// every side.
    fn fit_bounds(&mut self, bounds: GeoBounds, padding_px: u32);

    /// Recompute viewport geometry after the container changed size.
    fn invalidate_size(&mut self);

    fn replace_markers(&mut self, markers: &[MarkerSpec]);

    fn set_marker_style(&mut self, handle: MarkerHandle, style: MarkerStyle);

    /// Pan/zoom until the marker is visible outside of any cluster.
    fn reveal_marker(&mut self, handle: MarkerHandle);

    /// Open the marker's popup once `delay` has elapsed.
    fn open_popup(&mut self, handle: MarkerHandle, delay: Duration);

    /// Draw `route` as the overlay, or clear the overlay on `None`.
    fn replace_route(&mut self, route: Option<&Polyline>);

    /// Release event bindings and the surface itself.
    fn destroy(&mut self);
}
