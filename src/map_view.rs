//! Interactive map state: clustered markers, selection and route overlay.
//!
//! `MapView` owns its [`MapProvider`] and keeps every marker as a tagged
//! [`MarkerHandle`]. Each `set_*` call replaces the affected layer outright,
//! so no marker outlives the entity list it was built from.

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::cluster::{cluster_markers, Cluster};
use crate::entity::{outstanding_debt, Geocoded, MarkerState, DEFAULT_VISITED_WINDOW_DAYS};
use crate::export::{directions_url, format_brl};
use crate::geo::{GeoBounds, GeoPoint};
use crate::optimizer::Route;
use crate::polyline::Polyline;
use crate::traits::{Customer, Id, MapProvider};

/// Stacking offset that lifts the selected marker above its neighbours.
pub const SELECTED_Z_OFFSET: i32 = 1000;

#[derive(Debug, Error)]
pub enum MapError {
    /// The provider could not construct the map surface.
    #[error("map surface unavailable: {0}")]
    SurfaceUnavailable(String),
    /// `mount` was called after `teardown`.
    #[error("map view was already torn down")]
    AlreadyDestroyed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// The serviced country. The viewport may not leave it.
    pub country_bounds: GeoBounds,
    pub default_center: GeoPoint,
    pub default_zoom: u8,
    pub min_zoom: u8,
    pub fit_padding_px: u32,
    /// Delay before opening a popup after a pan, so the animation settles.
    pub popup_delay_ms: u64,
    pub visited_window_days: i64,
    pub tile_url_template: String,
    pub tile_attribution: String,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            country_bounds: GeoBounds {
                south: -33.75,
                west: -73.99,
                north: 5.27,
                east: -34.79,
            },
            default_center: GeoPoint {
                latitude: -14.2,
                longitude: -51.9,
            },
            default_zoom: 4,
            min_zoom: 4,
            fit_padding_px: 50,
            popup_delay_ms: 300,
            visited_window_days: DEFAULT_VISITED_WINDOW_DAYS,
            tile_url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            tile_attribution: "© OpenStreetMap contributors".to_string(),
        }
    }
}

impl MapConfig {
    pub fn popup_delay(&self) -> Duration {
        Duration::from_millis(self.popup_delay_ms)
    }
}

/// Opaque marker id issued by a `MapView`. Never reused within a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerHandle(u64);

impl MarkerHandle {
    pub fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerIcon {
    Visited,
    NotVisited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerStyle {
    pub icon: MarkerIcon,
    pub selected: bool,
    pub z_offset: i32,
}

impl MarkerStyle {
    pub fn for_state(state: MarkerState, selected: bool) -> Self {
        Self {
            icon: if state.visited_recently {
                MarkerIcon::Visited
            } else {
                MarkerIcon::NotVisited
            },
            selected,
            z_offset: if selected { SELECTED_Z_OFFSET } else { 0 },
        }
    }
}

/// Info popup shown for a marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub title: String,
    pub visit_status: String,
    /// Formatted outstanding debt, only when there is any.
    pub debt: Option<String>,
    pub directions_url: String,
}

/// Everything a provider needs to draw one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub handle: MarkerHandle,
    pub position: GeoPoint,
    pub state: MarkerState,
    pub style: MarkerStyle,
    pub popup: Popup,
}

/// Inbound events from the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    MarkerClicked(MarkerHandle),
    /// The mounting container changed size.
    Resized,
}

/// Outbound notifications for the host screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapNotification<I> {
    EntitySelected(I),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    Uninitialized,
    Ready,
    Destroyed,
}

#[derive(Debug, Clone)]
struct MarkerEntry<I> {
    id: I,
    spec: MarkerSpec,
}

pub struct MapView<P: MapProvider, I: Id> {
    provider: P,
    config: MapConfig,
    state: ViewState,
    markers: Vec<MarkerEntry<I>>,
    by_id: HashMap<I, usize>,
    by_handle: HashMap<MarkerHandle, usize>,
    next_handle: u64,
    route: Option<Polyline>,
    selection: Option<I>,
}

impl<P: MapProvider, I: Id> MapView<P, I> {
    /// Create an unmounted view. Nothing is drawn until [`MapView::mount`].
    pub fn new(provider: P, config: MapConfig) -> Self {
        Self {
            provider,
            config,
            state: ViewState::Uninitialized,
            markers: Vec::new(),
            by_id: HashMap::new(),
            by_handle: HashMap::new(),
            next_handle: 0,
            route: None,
            selection: None,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn selection(&self) -> Option<&I> {
        self.selection.as_ref()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Current markers in entity order.
    pub fn markers(&self) -> impl Iterator<Item = (&I, &MarkerSpec)> {
        self.markers.iter().map(|entry| (&entry.id, &entry.spec))
    }

    pub fn handle_for(&self, id: &I) -> Option<MarkerHandle> {
        self.by_id.get(id).map(|&index| self.markers[index].spec.handle)
    }

    /// Clusters over the current marker positions, for surfaces without a
    /// native cluster layer. Members index into [`MapView::markers`].
    pub fn clusters(&self, zoom: u8, radius_px: f64) -> Vec<Cluster> {
        let positions: Vec<GeoPoint> = self.markers.iter().map(|entry| entry.spec.position).collect();
        cluster_markers(&positions, zoom, radius_px)
    }

    /// The drawn route overlay, if any.
    pub fn route_overlay(&self) -> Option<&Polyline> {
        self.route.as_ref()
    }

    /// Construct the map surface and draw whatever state was set so far.
    ///
    /// Mounting a ready view is a no-op. A provider failure is fatal: the
    /// partly built surface is released and the view is destroyed.
    pub fn mount(&mut self) -> Result<(), MapError> {
        match self.state {
            ViewState::Ready => return Ok(()),
            ViewState::Destroyed => return Err(MapError::AlreadyDestroyed),
            ViewState::Uninitialized => {}
        }

        if let Err(err) = self.provider.mount(&self.config) {
            warn!(error = %err, "map surface failed to mount");
            self.provider.destroy();
            self.state = ViewState::Destroyed;
            return Err(err);
        }
        self.state = ViewState::Ready;
        debug!(markers = self.markers.len(), "map view ready");

        self.provider
            .set_view(self.config.default_center, self.config.default_zoom);
        self.draw_markers();
        self.provider.replace_route(self.route.as_ref());

        if self.route.is_some() {
            self.fit_route();
        } else if let Some(handle) = self.selected_handle() {
            self.reveal(handle);
        } else {
            self.fit_markers();
        }
        Ok(())
    }

    /// Replace every marker with one per entity.
    ///
    /// The viewport is refit to the markers only when no route overlay and
    /// no selection is active. A selection whose id is gone is dropped.
    pub fn set_entities<C>(&mut self, entities: &[Geocoded<'_, C>], now: i64)
    where
        C: Customer<Id = I>,
    {
        if self.is_destroyed("set_entities") {
            return;
        }

        if let Some(selected) = &self.selection {
            if !entities.iter().any(|entity| entity.id() == selected) {
                debug!(id = ?selected, "selected entity no longer displayed, dropping selection");
                self.selection = None;
            }
        }

        self.markers.clear();
        self.by_id.clear();
        self.by_handle.clear();

        for entity in entities {
            let id = entity.id().clone();
            if self.by_id.contains_key(&id) {
                warn!(id = ?id, "duplicate entity id, keeping first marker");
                continue;
            }

            let selected = self.selection.as_ref() == Some(&id);
            let spec = self.marker_spec(entity, now, selected);
            let index = self.markers.len();
            self.by_id.insert(id.clone(), index);
            self.by_handle.insert(spec.handle, index);
            self.markers.push(MarkerEntry { id, spec });
        }

        if self.state != ViewState::Ready {
            return;
        }

        self.draw_markers();
        if self.route.is_none() && self.selection.is_none() {
            self.fit_markers();
        }
    }

    /// Replace the route overlay.
    ///
    /// `None` is a route reset: it clears the overlay and the selection. A
    /// route with fewer than two stops only clears the overlay. Otherwise
    /// the polyline is drawn and the viewport fit to it.
    pub fn set_route<C>(&mut self, route: Option<&Route<'_, C>>)
    where
        C: Customer<Id = I>,
    {
        if self.is_destroyed("set_route") {
            return;
        }

        let polyline = route
            .map(|route| route.polyline(false))
            .filter(Polyline::is_drawable);

        if route.is_none() {
            self.set_selection(None);
        }

        self.route = polyline;
        if self.state != ViewState::Ready {
            return;
        }

        self.provider.replace_route(self.route.as_ref());
        self.fit_route();
    }

    /// Highlight one marker, or clear the highlight with `None`.
    ///
    /// Selecting an id that has no marker is ignored. Repeating the current
    /// selection only re-reveals it.
    pub fn set_selection(&mut self, id: Option<&I>) {
        if self.is_destroyed("set_selection") {
            return;
        }

        let Some(id) = id else {
            if let Some(previous) = self.selection.take() {
                self.restyle(&previous, false);
            }
            return;
        };

        if !self.by_id.contains_key(id) {
            debug!(id = ?id, "ignoring selection of entity without marker");
            return;
        }

        if let Some(previous) = self.selection.take() {
            if &previous != id {
                self.restyle(&previous, false);
            }
        }

        self.selection = Some(id.clone());
        self.restyle(id, true);

        if let Some(handle) = self.handle_for(id) {
            if self.state == ViewState::Ready {
                self.reveal(handle);
            }
        }
    }

    /// React to an event from the map surface.
    ///
    /// A marker click opens its popup and yields the entity id for the host;
    /// the host decides whether to select it. Clicks on handles from a
    /// previous entity list are ignored.
    pub fn handle_event(&mut self, event: MapEvent) -> Option<MapNotification<I>> {
        if self.state != ViewState::Ready {
            debug!(?event, state = ?self.state, "ignoring map event");
            return None;
        }

        match event {
            MapEvent::Resized => {
                self.provider.invalidate_size();
                None
            }
            MapEvent::MarkerClicked(handle) => {
                let &index = self.by_handle.get(&handle)?;
                self.provider.open_popup(handle, Duration::ZERO);
                Some(MapNotification::EntitySelected(self.markers[index].id.clone()))
            }
        }
    }

    /// Release the map surface. Safe to call repeatedly, and on a view that
    /// was never mounted.
    pub fn teardown(&mut self) {
        match self.state {
            ViewState::Ready => {
                self.provider.destroy();
                debug!("map view destroyed");
            }
            ViewState::Uninitialized => debug!("tearing down unmounted map view"),
            ViewState::Destroyed => return,
        }

        self.state = ViewState::Destroyed;
        self.markers.clear();
        self.by_id.clear();
        self.by_handle.clear();
        self.route = None;
        self.selection = None;
    }

    fn is_destroyed(&self, operation: &str) -> bool {
        if self.state == ViewState::Destroyed {
            warn!(operation, "map view already torn down");
            return true;
        }
        false
    }

    fn marker_spec<C>(&mut self, entity: &Geocoded<'_, C>, now: i64, selected: bool) -> MarkerSpec
    where
        C: Customer<Id = I>,
    {
        let customer = entity.customer();
        let state = MarkerState::derive(customer, now, self.config.visited_window_days);
        let handle = MarkerHandle(self.next_handle);
        self.next_handle += 1;

        let visit_status = if state.visited_recently {
            "Visitado recentemente"
        } else {
            "Não visitado recentemente"
        };

        MarkerSpec {
            handle,
            position: entity.location(),
            state,
            style: MarkerStyle::for_state(state, selected),
            popup: Popup {
                title: customer.display_name().to_string(),
                visit_status: visit_status.to_string(),
                debt: state.has_debt.then(|| format_brl(outstanding_debt(customer))),
                directions_url: directions_url(entity.location()),
            },
        }
    }

    fn selected_handle(&self) -> Option<MarkerHandle> {
        self.selection.as_ref().and_then(|id| self.handle_for(id))
    }

    fn restyle(&mut self, id: &I, selected: bool) {
        let Some(&index) = self.by_id.get(id) else {
            return;
        };

        let spec = &mut self.markers[index].spec;
        spec.style = MarkerStyle::for_state(spec.state, selected);
        if self.state == ViewState::Ready {
            self.provider.set_marker_style(spec.handle, spec.style);
        }
    }

    fn reveal(&mut self, handle: MarkerHandle) {
        self.provider.reveal_marker(handle);
        self.provider.open_popup(handle, self.config.popup_delay());
    }

    fn draw_markers(&mut self) {
        let specs: Vec<MarkerSpec> = self.markers.iter().map(|entry| entry.spec.clone()).collect();
        self.provider.replace_markers(&specs);
    }

    fn fit_markers(&mut self) {
        let bounds = GeoBounds::from_points(self.markers.iter().map(|entry| entry.spec.position));
        match bounds {
            Some(bounds) => self.provider.fit_bounds(bounds, self.config.fit_padding_px),
            None => self
                .provider
                .set_view(self.config.default_center, self.config.default_zoom),
        }
    }

    fn fit_route(&mut self) {
        if let Some(bounds) = self.route.as_ref().and_then(Polyline::bounds) {
            self.provider.fit_bounds(bounds, self.config.fit_padding_px);
        }
    }
}

impl<P: MapProvider, I: Id> Drop for MapView<P, I> {
    fn drop(&mut self) {
        self.teardown();
    }
}
