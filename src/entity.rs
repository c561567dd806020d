//! Customer records, geocoding filter and derived marker flags.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::geo::GeoPoint;
use crate::traits::Customer;

pub const SECONDS_PER_DAY: i64 = 86_400;

/// A customer counts as visited recently for this many days after a visit.
pub const DEFAULT_VISITED_WINDOW_DAYS: i64 = 25;

/// Customer document as stored by the customer-data collaborator.
///
/// Coordinates are nullable: geocoding happens best-effort upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub last_visited_at: Option<i64>,
    #[serde(default)]
    pub debt_amount: f64,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
}

impl Customer for CustomerRecord {
    type Id = String;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    fn last_visited_at(&self) -> Option<i64> {
        self.last_visited_at
    }

    fn debt_amount(&self) -> f64 {
        self.debt_amount
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn city(&self) -> &str {
        &self.city
    }
}

/// A borrowed customer together with its validated location.
///
/// Only customers with a valid coordinate pair can be wrapped, so anything
/// that accepts a `Geocoded` never sees a missing coordinate.
#[derive(Debug)]
pub struct Geocoded<'a, C> {
    customer: &'a C,
    location: GeoPoint,
}

impl<C> Clone for Geocoded<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Geocoded<'_, C> {}

impl<'a, C: Customer> Geocoded<'a, C> {
    pub fn new(customer: &'a C) -> Option<Self> {
        let location = customer.location()?;
        Some(Self { customer, location })
    }

    pub fn id(&self) -> &'a C::Id {
        self.customer.id()
    }
}

impl<'a, C> Geocoded<'a, C> {
    pub fn customer(&self) -> &'a C {
        self.customer
    }

    pub fn location(&self) -> GeoPoint {
        self.location
    }
}

/// Keep only customers with a usable location, in input order.
pub fn geocode<C: Customer>(customers: &[C]) -> Vec<Geocoded<'_, C>> {
    let geocoded: Vec<_> = customers.iter().filter_map(Geocoded::new).collect();

    let excluded = customers.len() - geocoded.len();
    if excluded > 0 {
        debug!(excluded, kept = geocoded.len(), "excluded customers without usable coordinates");
    }

    geocoded
}

/// Debt with negative or non-finite values read as zero.
pub fn outstanding_debt<C: Customer>(customer: &C) -> f64 {
    let debt = customer.debt_amount();
    if debt.is_finite() && debt > 0.0 { debt } else { 0.0 }
}

/// Per-customer flags derived on every render. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerState {
    pub visited_recently: bool,
    pub has_debt: bool,
}

impl MarkerState {
    /// `now` is a unix timestamp in seconds.
    pub fn derive<C: Customer>(customer: &C, now: i64, window_days: i64) -> Self {
        let window = window_days.saturating_mul(SECONDS_PER_DAY);
        let visited_recently = customer
            .last_visited_at()
            .is_some_and(|visited| now.saturating_sub(visited) <= window);

        Self {
            visited_recently,
            has_debt: outstanding_debt(customer) > 0.0,
        }
    }
}

/// Narrows the candidate set before a route is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateFilter {
    /// Cities to include. Empty means every city.
    pub cities: Vec<String>,
    /// Only customers that currently owe money.
    pub only_with_debt: bool,
    /// Skip customers visited inside the visited window.
    pub skip_visited_recently: bool,
}

impl CandidateFilter {
    pub fn matches<C: Customer>(&self, customer: &C, now: i64, window_days: i64) -> bool {
        if !self.cities.is_empty() {
            let city = customer.city().trim().to_lowercase();
            let listed = self
                .cities
                .iter()
                .any(|wanted| wanted.trim().to_lowercase() == city);
            if !listed {
                return false;
            }
        }

        let state = MarkerState::derive(customer, now, window_days);
        if self.only_with_debt && !state.has_debt {
            return false;
        }
        if self.skip_visited_recently && state.visited_recently {
            return false;
        }
        true
    }

    pub fn apply<'a, C: Customer>(
        &self,
        candidates: &[Geocoded<'a, C>],
        now: i64,
        window_days: i64,
    ) -> Vec<Geocoded<'a, C>> {
        candidates
            .iter()
            .filter(|candidate| self.matches(candidate.customer(), now, window_days))
            .copied()
            .collect()
    }
}
