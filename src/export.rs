//! Rows for the printable route sheet and external navigation links.
//!
//! The print renderer owns the document layout; this module only hands it
//! the ordered entities and their derived flags.

use serde::Serialize;

use crate::entity::{outstanding_debt, Geocoded, MarkerState};
use crate::geo::GeoPoint;
use crate::optimizer::Route;
use crate::traits::Customer;

/// "Open directions" deep link for a destination.
pub fn directions_url(point: GeoPoint) -> String {
    format!(
        "https://www.google.com/maps/dir/?api=1&destination={},{}",
        point.latitude, point.longitude
    )
}

/// Format an amount as Brazilian reais, e.g. `R$ 1.234,56`.
///
/// The float-to-cents cast saturates at `i64` bounds, far above any debt
/// the business records.
pub fn format_brl(amount: f64) -> String {
    debug_assert!(
        amount.is_finite() && amount.abs() < 9.0e16,
        "amount {} out of formatting range",
        amount
    );
    let cents = (amount * 100.0).round() as i64;
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.unsigned_abs();
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRow<I> {
    /// 1-based position on the sheet.
    pub position: usize,
    pub id: I,
    pub name: String,
    pub address: String,
    pub city: String,
    pub visited_recently: bool,
    pub has_debt: bool,
    pub debt_amount: f64,
    /// Distance from the previous stop; `None` on unordered sheets.
    pub leg_km: Option<f64>,
    pub directions_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSheet<I> {
    pub rows: Vec<SheetRow<I>>,
    pub total_km: Option<f64>,
}

impl<I> RouteSheet<I> {
    /// Sheet for an optimized route, with per-leg distances.
    pub fn from_route<C>(route: &Route<'_, C>, now: i64, window_days: i64) -> Self
    where
        C: Customer<Id = I>,
    {
        let rows = route
            .stops()
            .iter()
            .zip(route.legs())
            .enumerate()
            .map(|(index, (stop, leg))| row(index, stop, Some(leg), now, window_days))
            .collect();

        Self {
            rows,
            total_km: Some(route.total_distance_km()),
        }
    }

    /// Sheet for entities in the order given, without distances.
    pub fn unordered<C>(entities: &[Geocoded<'_, C>], now: i64, window_days: i64) -> Self
    where
        C: Customer<Id = I>,
    {
        let rows = entities
            .iter()
            .enumerate()
            .map(|(index, entity)| row(index, entity, None, now, window_days))
            .collect();

        Self { rows, total_km: None }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of outstanding debt across all rows.
    pub fn total_debt(&self) -> f64 {
        self.rows.iter().map(|row| row.debt_amount).sum()
    }
}

fn row<C: Customer>(
    index: usize,
    entity: &Geocoded<'_, C>,
    leg_km: Option<f64>,
    now: i64,
    window_days: i64,
) -> SheetRow<C::Id> {
    let customer = entity.customer();
    let state = MarkerState::derive(customer, now, window_days);

    SheetRow {
        position: index + 1,
        id: customer.id().clone(),
        name: customer.display_name().to_string(),
        address: customer.address().to_string(),
        city: customer.city().to_string(),
        visited_recently: state.visited_recently,
        has_debt: state.has_debt,
        debt_amount: outstanding_debt(customer),
        leg_km,
        directions_url: directions_url(entity.location()),
    }
}
