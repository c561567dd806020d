//! Customer builder for tests.

#![allow(dead_code)]

use route_planner::traits::Customer;

use super::goias_locations::Location;

pub const DAY: i64 = 86_400;

/// Fixed "now" for tests: 2025-10-09T08:53:20Z.
pub const NOW: i64 = 1_760_000_000;

#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord)]
pub struct TestId(pub String);

impl TestId {
    pub fn new(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Builder for test customers with sensible defaults.
#[derive(Clone, Debug)]
pub struct TestCustomer {
    pub id: TestId,
    pub name: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub last_visited_at: Option<i64>,
    pub debt: f64,
    pub address: String,
    pub city: String,
}

impl TestCustomer {
    pub fn new(id: &str) -> Self {
        Self {
            id: TestId::new(id),
            name: format!("Cliente {}", id),
            latitude: None,
            longitude: None,
            last_visited_at: None,
            debt: 0.0,
            address: String::new(),
            city: String::new(),
        }
    }

    pub fn at(mut self, lat: f64, lng: f64) -> Self {
        self.latitude = Some(lat);
        self.longitude = Some(lng);
        self
    }

    pub fn in_town(mut self, location: &Location) -> Self {
        self.latitude = Some(location.lat);
        self.longitude = Some(location.lng);
        self.city = location.name.to_string();
        self
    }

    pub fn without_latitude(mut self) -> Self {
        self.latitude = None;
        self
    }

    pub fn named(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn visited_days_ago(mut self, days: i64) -> Self {
        self.last_visited_at = Some(NOW - days * DAY);
        self
    }

    pub fn owes(mut self, amount: f64) -> Self {
        self.debt = amount;
        self
    }

    pub fn address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }
}

impl Customer for TestCustomer {
    type Id = TestId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.name
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
        self.debt
    }

    fn address(&self) -> &str {
        &self.address
    }

    fn city(&self) -> &str {
        &self.city
    }
}

/// Ids as plain strings, for concise assertions.
pub fn id_strs<'a>(ids: &[&'a TestId]) -> Vec<&'a str> {
    ids.iter().map(|id| id.0.as_str()).collect()
}
