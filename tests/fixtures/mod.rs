//! Test fixtures for route-planner.
//!
//! Provides realistic test data including:
//! - Real towns around Goiânia, Goiás (Brazil)
//! - A customer builder implementing the `Customer` trait

pub mod customers;
pub mod goias_locations;

pub use customers::*;
pub use goias_locations::*;
