//! route-planner core
//!
//! Collection-route ordering and map presentation for geocoded customers:
//! a greedy nearest-neighbor route builder and a provider-agnostic map view
//! with clustering, selection and a route overlay.

pub mod traits;
pub mod geo;
pub mod haversine;
pub mod polyline;
pub mod entity;
pub mod optimizer;
pub mod map_view;
pub mod cluster;
pub mod export;
