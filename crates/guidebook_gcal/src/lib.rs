// --- File: crates/guidebook_gcal/src/lib.rs ---
pub mod availability;
pub mod doc;
pub mod error;
pub mod gateway;
#[cfg(test)]
mod gateway_proptest;
#[cfg(test)]
mod gateway_test;
pub mod handlers;
pub mod models;
pub mod oauth;
pub mod resolver;
#[cfg(test)]
mod resolver_test;
pub mod routes;
pub mod service;
#[cfg(test)]
mod test_support;

pub use availability::{AvailabilityAggregator, ConflictChecker, GuideSelection};
pub use error::GcalError;
pub use gateway::EventGateway;
pub use models::{
    AccessToken, AvailabilityResult, CalendarEvent, ConflictCheck, EventUpdate, NewEvent,
    TokenStatus,
};
pub use oauth::TokenRefresher;
pub use resolver::{CalendarPurpose, CalendarResolver};
pub use routes::{credential_routes, public_routes, routes};
pub use service::GcalState;
