//! vigil-core
//!
//! Core traits and the one piece of real arithmetic shared across the vigil
//! workspace.
//!
//! - `availability`: the availability-interval accumulator and timeline helpers.
//! - `connector`: the `PresenceConnector` trait and its role traits.
//! - `store`: the `EventStore` trait for persisted status ledgers.
//! - `sender`: the `ReportSender` trait for outbound reports.
//!
//! Connector, store and sender traits are `async_trait` objects meant to be
//! shared as `Arc<dyn ...>` and driven from a Tokio 1.x runtime.
#![warn(missing_docs)]

/// Availability-interval accumulation over observation sequences.
pub mod availability;
/// Connector capability traits and the primary `PresenceConnector` interface.
pub mod connector;
/// Outbound report delivery.
pub mod sender;
/// Persisted status ledgers.
pub mod store;

pub use availability::{
    available_duration, compute_available_duration, is_chronological,
    observations_from_records, try_available_duration,
};
pub use connector::{AvailabilityProvider, PresenceConnector, RosterProvider};
pub use sender::ReportSender;
pub use store::EventStore;

pub use vigil_types::*;
