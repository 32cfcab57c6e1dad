//! Vigil watches agent presence on a helpdesk and reports how long each agent
//! was available.
//!
//! Overview
//! - Polls presence connectors that implement the `vigil_core` contracts.
//! - Classifies raw statuses against configurable markers and records only
//!   changes into a per-agent ledger held by an `EventStore`.
//! - Renders ledger reports (plaintext plus HTML table) and hands them to a
//!   `ReportSender`.
//! - Normalizes error handling: batch passes collect per-agent failures as
//!   warnings instead of aborting.
//!
//! Key behaviors
//! - Connectors are tried in priority order with a per-provider timeout;
//!   errors are collapsed the same way for every capability.
//! - Total available time sums closed AVAILABLE→NOT_AVAILABLE intervals only.
//!   An interval still open at the end of the window is not counted.
//! - A window is rotated once it holds `stack_size` records, archived to
//!   history when `keep_history` is set.
//!
//! Examples
//! ```rust,ignore
//! use std::sync::Arc;
//! use vigil::{Agent, Vigil, store::JsonFileStore};
//!
//! let vigil = Vigil::builder()
//!     .with_connector(Arc::new(zendesk))
//!     .sender(Arc::new(mailgun))
//!     .store(Arc::new(JsonFileStore::open("storage.json").await?))
//!     .agent(Agent::new(1001_u64, "Misty Kennedy"))
//!     .stack_size(12)
//!     .build()?;
//!
//! let report = vigil.poll().await?;
//! for change in &report.changes {
//!     println!("{} -> {}", change.agent.name, change.current);
//! }
//! ```
#![warn(missing_docs)]

pub(crate) mod core;
pub mod report;
mod router;
pub mod settings;
pub mod store;

pub use core::{Vigil, VigilBuilder, tag_err};
pub use router::util::{collapse_errors, join_with_deadline};
pub use settings::Settings;
pub use store::{EventStore, JsonFileStore, MemoryStore};

// Re-export core types for convenience
pub use vigil_core::{
    Agent, AgentId, AgentLedger, AgentTotal, Availability, Capability, DispatchReport, Message,
    Observation, PollReport, PresenceConnector, ReportConfig, ReportMode, ReportSender, Status,
    StatusChange, StatusMarkers, StatusRecord, TotalsReport, VigilConfig, VigilError,
    available_duration, compute_available_duration, try_available_duration,
};
