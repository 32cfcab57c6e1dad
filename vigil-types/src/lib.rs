//! Shared data types for the vigil presence monitor: agents, statuses,
//! persisted records, configuration, report envelopes, and the unified error.
#![warn(missing_docs)]

mod agent;
mod capability;
mod config;
mod connector;
mod error;
mod message;
mod record;
mod reports;
mod status;

pub use agent::{Agent, AgentId, Availability};
pub use capability::Capability;
pub use config::{ReportConfig, ReportMode, VigilConfig};
pub use connector::ConnectorKey;
pub use error::VigilError;
pub use message::Message;
pub use record::{AgentLedger, LEGACY_DT_FORMAT, StatusRecord, parse_record_dt};
pub use reports::{AgentTotal, DispatchReport, PollReport, StatusChange, TotalsReport};
pub use status::{Observation, Status, StatusMarkers};
