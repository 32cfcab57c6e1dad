//! Report envelopes produced by the orchestrator.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::agent::{Agent, AgentId};
use crate::error::VigilError;
use crate::status::Status;

/// A status transition recorded during a poll pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    /// Agent whose status changed.
    pub agent: Agent,
    /// Last stored status, if the agent had any record in the current window.
    pub previous: Option<Status>,
    /// Newly observed status.
    pub current: Status,
    /// Observation time.
    pub at: DateTime<Utc>,
    /// Whether a report for this change was delivered.
    pub reported: bool,
}

/// Summary of one poll pass over all configured agents.
///
/// One agent failing never aborts the pass; its error lands in `warnings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PollReport {
    /// Changes recorded in this pass, in agent order.
    pub changes: Vec<StatusChange>,
    /// Non-fatal issues encountered while polling.
    pub warnings: Vec<VigilError>,
}

/// Summary of a dispatch pass that flushes every agent's current window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DispatchReport {
    /// Agents whose report was delivered and whose window was cleared.
    pub sent: Vec<AgentId>,
    /// Non-fatal issues encountered while dispatching.
    pub warnings: Vec<VigilError>,
}

/// Total available time for one agent over its current window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentTotal {
    /// The agent.
    pub agent: Agent,
    /// Accumulated available time, in whole seconds.
    pub available_secs: i64,
    /// Number of records considered.
    pub records: usize,
}

impl AgentTotal {
    /// Build a total from an accumulated duration.
    #[must_use]
    pub fn new(agent: Agent, available: TimeDelta, records: usize) -> Self {
        Self {
            agent,
            available_secs: available.num_seconds(),
            records,
        }
    }

    /// Accumulated available time.
    #[must_use]
    pub fn available(&self) -> TimeDelta {
        TimeDelta::seconds(self.available_secs)
    }
}

/// Totals for all configured agents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TotalsReport {
    /// Per-agent totals, in agent order.
    pub totals: Vec<AgentTotal>,
    /// Agents whose ledger could not be read or was malformed.
    pub warnings: Vec<VigilError>,
}
