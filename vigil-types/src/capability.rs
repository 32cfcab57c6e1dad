use core::fmt;
use serde::{Deserialize, Serialize};

/// High-level capability labels for routing, errors, and telemetry.
///
/// These map one-to-one with orchestrator operations and allow consistent
/// Display formatting and match-exhaustive handling when adding
/// new capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum Capability {
    /// Live availability reading for a single agent.
    Availability,
    /// Listing of agents known to the presence provider.
    Roster,
    /// A full poll pass over all configured agents.
    Poll,
    /// Sending ledger reports for all configured agents.
    Dispatch,
    /// Delivering one rendered report.
    Report,
}

impl Capability {
    /// Stable, kebab-case identifier for logs/errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Availability => "availability",
            Self::Roster => "roster",
            Self::Poll => "poll",
            Self::Dispatch => "dispatch",
            Self::Report => "report",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
