//! Presence statuses, the markers that classify raw API strings, and observations.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classified presence status of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    /// The agent can take work.
    Available,
    /// The agent explicitly cannot take work.
    NotAvailable,
    /// Any other raw status reported upstream, kept verbatim.
    Other(String),
}

impl Status {
    /// True only for [`Status::Available`].
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// True for the two statuses that are tracked in the ledger.
    #[must_use]
    pub const fn is_tracked(&self) -> bool {
        matches!(self, Self::Available | Self::NotAvailable)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("AVAILABLE"),
            Self::NotAvailable => f.write_str("NOT_AVAILABLE"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

/// Raw status strings that mark "available" and "not available" upstream.
///
/// Upstream casing and separators drift (`"AVAILABLE"`, `"available"`,
/// `"not_available"`, `"NOT AVAILABLE"`), so [`StatusMarkers::classify`]
/// compares case-insensitively and treats `_`, `-` and spaces as the same
/// separator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusMarkers {
    /// Raw value meaning "available".
    pub available: String,
    /// Raw value meaning "not available".
    pub unavailable: String,
}

impl Default for StatusMarkers {
    fn default() -> Self {
        Self {
            available: "available".to_string(),
            unavailable: "not_available".to_string(),
        }
    }
}

impl StatusMarkers {
    /// Construct markers from the two raw values.
    pub fn new(available: impl Into<String>, unavailable: impl Into<String>) -> Self {
        Self {
            available: available.into(),
            unavailable: unavailable.into(),
        }
    }

    /// Map a raw upstream status string to a [`Status`].
    #[must_use]
    pub fn classify(&self, raw: &str) -> Status {
        let key = normalize(raw);
        if key == normalize(&self.available) {
            Status::Available
        } else if key == normalize(&self.unavailable) {
            Status::NotAvailable
        } else {
            Status::Other(raw.to_string())
        }
    }
}

fn normalize(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| match c {
            '-' | ' ' => '_',
            other => other.to_ascii_lowercase(),
        })
        .collect()
}

/// One recorded status change for a single entity.
///
/// Generic over the status representation so the same sequence type carries
/// classified [`Status`] values or raw upstream strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation<S = Status> {
    /// When the status was observed.
    pub at: DateTime<Utc>,
    /// Observed status.
    pub status: S,
}

impl<S> Observation<S> {
    /// Construct an observation.
    pub const fn new(at: DateTime<Utc>, status: S) -> Self {
        Self { at, status }
    }
}
