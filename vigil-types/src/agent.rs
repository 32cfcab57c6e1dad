//! Agent identity and live availability readings.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Upstream identifier of an agent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AgentId(String);

impl AgentId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AgentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AgentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<u64> for AgentId {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

/// An agent whose presence is watched.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Agent {
    /// Upstream identifier.
    pub id: AgentId,
    /// Display name used in reports.
    pub name: String,
}

impl Agent {
    /// Construct an agent.
    pub fn new(id: impl Into<AgentId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// A single live availability reading returned by a presence connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Raw upstream status string, unclassified.
    pub status: String,
    /// Channel through which the status was set, when the provider reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
}

impl Availability {
    /// Reading with only a raw status.
    pub fn new(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            via: None,
        }
    }
}
