use async_trait::async_trait;

use crate::{Agent, AgentId, Availability, VigilError};
pub use vigil_types::ConnectorKey;

/// Focused role trait for connectors that report live agent availability.
#[async_trait]
pub trait AvailabilityProvider: Send + Sync {
    /// Fetch the current availability reading for one agent.
    async fn availability(&self, agent: &AgentId) -> Result<Availability, VigilError>;
}

/// Focused role trait for connectors that can list agents.
#[async_trait]
pub trait RosterProvider: Send + Sync {
    /// List agents known to the presence provider.
    async fn roster(&self) -> Result<Vec<Agent>, VigilError>;
}

/// Main connector trait implemented by presence providers.
///
/// Capabilities are advertised through the `as_*_provider` accessors; the
/// orchestrator only routes a call to connectors that return `Some`.
pub trait PresenceConnector: Send + Sync {
    /// A stable identifier for priority lists (e.g., "vigil-zendesk").
    fn name(&self) -> &'static str;

    /// Canonical connector key constructed from the static name.
    fn key(&self) -> ConnectorKey {
        ConnectorKey::new(self.name())
    }

    /// Human-friendly vendor string.
    fn vendor(&self) -> &'static str {
        "unknown"
    }

    /// Advertise availability capability.
    fn as_availability_provider(&self) -> Option<&dyn AvailabilityProvider> {
        None
    }

    /// Advertise roster capability.
    fn as_roster_provider(&self) -> Option<&dyn RosterProvider> {
        None
    }
}
