//! vigil-mock
//!
//! Deterministic and scripted stand-ins for the vigil collaborators:
//! `MockConnector` serves static fixtures, `DynamicMockConnector` defers to a
//! test-side controller, and `RecordingSender` captures outbound reports.

use std::time::Duration;

use async_trait::async_trait;
use vigil_core::connector::{AvailabilityProvider, PresenceConnector, RosterProvider};
use vigil_core::{Agent, AgentId, Availability, VigilError};

mod dynamic;
mod fixtures;
mod sender;

pub use dynamic::{DynamicMockConnector, DynamicMockController, MockBehavior};
pub use sender::RecordingSender;

/// Mock connector for CI-safe demos. Provides deterministic data from static fixtures.
///
/// Agent id `FAIL` yields a connector error and `TIMEOUT` answers after a
/// short delay, long enough to trip a tight provider timeout.
pub struct MockConnector;

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockConnector {
    /// Delay applied to the `TIMEOUT` agent.
    pub const TIMEOUT_DELAY: Duration = Duration::from_millis(200);

    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Agents served by [`RosterProvider::roster`].
    #[must_use]
    pub fn fixture_agents() -> Vec<Agent> {
        fixtures::agents::roster()
    }

    async fn maybe_fail_or_timeout(id: &str, capability: &'static str) -> Result<(), VigilError> {
        match id {
            "FAIL" => Err(VigilError::connector(
                "vigil-mock",
                format!("forced failure: {capability}"),
            )),
            "TIMEOUT" => {
                tokio::time::sleep(Self::TIMEOUT_DELAY).await;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}

impl PresenceConnector for MockConnector {
    fn name(&self) -> &'static str {
        "vigil-mock"
    }

    fn vendor(&self) -> &'static str {
        "Mock"
    }

    fn as_availability_provider(&self) -> Option<&dyn AvailabilityProvider> {
        Some(self as &dyn AvailabilityProvider)
    }

    fn as_roster_provider(&self) -> Option<&dyn RosterProvider> {
        Some(self as &dyn RosterProvider)
    }
}

#[async_trait]
impl AvailabilityProvider for MockConnector {
    async fn availability(&self, agent: &AgentId) -> Result<Availability, VigilError> {
        let id = agent.as_str();
        Self::maybe_fail_or_timeout(id, "availability").await?;
        fixtures::agents::availability_by_id(id)
            .ok_or_else(|| VigilError::not_found(format!("availability for {id}")))
    }
}

#[async_trait]
impl RosterProvider for MockConnector {
    async fn roster(&self) -> Result<Vec<Agent>, VigilError> {
        Ok(fixtures::agents::roster())
    }
}
