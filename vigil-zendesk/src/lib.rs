//! vigil-zendesk
//!
//! Presence connector that implements `PresenceConnector` on top of the
//! Zendesk REST API. Exposes per-agent Talk (voice) availability and the
//! agent roster.
#![warn(missing_docs)]

/// Adapter definitions and the production adapter backed by `reqwest`.
pub mod adapter;
mod builder;

use std::sync::Arc;

#[cfg(feature = "test-adapters")]
use adapter::CloneArcAdapters;
use adapter::{RealAdapter, ZdAvailability, ZdUsers};
use async_trait::async_trait;
use vigil_core::{
    Agent, AgentId, Availability, VigilError,
    connector::{AvailabilityProvider, ConnectorKey, PresenceConnector, RosterProvider},
};

pub use builder::{ZendeskConnectorBuilder, ZendeskCredentials};

#[cfg(not(feature = "test-adapters"))]
type AdapterArc = Arc<RealAdapter>;

#[cfg(feature = "test-adapters")]
type AvailabilityAdapter = Arc<dyn ZdAvailability>;
#[cfg(not(feature = "test-adapters"))]
type AvailabilityAdapter = AdapterArc;

#[cfg(feature = "test-adapters")]
type UsersAdapter = Arc<dyn ZdUsers>;
#[cfg(not(feature = "test-adapters"))]
type UsersAdapter = AdapterArc;

/// Public connector type. Production users construct it with
/// `ZendeskConnector::builder()`.
pub struct ZendeskConnector {
    availability: AvailabilityAdapter,
    users: UsersAdapter,
}

impl ZendeskConnector {
    /// Static connector key for orchestrator priority configuration.
    pub const KEY: ConnectorKey = ConnectorKey::new("vigil-zendesk");

    /// Role carried by users that can take calls.
    pub const AGENT_ROLE: &'static str = "agent";

    fn looks_like_not_found(msg: &str) -> bool {
        let m = msg.to_ascii_lowercase();
        m.contains("not found") || m.contains("recordnotfound")
    }

    fn normalize_error(e: VigilError, what: &str) -> VigilError {
        match e {
            VigilError::Connector { connector: _, msg } => {
                if Self::looks_like_not_found(&msg) {
                    VigilError::not_found(what.to_string())
                } else {
                    VigilError::connector("vigil-zendesk", msg)
                }
            }
            VigilError::Other(msg) => VigilError::connector("vigil-zendesk", msg),
            other => other,
        }
    }

    /// Build from existing credentials with a fresh HTTP client.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn try_new(creds: &ZendeskCredentials) -> Result<Self, VigilError> {
        let a = RealAdapter::new(creds)?;
        Ok(Self::from_adapter(&a))
    }

    /// Build from a provided `reqwest::Client`.
    #[must_use]
    pub fn new_with_client(http: reqwest::Client, creds: &ZendeskCredentials) -> Self {
        let a = RealAdapter::with_client(http, creds);
        Self::from_adapter(&a)
    }

    /// For tests/injection (requires the `test-adapters` feature).
    #[cfg(feature = "test-adapters")]
    pub fn from_adapter<A: CloneArcAdapters + 'static>(adapter: &A) -> Self {
        Self {
            availability: adapter.clone_arc_availability(),
            users: adapter.clone_arc_users(),
        }
    }

    #[cfg(not(feature = "test-adapters"))]
    /// Build from a concrete `RealAdapter` by cloning it into shared handles.
    pub fn from_adapter(adapter: &RealAdapter) -> Self {
        let shared = Arc::new(adapter.clone());
        Self {
            availability: Arc::clone(&shared),
            users: shared,
        }
    }
}

#[async_trait]
impl AvailabilityProvider for ZendeskConnector {
    async fn availability(&self, agent: &AgentId) -> Result<Availability, VigilError> {
        let what = format!("availability for {agent}");
        let reading = self
            .availability
            .availability(agent.as_str())
            .await
            .map_err(|e| Self::normalize_error(e, &what))?;
        if reading.status.trim().is_empty() {
            return Err(VigilError::Data(format!("empty status in {what}")));
        }
        Ok(reading)
    }
}

#[async_trait]
impl RosterProvider for ZendeskConnector {
    async fn roster(&self) -> Result<Vec<Agent>, VigilError> {
        let users = self
            .users
            .users()
            .await
            .map_err(|e| Self::normalize_error(e, "roster"))?;
        Ok(users
            .into_iter()
            .filter(|u| u.role.eq_ignore_ascii_case(Self::AGENT_ROLE))
            .map(|u| Agent::new(u.id, u.name))
            .collect())
    }
}

impl PresenceConnector for ZendeskConnector {
    fn name(&self) -> &'static str {
        "vigil-zendesk"
    }

    fn vendor(&self) -> &'static str {
        "Zendesk"
    }

    fn as_availability_provider(&self) -> Option<&dyn AvailabilityProvider> {
        Some(self as &dyn AvailabilityProvider)
    }

    fn as_roster_provider(&self) -> Option<&dyn RosterProvider> {
        Some(self as &dyn RosterProvider)
    }
}
