use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use vigil_core::connector::{AvailabilityProvider, PresenceConnector, RosterProvider};
use vigil_core::{Agent, AgentId, Availability, VigilError};

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value immediately.
    Return(T),
    /// Fail immediately with the provided error.
    Fail(VigilError),
    /// Hang indefinitely (simulate a timeout).
    Hang,
}

#[derive(Default)]
struct InternalState {
    availability_rules: HashMap<AgentId, MockBehavior<Availability>>,
    roster_rule: Option<MockBehavior<Vec<Agent>>>,
    availability_requests: Vec<AgentId>,
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `availability` calls for a specific agent.
    pub async fn set_availability_behavior(
        &self,
        agent: impl Into<AgentId>,
        behavior: MockBehavior<Availability>,
    ) {
        let mut guard = self.state.lock().await;
        guard.availability_rules.insert(agent.into(), behavior);
    }

    /// Shorthand: answer `availability` for `agent` with a raw status.
    pub async fn set_status(&self, agent: impl Into<AgentId>, status: &str) {
        self.set_availability_behavior(agent, MockBehavior::Return(Availability::new(status)))
            .await;
    }

    /// Set the behavior for `roster` calls.
    pub async fn set_roster_behavior(&self, behavior: MockBehavior<Vec<Agent>>) {
        let mut guard = self.state.lock().await;
        guard.roster_rule = Some(behavior);
    }

    /// Return a copy of the agents requested through `availability`, in call order.
    pub async fn availability_requests(&self) -> Vec<AgentId> {
        let guard = self.state.lock().await;
        guard.availability_requests.clone()
    }

    /// Clear all configured behaviors and request logs.
    pub async fn clear_all_behaviors(&self) {
        let mut guard = self.state.lock().await;
        guard.availability_rules.clear();
        guard.roster_rule = None;
        guard.availability_requests.clear();
    }
}

/// A connector that defers all behavior to an external controller.
pub struct DynamicMockConnector {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockConnector {
    /// Create a new dynamic mock connector and its controller.
    #[must_use]
    pub fn new_with_controller(
        name: &'static str,
    ) -> (Arc<dyn PresenceConnector>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn PresenceConnector>, controller)
    }
}

impl PresenceConnector for DynamicMockConnector {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn as_availability_provider(&self) -> Option<&dyn AvailabilityProvider> {
        Some(self as &dyn AvailabilityProvider)
    }

    fn as_roster_provider(&self) -> Option<&dyn RosterProvider> {
        Some(self as &dyn RosterProvider)
    }
}

async fn play<T>(behavior: Option<MockBehavior<T>>, capability: &str) -> Result<T, VigilError> {
    match behavior {
        Some(MockBehavior::Return(v)) => Ok(v),
        Some(MockBehavior::Fail(e)) => Err(e),
        Some(MockBehavior::Hang) => std::future::pending().await,
        None => Err(VigilError::unsupported(capability)),
    }
}

#[async_trait]
impl AvailabilityProvider for DynamicMockConnector {
    async fn availability(&self, agent: &AgentId) -> Result<Availability, VigilError> {
        // Snapshot the rule without holding the lock across the await below.
        let behavior = {
            let mut guard = self.state.lock().await;
            guard.availability_requests.push(agent.clone());
            guard.availability_rules.get(agent).cloned()
        };
        play(behavior, "availability").await
    }
}

#[async_trait]
impl RosterProvider for DynamicMockConnector {
    async fn roster(&self) -> Result<Vec<Agent>, VigilError> {
        let behavior = {
            let guard = self.state.lock().await;
            guard.roster_rule.clone()
        };
        play(behavior, "roster").await
    }
}
