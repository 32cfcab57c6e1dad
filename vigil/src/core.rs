use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use vigil_core::connector::ConnectorKey;
use vigil_core::{
    Agent, Capability, EventStore, PresenceConnector, ReportConfig, ReportMode, ReportSender,
    StatusMarkers, VigilConfig, VigilError,
};

use crate::router::util::collapse_errors;
use crate::store::MemoryStore;

/// Orchestrator that polls presence providers, records status changes and
/// sends availability reports.
pub struct Vigil {
    pub(crate) connectors: Vec<Arc<dyn PresenceConnector>>,
    pub(crate) priority: Vec<ConnectorKey>,
    pub(crate) store: Arc<dyn EventStore>,
    pub(crate) sender: Option<Arc<dyn ReportSender>>,
    pub(crate) agents: Vec<Agent>,
    pub(crate) cfg: VigilConfig,
}

/// Builder for constructing a `Vigil` orchestrator with custom configuration.
pub struct VigilBuilder {
    connectors: Vec<Arc<dyn PresenceConnector>>,
    priority: Vec<ConnectorKey>,
    store: Option<Arc<dyn EventStore>>,
    sender: Option<Arc<dyn ReportSender>>,
    agents: Vec<Agent>,
    cfg: VigilConfig,
}

impl Default for VigilBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VigilBuilder {
    /// Create a new builder with default configuration.
    ///
    /// Starts with no connectors, no agents, no sender and an in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            connectors: vec![],
            priority: vec![],
            store: None,
            sender: None,
            agents: vec![],
            cfg: VigilConfig::default(),
        }
    }

    /// Register a presence connector.
    ///
    /// Registration order is the fallback order unless [`prefer`](Self::prefer)
    /// says otherwise.
    #[must_use]
    pub fn with_connector(mut self, c: Arc<dyn PresenceConnector>) -> Self {
        self.connectors.push(c);
        self
    }

    /// Set preferred connectors, highest priority first.
    ///
    /// An ordering hint only: unlisted connectors are still tried after the listed ones.
    #[must_use]
    pub fn prefer(mut self, connectors_desc: &[Arc<dyn PresenceConnector>]) -> Self {
        self.priority = connectors_desc.iter().map(|c| c.key()).collect();
        self
    }

    /// Event store for status ledgers. Defaults to [`MemoryStore`].
    #[must_use]
    pub fn store(mut self, store: Arc<dyn EventStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Sender used for reports. Without one, reports surface as `Unsupported` warnings.
    #[must_use]
    pub fn sender(mut self, sender: Arc<dyn ReportSender>) -> Self {
        self.sender = Some(sender);
        self
    }

    /// Watch one more agent.
    #[must_use]
    pub fn agent(mut self, agent: Agent) -> Self {
        self.agents.push(agent);
        self
    }

    /// Watch several agents.
    #[must_use]
    pub fn agents(mut self, agents: impl IntoIterator<Item = Agent>) -> Self {
        self.agents.extend(agents);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, cfg: VigilConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Raw status strings meaning available / not available.
    #[must_use]
    pub fn markers(mut self, markers: StatusMarkers) -> Self {
        self.cfg.markers = markers;
        self
    }

    /// Records per reporting window before the stack is rotated.
    #[must_use]
    pub const fn stack_size(mut self, n: usize) -> Self {
        self.cfg.stack_size = n;
        self
    }

    /// Archive rotated windows into history instead of dropping them.
    #[must_use]
    pub const fn keep_history(mut self, yes: bool) -> Self {
        self.cfg.keep_history = yes;
        self
    }

    /// Record and report on every poll, even without a status change.
    #[must_use]
    pub const fn always_report(mut self, yes: bool) -> Self {
        self.cfg.always_report = yes;
        self
    }

    /// What to send when a change is recorded.
    #[must_use]
    pub const fn report_mode(mut self, mode: ReportMode) -> Self {
        self.cfg.report_mode = mode;
        self
    }

    /// Rendering settings.
    #[must_use]
    pub fn report(mut self, report: ReportConfig) -> Self {
        self.cfg.report = report;
        self
    }

    /// Per-provider request timeout.
    #[must_use]
    pub const fn provider_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.provider_timeout = timeout;
        self
    }

    /// Overall deadline for one poll or dispatch pass.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: Duration) -> Self {
        self.cfg.request_timeout = Some(timeout);
        self
    }

    /// Build the `Vigil` orchestrator.
    ///
    /// # Errors
    /// Returns `InvalidArg` if no connector is registered, if `stack_size` is
    /// zero, or if an agent id is registered twice.
    pub fn build(self) -> Result<Vigil, VigilError> {
        if self.connectors.is_empty() {
            return Err(VigilError::InvalidArg(
                "no connectors registered; add at least one via with_connector(...)".to_string(),
            ));
        }
        if self.cfg.stack_size == 0 {
            return Err(VigilError::InvalidArg(
                "stack_size must be at least 1".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for a in &self.agents {
            if !seen.insert(a.id.clone()) {
                return Err(VigilError::InvalidArg(format!(
                    "agent {} registered more than once",
                    a.id
                )));
            }
        }

        // Drop unknown and duplicate preference keys.
        let known: HashSet<&'static str> = self.connectors.iter().map(|c| c.name()).collect();
        let mut kept = HashSet::new();
        let priority = self
            .priority
            .into_iter()
            .filter(|k| known.contains(k.as_str()) && kept.insert(k.as_str()))
            .collect();

        Ok(Vigil {
            connectors: self.connectors,
            priority,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn EventStore>),
            sender: self.sender,
            agents: self.agents,
            cfg: self.cfg,
        })
    }
}

/// Attribute an error to a connector unless it already carries its own context.
pub fn tag_err(connector: &str, e: VigilError) -> VigilError {
    match e {
        e @ (VigilError::NotFound { .. }
        | VigilError::ProviderTimeout { .. }
        | VigilError::Connector { .. }
        | VigilError::RequestTimeout { .. }
        | VigilError::AllProvidersTimedOut { .. }
        | VigilError::AllProvidersFailed(_)) => e,
        other => VigilError::Connector {
            connector: connector.to_string(),
            msg: other.to_string(),
        },
    }
}

/// Bound `fut` by an optional deadline, mapping expiry to `RequestTimeout`.
pub(crate) async fn with_request_deadline<T, Fut>(
    deadline: Option<Duration>,
    fut: Fut,
) -> Result<T, VigilError>
where
    Fut: core::future::Future<Output = T>,
{
    match deadline {
        Some(d) => tokio::time::timeout(d, fut)
            .await
            .map_err(|_| VigilError::request_timeout("request")),
        None => Ok(fut.await),
    }
}

impl Vigil {
    /// Start building a new `Vigil` instance.
    ///
    /// ```rust,ignore
    /// use std::sync::Arc;
    /// use vigil::{Agent, Vigil};
    ///
    /// let vigil = Vigil::builder()
    ///     .with_connector(Arc::new(zendesk))
    ///     .sender(Arc::new(mailgun))
    ///     .agent(Agent::new("1001", "Misty Kennedy"))
    ///     .build()?;
    /// let report = vigil.poll().await?;
    /// ```
    #[must_use]
    pub fn builder() -> VigilBuilder {
        VigilBuilder::new()
    }

    /// Agents watched by this instance, in registration order.
    #[must_use]
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Effective configuration.
    #[must_use]
    pub const fn config(&self) -> &VigilConfig {
        &self.cfg
    }

    /// Wrap a provider future with a timeout and standardized timeout error mapping.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "vigil::core::provider_call_with_timeout",
            skip(fut),
            fields(
                connector = connector_name,
                capability = %capability,
                timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            ),
        )
    )]
    pub(crate) async fn provider_call_with_timeout<T, Fut>(
        connector_name: &'static str,
        capability: Capability,
        timeout: Duration,
        fut: Fut,
    ) -> Result<T, VigilError>
    where
        Fut: core::future::Future<Output = Result<T, VigilError>>,
    {
        (tokio::time::timeout(timeout, fut).await).unwrap_or_else(|_| {
            Err(VigilError::provider_timeout(
                connector_name,
                capability.as_str(),
            ))
        })
    }

    pub(crate) fn ordered(&self) -> Vec<Arc<dyn PresenceConnector>> {
        let mut out: Vec<(usize, Arc<dyn PresenceConnector>)> =
            self.connectors.iter().cloned().enumerate().collect();
        if !self.priority.is_empty() {
            let pos: HashMap<_, _> = self
                .priority
                .iter()
                .enumerate()
                .map(|(i, k)| (k.as_str(), i))
                .collect();
            out.sort_by_key(|(orig_i, c)| {
                (pos.get(c.name()).copied().unwrap_or(usize::MAX), *orig_i)
            });
        }
        out.into_iter().map(|(_, c)| c).collect()
    }

    /// Try connectors in priority order until one succeeds.
    ///
    /// `call` returns `None` for connectors lacking the capability. Each call is
    /// bounded by the provider timeout; failures are collapsed with
    /// [`collapse_errors`].
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "vigil::core::fetch_priority_with_fallback",
            skip(self, call),
            fields(capability = %capability, not_found = %not_found_what),
        )
    )]
    pub(crate) async fn fetch_priority_with_fallback<T, F, Fut>(
        &self,
        capability: Capability,
        not_found_what: String,
        call: F,
    ) -> Result<T, VigilError>
    where
        T: Send,
        F: Fn(Arc<dyn PresenceConnector>) -> Option<Fut> + Send,
        Fut: core::future::Future<Output = Result<T, VigilError>> + Send,
    {
        let mut attempted_any = false;
        let mut errors: Vec<VigilError> = Vec::new();

        for c in self.ordered() {
            let Some(fut) = call(Arc::clone(&c)) else {
                continue;
            };
            attempted_any = true;
            match Self::provider_call_with_timeout(
                c.name(),
                capability,
                self.cfg.provider_timeout,
                fut,
            )
            .await
            {
                Ok(v) => return Ok(v),
                Err(e @ (VigilError::NotFound { .. } | VigilError::ProviderTimeout { .. })) => {
                    errors.push(e);
                }
                Err(e) => errors.push(tag_err(c.name(), e)),
            }
        }

        Err(collapse_errors(
            capability,
            attempted_any,
            errors,
            Some(not_found_what),
        ))
    }
}
