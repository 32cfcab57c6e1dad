use vigil_core::{Agent, Availability, Capability, VigilError};

use crate::Vigil;

impl Vigil {
    /// Fetch the live availability of one agent.
    ///
    /// Connectors are tried in priority order, each bounded by the provider
    /// timeout. `NotFound` from every provider collapses to `NotFound`.
    ///
    /// # Errors
    /// Returns an error if no eligible provider succeeds or none support the capability.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(target = "vigil::router", skip(self), fields(agent = %agent.id))
    )]
    pub async fn availability(&self, agent: &Agent) -> Result<Availability, VigilError> {
        let id = agent.id.clone();
        self.fetch_priority_with_fallback(
            Capability::Availability,
            format!("availability for {}", agent.id),
            move |c| {
                c.as_availability_provider()?;
                let id = id.clone();
                Some(async move {
                    match c.as_availability_provider() {
                        Some(p) => p.availability(&id).await,
                        None => Err(VigilError::connector(
                            c.name(),
                            "missing availability capability during call",
                        )),
                    }
                })
            },
        )
        .await
    }

    /// List agents known to the presence providers.
    ///
    /// # Errors
    /// Returns an error if no eligible provider succeeds or none support the capability.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(target = "vigil::router", skip(self))
    )]
    pub async fn roster(&self) -> Result<Vec<Agent>, VigilError> {
        self.fetch_priority_with_fallback(Capability::Roster, "roster".to_string(), |c| {
            c.as_roster_provider()?;
            Some(async move {
                match c.as_roster_provider() {
                    Some(p) => p.roster().await,
                    None => Err(VigilError::connector(
                        c.name(),
                        "missing roster capability during call",
                    )),
                }
            })
        })
        .await
    }
}
