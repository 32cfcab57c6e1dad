use chrono::TimeDelta;
use vigil_core::{
    Agent, AgentTotal, Capability, DispatchReport, Message, Status, StatusRecord, TotalsReport,
    VigilError, observations_from_records, try_available_duration,
};

use crate::Vigil;
use crate::report::render_ledger;
use crate::router::util::{join_with_deadline, relabel_timeout};

impl Vigil {
    /// Render the ledger report for one agent's current window.
    ///
    /// # Errors
    /// Returns `Storage` if the ledger cannot be read and
    /// `InvalidSequenceOrder` if its records are not chronological.
    pub async fn report_for(&self, agent: &Agent) -> Result<Message, VigilError> {
        let ledger = self.store.ledger(&agent.id).await?;
        let total = self.window_total(&ledger.stack)?;
        Ok(render_ledger(agent, &ledger.stack, total, &self.cfg.report))
    }

    /// Send every non-empty window and clear the windows that were delivered.
    ///
    /// A window whose report fails to send is kept for the next dispatch.
    ///
    /// # Errors
    /// Returns `RequestTimeout("dispatch")` if the configured request deadline elapses.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(target = "vigil::router", skip(self), fields(agents = self.agents.len()))
    )]
    pub async fn dispatch(&self) -> Result<DispatchReport, VigilError> {
        let tasks = self
            .agents
            .iter()
            .map(|agent| async move { (agent, self.dispatch_agent(agent).await) });
        let outcomes = join_with_deadline(tasks, self.cfg.request_timeout)
            .await
            .map_err(|e| relabel_timeout(e, Capability::Dispatch))?;

        let mut report = DispatchReport::default();
        for (agent, outcome) in outcomes {
            match outcome {
                Ok(true) => report.sent.push(agent.id.clone()),
                Ok(false) => {}
                Err(e) => {
                    #[cfg(feature = "tracing")]
                    crate::router::util::log_agent_failure(&agent.id, &e, "dispatch failed");
                    report.warnings.push(e);
                }
            }
        }
        Ok(report)
    }

    async fn dispatch_agent(&self, agent: &Agent) -> Result<bool, VigilError> {
        let ledger = self.store.ledger(&agent.id).await?;
        if ledger.stack.is_empty() {
            return Ok(false);
        }
        let total = self.window_total(&ledger.stack)?;
        let message = render_ledger(agent, &ledger.stack, total, &self.cfg.report);
        self.deliver(&message).await?;
        self.store.clear_stack(&agent.id).await?;
        Ok(true)
    }

    /// Total available time of every agent's current window.
    ///
    /// Agents whose ledger cannot be read or is out of order are reported in
    /// `warnings` and omitted from `totals`.
    pub async fn totals(&self) -> TotalsReport {
        let mut report = TotalsReport::default();
        for agent in &self.agents {
            let total = match self.store.ledger(&agent.id).await {
                Ok(ledger) => self
                    .window_total(&ledger.stack)
                    .map(|t| AgentTotal::new(agent.clone(), t, ledger.stack.len())),
                Err(e) => Err(e),
            };
            match total {
                Ok(t) => report.totals.push(t),
                Err(e) => report.warnings.push(e),
            }
        }
        report
    }

    fn window_total(&self, records: &[StatusRecord]) -> Result<TimeDelta, VigilError> {
        let observations = observations_from_records(records, &self.cfg.markers);
        try_available_duration(&observations, &Status::Available, &Status::NotAvailable)
    }
}
