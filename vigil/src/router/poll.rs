use chrono::Utc;
use vigil_core::{
    Agent, Capability, Message, PollReport, ReportMode, StatusChange, StatusRecord, VigilError,
};

use crate::Vigil;
use crate::report::render_change;
use crate::router::util::{join_with_deadline, relabel_timeout};

struct AgentPoll {
    change: Option<StatusChange>,
    warnings: Vec<VigilError>,
}

impl Vigil {
    /// Poll every configured agent once and record status changes.
    ///
    /// Agents are polled concurrently. For each agent the live status is
    /// classified and compared with the last stored record; only a change
    /// (or every reading, with `always_report`) is appended and reported.
    /// Statuses outside the configured markers are skipped. A full window is
    /// rotated after the append.
    ///
    /// A failure for one agent never aborts the pass: the error is collected
    /// in [`PollReport::warnings`].
    ///
    /// # Errors
    /// Returns `RequestTimeout("poll")` if the configured request deadline elapses.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(target = "vigil::router", skip(self), fields(agents = self.agents.len()))
    )]
    pub async fn poll(&self) -> Result<PollReport, VigilError> {
        let tasks = self.agents.iter().map(|agent| self.poll_agent(agent));
        let outcomes = join_with_deadline(tasks, self.cfg.request_timeout)
            .await
            .map_err(|e| relabel_timeout(e, Capability::Poll))?;

        let mut report = PollReport::default();
        for outcome in outcomes {
            report.changes.extend(outcome.change);
            report.warnings.extend(outcome.warnings);
        }
        #[cfg(feature = "tracing")]
        tracing::info!(
            target: "vigil::router",
            changes = report.changes.len(),
            warnings = report.warnings.len(),
            "poll pass finished"
        );
        Ok(report)
    }

    async fn poll_agent(&self, agent: &Agent) -> AgentPoll {
        let mut warnings = Vec::new();
        let change = match self.record_change(agent, &mut warnings).await {
            Ok(change) => change,
            Err(e) => {
                #[cfg(feature = "tracing")]
                crate::router::util::log_agent_failure(&agent.id, &e, "poll failed");
                warnings.push(e);
                None
            }
        };
        AgentPoll { change, warnings }
    }

    async fn record_change(
        &self,
        agent: &Agent,
        warnings: &mut Vec<VigilError>,
    ) -> Result<Option<StatusChange>, VigilError> {
        let reading = self.availability(agent).await?;
        let markers = &self.cfg.markers;
        let current = markers.classify(&reading.status);
        if !current.is_tracked() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                target: "vigil::router",
                agent = %agent.id,
                status = %reading.status,
                "status outside markers, skipped"
            );
            return Ok(None);
        }

        let previous = self
            .store
            .last_record(&agent.id)
            .await?
            .map(|r| markers.classify(&r.status));
        if previous.as_ref() == Some(&current) && !self.cfg.always_report {
            return Ok(None);
        }

        let record = StatusRecord::new(reading.status, Utc::now());
        let len = self.store.append(&agent.id, record.clone()).await?;

        let reported = match self.report_change(agent, &record).await {
            Ok(()) => true,
            Err(e) => {
                #[cfg(feature = "tracing")]
                crate::router::util::log_agent_failure(&agent.id, &e, "report not delivered");
                warnings.push(e);
                false
            }
        };

        if len >= self.cfg.stack_size {
            match self.store.rotate(&agent.id, self.cfg.keep_history).await {
                Ok(_moved) => {
                    #[cfg(feature = "tracing")]
                    tracing::debug!(
                        target: "vigil::router",
                        agent = %agent.id,
                        moved = _moved,
                        keep_history = self.cfg.keep_history,
                        "window rotated"
                    );
                }
                Err(e) => warnings.push(e),
            }
        }

        Ok(Some(StatusChange {
            agent: agent.clone(),
            previous,
            current,
            at: record.at,
            reported,
        }))
    }

    async fn report_change(&self, agent: &Agent, record: &StatusRecord) -> Result<(), VigilError> {
        let message = match self.cfg.report_mode {
            ReportMode::Change => render_change(agent, record, &self.cfg.report),
            // Ledger and any future modes send the full window.
            _ => self.report_for(agent).await?,
        };
        self.deliver(&message).await
    }

    /// Hand one message to the configured sender.
    pub(crate) async fn deliver(&self, message: &Message) -> Result<(), VigilError> {
        let sender = self
            .sender
            .as_ref()
            .ok_or_else(|| VigilError::unsupported(Capability::Report.as_str()))?;
        sender.send(message).await.map_err(|e| match e {
            e @ VigilError::Delivery { .. } => e,
            other => VigilError::delivery(sender.name(), other.to_string()),
        })
    }
}
