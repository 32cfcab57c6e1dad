use async_trait::async_trait;

use crate::{AgentId, AgentLedger, StatusRecord, VigilError};

/// Persistent per-agent ledger of status changes.
///
/// Implementations must be safe to share across concurrent poll tasks; each
/// method is atomic with respect to the others.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Full ledger for an agent. Unknown agents yield an empty ledger.
    async fn ledger(&self, agent: &AgentId) -> Result<AgentLedger, VigilError>;

    /// Most recent record in the agent's current window.
    async fn last_record(&self, agent: &AgentId) -> Result<Option<StatusRecord>, VigilError> {
        Ok(self.ledger(agent).await?.stack.pop())
    }

    /// Append a record to the agent's current window and return the new window length.
    async fn append(&self, agent: &AgentId, record: StatusRecord) -> Result<usize, VigilError>;

    /// Close the current window: move it into history when `keep_history`,
    /// otherwise drop it. Returns the number of records moved or dropped.
    async fn rotate(&self, agent: &AgentId, keep_history: bool) -> Result<usize, VigilError>;

    /// Drop the current window without archiving it.
    async fn clear_stack(&self, agent: &AgentId) -> Result<(), VigilError> {
        self.rotate(agent, false).await.map(|_| ())
    }
}
