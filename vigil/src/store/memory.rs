use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use vigil_core::{AgentId, AgentLedger, EventStore, StatusRecord, VigilError};

/// Process-local store. Contents are lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    ledgers: Mutex<HashMap<AgentId, AgentLedger>>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing ledgers.
    #[must_use]
    pub fn with_ledgers(ledgers: impl IntoIterator<Item = (AgentId, AgentLedger)>) -> Self {
        Self {
            ledgers: Mutex::new(ledgers.into_iter().collect()),
        }
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn ledger(&self, agent: &AgentId) -> Result<AgentLedger, VigilError> {
        Ok(self
            .ledgers
            .lock()
            .await
            .get(agent)
            .cloned()
            .unwrap_or_default())
    }

    async fn last_record(&self, agent: &AgentId) -> Result<Option<StatusRecord>, VigilError> {
        Ok(self
            .ledgers
            .lock()
            .await
            .get(agent)
            .and_then(|l| l.last().cloned()))
    }

    async fn append(&self, agent: &AgentId, record: StatusRecord) -> Result<usize, VigilError> {
        let mut guard = self.ledgers.lock().await;
        let ledger = guard.entry(agent.clone()).or_default();
        ledger.stack.push(record);
        Ok(ledger.stack.len())
    }

    async fn rotate(&self, agent: &AgentId, keep_history: bool) -> Result<usize, VigilError> {
        let mut guard = self.ledgers.lock().await;
        let Some(ledger) = guard.get_mut(agent) else {
            return Ok(0);
        };
        Ok(rotate_ledger(ledger, keep_history))
    }
}

/// Close the current window of `ledger`, returning how many records left it.
pub(crate) fn rotate_ledger(ledger: &mut AgentLedger, keep_history: bool) -> usize {
    let window = std::mem::take(&mut ledger.stack);
    let n = window.len();
    if keep_history {
        ledger.history.extend(window);
    }
    n
}
