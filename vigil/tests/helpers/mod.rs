// Shared fixtures for router tests.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use vigil::{
    Agent, AgentId, AgentLedger, EventStore, MemoryStore, StatusRecord, Vigil, VigilBuilder,
};
use vigil_mock::{DynamicMockConnector, DynamicMockController, RecordingSender};

pub const MISTY: &str = "1001";
pub const JORDAN: &str = "1002";

pub fn misty() -> Agent {
    Agent::new(MISTY, "Misty Kennedy")
}

pub fn jordan() -> Agent {
    Agent::new(JORDAN, "Jordan Blake")
}

/// Construct a UTC `DateTime` on 2024-03-04 for readability in tests.
pub fn at(hh: u32, mm: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 4, hh, mm, 0).unwrap()
}

pub fn rec(status: &str, hh: u32, mm: u32) -> StatusRecord {
    StatusRecord::new(status, at(hh, mm))
}

pub fn ledger(records: Vec<StatusRecord>) -> AgentLedger {
    AgentLedger {
        stack: records,
        history: vec![],
    }
}

/// A wired orchestrator plus handles to everything it talks to.
pub struct Rig {
    pub vigil: Vigil,
    pub ctl: DynamicMockController,
    pub sender: Arc<RecordingSender>,
    pub store: Arc<MemoryStore>,
}

impl Rig {
    pub async fn stack(&self, agent: &str) -> Vec<StatusRecord> {
        self.ledger(agent).await.stack
    }

    pub async fn ledger(&self, agent: &str) -> AgentLedger {
        self.store.ledger(&AgentId::from(agent)).await.unwrap()
    }
}

/// One dynamic connector, a recording sender and an in-memory store.
pub fn rig(agents: &[Agent], tweak: impl FnOnce(VigilBuilder) -> VigilBuilder) -> Rig {
    rig_with_store(agents, MemoryStore::new(), tweak)
}

pub fn rig_with_store(
    agents: &[Agent],
    store: MemoryStore,
    tweak: impl FnOnce(VigilBuilder) -> VigilBuilder,
) -> Rig {
    let (conn, ctl) = DynamicMockConnector::new_with_controller("dyn");
    let sender = Arc::new(RecordingSender::new());
    let store = Arc::new(store);
    let builder = Vigil::builder()
        .with_connector(conn)
        .sender(sender.clone())
        .store(store.clone())
        .agents(agents.iter().cloned());
    let vigil = tweak(builder).build().unwrap();
    Rig {
        vigil,
        ctl,
        sender,
        store,
    }
}
