use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;
use tokio::sync::Mutex;
use vigil_core::{AgentId, AgentLedger, EventStore, StatusRecord, VigilError, parse_record_dt};

use super::memory::rotate_ledger;

type Document = BTreeMap<String, AgentLedger>;

// On-disk shape before timestamps are resolved.
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawLedger {
    stack: Vec<RawRecord>,
    history: Vec<RawRecord>,
}

#[derive(Deserialize)]
struct RawRecord {
    status: String,
    dt: String,
}

impl RawLedger {
    fn resolve(self, legacy_offset: FixedOffset) -> Result<AgentLedger, VigilError> {
        let resolve_all = |records: Vec<RawRecord>| {
            records
                .into_iter()
                .map(|r| Ok(StatusRecord::new(r.status, parse_record_dt(&r.dt, legacy_offset)?)))
                .collect::<Result<Vec<_>, VigilError>>()
        };
        Ok(AgentLedger {
            stack: resolve_all(self.stack)?,
            history: resolve_all(self.history)?,
        })
    }
}

/// Store backed by one pretty-printed JSON document keyed by agent id.
///
/// The file is re-read before every operation so that edits made by another
/// process between polls are picked up, and rewritten after every mutation.
/// Writes go to a sibling temp file first and are renamed into place.
///
/// Records are always written as RFC 3339 UTC. Legacy naive timestamps are
/// read in the store's legacy offset, so the first rewrite migrates them.
pub struct JsonFileStore {
    path: PathBuf,
    legacy_offset: FixedOffset,
    io: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store at `path`, creating an empty document when missing.
    ///
    /// # Errors
    /// Returns `VigilError::Storage` if the file cannot be created or if an
    /// existing file is not a valid store document.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, VigilError> {
        Self::open_with_legacy_offset(path, Utc.fix()).await
    }

    /// Like [`open`](Self::open), reading legacy naive timestamps as local
    /// times in `legacy_offset`.
    ///
    /// # Errors
    /// Same as [`open`](Self::open).
    pub async fn open_with_legacy_offset(
        path: impl Into<PathBuf>,
        legacy_offset: FixedOffset,
    ) -> Result<Self, VigilError> {
        let store = Self {
            path: path.into(),
            legacy_offset,
            io: Mutex::new(()),
        };
        match tokio::fs::metadata(&store.path).await {
            Ok(_) => {
                store.load().await?;
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                store.save(&Document::new()).await?;
            }
            Err(e) => return Err(storage_err(&store.path, &e)),
        }
        Ok(store)
    }

    /// Offset legacy naive timestamps are read in.
    #[must_use]
    pub const fn legacy_offset(&self) -> FixedOffset {
        self.legacy_offset
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Document, VigilError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => return Err(storage_err(&self.path, &e)),
        };
        if raw.trim().is_empty() {
            return Ok(Document::new());
        }
        let raw: BTreeMap<String, RawLedger> =
            serde_json::from_str(&raw).map_err(|e| storage_err(&self.path, &e))?;
        raw.into_iter()
            .map(|(id, ledger)| Ok((id, ledger.resolve(self.legacy_offset)?)))
            .collect::<Result<Document, VigilError>>()
            .map_err(|e| storage_err(&self.path, &e))
    }

    async fn save(&self, doc: &Document) -> Result<(), VigilError> {
        let body = serde_json::to_string_pretty(doc).map_err(|e| storage_err(&self.path, &e))?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| storage_err(&self.path, &e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| storage_err(&self.path, &e))
    }
}

fn storage_err(path: &Path, e: &dyn std::fmt::Display) -> VigilError {
    VigilError::Storage(format!("{}: {e}", path.display()))
}

#[async_trait]
impl EventStore for JsonFileStore {
    async fn ledger(&self, agent: &AgentId) -> Result<AgentLedger, VigilError> {
        let _guard = self.io.lock().await;
        Ok(self
            .load()
            .await?
            .remove(agent.as_str())
            .unwrap_or_default())
    }

    async fn append(&self, agent: &AgentId, record: StatusRecord) -> Result<usize, VigilError> {
        let _guard = self.io.lock().await;
        let mut doc = self.load().await?;
        let ledger = doc.entry(agent.to_string()).or_default();
        ledger.stack.push(record);
        let len = ledger.stack.len();
        self.save(&doc).await?;
        Ok(len)
    }

    async fn rotate(&self, agent: &AgentId, keep_history: bool) -> Result<usize, VigilError> {
        let _guard = self.io.lock().await;
        let mut doc = self.load().await?;
        let Some(ledger) = doc.get_mut(agent.as_str()) else {
            return Ok(0);
        };
        let n = rotate_ledger(ledger, keep_history);
        self.save(&doc).await?;
        Ok(n)
    }
}
