//! Persisted status records and per-agent ledgers.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::VigilError;

/// One persisted status change.
///
/// Serialized as `{"status": ..., "dt": ...}`. `dt` is written as RFC 3339 and
/// read back from either RFC 3339 or the legacy naive `%Y-%m-%d %H:%M:%S`
/// layout. Plain serde takes naive values as UTC; stores that know the offset
/// the legacy values were written in go through [`parse_record_dt`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Raw status as reported upstream.
    pub status: String,
    /// When the change was recorded.
    #[serde(rename = "dt", with = "dt_format")]
    pub at: DateTime<Utc>,
}

impl StatusRecord {
    /// Construct a record.
    pub fn new(status: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            status: status.into(),
            at,
        }
    }
}

/// Store entry for one agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentLedger {
    /// Records in the current reporting window, oldest first.
    pub stack: Vec<StatusRecord>,
    /// Archived records from earlier windows, oldest first.
    pub history: Vec<StatusRecord>,
}

impl AgentLedger {
    /// Most recent record in the current window.
    #[must_use]
    pub fn last(&self) -> Option<&StatusRecord> {
        self.stack.last()
    }
}

/// Legacy layout written by older deployments.
pub const LEGACY_DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a stored `dt` value.
///
/// RFC 3339 values carry their own offset. Legacy naive values were written in
/// the host's local time and are read in `legacy_offset`.
///
/// # Errors
/// Returns `VigilError::Data` if `raw` matches neither layout.
pub fn parse_record_dt(raw: &str, legacy_offset: FixedOffset) -> Result<DateTime<Utc>, VigilError> {
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Ok(at.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, LEGACY_DT_FORMAT)
        .map_err(|e| VigilError::Data(format!("unparseable timestamp '{raw}': {e}")))?;
    legacy_offset
        .from_local_datetime(&naive)
        .single()
        .map(|at| at.with_timezone(&Utc))
        .ok_or_else(|| VigilError::Data(format!("timestamp '{raw}' has no single instant")))
}

mod dt_format {
    use chrono::{DateTime, Offset, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&at.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_record_dt(&raw, Utc.fix()).map_err(D::Error::custom)
    }
}
