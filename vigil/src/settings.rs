//! File-based settings for the `vigil` binary.
//!
//! A single JSON document describes the Zendesk account, the Mailgun sender,
//! the watched agents and orchestrator tuning:
//!
//! ```json
//! {
//!   "zendesk": { "subdomain": "acme", "email": "ops@acme.test", "password": "..." },
//!   "mailgun": { "api_key": "...", "domain": "mg.acme.test", "from": "vigil@acme.test", "to": ["lead@acme.test"] },
//!   "agents": [ { "id": 1001, "name": "Misty Kennedy" } ],
//!   "store_path": "storage.json",
//!   "legacy_offset_minutes": 120,
//!   "vigil": { "stack_size": 12, "provider_timeout_secs": 5 }
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use vigil_core::{
    Agent, AgentId, ReportConfig, ReportMode, StatusMarkers, VigilConfig, VigilError,
};
use vigil_mailgun::{MailgunSender, MailgunSettings};
use vigil_zendesk::ZendeskConnector;

use crate::VigilBuilder;
use crate::store::JsonFileStore;

/// Zendesk account section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZendeskSection {
    /// Account subdomain.
    #[serde(default)]
    pub subdomain: String,
    /// Login email.
    pub email: String,
    /// Password or API token.
    pub password: String,
    /// API base override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Mailgun sender section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailgunSection {
    /// Private API key.
    pub api_key: String,
    /// Sending domain.
    pub domain: String,
    /// `From` address.
    pub from: String,
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    #[serde(default)]
    pub cc: Vec<String>,
    /// API root override.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

/// One watched agent. Ids may be written as numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentEntry {
    /// Upstream id.
    pub id: RawId,
    /// Display name.
    pub name: String,
}

/// Agent id as written in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    /// Numeric id, as Zendesk issues them.
    Number(u64),
    /// Any other textual id.
    Text(String),
}

impl From<&RawId> for AgentId {
    fn from(raw: &RawId) -> Self {
        match raw {
            RawId::Number(n) => Self::from(*n),
            RawId::Text(s) => Self::from(s.as_str()),
        }
    }
}

/// Optional orchestrator tuning. Unset fields keep the library defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VigilSection {
    /// Status markers.
    pub markers: Option<StatusMarkers>,
    /// Records per window.
    pub stack_size: Option<usize>,
    /// Archive rotated windows.
    pub keep_history: Option<bool>,
    /// Report every reading.
    pub always_report: Option<bool>,
    /// Ledger or single-change reports.
    pub report_mode: Option<ReportMode>,
    /// Rendering settings.
    pub report: Option<ReportConfig>,
    /// Per-provider timeout in seconds.
    pub provider_timeout_secs: Option<u64>,
    /// Pass-level deadline in seconds.
    pub request_timeout_secs: Option<u64>,
}

/// Top-level settings document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Presence provider account.
    pub zendesk: ZendeskSection,
    /// Report delivery. Without it, polls record changes but send nothing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mailgun: Option<MailgunSection>,
    /// Watched agents.
    #[serde(default)]
    pub agents: Vec<AgentEntry>,
    /// JSON store location.
    #[serde(default = "default_store_path")]
    pub store_path: PathBuf,
    /// Offset, in minutes east of UTC, that naive timestamps in an older store
    /// file were written in. Defaults to the report display offset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legacy_offset_minutes: Option<i32>,
    /// Seconds between polls in `watch` mode.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    /// Orchestrator tuning.
    #[serde(default)]
    pub vigil: VigilSection,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("storage.json")
}

const fn default_poll_interval() -> u64 {
    60
}

impl Settings {
    /// Read and parse a settings file.
    ///
    /// # Errors
    /// Returns `VigilError::Config` when the file is missing, unreadable or malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, VigilError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| VigilError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw).map_err(|e| match e {
            VigilError::Config(msg) => VigilError::Config(format!("{}: {msg}", path.display())),
            other => other,
        })
    }

    /// Parse settings from a JSON string.
    ///
    /// # Errors
    /// Returns `VigilError::Config` on malformed JSON or invalid values.
    pub fn from_json(raw: &str) -> Result<Self, VigilError> {
        let settings: Self =
            serde_json::from_str(raw).map_err(|e| VigilError::Config(e.to_string()))?;
        if settings.poll_interval_secs == 0 {
            return Err(VigilError::Config(
                "poll_interval_secs must be at least 1".into(),
            ));
        }
        if settings.vigil.provider_timeout_secs == Some(0) {
            return Err(VigilError::Config(
                "vigil.provider_timeout_secs must be at least 1".into(),
            ));
        }
        if settings.vigil.request_timeout_secs == Some(0) {
            return Err(VigilError::Config(
                "vigil.request_timeout_secs must be at least 1".into(),
            ));
        }
        settings.legacy_offset()?;
        Ok(settings)
    }

    /// Offset legacy naive store timestamps are read in.
    ///
    /// # Errors
    /// Returns `VigilError::Config` when the offset is a day or more from UTC.
    pub fn legacy_offset(&self) -> Result<FixedOffset, VigilError> {
        let minutes = self.legacy_offset_minutes.unwrap_or_else(|| {
            self.vigil
                .report
                .as_ref()
                .map_or(0, |r| r.display_offset_minutes)
        });
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                VigilError::Config(format!("legacy offset of {minutes} minutes is out of range"))
            })
    }

    /// Watched agents in file order.
    #[must_use]
    pub fn agents(&self) -> Vec<Agent> {
        self.agents
            .iter()
            .map(|a| Agent::new(AgentId::from(&a.id), a.name.clone()))
            .collect()
    }

    /// Library configuration with file overrides applied.
    #[must_use]
    pub fn vigil_config(&self) -> VigilConfig {
        let v = &self.vigil;
        let mut cfg = VigilConfig::default();
        if let Some(m) = &v.markers {
            cfg.markers = m.clone();
        }
        if let Some(n) = v.stack_size {
            cfg.stack_size = n;
        }
        if let Some(yes) = v.keep_history {
            cfg.keep_history = yes;
        }
        if let Some(yes) = v.always_report {
            cfg.always_report = yes;
        }
        if let Some(mode) = v.report_mode {
            cfg.report_mode = mode;
        }
        if let Some(r) = &v.report {
            cfg.report = r.clone();
        }
        if let Some(secs) = v.provider_timeout_secs {
            cfg.provider_timeout = Duration::from_secs(secs);
        }
        cfg.request_timeout = v.request_timeout_secs.map(Duration::from_secs);
        cfg
    }

    /// Poll interval for `watch` mode.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Build the Zendesk connector.
    ///
    /// # Errors
    /// Returns `VigilError::Config` for incomplete credentials.
    pub fn zendesk_connector(&self) -> Result<ZendeskConnector, VigilError> {
        let z = &self.zendesk;
        let mut b = ZendeskConnector::builder()
            .subdomain(z.subdomain.clone())
            .email(z.email.clone())
            .password(z.password.clone());
        if let Some(url) = &z.base_url {
            b = b.base_url(url.clone());
        }
        b.build()
    }

    /// Build the Mailgun sender, if configured.
    ///
    /// # Errors
    /// Returns `VigilError::Config` for incomplete settings.
    pub fn mailgun_sender(&self) -> Result<Option<MailgunSender>, VigilError> {
        let Some(m) = &self.mailgun else {
            return Ok(None);
        };
        let mut settings =
            MailgunSettings::new(&m.api_key, &m.domain, &m.from, m.to.clone());
        settings.cc.clone_from(&m.cc);
        if let Some(base) = &m.api_base {
            settings.api_base.clone_from(base);
        }
        MailgunSender::try_new(&settings).map(Some)
    }

    /// Assemble a builder with the connector, sender, JSON store, agents and
    /// configuration described by this document.
    ///
    /// # Errors
    /// Returns `Config` for invalid sections and `Storage` if the store file
    /// cannot be opened.
    pub async fn builder(&self) -> Result<VigilBuilder, VigilError> {
        let store =
            JsonFileStore::open_with_legacy_offset(&self.store_path, self.legacy_offset()?)
                .await?;
        let mut b = VigilBuilder::new()
            .with_connector(Arc::new(self.zendesk_connector()?))
            .store(Arc::new(store))
            .agents(self.agents())
            .config(self.vigil_config());
        if let Some(sender) = self.mailgun_sender()? {
            b = b.sender(Arc::new(sender));
        }
        Ok(b)
    }
}
