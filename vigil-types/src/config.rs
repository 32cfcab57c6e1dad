//! Configuration types shared across the orchestrator and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::status::StatusMarkers;

/// What gets sent when a status change is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ReportMode {
    /// Send the full ledger report (current window plus total available time).
    #[default]
    Ledger,
    /// Send a one-line notification about the single change.
    Change,
}

/// Presentation settings for rendered reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Leading subject token, e.g. "ZD".
    pub subject_prefix: String,
    /// Service label shown in subjects and rows, e.g. "TALK".
    pub service: String,
    /// Fixed UTC offset, in minutes, used when rendering timestamps.
    pub display_offset_minutes: i32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            subject_prefix: "ZD".to_string(),
            service: "TALK".to_string(),
            display_offset_minutes: 0,
        }
    }
}

/// Global configuration for the `Vigil` orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VigilConfig {
    /// Raw status values that mean available / not available.
    pub markers: StatusMarkers,
    /// Number of records in a reporting window before the stack is rotated.
    pub stack_size: usize,
    /// Archive rotated stacks into the ledger history instead of dropping them.
    pub keep_history: bool,
    /// Record and report on every poll even when the status did not change.
    pub always_report: bool,
    /// What to send when a change is recorded.
    pub report_mode: ReportMode,
    /// Rendering settings.
    pub report: ReportConfig,
    /// Timeout for individual provider requests.
    pub provider_timeout: Duration,
    /// Optional overall deadline for a poll or dispatch pass.
    pub request_timeout: Option<Duration>,
}

impl Default for VigilConfig {
    fn default() -> Self {
        Self {
            markers: StatusMarkers::default(),
            stack_size: 12,
            keep_history: false,
            always_report: false,
            report_mode: ReportMode::default(),
            report: ReportConfig::default(),
            provider_timeout: Duration::from_secs(5),
            request_timeout: None,
        }
    }
}
