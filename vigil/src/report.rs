//! Plaintext and HTML rendering of availability reports.
//!
//! Records are listed newest first. Timestamps are stored in UTC and only
//! shifted into the configured display offset here.

use std::fmt::Write as _;

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use vigil_core::{Agent, Message, ReportConfig, StatusRecord};

/// Layout used for every rendered timestamp.
pub const DISPLAY_DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a timestamp in the configured fixed offset.
///
/// Offsets outside ±24h fall back to UTC.
#[must_use]
pub fn format_datetime(at: DateTime<Utc>, cfg: &ReportConfig) -> String {
    match FixedOffset::east_opt(cfg.display_offset_minutes.saturating_mul(60)) {
        Some(offset) => at.with_timezone(&offset).format(DISPLAY_DT_FORMAT).to_string(),
        None => at.format(DISPLAY_DT_FORMAT).to_string(),
    }
}

/// Render a duration as `H:MM:SS`, prefixed by `N day(s), ` when at least a
/// day long. Sub-second components are truncated; negative input renders as zero.
#[must_use]
pub fn format_duration(d: TimeDelta) -> String {
    let secs = d.num_seconds().max(0);
    let days = secs / 86_400;
    let rem = secs % 86_400;
    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

/// Minimal HTML escaping for text nodes.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// Subject line of a ledger report.
#[must_use]
pub fn subject(agent: &Agent, cfg: &ReportConfig) -> String {
    format!(
        "{} {} {} STATUS REPORT",
        cfg.subject_prefix, agent.name, cfg.service
    )
}

/// Plaintext body: one line per record, newest first, then the total.
#[must_use]
pub fn render_plaintext(
    agent: &Agent,
    records: &[StatusRecord],
    total: TimeDelta,
    cfg: &ReportConfig,
) -> String {
    let mut lines: Vec<String> = records
        .iter()
        .rev()
        .map(|r| {
            format!(
                "Id: {}, Name: {} {} {} {}",
                agent.id,
                agent.name,
                cfg.service,
                r.status.to_uppercase(),
                format_datetime(r.at, cfg)
            )
        })
        .collect();
    lines.push(format!("Total available: {}", format_duration(total)));
    lines.join("\n")
}

/// HTML body: a table of records, newest first, then the total.
#[must_use]
pub fn render_html(
    agent: &Agent,
    records: &[StatusRecord],
    total: TimeDelta,
    cfg: &ReportConfig,
) -> String {
    let id = escape_html(agent.id.as_str());
    let name = escape_html(&agent.name);
    let service = escape_html(&cfg.service);

    let mut html = String::from(
        "<!DOCTYPE html>\n<html>\n<body>\n<table border=\"1\">\n<thead>\n<tr>\
         <th>ID</th><th>NAME</th><th>SERVICE</th><th>STATUS</th><th>DATETIME</th>\
         </tr>\n</thead>\n<tbody>\n",
    );
    for r in records.iter().rev() {
        let _ = writeln!(
            html,
            "<tr><td>{id}</td><td>{name}</td><td>{service}</td><td><strong>{}</strong></td><td>{}</td></tr>",
            escape_html(&r.status.to_uppercase()),
            format_datetime(r.at, cfg)
        );
    }
    let _ = write!(
        html,
        "</tbody>\n</table>\n<p>Total available: {}</p>\n</body>\n</html>\n",
        format_duration(total)
    );
    html
}

/// Full ledger report for one agent's current window.
#[must_use]
pub fn render_ledger(
    agent: &Agent,
    records: &[StatusRecord],
    total: TimeDelta,
    cfg: &ReportConfig,
) -> Message {
    Message::plain(
        subject(agent, cfg),
        render_plaintext(agent, records, total, cfg),
    )
    .with_html(render_html(agent, records, total, cfg))
}

/// One-line notification about a single status change.
#[must_use]
pub fn render_change(agent: &Agent, record: &StatusRecord, cfg: &ReportConfig) -> Message {
    let line = format!(
        "{} status changed to: {} at {}",
        agent.name,
        record.status,
        format_datetime(record.at, cfg)
    );
    Message::plain(line.clone(), line)
}
