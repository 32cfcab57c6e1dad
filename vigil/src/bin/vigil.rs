use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vigil::report::format_duration;
use vigil::{PollReport, Settings, Vigil, VigilError};

#[derive(Parser, Debug)]
#[command(name = "vigil")]
#[command(version)]
#[command(about = "Watch helpdesk agent presence and report available time", long_about = None)]
struct Cli {
    /// Settings file
    #[arg(long, short, value_name = "PATH", env = "VIGIL_CONFIG", default_value = "vigil.json")]
    config: PathBuf,

    /// Verbose logging to stderr
    #[arg(long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll every agent once and record status changes
    Poll,
    /// Poll on a fixed schedule until interrupted
    Watch {
        /// Seconds between polls (defaults to poll_interval_secs from the settings file)
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
    /// Send the current ledger report for every agent and clear their windows
    Dispatch,
    /// List agents known to the presence API
    Agents,
    /// Print each agent's stored total available time
    Total,
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Flattened warnings worth showing. Non-actionable ones (an agent unknown
/// upstream, a capability nobody offers) only show with `--debug`.
fn visible_warnings(warnings: &[VigilError], verbose: bool) -> Vec<VigilError> {
    warnings
        .iter()
        .cloned()
        .flat_map(VigilError::flatten)
        .filter(|w| verbose || w.is_actionable())
        .collect()
}

fn print_warnings(warnings: &[VigilError], verbose: bool) {
    for w in visible_warnings(warnings, verbose) {
        eprintln!("warning: {w}");
    }
}

fn print_poll(report: &PollReport, verbose: bool) {
    for c in &report.changes {
        let previous = c
            .previous
            .as_ref()
            .map_or_else(|| "-".to_string(), ToString::to_string);
        println!(
            "{} {}: {} -> {}{}",
            c.agent.id,
            c.agent.name,
            previous,
            c.current,
            if c.reported { "" } else { " (not reported)" }
        );
    }
    print_warnings(&report.warnings, verbose);
}

async fn watch(vigil: &Vigil, every: Duration, verbose: bool) -> Result<()> {
    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    tracing::info!(interval_secs = every.as_secs(), "watching");
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match vigil.poll().await {
                    Ok(report) => print_poll(&report, verbose),
                    Err(e) => tracing::warn!(error = %e, "poll pass failed"),
                }
            }
            res = tokio::signal::ctrl_c() => {
                res.context("listening for ctrl-c")?;
                tracing::info!("interrupted, stopping");
                return Ok(());
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let settings = Settings::load(&cli.config)
        .with_context(|| format!("loading settings from {}", cli.config.display()))?;
    let vigil = settings
        .builder()
        .await?
        .build()
        .context("building orchestrator")?;

    match cli.command {
        Command::Poll => print_poll(&vigil.poll().await?, cli.debug),
        Command::Watch { interval } => {
            let every = interval.map_or_else(|| settings.poll_interval(), Duration::from_secs);
            watch(&vigil, every, cli.debug).await?;
        }
        Command::Dispatch => {
            let report = vigil.dispatch().await?;
            for id in &report.sent {
                println!("sent {id}");
            }
            print_warnings(&report.warnings, cli.debug);
        }
        Command::Agents => {
            for agent in vigil.roster().await? {
                println!("{} {}", agent.id, agent.name);
            }
        }
        Command::Total => {
            let report = vigil.totals().await;
            for t in &report.totals {
                println!(
                    "{} {}: {} ({} records)",
                    t.agent.id,
                    t.agent.name,
                    format_duration(t.available()),
                    t.records
                );
            }
            print_warnings(&report.warnings, cli.debug);
        }
    }
    Ok(())
}
