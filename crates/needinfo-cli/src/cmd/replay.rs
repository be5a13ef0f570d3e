//! `ni replay`: show how the event log drives the needs-info flag.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use needinfo_core::replay::TraceStep;
use needinfo_core::triage::trace;
use serde::Serialize;

use crate::cmd::{load_settings, load_snapshot};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `ni replay`.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Path to the ticket snapshot (JSON).
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,
}

#[derive(Debug, Serialize)]
struct ReplayOutput {
    needs_info: bool,
    events: usize,
    transitions: Vec<TraceStep>,
}

/// Execute `ni replay`.
pub fn run_replay(
    args: &ReplayArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let settings = load_settings(project_root, output)?;
    let snapshot = load_snapshot(&args.snapshot, output)?;
    let (needs_info, transitions) = trace(&snapshot, &settings);

    let payload = ReplayOutput {
        needs_info,
        events: snapshot.events.len(),
        transitions,
    };
    render_mode(output, &payload, render_replay_text, render_replay_pretty)
}

fn render_replay_text(report: &ReplayOutput, w: &mut dyn Write) -> std::io::Result<()> {
    for step in &report.transitions {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}",
            step.index,
            step.timestamp.to_rfc3339(),
            step.actor,
            step.transition,
            step.needs_info
        )?;
    }
    writeln!(w, "needs_info={}", report.needs_info)
}

fn render_replay_pretty(report: &ReplayOutput, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Replay")?;
    pretty_kv(w, "events", report.events.to_string())?;
    pretty_kv(w, "state changes", report.transitions.len().to_string())?;
    pretty_kv(w, "needs info", if report.needs_info { "yes" } else { "no" })?;

    if !report.transitions.is_empty() {
        writeln!(w)?;
        writeln!(
            w,
            "{:>4}  {:<20}  {:<16}  {:<18}  State",
            "#", "When", "Actor", "Transition"
        )?;
        for step in &report.transitions {
            writeln!(
                w,
                "{:>4}  {:<20}  {:<16}  {:<18}  {}",
                step.index,
                step.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                step.actor,
                step.transition,
                if step.needs_info { "needs-info" } else { "clear" }
            )?;
        }
    }
    Ok(())
}
