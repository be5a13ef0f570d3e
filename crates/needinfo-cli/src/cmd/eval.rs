//! `ni eval`: derive needs-info and escalation facts for one ticket.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::bail;
use chrono::{DateTime, Utc};
use clap::Args;
use needinfo_core::error::ErrorCode;
use needinfo_core::{TriageFacts, evaluate};

use crate::cmd::{load_settings, load_snapshot};
use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

/// Arguments for `ni eval`.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Path to the ticket snapshot (JSON).
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Evaluate as of this instant (RFC 3339) instead of the current time.
    #[arg(long, value_name = "RFC3339")]
    pub now: Option<String>,
}

/// Execute `ni eval`.
pub fn run_eval(args: &EvalArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let now = match parse_now(args.now.as_deref()) {
        Ok(now) => now,
        Err(err) => {
            render_error(
                output,
                &CliError::with_code(ErrorCode::InvalidTimestamp, err.to_string()),
            )?;
            bail!("invalid --now value");
        }
    };

    let settings = load_settings(project_root, output)?;
    let snapshot = load_snapshot(&args.snapshot, output)?;
    let facts = evaluate(&snapshot, &settings, now);

    render_mode(output, &facts, render_eval_text, render_eval_pretty)
}

fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>, chrono::ParseError> {
    raw.map_or_else(
        || Ok(Utc::now()),
        |value| DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc)),
    )
}

fn render_eval_text(facts: &TriageFacts, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "is_needs_info={}", facts.needs_info.is_needs_info)?;
    writeln!(w, "template_missing={}", facts.needs_info.template_missing)?;
    writeln!(
        w,
        "template_missing_sections={}",
        facts.needs_info.template_missing_sections.join(",")
    )?;
    writeln!(
        w,
        "template_warning_required={}",
        facts.needs_info.template_warning_required
    )?;
    writeln!(w, "needs_info_action={}", facts.escalation.needs_info_action)
}

fn render_eval_pretty(facts: &TriageFacts, w: &mut dyn Write) -> std::io::Result<()> {
    let yes_no = |flag: bool| if flag { "yes" } else { "no" };
    let sections = &facts.needs_info.template_missing_sections;

    pretty_section(w, "Needs info")?;
    pretty_kv(w, "needs info", yes_no(facts.needs_info.is_needs_info))?;
    pretty_kv(w, "template missing", yes_no(facts.needs_info.template_missing))?;
    pretty_kv(
        w,
        "missing sections",
        if sections.is_empty() {
            "(none)".to_string()
        } else {
            sections.join(", ")
        },
    )?;
    pretty_kv(
        w,
        "missing-data warning due",
        yes_no(facts.needs_info.template_warning_required),
    )?;
    writeln!(w)?;
    pretty_section(w, "Escalation")?;
    pretty_kv(w, "action", facts.escalation.needs_info_action.to_string())
}
