use anyhow::Result;
use clap::Args;
use needinfo_core::config::{EffectiveConfig, resolve_config};
use std::io::Write;
use std::path::Path;

use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `ni config`.
#[derive(Args, Debug, Default)]
pub struct ConfigArgs {
    /// Print the raw project config as TOML.
    #[arg(long)]
    raw: bool,
}

pub fn run_config(args: &ConfigArgs, project_root: &Path, output: OutputMode) -> Result<()> {
    let effective = resolve_config(project_root, output.as_str())?;

    if args.raw && !output.is_json() {
        let rendered = toml::to_string_pretty(&effective.project)?;
        print!("{rendered}");
        return Ok(());
    }

    let problem = effective.project.settings().err().map(|err| err.to_string());
    render_mode(
        output,
        &effective,
        render_config_text,
        |config, w| render_config_pretty(config, problem.as_deref(), w),
    )
}

fn render_config_text(config: &EffectiveConfig, w: &mut dyn Write) -> std::io::Result<()> {
    let project = &config.project;
    writeln!(w, "thresholds.warn_days={}", project.thresholds.warn_days)?;
    writeln!(w, "thresholds.expire_days={}", project.thresholds.expire_days)?;
    writeln!(w, "labels.needs_info={}", project.labels.needs_info)?;
    writeln!(
        w,
        "automation.identities={}",
        project.automation.identities.join(",")
    )?;
    writeln!(w, "output={}", config.resolved_output)
}

fn render_config_pretty(
    config: &EffectiveConfig,
    problem: Option<&str>,
    w: &mut dyn Write,
) -> std::io::Result<()> {
    let project = &config.project;
    pretty_section(w, "Effective configuration")?;
    pretty_kv(w, "warn after (days)", project.thresholds.warn_days.to_string())?;
    pretty_kv(w, "close after (days)", project.thresholds.expire_days.to_string())?;
    pretty_kv(w, "needs-info label", &project.labels.needs_info)?;
    pretty_kv(w, "automation", project.automation.identities.join(", "))?;
    pretty_kv(w, "output", &config.resolved_output)?;
    if let Some(problem) = problem {
        writeln!(w)?;
        writeln!(w, "⚠ {problem}")?;
    }
    Ok(())
}
