#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use needinfo_core::config::load_user_config;
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "ni: needs-info triage for issue trackers",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format (overrides FORMAT and user config).
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Project root used for `.needinfo/config.toml` discovery.
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, environment, and user config.
    fn output_mode(&self) -> OutputMode {
        let user_output = load_user_config().ok().and_then(|config| config.output);
        output::resolve_output_mode(self.format, self.json, user_output.as_deref())
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Triage",
        about = "Evaluate one ticket",
        long_about = "Derive needs-info, template, and escalation facts for a ticket snapshot.",
        after_help = "EXAMPLES:\n    # Evaluate a ticket now\n    ni eval ticket.json\n\n    # Evaluate as of a fixed instant\n    ni eval ticket.json --now 2024-06-01T00:00:00Z\n\n    # Emit machine-readable output\n    ni eval ticket.json --json"
    )]
    Eval(cmd::eval::EvalArgs),

    #[command(
        next_help_heading = "Triage",
        about = "Trace needs-info state changes",
        long_about = "Replay a ticket's event log and list every event that changed the needs-info flag.",
        after_help = "EXAMPLES:\n    # Show state changes\n    ni replay ticket.json\n\n    # Emit machine-readable output\n    ni replay ticket.json --json"
    )]
    Replay(cmd::replay::ReplayArgs),

    #[command(
        next_help_heading = "Project Maintenance",
        about = "Show effective configuration",
        long_about = "Show thresholds, label name, and automation identities after defaults are applied.",
        after_help = "EXAMPLES:\n    # Show resolved configuration\n    ni config\n\n    # Print project config as TOML\n    ni config --raw"
    )]
    Config(cmd::config::ConfigArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("NEEDINFO_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "ni=debug,needinfo_core=debug,info"
        } else {
            "needinfo_core=info,warn"
        })
    });

    let format = env::var("NEEDINFO_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = match cli.root.clone() {
        Some(root) => root,
        None => env::current_dir()?,
    };
    let output = cli.output_mode();

    match cli.command {
        Commands::Eval(ref args) => cmd::eval::run_eval(args, output, &project_root),
        Commands::Replay(ref args) => cmd::replay::run_replay(args, output, &project_root),
        Commands::Config(ref args) => cmd::config::run_config(args, &project_root, output),
    }
}
