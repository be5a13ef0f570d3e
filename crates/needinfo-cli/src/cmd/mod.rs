pub mod config;
pub mod eval;
pub mod replay;

use std::path::Path;

use anyhow::bail;
use needinfo_core::config::{TriageSettings, load_project_config};
use needinfo_core::error::ErrorCode;
use needinfo_core::snapshot::TicketSnapshot;

use crate::output::{CliError, OutputMode, render_error};

/// Load and validate project settings, rendering a coded error on failure.
pub fn load_settings(project_root: &Path, output: OutputMode) -> anyhow::Result<TriageSettings> {
    let config = match load_project_config(project_root) {
        Ok(config) => config,
        Err(err) => {
            render_error(
                output,
                &CliError::with_code(ErrorCode::ConfigParseError, format!("{err:#}")),
            )?;
            bail!("config parse failed");
        }
    };

    match config.settings() {
        Ok(settings) => Ok(settings),
        Err(err) => {
            render_error(output, &CliError::with_code(ErrorCode::from(&err), err.to_string()))?;
            bail!("invalid config: {err}");
        }
    }
}

/// Load a ticket snapshot, rendering a coded error on failure.
pub fn load_snapshot(path: &Path, output: OutputMode) -> anyhow::Result<TicketSnapshot> {
    match TicketSnapshot::load(path) {
        Ok(snapshot) => Ok(snapshot),
        Err(err) => {
            render_error(output, &CliError::with_code(ErrorCode::from(&err), err.to_string()))?;
            bail!("could not load snapshot {}", path.display());
        }
    }
}
