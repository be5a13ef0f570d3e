#![forbid(unsafe_code)]
//! needinfo-core library.
//!
//! Derives the needs-info state of a tracker ticket from its event log,
//! checks the submitted template for missing sections, and decides whether
//! the warn-then-close escalation should fire on this pass.
//!
//! # Conventions
//!
//! - **Errors**: Use `anyhow::Result` for file loading; typed `thiserror`
//!   errors for everything callers match on. The three derivation stages
//!   never fail.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod config;
pub mod error;
pub mod escalation;
pub mod facts;
pub mod history;
pub mod model;
pub mod replay;
pub mod snapshot;
pub mod template;
pub mod triage;

pub use escalation::{EscalationInput, Thresholds, escalate};
pub use facts::{EscalationFacts, NeedsInfoAction, NeedsInfoFacts, TriageFacts};
pub use replay::replay_needs_info;
pub use template::check_template;
pub use triage::evaluate;
