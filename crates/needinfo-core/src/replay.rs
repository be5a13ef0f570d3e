//! Needs-info state replay over a ticket's event log.
//!
//! The state is a two-state machine (`needs-info` / `clear`) with no
//! terminal state. It is re-derived from scratch on every pass by walking
//! the log once, in order, through [`classify`].
//!
//! # Transition table
//!
//! Checked top to bottom; the first matching row wins.
//!
//! | current | event                                   | result      |
//! |---------|-----------------------------------------|-------------|
//! | set     | comment by submitter                    | clear       |
//! | any     | actor is automation                     | unchanged   |
//! | any     | `labeled` needs-info label              | set         |
//! | any     | `unlabeled` needs-info label            | clear       |
//! | any     | comment containing `!needs_info`        | clear       |
//! | any     | comment containing `needs_info`         | set         |
//! | any     | anything else                           | unchanged   |

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::model::{Event, EventKind};

/// Comment command that sets the flag.
pub const NEEDS_INFO_COMMAND: &str = "needs_info";

/// Comment command that clears the flag. Checked before [`NEEDS_INFO_COMMAND`].
pub const CLEAR_NEEDS_INFO_COMMAND: &str = "!needs_info";

/// Who may toggle the flag and which label represents it.
#[derive(Debug, Clone, Copy)]
pub struct ReplayContext<'a> {
    /// Ticket author.
    pub submitter: &'a str,
    /// Bot identities whose events never toggle the flag.
    pub automation: &'a HashSet<String>,
    /// Name of the needs-info label.
    pub label: &'a str,
}

/// Why an event did or did not move the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// Submitter commented while the flag was set.
    SubmitterReplied,
    /// Actor is a known automation identity.
    Automation,
    Labeled,
    Unlabeled,
    ClearCommand,
    SetCommand,
    /// Event kind or content has no bearing on the flag.
    Ignored,
}

impl Transition {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SubmitterReplied => "submitter_replied",
            Self::Automation => "automation",
            Self::Labeled => "labeled",
            Self::Unlabeled => "unlabeled",
            Self::ClearCommand => "clear_command",
            Self::SetCommand => "set_command",
            Self::Ignored => "ignored",
        }
    }

    /// State after applying this transition to `state`.
    #[must_use]
    pub const fn apply(self, state: bool) -> bool {
        match self {
            Self::Labeled | Self::SetCommand => true,
            Self::SubmitterReplied | Self::Unlabeled | Self::ClearCommand => false,
            Self::Automation | Self::Ignored => state,
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Classify `event` against the current `state`.
#[must_use]
pub fn classify(state: bool, event: &Event, ctx: &ReplayContext<'_>) -> Transition {
    if state && event.kind == EventKind::Commented && event.actor == ctx.submitter {
        return Transition::SubmitterReplied;
    }

    if ctx.automation.contains(&event.actor) {
        return Transition::Automation;
    }

    match event.kind {
        EventKind::Labeled if event.label.as_deref() == Some(ctx.label) => Transition::Labeled,
        EventKind::Unlabeled if event.label.as_deref() == Some(ctx.label) => {
            Transition::Unlabeled
        }
        EventKind::Commented => {
            let body = event.body_text();
            if body.contains(CLEAR_NEEDS_INFO_COMMAND) {
                Transition::ClearCommand
            } else if body.contains(NEEDS_INFO_COMMAND) {
                Transition::SetCommand
            } else {
                Transition::Ignored
            }
        }
        _ => Transition::Ignored,
    }
}

/// Replay `events` (already in chronological order) and return whether the
/// ticket is currently waiting on its submitter.
#[must_use]
pub fn replay_needs_info(events: &[Event], ctx: &ReplayContext<'_>) -> bool {
    let mut needs_info = false;
    for event in events {
        needs_info = classify(needs_info, event, ctx).apply(needs_info);
    }
    needs_info
}

/// One state change observed during replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    /// Position of the event in the replayed sequence.
    pub index: usize,
    pub actor: String,
    pub timestamp: DateTime<Utc>,
    pub transition: Transition,
    /// Flag value after the event.
    pub needs_info: bool,
}

/// Replay `events` and record every event that flipped the flag.
#[must_use]
pub fn replay_trace(events: &[Event], ctx: &ReplayContext<'_>) -> Vec<TraceStep> {
    let mut needs_info = false;
    let mut steps = Vec::new();
    for (index, event) in events.iter().enumerate() {
        let transition = classify(needs_info, event, ctx);
        let next = transition.apply(needs_info);
        if next != needs_info {
            steps.push(TraceStep {
                index,
                actor: event.actor.clone(),
                timestamp: event.timestamp,
                transition,
                needs_info: next,
            });
        }
        needs_info = next;
    }
    steps
}
