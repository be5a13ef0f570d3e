//! Chronological view over a ticket's activity log.
//!
//! [`TicketHistory`] owns the events in occurrence order and answers the
//! timestamp questions the escalation stage needs: when a label was last
//! applied or removed, and which canned comments the bot already posted.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::model::{BoilerplateComment, BoilerplateLog, Event, EventKind, parse_marker};

/// Ordered event log for one ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketHistory {
    events: Vec<Event>,
}

impl TicketHistory {
    /// Build a history, sorting events by timestamp.
    ///
    /// The sort is stable, so events sharing a timestamp keep the order the
    /// tracker reported them in.
    #[must_use]
    pub fn new(mut events: Vec<Event>) -> Self {
        events.sort_by_key(|event| event.timestamp);
        Self { events }
    }

    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// When `label` was most recently applied.
    #[must_use]
    pub fn label_last_applied(&self, label: &str) -> Option<DateTime<Utc>> {
        self.last_label_event(EventKind::Labeled, label)
    }

    /// When `label` was most recently removed.
    #[must_use]
    pub fn label_last_removed(&self, label: &str) -> Option<DateTime<Utc>> {
        self.last_label_event(EventKind::Unlabeled, label)
    }

    fn last_label_event(&self, kind: EventKind, label: &str) -> Option<DateTime<Utc>> {
        self.events
            .iter()
            .rev()
            .find(|event| event.is_label_event(kind, label))
            .map(|event| event.timestamp)
    }

    /// Canned comments posted by automation identities, in order.
    ///
    /// Only comments authored by one of `automation` count; a human quoting
    /// a marker does not register as the bot having warned.
    #[must_use]
    pub fn boilerplate_comments(&self, automation: &HashSet<String>) -> BoilerplateLog {
        let records = self
            .events
            .iter()
            .filter(|event| event.kind == EventKind::Commented)
            .filter(|event| automation.contains(&event.actor))
            .filter_map(|event| {
                parse_marker(event.body_text())
                    .map(|key| BoilerplateComment::new(key, event.timestamp))
            })
            .collect();
        BoilerplateLog::new(records)
    }

    /// Emit every event at debug level.
    ///
    /// Used when the history is inconsistent with the current label set and
    /// someone needs the raw log to work out why.
    pub fn log_events(&self) {
        for (idx, event) in self.events.iter().enumerate() {
            debug!(
                idx,
                actor = %event.actor,
                kind = %event.kind,
                label = event.label.as_deref().unwrap_or(""),
                timestamp = %event.timestamp,
                "history event"
            );
        }
    }
}
