//! Tracker event model.
//!
//! An [`Event`] is one entry of a ticket's activity log as reported by the
//! tracker. Only three kinds drive needs-info derivation (`labeled`,
//! `unlabeled`, `commented`); the rest are carried so a history can be
//! dumped for diagnosis, and anything the tracker adds later lands in
//! [`EventKind::Other`] instead of failing deserialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a tracker activity-log entry.
///
/// String representation follows the tracker's own lowercase names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A label was applied.
    Labeled,
    /// A label was removed.
    Unlabeled,
    /// A comment was posted.
    Commented,
    Closed,
    Reopened,
    Assigned,
    Renamed,
    Referenced,
    Mentioned,
    Subscribed,
    CrossReferenced,
    /// Any kind this crate does not know about.
    Other,
}

/// Error returned when parsing an unknown event kind string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown event kind '{raw}'")]
pub struct UnknownEventKind {
    /// The unrecognised input string.
    pub raw: String,
}

impl EventKind {
    /// All named kinds, excluding [`EventKind::Other`].
    pub const KNOWN: [Self; 11] = [
        Self::Labeled,
        Self::Unlabeled,
        Self::Commented,
        Self::Closed,
        Self::Reopened,
        Self::Assigned,
        Self::Renamed,
        Self::Referenced,
        Self::Mentioned,
        Self::Subscribed,
        Self::CrossReferenced,
    ];

    /// Return the tracker's string for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Labeled => "labeled",
            Self::Unlabeled => "unlabeled",
            Self::Commented => "commented",
            Self::Closed => "closed",
            Self::Reopened => "reopened",
            Self::Assigned => "assigned",
            Self::Renamed => "renamed",
            Self::Referenced => "referenced",
            Self::Mentioned => "mentioned",
            Self::Subscribed => "subscribed",
            Self::CrossReferenced => "cross-referenced",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::KNOWN
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownEventKind { raw: s.to_string() })
    }
}

// Custom serde: unknown strings become `Other` rather than an error, so a
// tracker that grows new activity kinds never breaks history parsing.
impl Serialize for EventKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for EventKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Self::from_str(&s).unwrap_or(Self::Other))
    }
}

/// One historical action on a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Login of whoever performed the action.
    pub actor: String,

    #[serde(alias = "event")]
    pub kind: EventKind,

    /// Label name for `labeled` / `unlabeled` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Comment text for `commented` events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    #[serde(alias = "created_at")]
    pub timestamp: DateTime<Utc>,
}

impl Event {
    /// A `labeled` event.
    #[must_use]
    pub fn labeled(actor: impl Into<String>, label: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            actor: actor.into(),
            kind: EventKind::Labeled,
            label: Some(label.into()),
            body: None,
            timestamp: at,
        }
    }

    /// An `unlabeled` event.
    #[must_use]
    pub fn unlabeled(
        actor: impl Into<String>,
        label: impl Into<String>,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            actor: actor.into(),
            kind: EventKind::Unlabeled,
            label: Some(label.into()),
            body: None,
            timestamp: at,
        }
    }

    /// A `commented` event.
    #[must_use]
    pub fn commented(actor: impl Into<String>, body: impl Into<String>, at: DateTime<Utc>) -> Self {
        Self {
            actor: actor.into(),
            kind: EventKind::Commented,
            label: None,
            body: Some(body.into()),
            timestamp: at,
        }
    }

    /// True when this event is `kind` applied to `label`.
    #[must_use]
    pub fn is_label_event(&self, kind: EventKind, label: &str) -> bool {
        self.kind == kind && self.label.as_deref() == Some(label)
    }

    /// Comment body, or the empty string for non-comment events.
    #[must_use]
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}
