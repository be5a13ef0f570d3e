//! Ticket snapshot: everything one evaluation pass reads about a ticket.
//!
//! The snapshot is assembled by whatever talks to the tracker and handed
//! over as JSON:
//!
//! ```json
//! {
//!   "submitter": "jdoe",
//!   "kind": "issue",
//!   "labels": ["bug", "needs_info"],
//!   "template": {"issue type": "Bug Report", "component name": "ping"},
//!   "component_match_strategy": ["filename"],
//!   "events": [{"actor": "maint", "kind": "labeled", "label": "needs_info",
//!               "timestamp": "2024-01-01T00:00:00Z"}],
//!   "boilerplate": [{"key": "needs_info_base", "timestamp": "2024-02-01T00:00:00Z"}]
//! }
//! ```
//!
//! `boilerplate` is optional; when absent it is derived from markers in the
//! automation-authored comments of `events`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::{
    BoilerplateLog, Event, TemplateFields, TicketKind, deserialize_template_fields,
};

/// Errors from loading a snapshot document.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse snapshot {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Current state and full history of one ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSnapshot {
    pub submitter: String,
    #[serde(default)]
    pub kind: TicketKind,
    #[serde(default)]
    pub labels: BTreeSet<String>,
    /// Section name to value. Keys are lowercased on load.
    #[serde(default, deserialize_with = "deserialize_template_fields")]
    pub template: TemplateFields,
    #[serde(default)]
    pub component_match_strategy: Vec<String>,
    #[serde(default)]
    pub events: Vec<Event>,
    /// Canned comments already posted, when the caller tracked them itself.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boilerplate: Option<BoilerplateLog>,
}

impl TicketSnapshot {
    /// Parse a snapshot from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns the underlying `serde_json` error on malformed input.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Read and parse a snapshot file.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Read`] if the file cannot be read, or
    /// [`SnapshotError::Parse`] if it is not a valid snapshot.
    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.contains(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventKind;
    use std::io::Write;

    const MINIMAL: &str = r#"{"submitter": "jdoe"}"#;

    #[test]
    fn minimal_snapshot_defaults() {
        let snap = TicketSnapshot::from_json(MINIMAL).expect("parse");
        assert_eq!(snap.submitter, "jdoe");
        assert_eq!(snap.kind, TicketKind::Issue);
        assert!(snap.labels.is_empty());
        assert!(snap.template.is_empty());
        assert!(snap.events.is_empty());
        assert!(snap.boilerplate.is_none());
    }

    #[test]
    fn full_snapshot_parses() {
        let raw = r#"{
            "submitter": "jdoe",
            "kind": "change_request",
            "labels": ["needs_info", "bug"],
            "template": {"issue type": "Bug Report"},
            "component_match_strategy": ["component_command"],
            "events": [
                {"actor": "maint", "kind": "labeled", "label": "needs_info",
                 "timestamp": "2024-01-01T00:00:00Z"},
                {"actor": "maint", "kind": "head_ref_deleted",
                 "timestamp": "2024-01-02T00:00:00Z"}
            ],
            "boilerplate": [{"key": "needs_info_base", "timestamp": "2024-02-01T00:00:00Z"}]
        }"#;
        let snap = TicketSnapshot::from_json(raw).expect("parse");
        assert!(snap.kind.is_change_request());
        assert!(snap.has_label("needs_info"));
        assert_eq!(snap.events[1].kind, EventKind::Other);
        assert_eq!(snap.boilerplate.map(|b| b.records().len()), Some(1));
    }

    #[test]
    fn template_keys_are_lowercased() {
        let raw = r#"{"submitter": "jdoe", "template": {"Issue Type": "Bug Report"}}"#;
        let snap = TicketSnapshot::from_json(raw).expect("parse");
        assert_eq!(crate::template::issue_type(&snap.template), "Bug Report");
    }

    #[test]
    fn missing_submitter_is_an_error() {
        assert!(TicketSnapshot::from_json("{}").is_err());
    }

    #[test]
    fn load_reports_path_on_parse_failure() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "{{ not json").expect("write");
        let err = TicketSnapshot::load(file.path()).unwrap_err();
        assert!(matches!(err, SnapshotError::Parse { .. }));
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }

    #[test]
    fn load_missing_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = TicketSnapshot::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, SnapshotError::Read { .. }));
    }

    #[test]
    fn load_roundtrip_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        write!(file, "{MINIMAL}").expect("write");
        let snap = TicketSnapshot::load(file.path()).expect("load");
        assert_eq!(snap.submitter, "jdoe");
    }
}
