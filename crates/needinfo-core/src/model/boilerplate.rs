//! Canned bot comments ("boilerplate") and the log of ones already posted.
//!
//! The bot tags every canned comment with an HTML marker such as
//! `<!--- boilerplate: needs_info_base --->`. Scanning history for these
//! markers is how a pass learns which warnings were already issued.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Generic "please provide more information" warning.
pub const NEEDS_INFO_BASE: &str = "needs_info_base";

/// "Your template is missing sections" warning.
pub const ISSUE_MISSING_DATA: &str = "issue_missing_data";

const MARKER_KEYWORD: &str = "boilerplate:";

/// A previously posted canned comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoilerplateComment {
    /// Template key carried in the comment marker.
    pub key: String,
    /// When the comment was posted.
    pub timestamp: DateTime<Utc>,
}

impl BoilerplateComment {
    #[must_use]
    pub fn new(key: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            timestamp,
        }
    }
}

/// Extract the template key from a comment body, if it carries a marker.
///
/// Accepts both `<!-- boilerplate: key -->` and the triple-dash variant.
/// Plain-text mentions of the keyword are skipped; the first well-formed
/// marker wins.
#[must_use]
pub fn parse_marker(body: &str) -> Option<&str> {
    body.match_indices(MARKER_KEYWORD)
        .find_map(|(start, _)| marker_at(body, start))
}

fn marker_at(body: &str, start: usize) -> Option<&str> {
    let opener = body[..start].trim_end().trim_end_matches('-');
    if !opener.ends_with("<!") {
        return None;
    }

    let rest = &body[start + MARKER_KEYWORD.len()..];
    let end = rest.find("-->")?;
    rest[..end].split_whitespace().next().filter(|key| !key.starts_with('-'))
}

/// Chronological record of canned comments posted on one ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoilerplateLog {
    records: Vec<BoilerplateComment>,
}

impl BoilerplateLog {
    /// Build a log, ordering records by timestamp.
    #[must_use]
    pub fn new(mut records: Vec<BoilerplateComment>) -> Self {
        records.sort_by_key(|record| record.timestamp);
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[BoilerplateComment] {
        &self.records
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether any comment with `key` has been posted.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.records.iter().any(|record| record.key == key)
    }

    /// Number of comments posted with `key`.
    #[must_use]
    pub fn count(&self, key: &str) -> usize {
        self.records.iter().filter(|record| record.key == key).count()
    }

    /// Timestamp of the most recent comment posted with `key`.
    #[must_use]
    pub fn last_date_for(&self, key: &str) -> Option<DateTime<Utc>> {
        self.records
            .iter()
            .filter(|record| record.key == key)
            .map(|record| record.timestamp)
            .max()
    }
}
