use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Parsed template sections, keyed by lowercase section name.
pub type TemplateFields = BTreeMap<String, String>;

/// Deserialize template sections with keys trimmed and lowercased, so
/// `"Issue Type"` and `"issue type"` name the same section.
///
/// # Errors
///
/// Propagates the underlying deserializer error.
pub fn deserialize_template_fields<'de, D>(deserializer: D) -> Result<TemplateFields, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, String>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| (key.trim().to_lowercase(), value))
        .collect())
}

/// The two ticket kinds a tracker distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketKind {
    /// A reported problem or request.
    #[default]
    Issue,
    /// A proposed code change (pull request).
    #[serde(alias = "pull_request", alias = "pullrequest")]
    ChangeRequest,
}

impl TicketKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Issue => "issue",
            Self::ChangeRequest => "change_request",
        }
    }

    #[must_use]
    pub const fn is_change_request(self) -> bool {
        matches!(self, Self::ChangeRequest)
    }
}

impl fmt::Display for TicketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
