//! Derived outputs handed back to the bot.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of the template check, with the possibly forced needs-info flag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NeedsInfoFacts {
    pub is_needs_info: bool,
    /// The template mapping was entirely empty.
    pub template_missing: bool,
    /// Required sections that were absent or blank, in policy order.
    pub template_missing_sections: Vec<String>,
    /// A "missing data" warning should be posted on this pass.
    pub template_warning_required: bool,
}

/// Next escalation step for a ticket stuck in needs-info.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NeedsInfoAction {
    #[default]
    None,
    /// Post the needs-info warning.
    Warn,
    /// Close the ticket.
    Close,
}

impl NeedsInfoAction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Warn => "warn",
            Self::Close => "close",
        }
    }
}

impl fmt::Display for NeedsInfoAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationFacts {
    pub needs_info_action: NeedsInfoAction,
}

/// Everything one triage pass derives for a ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageFacts {
    #[serde(flatten)]
    pub needs_info: NeedsInfoFacts,
    #[serde(flatten)]
    pub escalation: EscalationFacts,
}
