//! Template completeness check.
//!
//! Issues are filed against a structured template. Which sections must be
//! filled depends on the ticket kind and on the declared issue type:
//!
//! | section           | change request | issue                               |
//! |-------------------|----------------|-------------------------------------|
//! | `issue type`      | required       | required                            |
//! | `component name`  | -              | required unless set by `/component` |
//! | `ansible version` | -              | required unless feature/docs        |

use tracing::debug;

use crate::facts::NeedsInfoFacts;
use crate::model::{BoilerplateLog, ISSUE_MISSING_DATA, TemplateFields, TicketKind};

pub const ISSUE_TYPE: &str = "issue type";
pub const COMPONENT_NAME: &str = "component name";
pub const TARGET_VERSION: &str = "ansible version";

/// Component match strategy recorded when a maintainer set the component
/// with a slash command; the template section is then redundant.
pub const COMPONENT_COMMAND_STRATEGY: &str = "component_command";

/// Issue types that are not tied to a release.
const VERSIONLESS_ISSUE_TYPES: [&str; 2] = ["feature idea", "documentation report"];

/// Declared issue type, or the empty string.
#[must_use]
pub fn issue_type(template: &TemplateFields) -> &str {
    template.get(ISSUE_TYPE).map_or("", |value| value.trim())
}

/// Required sections for this ticket, in reporting order.
#[must_use]
pub fn required_sections(kind: TicketKind, issue_type: &str) -> Vec<&'static str> {
    let mut required = vec![ISSUE_TYPE];
    if !kind.is_change_request() {
        required.push(COMPONENT_NAME);
        let lowered = issue_type.to_lowercase();
        if !VERSIONLESS_ISSUE_TYPES.contains(&lowered.as_str()) {
            required.push(TARGET_VERSION);
        }
    }
    required
}

/// Check `template` and fold the result into the replayed needs-info flag.
///
/// `replayed_needs_info` is the flag from event replay; an incomplete
/// template on an issue forces it on. `posted` is consulted so the missing
/// data warning goes out at most once per ticket.
#[must_use]
pub fn check_template(
    template: &TemplateFields,
    kind: TicketKind,
    component_match_strategy: &[String],
    posted: &BoilerplateLog,
    replayed_needs_info: bool,
) -> NeedsInfoFacts {
    let component_by_command = component_match_strategy
        .iter()
        .any(|strategy| strategy == COMPONENT_COMMAND_STRATEGY);

    let missing: Vec<String> = required_sections(kind, issue_type(template))
        .into_iter()
        .filter(|section| {
            let filled = template
                .get(*section)
                .is_some_and(|value| !value.trim().is_empty());
            !filled && !(*section == COMPONENT_NAME && component_by_command)
        })
        .map(str::to_string)
        .collect();

    let mut facts = NeedsInfoFacts {
        is_needs_info: replayed_needs_info,
        template_missing: template.is_empty(),
        template_missing_sections: missing,
        template_warning_required: false,
    };

    if facts.template_missing || !facts.template_missing_sections.is_empty() {
        if !kind.is_change_request() {
            facts.is_needs_info = true;
        }
        facts.template_warning_required = !posted.contains(ISSUE_MISSING_DATA);
        debug!(
            template_missing = facts.template_missing,
            missing = ?facts.template_missing_sections,
            warning_required = facts.template_warning_required,
            "template incomplete"
        );
    }

    facts
}
