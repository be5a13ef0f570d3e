//! Warn-then-close escalation for tickets stuck in needs-info.
//!
//! # Cycle
//!
//! A cycle starts when the needs-info label is applied. With no canned
//! comment posted yet, the clock runs from the label: past `warn_days` the
//! bot warns. Once a warning (or a missing-data notice) is on the ticket, the
//! clock runs from the latest such comment instead, and after a further
//! `expire_days - warn_days` the ticket may close, but only if a needs-info
//! warning was actually posted. Removing the label after the last comment
//! restarts the cycle.
//!
//! Nothing here is stateful: every pass re-derives the action from
//! timestamps, so a cleared flag simply yields [`NeedsInfoAction::None`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::facts::{EscalationFacts, NeedsInfoAction};
use crate::model::{BoilerplateLog, ISSUE_MISSING_DATA, NEEDS_INFO_BASE};

/// Day counts driving the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Days after which the submitter is warned.
    pub warn_days: u32,
    /// Total days after which the ticket may be closed.
    pub expire_days: u32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            warn_days: 30,
            expire_days: 60,
        }
    }
}

impl Thresholds {
    /// Days between the warning and the close, measured from the warning.
    #[must_use]
    pub const fn expire_after_warn(self) -> u32 {
        self.expire_days.saturating_sub(self.warn_days)
    }
}

/// Timestamps and counts the escalation decision is made from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscalationInput {
    pub is_needs_info: bool,
    /// The needs-info label is currently on the ticket.
    pub has_label: bool,
    pub label_last_applied: Option<DateTime<Utc>>,
    pub label_last_removed: Option<DateTime<Utc>>,
    /// Latest `needs_info_base` comment.
    pub last_base_warning: Option<DateTime<Utc>>,
    /// Latest `issue_missing_data` comment.
    pub last_missing_data_warning: Option<DateTime<Utc>>,
    /// How many `needs_info_base` comments were ever posted.
    pub base_warnings_posted: usize,
    pub now: DateTime<Utc>,
}

impl EscalationInput {
    /// Fill the boilerplate-derived fields from `posted`.
    #[must_use]
    pub fn with_boilerplate(mut self, posted: &BoilerplateLog) -> Self {
        self.last_base_warning = posted.last_date_for(NEEDS_INFO_BASE);
        self.last_missing_data_warning = posted.last_date_for(ISSUE_MISSING_DATA);
        self.base_warnings_posted = posted.count(NEEDS_INFO_BASE);
        self
    }

    /// The comment the current cycle is timed from, if any.
    ///
    /// The later of the two canned comments, discarded when the label was
    /// removed after it.
    #[must_use]
    pub fn reference_time(&self) -> Option<DateTime<Utc>> {
        let reference = self.last_base_warning.max(self.last_missing_data_warning)?;
        match self.label_last_removed {
            Some(removed) if removed > reference => None,
            _ => Some(reference),
        }
    }
}

fn whole_days(now: DateTime<Utc>, since: DateTime<Utc>) -> i64 {
    now.signed_duration_since(since).num_days()
}

/// Decide the next escalation step.
#[must_use]
pub fn escalate(input: &EscalationInput, thresholds: Thresholds) -> EscalationFacts {
    let none = EscalationFacts::default();

    if !input.is_needs_info || !input.has_label {
        return none;
    }

    let warn_days = i64::from(thresholds.warn_days);
    let expire_days = i64::from(thresholds.expire_after_warn());

    let action = if let Some(reference) = input.reference_time() {
        let delta = whole_days(input.now, reference);
        let warned = input.base_warnings_posted > 0;
        if delta >= expire_days {
            // Never close a ticket whose submitter was not warned first.
            if warned {
                NeedsInfoAction::Close
            } else {
                NeedsInfoAction::Warn
            }
        } else if delta > warn_days && !warned {
            NeedsInfoAction::Warn
        } else {
            NeedsInfoAction::None
        }
    } else {
        let Some(applied) = input.label_last_applied else {
            warn!("needs-info label present but its application time is unknown; skipping");
            return none;
        };
        if whole_days(input.now, applied) > warn_days {
            NeedsInfoAction::Warn
        } else {
            NeedsInfoAction::None
        }
    };

    debug!(%action, "escalation decided");
    EscalationFacts {
        needs_info_action: action,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn ago(days: i64) -> Option<DateTime<Utc>> {
        Some(now() - Duration::days(days))
    }

    fn base() -> EscalationInput {
        EscalationInput {
            is_needs_info: true,
            has_label: true,
            label_last_applied: ago(1),
            label_last_removed: None,
            last_base_warning: None,
            last_missing_data_warning: None,
            base_warnings_posted: 0,
            now: now(),
        }
    }

    fn action(input: &EscalationInput) -> NeedsInfoAction {
        escalate(input, Thresholds::default()).needs_info_action
    }

    #[test]
    fn default_thresholds() {
        let t = Thresholds::default();
        assert_eq!(t.warn_days, 30);
        assert_eq!(t.expire_days, 60);
        assert_eq!(t.expire_after_warn(), 30);
    }

    #[test]
    fn expire_after_warn_saturates() {
        let t = Thresholds {
            warn_days: 40,
            expire_days: 10,
        };
        assert_eq!(t.expire_after_warn(), 0);
    }

    #[test]
    fn not_needs_info_or_no_label_is_none() {
        let mut input = base();
        input.label_last_applied = ago(400);
        input.last_base_warning = ago(300);
        input.base_warnings_posted = 1;

        input.is_needs_info = false;
        assert_eq!(action(&input), NeedsInfoAction::None);

        input.is_needs_info = true;
        input.has_label = false;
        assert_eq!(action(&input), NeedsInfoAction::None);
    }

    #[test]
    fn fresh_cycle_warns_after_threshold() {
        let mut input = base();
        input.label_last_applied = ago(31);
        assert_eq!(action(&input), NeedsInfoAction::Warn);

        input.label_last_applied = ago(29);
        assert_eq!(action(&input), NeedsInfoAction::None);

        // Exactly at the threshold is not yet past it.
        input.label_last_applied = ago(30);
        assert_eq!(action(&input), NeedsInfoAction::None);
    }

    #[test]
    fn fresh_cycle_without_applied_time_is_none() {
        let mut input = base();
        input.label_last_applied = None;
        assert_eq!(action(&input), NeedsInfoAction::None);
    }

    #[test]
    fn closes_after_warning_expires() {
        let mut input = base();
        input.label_last_applied = ago(91);
        input.last_base_warning = ago(61);
        input.base_warnings_posted = 1;
        assert_eq!(action(&input), NeedsInfoAction::Close);
    }

    #[test]
    fn close_boundary_is_inclusive() {
        let mut input = base();
        input.label_last_applied = ago(60);
        input.last_base_warning = ago(30);
        input.base_warnings_posted = 1;
        assert_eq!(action(&input), NeedsInfoAction::Close);

        input.last_base_warning = ago(29);
        assert_eq!(action(&input), NeedsInfoAction::None);
    }

    #[test]
    fn expired_without_warning_warns_instead_of_closing() {
        let mut input = base();
        input.label_last_applied = ago(100);
        input.last_missing_data_warning = ago(70);
        input.base_warnings_posted = 0;
        assert_eq!(action(&input), NeedsInfoAction::Warn);
    }

    #[test]
    fn later_missing_data_comment_resets_clock() {
        let mut input = base();
        input.label_last_applied = ago(90);
        input.last_base_warning = ago(61);
        input.last_missing_data_warning = ago(5);
        input.base_warnings_posted = 1;
        assert_eq!(input.reference_time(), ago(5));
        assert_eq!(action(&input), NeedsInfoAction::None);
    }

    #[test]
    fn between_warn_and_expire_warns_only_once() {
        let thresholds = Thresholds {
            warn_days: 10,
            expire_days: 60,
        };
        let mut input = base();
        input.label_last_applied = ago(40);
        input.last_missing_data_warning = ago(20);

        assert_eq!(
            escalate(&input, thresholds).needs_info_action,
            NeedsInfoAction::Warn
        );

        input.last_base_warning = ago(25);
        input.base_warnings_posted = 1;
        assert_eq!(
            escalate(&input, thresholds).needs_info_action,
            NeedsInfoAction::None
        );
    }

    #[test]
    fn label_removed_after_warning_restarts_cycle() {
        let mut input = base();
        input.last_base_warning = ago(70);
        input.base_warnings_posted = 1;
        input.label_last_removed = ago(50);
        input.label_last_applied = ago(10);
        assert_eq!(input.reference_time(), None);
        assert_eq!(action(&input), NeedsInfoAction::None);

        input.label_last_applied = ago(45);
        assert_eq!(action(&input), NeedsInfoAction::Warn);
    }

    #[test]
    fn label_removed_before_warning_keeps_reference() {
        let mut input = base();
        input.label_last_removed = ago(80);
        input.label_last_applied = ago(75);
        input.last_base_warning = ago(61);
        input.base_warnings_posted = 1;
        assert_eq!(input.reference_time(), ago(61));
        assert_eq!(action(&input), NeedsInfoAction::Close);
    }

    #[test]
    fn label_removed_at_warning_time_keeps_reference() {
        let mut input = base();
        input.label_last_applied = ago(75);
        input.last_base_warning = ago(61);
        input.label_last_removed = ago(61);
        input.base_warnings_posted = 1;
        assert_eq!(input.reference_time(), ago(61));
        assert_eq!(action(&input), NeedsInfoAction::Close);
    }

    #[test]
    fn with_boilerplate_fills_fields() {
        use crate::model::BoilerplateComment;

        let posted = BoilerplateLog::new(vec![
            BoilerplateComment::new(NEEDS_INFO_BASE, now() - Duration::days(40)),
            BoilerplateComment::new(NEEDS_INFO_BASE, now() - Duration::days(20)),
            BoilerplateComment::new(ISSUE_MISSING_DATA, now() - Duration::days(50)),
        ]);
        let input = base().with_boilerplate(&posted);
        assert_eq!(input.last_base_warning, ago(20));
        assert_eq!(input.last_missing_data_warning, ago(50));
        assert_eq!(input.base_warnings_posted, 2);
        assert_eq!(input.reference_time(), ago(20));
    }
}
