//! One triage pass over a single ticket.
//!
//! Runs the three stages in order: replay the event log, check the
//! template (which may force the flag on), then time the escalation from
//! the resulting flag. `now` is taken once by the caller so every
//! threshold comparison in the pass sees the same instant.

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use crate::config::TriageSettings;
use crate::escalation::{EscalationInput, escalate};
use crate::facts::TriageFacts;
use crate::history::TicketHistory;
use crate::model::BoilerplateLog;
use crate::replay::{ReplayContext, TraceStep, replay_needs_info, replay_trace};
use crate::snapshot::TicketSnapshot;
use crate::template::check_template;

fn replay_context<'a>(
    snapshot: &'a TicketSnapshot,
    settings: &'a TriageSettings,
) -> ReplayContext<'a> {
    ReplayContext {
        submitter: &snapshot.submitter,
        automation: &settings.automation,
        label: &settings.label,
    }
}

/// Canned comments already on the ticket: as supplied, or scanned from history.
fn posted_boilerplate(
    snapshot: &TicketSnapshot,
    history: &TicketHistory,
    settings: &TriageSettings,
) -> BoilerplateLog {
    snapshot
        .boilerplate
        .clone()
        .unwrap_or_else(|| history.boilerplate_comments(&settings.automation))
}

/// Derive all needs-info and escalation facts for `snapshot`.
#[must_use]
#[instrument(skip_all, fields(submitter = %snapshot.submitter, kind = %snapshot.kind))]
pub fn evaluate(
    snapshot: &TicketSnapshot,
    settings: &TriageSettings,
    now: DateTime<Utc>,
) -> TriageFacts {
    let history = TicketHistory::new(snapshot.events.clone());
    let replayed = replay_needs_info(history.events(), &replay_context(snapshot, settings));
    let posted = posted_boilerplate(snapshot, &history, settings);

    let needs_info = check_template(
        &snapshot.template,
        snapshot.kind,
        &snapshot.component_match_strategy,
        &posted,
        replayed,
    );

    let has_label = snapshot.has_label(&settings.label);
    let label_last_applied = history.label_last_applied(&settings.label);
    if needs_info.is_needs_info && has_label && label_last_applied.is_none() {
        warn!(
            label = %settings.label,
            events = history.len(),
            "label is applied but history has no matching labeled event"
        );
        history.log_events();
    }

    let input = EscalationInput {
        is_needs_info: needs_info.is_needs_info,
        has_label,
        label_last_applied,
        label_last_removed: history.label_last_removed(&settings.label),
        last_base_warning: None,
        last_missing_data_warning: None,
        base_warnings_posted: 0,
        now,
    }
    .with_boilerplate(&posted);
    let escalation = escalate(&input, settings.thresholds);

    info!(
        replayed,
        is_needs_info = needs_info.is_needs_info,
        action = %escalation.needs_info_action,
        "ticket evaluated"
    );

    TriageFacts {
        needs_info,
        escalation,
    }
}

/// Replay only, returning the final flag and every state change.
#[must_use]
pub fn trace(snapshot: &TicketSnapshot, settings: &TriageSettings) -> (bool, Vec<TraceStep>) {
    let history = TicketHistory::new(snapshot.events.clone());
    let ctx = replay_context(snapshot, settings);
    let steps = replay_trace(history.events(), &ctx);
    (replay_needs_info(history.events(), &ctx), steps)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facts::NeedsInfoAction;
    use crate::model::{BoilerplateComment, Event, NEEDS_INFO_BASE, TicketKind};
    use crate::template::{COMPONENT_NAME, ISSUE_TYPE, TARGET_VERSION};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    fn ago(days: i64) -> DateTime<Utc> {
        now() - Duration::days(days)
    }

    fn complete_issue() -> TicketSnapshot {
        TicketSnapshot {
            submitter: "reporter".to_string(),
            template: [
                (ISSUE_TYPE, "bug report"),
                (COMPONENT_NAME, "ping"),
                (TARGET_VERSION, "2.9"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            ..TicketSnapshot::default()
        }
    }

    fn marker(key: &str) -> String {
        format!("Please respond.\n<!--- boilerplate: {key} --->")
    }

    #[test]
    fn untouched_complete_ticket() {
        let facts = evaluate(&complete_issue(), &TriageSettings::default(), now());
        assert_eq!(facts, TriageFacts::default());
    }

    #[test]
    fn labeled_recently_no_action() {
        let mut snap = complete_issue();
        snap.labels.insert("needs_info".to_string());
        snap.events = vec![Event::labeled("maint", "needs_info", ago(3))];

        let facts = evaluate(&snap, &TriageSettings::default(), now());
        assert!(facts.needs_info.is_needs_info);
        assert_eq!(facts.escalation.needs_info_action, NeedsInfoAction::None);
    }

    #[test]
    fn labeled_long_ago_warns() {
        let mut snap = complete_issue();
        snap.labels.insert("needs_info".to_string());
        snap.events = vec![Event::labeled("maint", "needs_info", ago(31))];

        let facts = evaluate(&snap, &TriageSettings::default(), now());
        assert_eq!(facts.escalation.needs_info_action, NeedsInfoAction::Warn);
    }

    #[test]
    fn warned_and_expired_closes_from_history_markers() {
        let mut snap = complete_issue();
        snap.labels.insert("needs_info".to_string());
        snap.events = vec![
            Event::labeled("maint", "needs_info", ago(95)),
            Event::commented("ansibot", marker(NEEDS_INFO_BASE), ago(61)),
        ];

        let facts = evaluate(&snap, &TriageSettings::default(), now());
        assert_eq!(facts.escalation.needs_info_action, NeedsInfoAction::Close);
    }

    #[test]
    fn supplied_boilerplate_overrides_history_scan() {
        let mut snap = complete_issue();
        snap.labels.insert("needs_info".to_string());
        snap.events = vec![
            Event::labeled("maint", "needs_info", ago(95)),
            Event::commented("ansibot", marker(NEEDS_INFO_BASE), ago(61)),
        ];
        snap.boilerplate = Some(BoilerplateLog::new(vec![BoilerplateComment::new(
            NEEDS_INFO_BASE,
            ago(2),
        )]));

        let facts = evaluate(&snap, &TriageSettings::default(), now());
        assert_eq!(facts.escalation.needs_info_action, NeedsInfoAction::None);
    }

    #[test]
    fn submitter_reply_stops_escalation() {
        let mut snap = complete_issue();
        snap.labels.insert("needs_info".to_string());
        snap.events = vec![
            Event::labeled("maint", "needs_info", ago(95)),
            Event::commented("ansibot", marker(NEEDS_INFO_BASE), ago(61)),
            Event::commented("reporter", "here you go", ago(1)),
        ];

        let facts = evaluate(&snap, &TriageSettings::default(), now());
        assert!(!facts.needs_info.is_needs_info);
        assert_eq!(facts.escalation.needs_info_action, NeedsInfoAction::None);
    }

    #[test]
    fn incomplete_template_forces_flag_but_label_gates_escalation() {
        let mut snap = complete_issue();
        snap.template.clear();

        let facts = evaluate(&snap, &TriageSettings::default(), now());
        assert!(facts.needs_info.is_needs_info);
        assert!(facts.needs_info.template_missing);
        assert!(facts.needs_info.template_warning_required);
        assert_eq!(facts.escalation.needs_info_action, NeedsInfoAction::None);
    }

    #[test]
    fn label_without_history_does_not_escalate() {
        let mut snap = complete_issue();
        snap.labels.insert("needs_info".to_string());
        snap.template.clear();

        let facts = evaluate(&snap, &TriageSettings::default(), now());
        assert!(facts.needs_info.is_needs_info);
        assert_eq!(facts.escalation.needs_info_action, NeedsInfoAction::None);
    }

    #[test]
    fn change_request_missing_template_not_forced() {
        let snap = TicketSnapshot {
            submitter: "contributor".to_string(),
            kind: TicketKind::ChangeRequest,
            ..TicketSnapshot::default()
        };
        let facts = evaluate(&snap, &TriageSettings::default(), now());
        assert!(!facts.needs_info.is_needs_info);
        assert_eq!(facts.needs_info.template_missing_sections, vec![ISSUE_TYPE]);
    }

    #[test]
    fn custom_label_name() {
        let settings = TriageSettings {
            label: "waiting_on_contributor".to_string(),
            ..TriageSettings::default()
        };
        let mut snap = complete_issue();
        snap.labels.insert("waiting_on_contributor".to_string());
        snap.events = vec![Event::labeled("maint", "waiting_on_contributor", ago(40))];

        let facts = evaluate(&snap, &settings, now());
        assert_eq!(facts.escalation.needs_info_action, NeedsInfoAction::Warn);
    }

    #[test]
    fn trace_sorts_before_replaying() {
        let mut snap = complete_issue();
        snap.events = vec![
            Event::unlabeled("maint", "needs_info", ago(1)),
            Event::labeled("maint", "needs_info", ago(5)),
        ];
        let (needs_info, steps) = trace(&snap, &TriageSettings::default());
        assert!(!needs_info);
        assert_eq!(steps.len(), 2);
    }
}
