//! Event fanout: candidate lookup, predicate filtering, action execution.
//!
//! For a train-tracking telegram both the bare station key and the
//! `station|trackSection` key are probed. For a route-set telegram the same
//! two probes run once per section position, with that position's
//! previous/next windows feeding the route predicate; one telegram can fire
//! many independent rules.
//!
//! All matching rules for one event are independent; they execute in
//! declaration order within a key purely for reproducible logs.

use crate::events::{Event, RouteSetEvent, TrainTrackingEvent};
use crate::executor::{execute, EventContext};
use crate::matcher::{route_rule_matches, tracking_rule_matches};
use crate::register::BitRegister;
use crate::rules::{composite_key, Rule, RuleIndex};

/// What one dispatched event did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Rules whose predicate matched (each one pulses the acknowledge
    /// indicator).
    pub matched: usize,
    /// Matched rules whose action could not be executed.
    pub action_errors: usize,
}

impl DispatchSummary {
    fn absorb(&mut self, other: DispatchSummary) {
        self.matched += other.matched;
        self.action_errors += other.action_errors;
    }
}

/// Run every applicable rule for `event` against the register.
pub fn dispatch(
    index: &RuleIndex,
    register: &mut BitRegister,
    event: &Event,
    now_ms: u64,
) -> DispatchSummary {
    match event {
        Event::Tracking(t) => dispatch_tracking(index, register, t, now_ms),
        Event::RouteSet(r) => dispatch_routeset(index, register, r, now_ms),
    }
}

fn dispatch_tracking(
    index: &RuleIndex,
    register: &mut BitRegister,
    event: &TrainTrackingEvent,
    now_ms: u64,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();
    let ctx = EventContext::Tracking(event.event_type);

    let mut run_key = |key: &str, summary: &mut DispatchSummary| {
        for rule in index.lookup(key) {
            if tracking_rule_matches(rule, event) {
                summary.absorb(run_action(rule, ctx, register, now_ms));
            }
        }
    };

    run_key(&event.station, &mut summary);
    if let Some(section) = &event.track_section {
        run_key(&composite_key(&event.station, section), &mut summary);
    }

    summary
}

fn dispatch_routeset(
    index: &RuleIndex,
    register: &mut BitRegister,
    event: &RouteSetEvent,
    now_ms: u64,
) -> DispatchSummary {
    let mut summary = DispatchSummary::default();
    let ctx = EventContext::Route(event.route_type);

    for i in 0..event.sections.len() {
        let prev = &event.sections[..i];
        let current = &event.sections[i];
        let next = &event.sections[i + 1..];

        let mut run_key = |key: &str, summary: &mut DispatchSummary| {
            for rule in index.lookup(key) {
                if route_rule_matches(rule, event.route_type, prev, next) {
                    summary.absorb(run_action(rule, ctx, register, now_ms));
                }
            }
        };

        run_key(&current.station_code, &mut summary);
        run_key(
            &composite_key(&current.station_code, &current.section_id),
            &mut summary,
        );
    }

    summary
}

fn run_action(
    rule: &Rule,
    ctx: EventContext,
    register: &mut BitRegister,
    now_ms: u64,
) -> DispatchSummary {
    let mut summary = DispatchSummary {
        matched: 1,
        action_errors: 0,
    };
    if let Err(e) = execute(rule, ctx, register, now_ms) {
        eprintln!("[Panel] rule for '{}': {}", rule.location_key(), e);
        summary.action_errors = 1;
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{RouteSection, RouteType};
    use crate::rules::RawRule;

    fn index_from(json: &str, bits: usize) -> RuleIndex {
        let raw: Vec<RawRule> = serde_json::from_str(json).unwrap();
        RuleIndex::build(raw, bits)
    }

    fn tracking_event(json: &str) -> Event {
        Event::Tracking(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn bare_and_composite_keys_both_fire() {
        let index = index_from(
            r#"[
                {"station": "HKI", "action": "SET", "bit": 0},
                {"station": "HKI", "trackSection": "001", "action": "SET", "bit": 1},
                {"station": "HKI", "trackSection": "002", "action": "SET", "bit": 2}
            ]"#,
            4,
        );
        let mut reg = BitRegister::new(4, None);

        let event = tracking_event(
            r#"{"station": "HKI", "trackSection": "001", "type": "OCCUPY"}"#,
        );
        let summary = dispatch(&index, &mut reg, &event, 0);

        assert_eq!(summary.matched, 2);
        assert!(reg.get(0), "bare key rule fired");
        assert!(reg.get(1), "composite key rule fired");
        assert!(!reg.get(2), "other section untouched");
    }

    #[test]
    fn event_without_section_skips_composite_lookup() {
        let index = index_from(
            r#"[{"station": "HKI", "trackSection": "001", "action": "SET", "bit": 0}]"#,
            1,
        );
        let mut reg = BitRegister::new(1, None);

        let event = tracking_event(r#"{"station": "HKI", "type": "OCCUPY"}"#);
        let summary = dispatch(&index, &mut reg, &event, 0);

        assert_eq!(summary.matched, 0);
        assert!(!reg.get(0));
    }

    #[test]
    fn routeset_fires_once_per_matching_section_position() {
        let index = index_from(
            r#"[
                {"station": "X", "type": "ROUTESET", "to": "Y", "action": "SET", "bit": 2},
                {"station": "Y", "type": "ROUTESET", "action": "SET", "bit": 3}
            ]"#,
            4,
        );
        let mut reg = BitRegister::new(4, None);

        let event = Event::RouteSet(RouteSetEvent {
            message_time: None,
            train_number: None,
            route_type: RouteType::T,
            sections: vec![
                RouteSection {
                    station_code: "X".to_string(),
                    section_id: "0".to_string(),
                },
                RouteSection {
                    station_code: "Y".to_string(),
                    section_id: "1".to_string(),
                },
                RouteSection {
                    station_code: "Z".to_string(),
                    section_id: "2".to_string(),
                },
            ],
        });

        let summary = dispatch(&index, &mut reg, &event, 0);
        assert_eq!(summary.matched, 2);
        assert!(reg.get(2), "X rule matched at index 0 where next[0] == Y");
        assert!(reg.get(3), "filterless Y rule matched at index 1");
    }

    #[test]
    fn unknown_action_counts_as_match_with_error() {
        let index = index_from(
            r#"[{"station": "HKI", "action": "BLINK", "bit": 0}]"#,
            1,
        );
        let mut reg = BitRegister::new(1, None);

        let event = tracking_event(r#"{"station": "HKI", "type": "OCCUPY"}"#);
        let summary = dispatch(&index, &mut reg, &event, 0);

        assert_eq!(summary.matched, 1);
        assert_eq!(summary.action_errors, 1);
        assert!(!reg.get(0));
    }

    #[test]
    fn auto_rule_follows_occupy_release_sequence() {
        let index = index_from(r#"[{"station": "A", "action": "AUTO", "bit": 0}]"#, 1);
        let mut reg = BitRegister::new(1, None);

        let occupy = tracking_event(r#"{"station": "A", "type": "OCCUPY"}"#);
        dispatch(&index, &mut reg, &occupy, 0);
        assert!(reg.get(0));

        let release = tracking_event(r#"{"station": "A", "type": "RELEASE"}"#);
        dispatch(&index, &mut reg, &release, 0);
        assert!(!reg.get(0));
    }

    #[test]
    fn tracking_event_type_available_for_gated_pulses() {
        let index = index_from(
            r#"[{"station": "A", "action": "PULSERELEASE", "bit": 0}]"#,
            1,
        );
        let mut reg = BitRegister::new(1, None);

        let occupy = tracking_event(r#"{"station": "A", "type": "OCCUPY"}"#);
        let summary = dispatch(&index, &mut reg, &occupy, 0);
        assert_eq!(summary.matched, 1, "rule matches, pulse just stays gated");
        assert!(!reg.get(0));

        let release = tracking_event(r#"{"station": "A", "type": "RELEASE"}"#);
        dispatch(&index, &mut reg, &release, 0);
        assert!(reg.get(0));
    }
}
