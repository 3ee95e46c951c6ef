//! Pure predicates deciding whether a rule applies to a normalized event.
//!
//! Two predicate forms exist, selected by the rule's trigger: one for
//! train-tracking telegrams and one evaluated per section position of a
//! route-set telegram. Absent filter fields always mean "don't care".

use crate::events::{RouteSection, RouteType, TrackingEventType, TrainTrackingEvent};
use crate::rules::{Rule, RuleTrigger};

/// Does `rule` apply to a train-tracking telegram?
///
/// Rules with a route-set trigger never match here; an unrecognized trigger
/// string never matches anything.
pub fn tracking_rule_matches(rule: &Rule, event: &TrainTrackingEvent) -> bool {
    if matches!(&rule.trigger, Some(t) if t.is_routeset()) {
        return false;
    }

    if let Some(from) = &rule.from {
        if event.previous_station.as_deref() != Some(from.as_str()) {
            return false;
        }
    }

    // Both section filters compare the event's section against `to`, not
    // against the section filter itself. Deployed rule tables depend on this
    // comparison; do not change it without re-auditing those tables.
    if rule.from_section.is_some() && event.previous_track_section != rule.to {
        return false;
    }

    if let Some(to) = &rule.to {
        if event.next_station.as_deref() != Some(to.as_str()) {
            return false;
        }
    }

    if rule.to_section.is_some() && event.next_track_section != rule.to {
        return false;
    }

    match &rule.trigger {
        None => true,
        Some(RuleTrigger::Occupy) => event.event_type == TrackingEventType::Occupy,
        Some(RuleTrigger::Release) => event.event_type == TrackingEventType::Release,
        // Route-set triggers were excluded above; unknown triggers can never
        // equal a telegram type.
        Some(_) => false,
    }
}

/// Does `rule` apply to a route-set telegram at one section position?
///
/// `prev` holds the sections strictly before the position under evaluation,
/// `next` the sections strictly after it. A `from`/`fromSection` filter is
/// checked against the last element of `prev`, a `to`/`toSection` filter
/// against the first element of `next`; an empty window disqualifies the
/// filter's rule.
pub fn route_rule_matches(
    rule: &Rule,
    route_type: RouteType,
    prev: &[RouteSection],
    next: &[RouteSection],
) -> bool {
    let wanted = match &rule.trigger {
        Some(RuleTrigger::RouteSet) => RouteType::T,
        Some(RuleTrigger::RouteSetS) => RouteType::S,
        Some(RuleTrigger::RouteSetC) => RouteType::C,
        _ => return false,
    };
    if route_type != wanted {
        return false;
    }

    if let Some(from) = &rule.from {
        match prev.last() {
            Some(s) if s.station_code == *from => {}
            _ => return false,
        }
    }

    if let Some(to) = &rule.to {
        match next.first() {
            Some(s) if s.station_code == *to => {}
            _ => return false,
        }
    }

    if let Some(from_section) = &rule.from_section {
        match prev.last() {
            Some(s) if s.section_id == *from_section => {}
            _ => return false,
        }
    }

    if let Some(to_section) = &rule.to_section {
        match next.first() {
            Some(s) if s.section_id == *to_section => {}
            _ => return false,
        }
    }

    true
}
