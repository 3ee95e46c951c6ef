//! Applies a matched rule's action to the bit register.
//!
//! Exactly one register effect per matched rule:
//!
//! | action | effect |
//! |--------|--------|
//! | AUTO | set on an active event (OCCUPY, route T/S), clear otherwise |
//! | AUTOINV | inverse of AUTO |
//! | SET / CLEAR | unconditional |
//! | TOGGLE | flip |
//! | PULSE | set, auto-clear after the pulse delay |
//! | PULSEOCCUPY / PULSERELEASE | PULSE gated on the telegram type |
//!
//! An unrecognized action produces an [`ActionError`] and no register
//! effect; the dispatcher still pulses the acknowledge indicator for the
//! match itself.

use std::fmt;

use crate::events::{RouteType, TrackingEventType};
use crate::register::BitRegister;
use crate::rules::{Rule, RuleAction};

/// The part of the matched event an action can depend on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventContext {
    /// Matched a train-tracking telegram of this type.
    Tracking(TrackingEventType),
    /// Matched a route-set telegram of this type.
    Route(RouteType),
}

impl EventContext {
    /// Whether the event signals an "active" state for AUTO: occupation, or
    /// a route being established (T/S). Releases and cancellations (C) are
    /// inactive.
    pub fn is_active(&self) -> bool {
        match self {
            EventContext::Tracking(t) => *t == TrackingEventType::Occupy,
            EventContext::Route(r) => matches!(r, RouteType::T | RouteType::S),
        }
    }
}

/// Error applying a matched rule's action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionError {
    /// The rule carries an action string the executor does not know.
    Unrecognized {
        /// The action string from the config.
        action: String,
        /// The rule's target bit, for diagnostics.
        bit: usize,
    },
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionError::Unrecognized { action, bit } => {
                write!(f, "unrecognized action '{}' for bit {}", action, bit)
            }
        }
    }
}

impl std::error::Error for ActionError {}

/// Apply `rule`'s action to the register for an event matched in context
/// `ctx`.
pub fn execute(
    rule: &Rule,
    ctx: EventContext,
    register: &mut BitRegister,
    now_ms: u64,
) -> Result<(), ActionError> {
    match &rule.action {
        RuleAction::Auto => register.write(rule.bit, ctx.is_active()),
        RuleAction::AutoInv => register.write(rule.bit, !ctx.is_active()),
        RuleAction::Set => register.set(rule.bit),
        RuleAction::Clear => register.clear(rule.bit),
        RuleAction::Toggle => register.toggle(rule.bit),
        RuleAction::Pulse => register.pulse(rule.bit, now_ms),
        RuleAction::PulseOccupy => {
            if ctx == EventContext::Tracking(TrackingEventType::Occupy) {
                register.pulse(rule.bit, now_ms);
            }
        }
        RuleAction::PulseRelease => {
            if ctx == EventContext::Tracking(TrackingEventType::Release) {
                register.pulse(rule.bit, now_ms);
            }
        }
        RuleAction::Unknown(action) => {
            return Err(ActionError::Unrecognized {
                action: action.clone(),
                bit: rule.bit,
            });
        }
    }
    Ok(())
}
