//! Rule table: actions, triggers, validation and the location-key index.
//!
//! Rules come from the JSON config as loosely-typed [`RawRule`] entries and
//! are validated into [`Rule`] at load time. A rule missing its `action` or
//! `bit`, or targeting a bit outside the register, is rejected and skipped
//! with a log line; it is never partially applied.
//!
//! Validated rules are indexed by **location key**: the station code alone,
//! or `station|section` when the rule names a track section. Lookups during
//! dispatch probe both forms.
//!
//! # Example
//!
//! ```rust
//! use rs_railpanel::rules::{RawRule, RuleIndex};
//!
//! let raw: Vec<RawRule> = serde_json::from_str(r#"[
//!     {"station": "HKI", "type": "OCCUPY", "action": "PULSE", "bit": 0},
//!     {"station": "HKI", "trackSection": "001", "action": "SET", "bit": 1}
//! ]"#).unwrap();
//!
//! let index = RuleIndex::build(raw, 2);
//! assert_eq!(index.lookup("HKI").len(), 1);
//! assert_eq!(index.lookup("HKI|001").len(), 1);
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

// ============================================================================
// Actions and Triggers
// ============================================================================

/// What a matched rule does to its target bit.
///
/// The `Unknown` variant preserves an unrecognized action string from the
/// config: such a rule still participates in matching (and pulses the
/// acknowledge indicator) but its execution reports an error instead of
/// touching the register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleAction {
    /// Set on an "active" event (OCCUPY, route type T/S), clear otherwise.
    Auto,
    /// Inverse of `Auto`.
    AutoInv,
    /// Unconditionally set.
    Set,
    /// Unconditionally clear.
    Clear,
    /// Flip the current value.
    Toggle,
    /// Set, then auto-clear after the pulse delay.
    Pulse,
    /// `Pulse`, but only on OCCUPY telegrams.
    PulseOccupy,
    /// `Pulse`, but only on RELEASE telegrams.
    PulseRelease,
    /// Unrecognized action string, preserved for diagnostics.
    Unknown(String),
}

impl RuleAction {
    /// Parse an action from its config string.
    ///
    /// Unrecognized strings are preserved as [`RuleAction::Unknown`] rather
    /// than dropped, so the rule's match behavior survives a typo.
    pub fn from_text(s: &str) -> Self {
        match s {
            "AUTO" => RuleAction::Auto,
            "AUTOINV" => RuleAction::AutoInv,
            "SET" => RuleAction::Set,
            "CLEAR" => RuleAction::Clear,
            "TOGGLE" => RuleAction::Toggle,
            "PULSE" => RuleAction::Pulse,
            "PULSEOCCUPY" => RuleAction::PulseOccupy,
            "PULSERELEASE" => RuleAction::PulseRelease,
            other => RuleAction::Unknown(other.to_string()),
        }
    }
}

/// The rule's `type` filter: which telegrams it can match at all.
///
/// Route-set triggers double as the selector between the two predicate
/// forms; a rule with a route-set trigger never matches a train-tracking
/// telegram and vice versa.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleTrigger {
    /// Only OCCUPY tracking telegrams.
    Occupy,
    /// Only RELEASE tracking telegrams.
    Release,
    /// Route-set telegrams of type T.
    RouteSet,
    /// Route-set telegrams of type S.
    RouteSetS,
    /// Route-set telegrams of type C.
    RouteSetC,
    /// Unrecognized trigger string; matches nothing.
    Unknown(String),
}

impl RuleTrigger {
    /// Parse a trigger from its config string.
    pub fn from_text(s: &str) -> Self {
        match s {
            "OCCUPY" => RuleTrigger::Occupy,
            "RELEASE" => RuleTrigger::Release,
            "ROUTESET" => RuleTrigger::RouteSet,
            "ROUTESET_S" => RuleTrigger::RouteSetS,
            "ROUTESET_C" => RuleTrigger::RouteSetC,
            other => RuleTrigger::Unknown(other.to_string()),
        }
    }

    /// True for the route-set trigger family.
    pub fn is_routeset(&self) -> bool {
        matches!(
            self,
            RuleTrigger::RouteSet | RuleTrigger::RouteSetS | RuleTrigger::RouteSetC
        )
    }
}

// ============================================================================
// Rules
// ============================================================================

/// A rule entry as it appears in the config file, before validation.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRule {
    /// Station code the rule listens on.
    #[serde(default)]
    pub station: Option<String>,
    /// Track section / section id; makes the location key composite.
    #[serde(default)]
    pub track_section: Option<String>,
    /// Telegram type filter.
    #[serde(rename = "type", default)]
    pub rule_type: Option<String>,
    /// Previous-station filter.
    #[serde(default)]
    pub from: Option<String>,
    /// Next-station filter.
    #[serde(default)]
    pub to: Option<String>,
    /// Previous-section filter.
    #[serde(default)]
    pub from_section: Option<String>,
    /// Next-section filter.
    #[serde(default)]
    pub to_section: Option<String>,
    /// Action name.
    #[serde(default)]
    pub action: Option<String>,
    /// Target bit index.
    #[serde(default)]
    pub bit: Option<usize>,
}

/// A validated rule.
#[derive(Clone, Debug)]
pub struct Rule {
    /// Station code the rule listens on.
    pub station: String,
    /// Track section / section id part of the location key, if any.
    pub section: Option<String>,
    /// Telegram type filter; `None` means "don't care".
    pub trigger: Option<RuleTrigger>,
    /// Previous-station filter.
    pub from: Option<String>,
    /// Next-station filter.
    pub to: Option<String>,
    /// Previous-section filter.
    pub from_section: Option<String>,
    /// Next-section filter.
    pub to_section: Option<String>,
    /// What to do with the target bit.
    pub action: RuleAction,
    /// Target bit index, validated against the register length.
    pub bit: usize,
}

impl Rule {
    /// The index key this rule is filed under.
    pub fn location_key(&self) -> String {
        match &self.section {
            Some(section) => composite_key(&self.station, section),
            None => self.station.clone(),
        }
    }
}

/// Build a composite `station|section` location key.
pub fn composite_key(station: &str, section: &str) -> String {
    format!("{}|{}", station, section)
}

/// Why a raw rule was rejected at load time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RuleLoadError {
    /// No station code.
    MissingStation,
    /// No action field.
    MissingAction,
    /// No bit field.
    MissingBit,
    /// Bit index beyond the configured register length.
    BitOutOfRange {
        /// The offending index.
        bit: usize,
        /// Configured register length.
        bits: usize,
    },
}

impl fmt::Display for RuleLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleLoadError::MissingStation => write!(f, "rule has no station"),
            RuleLoadError::MissingAction => write!(f, "rule has no action"),
            RuleLoadError::MissingBit => write!(f, "rule has no bit"),
            RuleLoadError::BitOutOfRange { bit, bits } => {
                write!(f, "bit {} out of range (register has {} bits)", bit, bits)
            }
        }
    }
}

impl std::error::Error for RuleLoadError {}

impl Rule {
    /// Validate a raw config entry against the register length.
    pub fn from_raw(raw: RawRule, bits: usize) -> Result<Self, RuleLoadError> {
        let station = raw.station.ok_or(RuleLoadError::MissingStation)?;
        let action = raw.action.ok_or(RuleLoadError::MissingAction)?;
        let bit = raw.bit.ok_or(RuleLoadError::MissingBit)?;
        if bit >= bits {
            return Err(RuleLoadError::BitOutOfRange { bit, bits });
        }

        Ok(Rule {
            station,
            section: raw.track_section,
            trigger: raw.rule_type.as_deref().map(RuleTrigger::from_text),
            from: raw.from,
            to: raw.to,
            from_section: raw.from_section,
            to_section: raw.to_section,
            action: RuleAction::from_text(&action),
            bit,
        })
    }
}

// ============================================================================
// Rule Index
// ============================================================================

/// Mapping from location key to the rules filed under it, in declaration
/// order.
#[derive(Debug, Default)]
pub struct RuleIndex {
    map: HashMap<String, Vec<Rule>>,
    loaded: usize,
    skipped: usize,
}

impl RuleIndex {
    /// Build the index from raw config entries.
    ///
    /// Invalid entries are logged and skipped; the rest of the table loads
    /// normally.
    pub fn build(raw_rules: Vec<RawRule>, bits: usize) -> Self {
        let mut index = RuleIndex::default();
        for (i, raw) in raw_rules.into_iter().enumerate() {
            match Rule::from_raw(raw, bits) {
                Ok(rule) => index.insert(rule),
                Err(e) => {
                    eprintln!("[Config] skipping rule {}: {}", i, e);
                    index.skipped += 1;
                }
            }
        }
        index
    }

    /// File a validated rule under its location key, preserving declaration
    /// order within the key.
    pub fn insert(&mut self, rule: Rule) {
        self.map.entry(rule.location_key()).or_default().push(rule);
        self.loaded += 1;
    }

    /// Rules filed under `key` (empty when the key is unknown).
    pub fn lookup(&self, key: &str) -> &[Rule] {
        self.map.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of rules loaded.
    pub fn len(&self) -> usize {
        self.loaded
    }

    /// True if no rule loaded.
    pub fn is_empty(&self) -> bool {
        self.loaded == 0
    }

    /// Number of raw entries rejected during the build.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
