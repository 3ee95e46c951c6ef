//! # rs-railpanel
//!
//! Maps a stream of railway telegrams (track occupancy/release and
//! route-set messages) through a user-defined rule table onto a bank of
//! output bits, and serializes those bits to daisy-chained shift-and-store
//! registers driving indicator circuits (LEDs, relays).
//!
//! ## Features
//!
//! - **Rule engine**: station / track-section keyed rules with positional
//!   filters (previous/next station and section, route-section windows)
//! - **Eight action semantics**: AUTO, AUTOINV, SET, CLEAR, TOGGLE, PULSE,
//!   PULSEOCCUPY, PULSERELEASE
//! - **Shift protocol**: highest-bit-first clock-out with a single strobe
//!   latch, on a fixed 100 ms period
//! - **Status indicators**: received/acknowledge flashes, latched error line
//!   with a silence watchdog
//! - **Hardware abstraction**: recording mocks for desktop testing, ESP32
//!   GPIO behind the `esp32` feature, MQTT channel behind `mqtt`
//!
//! ## Architecture
//!
//! - `traits` - hardware and channel abstractions
//! - `register` - the output bit bank and pulse timers
//! - `rules` / `matcher` / `executor` / `dispatch` - the rule engine
//! - `events` - telegram normalization
//! - `status` / `panel` - indicators and the owning controller
//! - `transmit` - the shift-register protocol
//! - `hal` - concrete implementations (mock for testing, esp32 for hardware)
//! - `services` - MQTT channel and periodic drive loop (feature-gated)
//!
//! ## Example
//!
//! ```rust
//! use rs_railpanel::{
//!     config::Config,
//!     hal::{MockShiftBus, MockStatusLines},
//!     panel::PanelController,
//!     transmit::ShiftTransmitter,
//!     traits::ChannelKind,
//! };
//!
//! let config = Config::from_json_str(r#"{
//!     "bits": 2,
//!     "rules": [{"station": "HKI", "type": "OCCUPY", "action": "SET", "bit": 1}]
//! }"#).unwrap();
//!
//! let mut panel = PanelController::new(
//!     config.build_register(),
//!     config.build_index(),
//!     MockStatusLines::new(),
//! ).unwrap();
//!
//! panel.handle_telegram(
//!     ChannelKind::TrainTracking,
//!     br#"{"station": "HKI", "type": "OCCUPY"}"#,
//!     0,
//! ).unwrap();
//!
//! let mut tx = ShiftTransmitter::new(MockShiftBus::new());
//! tx.transmit(panel.snapshot()).unwrap();
//! // Bit 1 is shifted out first so bit 0 lands in the first chain stage.
//! assert_eq!(tx.bus().clocked_bits(), vec![true, false]);
//! ```

#![warn(missing_docs)]

/// JSON configuration: register size, rule table, broker settings.
pub mod config;
/// Event fanout over the rule index.
pub mod dispatch;
/// Telegram wire shapes and normalization.
pub mod events;
/// Action semantics applied to the bit register.
pub mod executor;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Rule predicates for the two telegram forms.
pub mod matcher;
/// Main panel controller that ties everything together.
pub mod panel;
/// The output bit bank and its pulse timers.
pub mod register;
/// Rule table, actions and the location-key index.
pub mod rules;
/// Status indicator bookkeeping.
pub mod status;
/// Shift-register transmission protocol.
pub mod transmit;
/// Core traits for hardware abstraction and the telegram channel.
pub mod traits;

/// Network services and the periodic drive loop (feature-gated).
#[cfg(feature = "mqtt")]
pub mod services;

// Re-exports for convenience
pub use config::{Config, MqttConfig};
pub use dispatch::{dispatch, DispatchSummary};
pub use events::{
    normalize, Event, NormalizeError, RouteSection, RouteSetEvent, RouteType, TrackingEventType,
    TrainTrackingEvent,
};
pub use executor::{execute, ActionError, EventContext};
pub use matcher::{route_rule_matches, tracking_rule_matches};
pub use panel::{PanelController, TelegramOutcome};
pub use register::{BitRegister, PULSE_CLEAR_MS};
pub use rules::{RawRule, Rule, RuleAction, RuleIndex, RuleLoadError, RuleTrigger};
pub use status::{StatusPanel, FLASH_MS};
pub use transmit::{ShiftTransmitter, TRANSMIT_INTERVAL_MS};
pub use traits::{ChannelKind, ShiftBus, StatusLines, Telegram, TelegramChannel};
