//! Main panel controller tying register, rule index and indicators together.
//!
//! [`PanelController`] is the single owner of all mutable panel state. One
//! serialized timeline feeds it inbound telegrams, pulse expirations and the
//! periodic transmit tick; nothing else touches the register.
//!
//! # Example
//!
//! ```rust
//! use rs_railpanel::panel::{PanelController, TelegramOutcome};
//! use rs_railpanel::register::BitRegister;
//! use rs_railpanel::rules::{RawRule, RuleIndex};
//! use rs_railpanel::hal::MockStatusLines;
//! use rs_railpanel::traits::ChannelKind;
//!
//! let raw: Vec<RawRule> = serde_json::from_str(
//!     r#"[{"station": "HKI", "action": "SET", "bit": 0}]"#).unwrap();
//! let index = RuleIndex::build(raw, 1);
//! let register = BitRegister::new(1, None);
//!
//! let mut panel = PanelController::new(register, index, MockStatusLines::new()).unwrap();
//! panel
//!     .handle_telegram(
//!         ChannelKind::TrainTracking,
//!         br#"{"station": "HKI", "type": "OCCUPY"}"#,
//!         0,
//!     )
//!     .unwrap();
//! assert!(panel.bit(0));
//! ```

use crate::dispatch::{dispatch, DispatchSummary};
use crate::events::normalize;
use crate::register::BitRegister;
use crate::rules::RuleIndex;
use crate::status::StatusPanel;
use crate::traits::{ChannelKind, StatusLines, TelegramChannel};

/// What happened to one inbound telegram.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TelegramOutcome {
    /// Normalized and dispatched; the summary counts rule matches.
    Dispatched(DispatchSummary),
    /// Payload could not be normalized; error indicator raised, no other
    /// state touched.
    Rejected,
}

/// Single owner of the bit register, rule index and indicator state.
///
/// # Thread Safety
///
/// The controller itself is not thread-safe. For multi-source scenarios
/// (MQTT event loop + periodic transmit tick) wrap it in the
/// `SharedPanelState` from the services module (requires the `mqtt`
/// feature), which serializes all access behind one lock.
pub struct PanelController<S: StatusLines> {
    register: BitRegister,
    index: RuleIndex,
    status: StatusPanel<S>,
    last_message_ms: Option<u64>,
}

impl<S: StatusLines> PanelController<S> {
    /// Create a controller; the error indicator starts raised until the
    /// first good telegram clears it.
    pub fn new(register: BitRegister, index: RuleIndex, lines: S) -> Result<Self, S::Error> {
        Ok(Self {
            register,
            index,
            status: StatusPanel::new(lines)?,
            last_message_ms: None,
        })
    }

    /// Process one raw telegram from the given stream.
    ///
    /// Every telegram, well-formed or not, refreshes the last-message
    /// timestamp: the channel demonstrably carried something, which is what
    /// the liveness watchdog measures. A good telegram flashes the received
    /// line, clears the error level and dispatches; a corrupt one raises the
    /// error level, is logged and dropped.
    pub fn handle_telegram(
        &mut self,
        kind: ChannelKind,
        payload: &[u8],
        now_ms: u64,
    ) -> Result<TelegramOutcome, S::Error> {
        self.last_message_ms = Some(now_ms);

        let event = match normalize(kind, payload) {
            Ok(event) => event,
            Err(e) => {
                eprintln!("[Panel] {}", e);
                self.status.set_error(true)?;
                return Ok(TelegramOutcome::Rejected);
            }
        };

        self.status.pulse_received(now_ms)?;
        self.status.set_error(false)?;

        let summary = dispatch(&self.index, &mut self.register, &event, now_ms);
        if summary.matched > 0 {
            self.status.pulse_acknowledge(now_ms)?;
        }

        Ok(TelegramOutcome::Dispatched(summary))
    }

    /// Drain all pending telegrams from a polled channel.
    pub fn drain_channel<C: TelegramChannel>(
        &mut self,
        channel: &mut C,
        now_ms: u64,
    ) -> Result<usize, S::Error> {
        let mut handled = 0;
        while let Some(telegram) = channel.try_recv() {
            self.handle_telegram(telegram.kind, &telegram.payload, now_ms)?;
            handled += 1;
        }
        Ok(handled)
    }

    /// Advance the timeline: expire bit pulses and indicator flashes.
    pub fn update(&mut self, now_ms: u64) -> Result<(), S::Error> {
        self.register.update(now_ms);
        self.status.update(now_ms)
    }

    /// Raise the error level when the channel has been silent longer than
    /// `limit_ms`. Returns whether the watchdog tripped.
    pub fn check_silence(&mut self, now_ms: u64, limit_ms: u64) -> Result<bool, S::Error> {
        let silent = match self.last_message_ms {
            Some(t) => now_ms.saturating_sub(t) >= limit_ms,
            // Startup silence is already covered by the initial error level.
            None => false,
        };
        if silent {
            self.status.set_error(true)?;
        }
        Ok(silent)
    }

    /// Consistent snapshot of the register for transmission.
    pub fn snapshot(&self) -> &[bool] {
        self.register.snapshot()
    }

    /// Current value of one bit.
    pub fn bit(&self, index: usize) -> bool {
        self.register.get(index)
    }

    /// Whether the error indicator is currently raised.
    pub fn error(&self) -> bool {
        self.status.error()
    }

    /// Timestamp of the last telegram, if any arrived yet.
    pub fn last_message_ms(&self) -> Option<u64> {
        self.last_message_ms
    }

    /// The indicator lines, for mock inspection in tests.
    pub fn status_lines(&self) -> &S {
        self.status.lines()
    }
}
