//! Status indicator bookkeeping over a [`StatusLines`] implementation.
//!
//! The received and acknowledge lines flash briefly; the error line is a
//! latched level. Flash expiry runs on the same explicit `update(now_ms)`
//! timeline as bit pulses, so no timer threads are involved.
//!
//! The error line starts raised: it clears on the first successfully
//! normalized telegram and comes back on normalization failures or watchdog
//! silence.

use crate::traits::StatusLines;

/// How long the received/acknowledge lines stay lit per flash, in
/// milliseconds. Shorter than the transmit period so a flash never outlives
/// two frames.
pub const FLASH_MS: u64 = 50;

/// Indicator state machine driving three [`StatusLines`] outputs.
#[derive(Debug)]
pub struct StatusPanel<S: StatusLines> {
    lines: S,
    error_on: bool,
    received_until: Option<u64>,
    acknowledge_until: Option<u64>,
}

impl<S: StatusLines> StatusPanel<S> {
    /// Wrap the given lines, raising the error level until the first good
    /// telegram clears it.
    pub fn new(mut lines: S) -> Result<Self, S::Error> {
        lines.set_received(false)?;
        lines.set_acknowledge(false)?;
        lines.set_error(true)?;
        Ok(Self {
            lines,
            error_on: true,
            received_until: None,
            acknowledge_until: None,
        })
    }

    /// Flash the message-received line.
    pub fn pulse_received(&mut self, now_ms: u64) -> Result<(), S::Error> {
        self.lines.set_received(true)?;
        self.received_until = Some(now_ms + FLASH_MS);
        Ok(())
    }

    /// Flash the rule-acknowledge line. Overlapping flashes re-arm the off
    /// deadline.
    pub fn pulse_acknowledge(&mut self, now_ms: u64) -> Result<(), S::Error> {
        self.lines.set_acknowledge(true)?;
        self.acknowledge_until = Some(now_ms + FLASH_MS);
        Ok(())
    }

    /// Raise or drop the latched error level.
    pub fn set_error(&mut self, on: bool) -> Result<(), S::Error> {
        if self.error_on != on {
            self.error_on = on;
            self.lines.set_error(on)?;
        }
        Ok(())
    }

    /// Whether the error level is currently raised.
    pub fn error(&self) -> bool {
        self.error_on
    }

    /// Expire flashes whose deadline has passed.
    pub fn update(&mut self, now_ms: u64) -> Result<(), S::Error> {
        if matches!(self.received_until, Some(t) if now_ms >= t) {
            self.lines.set_received(false)?;
            self.received_until = None;
        }
        if matches!(self.acknowledge_until, Some(t) if now_ms >= t) {
            self.lines.set_acknowledge(false)?;
            self.acknowledge_until = None;
        }
        Ok(())
    }

    /// Access the underlying lines (mainly for mock inspection in tests).
    pub fn lines(&self) -> &S {
        &self.lines
    }
}
