//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for the hardware and network traits,
//! enabling development and testing on desktop without a register chain or
//! broker connection.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockShiftBus`] | [`ShiftBus`] | Records the exact line-op sequence |
//! | [`MockStatusLines`] | [`StatusLines`] | Tracks indicator levels and writes |
//! | [`MockChannel`] | [`TelegramChannel`] | Queued telegrams for polling |
//!
//! # Example
//!
//! ```rust
//! use rs_railpanel::hal::MockShiftBus;
//! use rs_railpanel::transmit::ShiftTransmitter;
//!
//! let mut tx = ShiftTransmitter::new(MockShiftBus::new());
//! tx.transmit(&[true, false]).unwrap();
//!
//! // The chain received b1 first, then b0, then one strobe.
//! assert_eq!(tx.bus().clocked_bits(), vec![false, true]);
//! assert_eq!(tx.bus().strobe_count(), 1);
//! ```
//!
//! [`ShiftBus`]: crate::traits::ShiftBus
//! [`StatusLines`]: crate::traits::StatusLines
//! [`TelegramChannel`]: crate::traits::TelegramChannel

use std::collections::VecDeque;

use crate::traits::{ShiftBus, StatusLines, Telegram, TelegramChannel};

// ============================================================================
// Hardware Mocks
// ============================================================================

/// One recorded operation on the mock shift bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusOp {
    /// Data line driven to this level.
    Data(bool),
    /// Clock line pulsed high then low.
    ClockPulse,
    /// Strobe line pulsed high then low.
    StrobePulse,
}

/// Mock shift bus recording every line operation in order.
///
/// Use [`clocked_bits`](Self::clocked_bits) to recover the bit values the
/// chain actually received, in wire order.
#[derive(Debug, Default)]
pub struct MockShiftBus {
    /// Every operation in call order.
    pub ops: Vec<BusOp>,
    data_level: bool,
}

impl MockShiftBus {
    /// Creates a new mock bus with no recorded operations.
    pub fn new() -> Self {
        Self::default()
    }

    /// The data level at each clock pulse, in wire order (first shifted
    /// first).
    pub fn clocked_bits(&self) -> Vec<bool> {
        let mut level = false;
        let mut bits = Vec::new();
        for op in &self.ops {
            match op {
                BusOp::Data(l) => level = *l,
                BusOp::ClockPulse => bits.push(level),
                BusOp::StrobePulse => {}
            }
        }
        bits
    }

    /// Number of strobe pulses recorded.
    pub fn strobe_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| **op == BusOp::StrobePulse)
            .count()
    }
}

impl ShiftBus for MockShiftBus {
    type Error = ();

    fn set_data(&mut self, level: bool) -> Result<(), ()> {
        self.data_level = level;
        self.ops.push(BusOp::Data(level));
        Ok(())
    }

    fn pulse_clock(&mut self) -> Result<(), ()> {
        self.ops.push(BusOp::ClockPulse);
        Ok(())
    }

    fn pulse_strobe(&mut self) -> Result<(), ()> {
        self.ops.push(BusOp::StrobePulse);
        Ok(())
    }
}

/// Mock status lines tracking current levels and write counts.
#[derive(Debug, Default)]
pub struct MockStatusLines {
    /// Current level of the received line.
    pub received: bool,
    /// Current level of the acknowledge line.
    pub acknowledge: bool,
    /// Current level of the error line.
    pub error: bool,
    /// Number of writes to the received line.
    pub received_writes: usize,
    /// Number of writes to the acknowledge line.
    pub acknowledge_writes: usize,
    /// Number of writes to the error line.
    pub error_writes: usize,
}

impl MockStatusLines {
    /// Creates new mock lines, all low.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatusLines for MockStatusLines {
    type Error = ();

    fn set_received(&mut self, on: bool) -> Result<(), ()> {
        self.received = on;
        self.received_writes += 1;
        Ok(())
    }

    fn set_acknowledge(&mut self, on: bool) -> Result<(), ()> {
        self.acknowledge = on;
        self.acknowledge_writes += 1;
        Ok(())
    }

    fn set_error(&mut self, on: bool) -> Result<(), ()> {
        self.error = on;
        self.error_writes += 1;
        Ok(())
    }
}

// ============================================================================
// Network Mock
// ============================================================================

/// Mock telegram channel with a FIFO queue of pending telegrams.
///
/// # Example
///
/// ```rust
/// use rs_railpanel::hal::MockChannel;
/// use rs_railpanel::traits::{ChannelKind, Telegram, TelegramChannel};
///
/// let mut channel = MockChannel::new();
/// channel.queue(Telegram::new(
///     ChannelKind::TrainTracking,
///     "train-tracking/HKI",
///     br#"{"station": "HKI", "type": "OCCUPY"}"#.as_slice(),
/// ));
///
/// assert!(channel.try_recv().is_some());
/// assert!(channel.try_recv().is_none());
/// ```
#[derive(Debug, Default)]
pub struct MockChannel {
    queue: VecDeque<Telegram>,
    /// Simulated connection state.
    pub connected: bool,
    /// Whether `subscribe` was called.
    pub subscribed: bool,
}

impl MockChannel {
    /// Creates a new, connected mock channel with an empty queue.
    pub fn new() -> Self {
        Self {
            connected: true,
            ..Self::default()
        }
    }

    /// Queue a telegram for the next `try_recv`.
    pub fn queue(&mut self, telegram: Telegram) {
        self.queue.push_back(telegram);
    }
}

impl TelegramChannel for MockChannel {
    type Error = ();

    fn subscribe(&mut self) -> Result<(), ()> {
        self.subscribed = true;
        Ok(())
    }

    fn try_recv(&mut self) -> Option<Telegram> {
        self.queue.pop_front()
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::ChannelKind;

    #[test]
    fn mock_bus_recovers_clocked_bits() {
        let mut bus = MockShiftBus::new();
        bus.set_data(true).unwrap();
        bus.pulse_clock().unwrap();
        bus.set_data(false).unwrap();
        bus.pulse_clock().unwrap();
        bus.pulse_strobe().unwrap();

        assert_eq!(bus.clocked_bits(), vec![true, false]);
        assert_eq!(bus.strobe_count(), 1);
    }

    #[test]
    fn mock_status_lines_count_writes() {
        let mut lines = MockStatusLines::new();
        lines.set_error(true).unwrap();
        lines.set_error(false).unwrap();
        assert_eq!(lines.error_writes, 2);
        assert!(!lines.error);
    }

    #[test]
    fn mock_channel_is_fifo() {
        let mut channel = MockChannel::new();
        channel.queue(Telegram::new(ChannelKind::TrainTracking, "a", b"1".as_slice()));
        channel.queue(Telegram::new(ChannelKind::RouteSet, "b", b"2".as_slice()));

        assert_eq!(channel.try_recv().unwrap().topic, "a");
        assert_eq!(channel.try_recv().unwrap().topic, "b");
        assert!(channel.try_recv().is_none());
    }
}
