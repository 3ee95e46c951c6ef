//! Serializes the bit register to the shift-and-store chain.
//!
//! Bits are clocked out from the **highest index down to index 0**: the last
//! logical bit goes onto the wire first, so after the full sequence it sits
//! in the earliest chain stage and bit 0 ends up in the very first physical
//! output stage. After all bits are shifted, one strobe pulse latches every
//! stage into the output drivers at once.
//!
//! Per bit, in strict order: drive data to the bit's value, pulse the clock,
//! reset data low. Pulse hold timing is owned by the [`ShiftBus`]
//! implementation.
//!
//! The transmitter runs on a fixed period (whether or not anything changed,
//! so pulse expirations become visible within one period) and may also be
//! invoked right after a mutation for lower latency.

use crate::traits::ShiftBus;

/// Period of the regular transmission tick, in milliseconds.
pub const TRANSMIT_INTERVAL_MS: u64 = 100;

/// Pushes register snapshots to the hardware chain over a [`ShiftBus`].
#[derive(Debug)]
pub struct ShiftTransmitter<B: ShiftBus> {
    bus: B,
}

impl<B: ShiftBus> ShiftTransmitter<B> {
    /// Create a transmitter over the given bus.
    pub fn new(bus: B) -> Self {
        Self { bus }
    }

    /// Shift the whole snapshot out and latch it.
    ///
    /// The caller passes a consistent snapshot; the register is never read
    /// mid-mutation.
    pub fn transmit(&mut self, bits: &[bool]) -> Result<(), B::Error> {
        for &bit in bits.iter().rev() {
            self.bus.set_data(bit)?;
            self.bus.pulse_clock()?;
            self.bus.set_data(false)?;
        }
        self.bus.pulse_strobe()
    }

    /// Access the underlying bus.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the underlying bus.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{BusOp, MockShiftBus};

    #[test]
    fn bits_are_clocked_highest_index_first() {
        let mut tx = ShiftTransmitter::new(MockShiftBus::new());
        tx.transmit(&[true, false, false, true]).unwrap();

        // b3, b2, b1, b0
        assert_eq!(tx.bus().clocked_bits(), vec![true, false, false, true]);
    }

    #[test]
    fn each_bit_follows_data_clock_reset_sequence() {
        let mut tx = ShiftTransmitter::new(MockShiftBus::new());
        tx.transmit(&[true]).unwrap();

        assert_eq!(
            tx.bus().ops,
            vec![
                BusOp::Data(true),
                BusOp::ClockPulse,
                BusOp::Data(false),
                BusOp::StrobePulse,
            ]
        );
    }

    #[test]
    fn strobe_fires_exactly_once_after_all_bits() {
        let mut tx = ShiftTransmitter::new(MockShiftBus::new());
        tx.transmit(&[false, true, false]).unwrap();

        let strobes: Vec<usize> = tx
            .bus()
            .ops
            .iter()
            .enumerate()
            .filter(|(_, op)| **op == BusOp::StrobePulse)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(strobes.len(), 1);
        assert_eq!(strobes[0], tx.bus().ops.len() - 1);
    }

    #[test]
    fn empty_register_still_strobes() {
        let mut tx = ShiftTransmitter::new(MockShiftBus::new());
        tx.transmit(&[]).unwrap();
        assert_eq!(tx.bus().ops, vec![BusOp::StrobePulse]);
    }

    #[test]
    fn repeated_transmissions_append_in_order() {
        let mut tx = ShiftTransmitter::new(MockShiftBus::new());
        tx.transmit(&[true, false]).unwrap();
        tx.transmit(&[false, true]).unwrap();

        assert_eq!(tx.bus().strobe_count(), 2);
        assert_eq!(tx.bus().clocked_bits(), vec![false, true, true, false]);
    }
}
