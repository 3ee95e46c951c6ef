//! The output bit bank and its pending pulse timers.
//!
//! [`BitRegister`] owns the ordered array of output bits that is serialized
//! to the shift-register chain. Bits are mutated only by the action executor
//! and read only by the transmitter; pulse expiry is driven by explicit
//! `update(now_ms)` calls from the single owning loop rather than OS timers.
//!
//! # Example
//!
//! ```rust
//! use rs_railpanel::register::{BitRegister, PULSE_CLEAR_MS};
//!
//! let mut reg = BitRegister::new(4, Some("0100"));
//! assert_eq!(reg.snapshot(), &[false, true, false, false]);
//!
//! reg.pulse(0, 1000);
//! assert!(reg.get(0));
//!
//! // The pulse clears itself once its deadline passes.
//! reg.update(1000 + PULSE_CLEAR_MS);
//! assert!(!reg.get(0));
//! ```

/// How long a pulsed bit stays set before it is cleared again, in
/// milliseconds.
pub const PULSE_CLEAR_MS: u64 = 100;

/// Fixed-size bank of output bits with per-bit pulse deadlines.
///
/// The length is fixed at construction; all indices used by the executor are
/// validated against it at rule-load time, so the mutating methods treat an
/// out-of-range index as a no-op rather than panicking.
#[derive(Debug, Clone)]
pub struct BitRegister {
    bits: Vec<bool>,
    /// Pending auto-clear deadline per bit. `Some(t)` means the bit was
    /// pulsed and clears at time `t` unless another action supersedes it.
    pulse_deadline: Vec<Option<u64>>,
}

impl BitRegister {
    /// Create a register of `len` bits initialized from a '0'/'1' pattern.
    ///
    /// Pattern positions beyond the register length are ignored; missing
    /// positions (short or absent pattern) default to `false`. Any character
    /// other than `'1'` counts as `'0'`.
    pub fn new(len: usize, initial_pattern: Option<&str>) -> Self {
        let mut bits = vec![false; len];
        if let Some(pattern) = initial_pattern {
            for (i, c) in pattern.chars().take(len).enumerate() {
                bits[i] = c == '1';
            }
        }
        Self {
            pulse_deadline: vec![None; len],
            bits,
        }
    }

    /// Number of bits in the register.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True if the register has no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Current value of bit `index` (`false` for out-of-range indices).
    pub fn get(&self, index: usize) -> bool {
        self.bits.get(index).copied().unwrap_or(false)
    }

    /// Set bit `index`, superseding any pending pulse on it.
    pub fn set(&mut self, index: usize) {
        self.write(index, true);
    }

    /// Clear bit `index`, superseding any pending pulse on it.
    pub fn clear(&mut self, index: usize) {
        self.write(index, false);
    }

    /// Write bit `index` to `value`, superseding any pending pulse on it.
    pub fn write(&mut self, index: usize, value: bool) {
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = value;
            self.pulse_deadline[index] = None;
        }
    }

    /// Flip bit `index`, superseding any pending pulse on it.
    pub fn toggle(&mut self, index: usize) {
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = !*bit;
            self.pulse_deadline[index] = None;
        }
    }

    /// Set bit `index` and schedule it to clear [`PULSE_CLEAR_MS`] after
    /// `now_ms`. A second pulse before expiry re-arms the deadline; any other
    /// action on the bit cancels it (last writer wins).
    pub fn pulse(&mut self, index: usize, now_ms: u64) {
        if let Some(bit) = self.bits.get_mut(index) {
            *bit = true;
            self.pulse_deadline[index] = Some(now_ms + PULSE_CLEAR_MS);
        }
    }

    /// Expire pulse deadlines that have passed, clearing their bits.
    ///
    /// Must be called with monotonically non-decreasing `now_ms` values from
    /// the owning loop.
    pub fn update(&mut self, now_ms: u64) {
        for (bit, deadline) in self.bits.iter_mut().zip(self.pulse_deadline.iter_mut()) {
            if let Some(t) = *deadline {
                if now_ms >= t {
                    *bit = false;
                    *deadline = None;
                }
            }
        }
    }

    /// Consistent snapshot of the bit values for transmission.
    ///
    /// The owning loop holds the register across one full transmission, so a
    /// borrowed slice is already a consistent view.
    pub fn snapshot(&self) -> &[bool] {
        &self.bits
    }

    /// True if any bit has a pulse waiting to expire.
    pub fn has_pending_pulse(&self) -> bool {
        self.pulse_deadline.iter().any(|d| d.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_pattern_applied_and_padded() {
        let reg = BitRegister::new(5, Some("101"));
        assert_eq!(reg.snapshot(), &[true, false, true, false, false]);
    }

    #[test]
    fn initial_pattern_longer_than_register_is_truncated() {
        let reg = BitRegister::new(2, Some("1111"));
        assert_eq!(reg.snapshot(), &[true, true]);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn missing_pattern_defaults_to_zero() {
        let reg = BitRegister::new(3, None);
        assert_eq!(reg.snapshot(), &[false, false, false]);
    }

    #[test]
    fn non_binary_pattern_chars_count_as_zero() {
        let reg = BitRegister::new(3, Some("1x1"));
        assert_eq!(reg.snapshot(), &[true, false, true]);
    }

    #[test]
    fn set_is_idempotent() {
        let mut reg = BitRegister::new(1, None);
        reg.set(0);
        reg.set(0);
        assert!(reg.get(0));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut reg = BitRegister::new(1, Some("1"));
        reg.clear(0);
        reg.clear(0);
        assert!(!reg.get(0));
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let mut reg = BitRegister::new(2, Some("01"));
        reg.toggle(0);
        reg.toggle(0);
        reg.toggle(1);
        reg.toggle(1);
        assert_eq!(reg.snapshot(), &[false, true]);
    }

    #[test]
    fn pulse_sets_then_clears_after_deadline() {
        let mut reg = BitRegister::new(1, None);
        reg.pulse(0, 500);
        assert!(reg.get(0));

        reg.update(500 + PULSE_CLEAR_MS - 1);
        assert!(reg.get(0));

        reg.update(500 + PULSE_CLEAR_MS);
        assert!(!reg.get(0));
        assert!(!reg.has_pending_pulse());
    }

    #[test]
    fn set_supersedes_pending_pulse() {
        let mut reg = BitRegister::new(1, None);
        reg.pulse(0, 0);
        reg.set(0);

        // The scheduled clear no longer applies.
        reg.update(PULSE_CLEAR_MS * 2);
        assert!(reg.get(0));
    }

    #[test]
    fn repulse_rearms_deadline() {
        let mut reg = BitRegister::new(1, None);
        reg.pulse(0, 0);
        reg.pulse(0, 50);

        reg.update(PULSE_CLEAR_MS);
        assert!(reg.get(0), "first deadline superseded by second pulse");

        reg.update(50 + PULSE_CLEAR_MS);
        assert!(!reg.get(0));
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut reg = BitRegister::new(2, None);
        reg.set(9);
        reg.toggle(9);
        reg.pulse(9, 0);
        assert_eq!(reg.snapshot(), &[false, false]);
    }
}
