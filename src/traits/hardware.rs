//! Hardware abstraction traits for the shift-register chain and status lines.
//!
//! This module defines the digital-line interfaces that allow rs-railpanel to
//! run against real GPIO (ESP32) or against recording mocks on the desktop.
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`ShiftBus`] | Clock/data/strobe lines of the shift-and-store chain |
//! | [`StatusLines`] | Received / acknowledge / error indicator outputs |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations from
//! [`crate::hal::mock`]. For ESP32 hardware, use the implementations from
//! `hal::esp32` (requires the `esp32` feature).
//!
//! # Example
//!
//! ```rust
//! use rs_railpanel::traits::ShiftBus;
//! use rs_railpanel::hal::MockShiftBus;
//!
//! let mut bus = MockShiftBus::new();
//! bus.set_data(true).unwrap();
//! bus.pulse_clock().unwrap();
//! bus.set_data(false).unwrap();
//! bus.pulse_strobe().unwrap();
//! ```

/// Shift-register bus trait - abstracts the three serial lines of a
/// daisy-chained shift-and-store register (e.g. 74HC595, MIC5891).
///
/// The transmitter drives the chain through this trait only; the protocol
/// (bit order, data/clock sequencing, final strobe) lives in
/// [`crate::transmit::ShiftTransmitter`].
///
/// # Implementation Notes
///
/// - `pulse_clock` and `pulse_strobe` drive the line high, hold it for at
///   least the register's minimum pulse width (about 1 microsecond for the
///   common parts), then drive it low again.
/// - Implementations own the hold timing; callers never sleep between line
///   operations.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_railpanel::traits::ShiftBus;
///
/// struct MyBus { /* GPIO handles */ }
///
/// impl ShiftBus for MyBus {
///     type Error = ();
///
///     fn set_data(&mut self, level: bool) -> Result<(), ()> {
///         // drive the serial-data pin
///         Ok(())
///     }
///
///     fn pulse_clock(&mut self) -> Result<(), ()> {
///         // clock high, hold >= 1us, clock low
///         Ok(())
///     }
///
///     fn pulse_strobe(&mut self) -> Result<(), ()> {
///         // strobe high, hold >= 1us, strobe low
///         Ok(())
///     }
/// }
/// ```
pub trait ShiftBus {
    /// Error type for bus operations.
    type Error;

    /// Drive the serial data line to the given level.
    fn set_data(&mut self, level: bool) -> Result<(), Self::Error>;

    /// Pulse the shift clock high then low, shifting the current data level
    /// into the first register stage.
    fn pulse_clock(&mut self) -> Result<(), Self::Error>;

    /// Pulse the strobe (store/latch) line high then low, latching all
    /// shifted stages into the output drivers at once.
    fn pulse_strobe(&mut self) -> Result<(), Self::Error>;
}

/// Status indicator lines: three level-driven outputs next to the panel.
///
/// | Line | Meaning |
/// |------|---------|
/// | received | flashes when any telegram arrives and normalizes |
/// | acknowledge | flashes when a rule matched an event |
/// | error | held high while the panel is in a fault state |
///
/// Flash timing is owned by [`crate::status::StatusPanel`]; implementations
/// only set levels.
pub trait StatusLines {
    /// Error type for line operations.
    type Error;

    /// Drive the message-received line.
    fn set_received(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Drive the rule-acknowledge line.
    fn set_acknowledge(&mut self, on: bool) -> Result<(), Self::Error>;

    /// Drive the error line.
    fn set_error(&mut self, on: bool) -> Result<(), Self::Error>;
}
