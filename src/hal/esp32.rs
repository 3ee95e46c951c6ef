//! ESP32 GPIO implementations of the panel lines.
//!
//! The shift-and-store chain (74HC595 / MIC5891 style parts) hangs off three
//! GPIO outputs; three more drive the status indicators. Any free output
//! pins work, the defaults used in the wiring docs are:
//!
//! - GPIO2 → clock
//! - GPIO3 → data
//! - GPIO4 → strobe
//! - GPIO5/6/7 → received / acknowledge / error indicators

use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{Output, OutputPin, PinDriver};
use esp_idf_hal::peripheral::Peripheral;

use crate::traits::{ShiftBus, StatusLines};

/// Clock/strobe hold time in microseconds.
///
/// The common shift-and-store parts need well under a microsecond of pulse
/// width; one full microsecond leaves margin for slow wiring.
pub const PULSE_HOLD_US: u32 = 1;

/// Shift-register bus over three GPIO outputs.
///
/// # Example
///
/// ```ignore
/// use rs_railpanel::hal::esp32::Esp32ShiftBus;
///
/// let peripherals = Peripherals::take()?;
/// let bus = Esp32ShiftBus::new(
///     peripherals.pins.gpio2,
///     peripherals.pins.gpio3,
///     peripherals.pins.gpio4,
/// )?;
/// ```
pub struct Esp32ShiftBus<'d, CLK, DAT, STB>
where
    CLK: OutputPin,
    DAT: OutputPin,
    STB: OutputPin,
{
    clock: PinDriver<'d, CLK, Output>,
    data: PinDriver<'d, DAT, Output>,
    strobe: PinDriver<'d, STB, Output>,
}

impl<'d, CLK, DAT, STB> Esp32ShiftBus<'d, CLK, DAT, STB>
where
    CLK: OutputPin,
    DAT: OutputPin,
    STB: OutputPin,
{
    /// Creates the bus with all three lines driven low.
    pub fn new(
        clock_pin: impl Peripheral<P = CLK> + 'd,
        data_pin: impl Peripheral<P = DAT> + 'd,
        strobe_pin: impl Peripheral<P = STB> + 'd,
    ) -> Result<Self, esp_idf_hal::sys::EspError> {
        let mut clock = PinDriver::output(clock_pin)?;
        let mut data = PinDriver::output(data_pin)?;
        let mut strobe = PinDriver::output(strobe_pin)?;
        clock.set_low()?;
        data.set_low()?;
        strobe.set_low()?;
        Ok(Self {
            clock,
            data,
            strobe,
        })
    }
}

impl<'d, CLK, DAT, STB> ShiftBus for Esp32ShiftBus<'d, CLK, DAT, STB>
where
    CLK: OutputPin,
    DAT: OutputPin,
    STB: OutputPin,
{
    type Error = esp_idf_hal::sys::EspError;

    fn set_data(&mut self, level: bool) -> Result<(), Self::Error> {
        if level {
            self.data.set_high()
        } else {
            self.data.set_low()
        }
    }

    fn pulse_clock(&mut self) -> Result<(), Self::Error> {
        self.clock.set_high()?;
        Ets::delay_us(PULSE_HOLD_US);
        self.clock.set_low()
    }

    fn pulse_strobe(&mut self) -> Result<(), Self::Error> {
        self.strobe.set_high()?;
        Ets::delay_us(PULSE_HOLD_US);
        self.strobe.set_low()
    }
}

/// Status indicator lines over three GPIO outputs.
pub struct Esp32StatusLines<'d, RCV, ACK, ERR>
where
    RCV: OutputPin,
    ACK: OutputPin,
    ERR: OutputPin,
{
    received: PinDriver<'d, RCV, Output>,
    acknowledge: PinDriver<'d, ACK, Output>,
    error: PinDriver<'d, ERR, Output>,
}

impl<'d, RCV, ACK, ERR> Esp32StatusLines<'d, RCV, ACK, ERR>
where
    RCV: OutputPin,
    ACK: OutputPin,
    ERR: OutputPin,
{
    /// Creates the lines with all three outputs low.
    pub fn new(
        received_pin: impl Peripheral<P = RCV> + 'd,
        acknowledge_pin: impl Peripheral<P = ACK> + 'd,
        error_pin: impl Peripheral<P = ERR> + 'd,
    ) -> Result<Self, esp_idf_hal::sys::EspError> {
        let mut received = PinDriver::output(received_pin)?;
        let mut acknowledge = PinDriver::output(acknowledge_pin)?;
        let mut error = PinDriver::output(error_pin)?;
        received.set_low()?;
        acknowledge.set_low()?;
        error.set_low()?;
        Ok(Self {
            received,
            acknowledge,
            error,
        })
    }
}

impl<'d, RCV, ACK, ERR> StatusLines for Esp32StatusLines<'d, RCV, ACK, ERR>
where
    RCV: OutputPin,
    ACK: OutputPin,
    ERR: OutputPin,
{
    type Error = esp_idf_hal::sys::EspError;

    fn set_received(&mut self, on: bool) -> Result<(), Self::Error> {
        if on {
            self.received.set_high()
        } else {
            self.received.set_low()
        }
    }

    fn set_acknowledge(&mut self, on: bool) -> Result<(), Self::Error> {
        if on {
            self.acknowledge.set_high()
        } else {
            self.acknowledge.set_low()
        }
    }

    fn set_error(&mut self, on: bool) -> Result<(), Self::Error> {
        if on {
            self.error.set_high()
        } else {
            self.error.set_low()
        }
    }
}
