//! 74HC4067 multiplexer bus implementation for ESP32.
//!
//! The mux routes one of 16 track contacts onto the shared signal line.
//! Contacts switch against GND, so the signal GPIO uses the internal
//! pull-up and reads low when the selected contact is closed.
//!
//! # Wiring
//!
//! - S0 → GPIO2, S1 → GPIO3, S2 → GPIO4, S3 → GPIO5
//! - SIG → GPIO6 (pull-up)
//! - EN → GND (hard-wired, mux always enabled)
//! - VCC → 3.3V, GND → GND

use crate::traits::MuxBus;
use esp_idf_hal::delay::Ets;
use esp_idf_hal::gpio::{Input, InputPin, Output, OutputPin, PinDriver, Pull};
use esp_idf_hal::peripheral::Peripheral;

/// 74HC4067 bus on ESP32 GPIOs.
///
/// # Example
///
/// ```ignore
/// use rs_trackstate::hal::esp32::Esp32Mux;
/// use rs_trackstate::mux::MuxReader;
///
/// let peripherals = Peripherals::take()?;
/// let bus = Esp32Mux::new(
///     peripherals.pins.gpio2, // S0
///     peripherals.pins.gpio3, // S1
///     peripherals.pins.gpio4, // S2
///     peripherals.pins.gpio5, // S3
///     peripherals.pins.gpio6, // SIG
/// )?;
///
/// let mut reader = MuxReader::new(bus);
/// let vector = reader.read_all();
/// ```
pub struct Esp32Mux<'d, S0, S1, S2, S3, SIG>
where
    S0: OutputPin,
    S1: OutputPin,
    S2: OutputPin,
    S3: OutputPin,
    SIG: InputPin + OutputPin,
{
    s0: PinDriver<'d, S0, Output>,
    s1: PinDriver<'d, S1, Output>,
    s2: PinDriver<'d, S2, Output>,
    s3: PinDriver<'d, S3, Output>,
    sig: PinDriver<'d, SIG, Input>,
}

impl<'d, S0, S1, S2, S3, SIG> Esp32Mux<'d, S0, S1, S2, S3, SIG>
where
    S0: OutputPin,
    S1: OutputPin,
    S2: OutputPin,
    S3: OutputPin,
    SIG: InputPin + OutputPin,
{
    /// Creates a new mux bus instance.
    ///
    /// Configures the address pins as outputs driven low (channel 0
    /// selected) and the signal pin as an input with internal pull-up.
    ///
    /// # Errors
    ///
    /// Returns an error if GPIO initialization fails.
    pub fn new(
        s0_pin: impl Peripheral<P = S0> + 'd,
        s1_pin: impl Peripheral<P = S1> + 'd,
        s2_pin: impl Peripheral<P = S2> + 'd,
        s3_pin: impl Peripheral<P = S3> + 'd,
        sig_pin: impl Peripheral<P = SIG> + 'd,
    ) -> Result<Self, esp_idf_hal::sys::EspError> {
        let mut s0 = PinDriver::output(s0_pin)?;
        let mut s1 = PinDriver::output(s1_pin)?;
        let mut s2 = PinDriver::output(s2_pin)?;
        let mut s3 = PinDriver::output(s3_pin)?;
        let mut sig = PinDriver::input(sig_pin)?;

        // Contacts switch against GND
        sig.set_pull(Pull::Up)?;

        s0.set_low()?;
        s1.set_low()?;
        s2.set_low()?;
        s3.set_low()?;

        Ok(Self { s0, s1, s2, s3, sig })
    }
}

impl<S0, S1, S2, S3, SIG> MuxBus for Esp32Mux<'_, S0, S1, S2, S3, SIG>
where
    S0: OutputPin,
    S1: OutputPin,
    S2: OutputPin,
    S3: OutputPin,
    SIG: InputPin + OutputPin,
{
    fn select(&mut self, addr: u8) {
        // Level writes on a configured output pin cannot fail on ESP32.
        let _ = self.s0.set_level((addr & 0b0001 != 0).into());
        let _ = self.s1.set_level((addr & 0b0010 != 0).into());
        let _ = self.s2.set_level((addr & 0b0100 != 0).into());
        let _ = self.s3.set_level((addr & 0b1000 != 0).into());
    }

    fn signal_is_low(&mut self) -> bool {
        self.sig.is_low()
    }

    fn delay_us(&mut self, us: u32) {
        Ets::delay_us(us);
    }
}
