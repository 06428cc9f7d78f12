//! SSD1306 OLED status screen implementation for ESP32.
//!
//! Renders the sensor status on a 128x64 pixel display:
//! - Per-contact occupancy row with a channel-number ruler
//! - Device hash and firmware version
//! - Central station link state
//! - Local IP address
//!
//! # Wiring
//!
//! - SDA → GPIO8 (also has onboard LED)
//! - SCL → GPIO9 (also shared with BOOT button)
//! - VCC → 3.3V
//! - GND → GND

use core::fmt::Write as _;

use crate::traits::{StatusDisplay, StatusView};
use embedded_graphics::{
    mono_font::{ascii::FONT_6X10, MonoTextStyle},
    pixelcolor::BinaryColor,
    prelude::*,
    text::Text,
};
use esp_idf_hal::i2c::I2cDriver;
use ssd1306::{mode::BufferedGraphicsMode, prelude::*, I2CDisplayInterface, Ssd1306};

/// Crate version shown on the hash line.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Channel-number ruler under the contact row (every second channel).
const RULER: &str = " 2 4 6 8 0 2 4 6";

/// SSD1306 display type alias for cleaner code.
type DisplayDriver<'d> = Ssd1306<
    I2CInterface<I2cDriver<'d>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// SSD1306 OLED status screen for ESP32.
///
/// Uses I2C on GPIO8 (SDA) and GPIO9 (SCL) to communicate with a 128x64 OLED.
///
/// # Display Layout
///
/// ```text
/// ┌────────────────────────────┐
/// │ #--#-----------#           │  contact row
/// │  2 4 6 8 0 2 4 6           │  channel ruler
/// │                            │
/// │ Hash:474C  v0.1.0          │
/// │ CS: OK   .178.112          │
/// │  192.168.178.122           │
/// └────────────────────────────┘
/// ```
pub struct Esp32Display<'d> {
    display: DisplayDriver<'d>,
    station_tail: heapless::String<16>,
}

impl<'d> Esp32Display<'d> {
    /// Creates a new display instance.
    ///
    /// # Arguments
    ///
    /// * `i2c` - I2C driver configured for GPIO8/9
    /// * `station_host` - station address, trailing part shown on the CS line
    pub fn new(i2c: I2cDriver<'d>, station_host: &str) -> Result<Self, DisplayError> {
        let interface = I2CDisplayInterface::new(i2c);
        let display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
            .into_buffered_graphics_mode();

        // Last two octets are enough to recognize the station.
        let mut station_tail = heapless::String::new();
        let tail = match station_host.match_indices('.').nth(1) {
            Some((i, _)) => &station_host[i..],
            None => station_host,
        };
        for c in tail.chars() {
            if station_tail.push(c).is_err() {
                break;
            }
        }

        Ok(Self {
            display,
            station_tail,
        })
    }
}

impl StatusDisplay for Esp32Display<'_> {
    type Error = DisplayError;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.display.init()?;
        self.clear()
    }

    fn clear(&mut self) -> Result<(), Self::Error> {
        self.display.clear(BinaryColor::Off)?;
        self.display.flush()?;
        Ok(())
    }

    fn render(&mut self, view: &StatusView) -> Result<(), Self::Error> {
        self.display.clear(BinaryColor::Off)?;

        let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

        // Contact row with the channel ruler under it
        Text::new(view.contacts.as_str(), Point::new(4, 10), text_style)
            .draw(&mut self.display)?;
        Text::new(RULER, Point::new(4, 22), text_style).draw(&mut self.display)?;

        // Hash and firmware version
        let mut line: heapless::String<24> = heapless::String::new();
        let _ = write!(line, "Hash:{}  v{}", view.hash, VERSION);
        Text::new(line.as_str(), Point::new(4, 38), text_style).draw(&mut self.display)?;

        // Central station link state
        let mut cs_line: heapless::String<24> = heapless::String::new();
        let cs_state = if view.link_up { "OK " } else { "ERR" };
        let _ = write!(cs_line, "CS: {} {:>8}", cs_state, self.station_tail.as_str());
        Text::new(cs_line.as_str(), Point::new(4, 50), text_style).draw(&mut self.display)?;

        // Local IP
        Text::new(view.ip.as_str(), Point::new(4, 62), text_style).draw(&mut self.display)?;

        self.display.flush()?;
        Ok(())
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Self::Error> {
        self.display.clear(BinaryColor::Off)?;

        let text_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);

        // Center the text vertically
        Text::new(line1, Point::new(4, 24), text_style).draw(&mut self.display)?;

        if let Some(l2) = line2 {
            Text::new(l2, Point::new(4, 40), text_style).draw(&mut self.display)?;
        }

        self.display.flush()?;
        Ok(())
    }
}

/// Display error type.
#[derive(Debug)]
pub struct DisplayError;

impl From<display_interface::DisplayError> for DisplayError {
    fn from(_: display_interface::DisplayError) -> Self {
        DisplayError
    }
}
