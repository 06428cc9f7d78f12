//! ESP32 hardware abstraction layer for the track-occupancy sensor.
//!
//! This module provides hardware implementations for an ESP32 board
//! wired to a 74HC4067 16-channel multiplexer carrying the track
//! contacts.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32-C3 SuperMini (RISC-V 160MHz, 4MB Flash)
//! - **Multiplexer**: 74HC4067, enable pin hard-wired low
//! - **Contacts**: up to 16 track contacts against GND, signal pulled up
//! - **Display**: SSD1306 128x64 OLED (I2C)
//!
//! # Pin Assignments
//!
//! See the [`pins`] module for GPIO assignments matching the SuperMini layout.

mod clock;
mod mux;

pub use clock::Esp32Clock;
pub use mux::Esp32Mux;

#[cfg(feature = "display")]
mod display;
#[cfg(feature = "display")]
pub use display::Esp32Display;

#[cfg(feature = "wifi")]
mod wifi;
#[cfg(feature = "wifi")]
pub use wifi::Esp32Wifi;

/// Pin assignments for SuperMini ESP32-C3.
///
/// The 74HC4067 enable pin is tied to GND on the carrier board, so only
/// the four address lines and the shared signal line are wired to GPIOs.
pub mod pins {
    // =========================================================================
    // Multiplexer (74HC4067)
    // =========================================================================

    /// Address select bit 0 (S0 on 74HC4067)
    pub const MUX_S0: i32 = 2;

    /// Address select bit 1 (S1 on 74HC4067)
    pub const MUX_S1: i32 = 3;

    /// Address select bit 2 (S2 on 74HC4067)
    pub const MUX_S2: i32 = 4;

    /// Address select bit 3 (S3 on 74HC4067)
    pub const MUX_S3: i32 = 5;

    /// Shared signal line (SIG on 74HC4067), input with pull-up
    pub const MUX_SIG: i32 = 6;

    // =========================================================================
    // I2C Display (SSD1306)
    // =========================================================================

    /// I2C data line (also has onboard blue LED - will flicker during I2C)
    pub const I2C_SDA: i32 = 8;

    /// I2C clock line (also shared with BOOT button - only affects programming)
    pub const I2C_SCL: i32 = 9;

    /// Default I2C address for SSD1306 OLED
    pub const OLED_I2C_ADDR: u8 = 0x3C;
}
