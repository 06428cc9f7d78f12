//! Display abstraction for the on-device status screen.
//!
//! This module defines the [`StatusDisplay`] trait for rendering the
//! contact summary and link health to various display devices (OLED,
//! simulated displays for testing, etc.).

use heapless::String as HString;

use crate::mcan::DeviceHash;

/// Fixed-width contact summary, one character per channel.
pub type ContactSummary = HString<16>;

/// Dotted-quad IPv4 address string ("255.255.255.255" is 15 chars).
pub type IpString = HString<16>;

/// Snapshot of everything the status screen shows.
///
/// Built by the poll loop on every confirmed change and on every
/// liveness flip; the display renders it however it likes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StatusView {
    /// One character per channel, `#` = contact closed, `-` = open.
    pub contacts: ContactSummary,
    /// Most recent reachability of the central station.
    pub link_up: bool,
    /// Device hash tagged onto every outgoing frame.
    pub hash: DeviceHash,
    /// Local station-mode IP address, empty until known.
    pub ip: IpString,
}

/// Display trait for rendering sensor status.
///
/// Implementors provide hardware-specific rendering for displays like
/// SSD1306 OLED or simulated displays for testing.
///
/// # Example
///
/// ```ignore
/// use rs_trackstate::traits::{StatusDisplay, StatusView};
///
/// struct MyDisplay { /* ... */ }
///
/// impl StatusDisplay for MyDisplay {
///     type Error = ();
///
///     fn init(&mut self) -> Result<(), ()> { Ok(()) }
///     fn clear(&mut self) -> Result<(), ()> { Ok(()) }
///     fn render(&mut self, view: &StatusView) -> Result<(), ()> {
///         // Draw contact row, hash, link state, IP...
///         Ok(())
///     }
///     fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), ()> {
///         Ok(())
///     }
/// }
/// ```
pub trait StatusDisplay {
    /// Error type for display operations.
    type Error;

    /// Initializes the display hardware.
    ///
    /// Called once at startup.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Clears the display.
    fn clear(&mut self) -> Result<(), Self::Error>;

    /// Renders the current sensor status.
    ///
    /// Called on every confirmed contact change and whenever the link
    /// health flips. Implementations should display:
    /// - The per-contact occupancy row
    /// - The device hash
    /// - Central station link state (OK / ERR)
    /// - The local IP address
    fn render(&mut self, view: &StatusView) -> Result<(), Self::Error>;

    /// Shows a simple message (e.g., for startup or errors).
    ///
    /// # Arguments
    ///
    /// * `line1` - First line of text
    /// * `line2` - Optional second line of text
    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), Self::Error>;
}
