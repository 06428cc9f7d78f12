//! Hardware abstraction traits for the multiplexer bus and time source.
//!
//! This module defines the hardware interfaces that allow rs-trackstate to
//! work across different platforms (ESP32, desktop mocks, etc.).
//!
//! # Key Traits
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`MuxBus`] | 74HC4067 address select and signal line sampling |
//! | [`Clock`] | Time source for `no_std` environments |
//!
//! # Implementation
//!
//! For testing and desktop development, use the mock implementations
//! from [`crate::hal::mock`]. For ESP32 hardware, use the
//! implementations from `hal::esp32` (requires `esp32` feature).

/// Multiplexer bus trait - abstracts the electrical interface to a
/// 74HC4067-style analog/digital multiplexer.
///
/// One physical chip provides all three concerns, so they live on one
/// trait: driving the four address-select lines, sampling the shared
/// signal line, and a microsecond delay for spacing samples.
///
/// # Implementation Notes
///
/// - `select` drives the address lines to the binary encoding of `addr`;
///   only the low 4 bits are meaningful
/// - The signal line is expected to be pulled up; a closed contact pulls
///   it low, so `signal_is_low` returning `true` means "contact active"
/// - `delay_us` must actually block for the requested time on hardware;
///   mocks may just count calls
///
/// # Example Implementation
///
/// ```rust,ignore
/// use rs_trackstate::traits::MuxBus;
///
/// struct MyMux { /* pin handles */ }
///
/// impl MuxBus for MyMux {
///     fn select(&mut self, addr: u8) {
///         // Drive S0..S3 to the bits of addr...
///     }
///
///     fn signal_is_low(&mut self) -> bool {
///         // Read the SIG input...
///         false
///     }
///
///     fn delay_us(&mut self, us: u32) {
///         // Busy-wait or timer delay...
///     }
/// }
/// ```
pub trait MuxBus {
    /// Drive the address-select lines to the binary encoding of `addr`.
    ///
    /// Propagation delay through the mux is assumed negligible versus
    /// the sample spacing.
    fn select(&mut self, addr: u8);

    /// Sample the shared signal line once.
    ///
    /// Returns `true` when the line reads low (contact closed).
    fn signal_is_low(&mut self) -> bool;

    /// Block for the given number of microseconds.
    fn delay_us(&mut self, us: u32);
}

/// Time source trait for `no_std` compatibility.
///
/// Provides monotonic time in milliseconds for liveness cadence and the
/// frame time counter. On desktop, this can wrap `std::time::Instant`.
/// On embedded, use a hardware timer.
///
/// # Example
///
/// ```rust
/// use rs_trackstate::traits::Clock;
/// use rs_trackstate::hal::MockClock;
///
/// let mut clock = MockClock::new();
/// assert_eq!(clock.now_ms(), 0);
///
/// clock.advance(100);
/// assert_eq!(clock.now_ms(), 100);
/// ```
pub trait Clock {
    /// Returns current time in milliseconds since an arbitrary epoch.
    ///
    /// Must be monotonically increasing.
    fn now_ms(&self) -> u64;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestMux {
        selected: u8,
        low: bool,
        delayed: u64,
    }

    impl MuxBus for TestMux {
        fn select(&mut self, addr: u8) {
            self.selected = addr;
        }

        fn signal_is_low(&mut self) -> bool {
            self.low
        }

        fn delay_us(&mut self, us: u32) {
            self.delayed += us as u64;
        }
    }

    #[test]
    fn mux_bus_select_and_sample() {
        let mut mux = TestMux {
            selected: 0,
            low: true,
            delayed: 0,
        };

        mux.select(0b1010);
        assert_eq!(mux.selected, 0b1010);
        assert!(mux.signal_is_low());

        mux.delay_us(250);
        mux.delay_us(250);
        assert_eq!(mux.delayed, 500);
    }
}
