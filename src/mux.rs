//! Debounced channel reader for the 74HC4067 16-channel multiplexer.
//!
//! The mux routes one of up to 16 track contacts onto a single shared
//! signal line, selected by four address pins. Track contacts bounce and
//! the line picks up noise, so a single sample is worthless: each read
//! takes up to [`CHECK_MAX`] samples spaced [`CHECK_DELAY_US`] apart and
//! declares the contact closed as soon as [`CHECK_MIN_ZEROS`] low
//! readings have accumulated.
//!
//! The early exit means a firmly-closed contact resolves after
//! `min_zeros` samples, while an open or merely glitching contact costs
//! the full budget. Worst-case latency per channel is bounded by
//! `check_max * delay_us`, so a full [`MuxReader::read_all`] sweep is
//! bounded by `ports * check_max * delay_us`.
//!
//! # Example
//!
//! ```rust
//! use rs_trackstate::mux::MuxReader;
//! use rs_trackstate::hal::MockMux;
//!
//! let mut bus = MockMux::new();
//! bus.set_contact(3, true);
//!
//! let mut reader = MuxReader::new(bus);
//! assert_eq!(reader.read_all(), 1 << 3);
//! ```

use crate::traits::MuxBus;

/// Maximum samples taken per channel before declaring it open.
pub const CHECK_MAX: u16 = 100;

/// Low readings required to declare a channel set.
pub const CHECK_MIN_ZEROS: u16 = 20;

/// Spacing between samples in microseconds.
pub const CHECK_DELAY_US: u32 = 250;

/// Default number of mux input ports.
pub const PORTS_DEFAULT: u8 = 16;

/// Hard upper limit on ports (the 74HC4067 has 16 inputs and the state
/// vector is 16 bits).
pub const PORTS_MAX: u8 = 16;

/// Debounce filter parameters.
///
/// `min_zeros` low readings out of at most `check_max` samples, spaced
/// `delay_us` apart, are required to accept a channel as set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Debounce {
    /// Sample budget per channel.
    pub check_max: u16,
    /// Low-reading threshold for accepting a channel as set.
    pub min_zeros: u16,
    /// Delay between samples in microseconds.
    pub delay_us: u32,
}

impl Default for Debounce {
    fn default() -> Self {
        Self {
            check_max: CHECK_MAX,
            min_zeros: CHECK_MIN_ZEROS,
            delay_us: CHECK_DELAY_US,
        }
    }
}

/// Debounced reader over a [`MuxBus`].
///
/// Each call is self-contained: no sampling state is carried between
/// reads, only the address lines are left at the last selected channel.
pub struct MuxReader<B: MuxBus> {
    bus: B,
    ports: u8,
    debounce: Debounce,
}

impl<B: MuxBus> MuxReader<B> {
    /// Creates a reader with the default 16 ports and default debounce.
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            ports: PORTS_DEFAULT,
            debounce: Debounce::default(),
        }
    }

    /// Sets the number of ports to sweep (clamped to 1..=16).
    pub fn with_ports(mut self, ports: u8) -> Self {
        self.ports = ports.clamp(1, PORTS_MAX);
        self
    }

    /// Sets the debounce parameters.
    pub fn with_debounce(mut self, debounce: Debounce) -> Self {
        self.debounce = debounce;
        self
    }

    /// Number of ports swept by [`read_all`](Self::read_all).
    #[inline]
    pub fn ports(&self) -> u8 {
        self.ports
    }

    /// Reads a single channel.
    ///
    /// Drives the address lines, then samples until the low-reading
    /// threshold is reached (set) or the budget is exhausted (open).
    pub fn read(&mut self, addr: u8) -> bool {
        self.bus.select(addr);
        self.sample_selected()
    }

    /// Reads every configured channel in ascending address order and
    /// packs the results into a state vector, bit `i` = channel `i`.
    pub fn read_all(&mut self) -> u16 {
        let mut vector = 0u16;
        for addr in 0..self.ports {
            if self.read(addr) {
                vector |= 1 << addr;
            }
        }
        vector
    }

    /// Consumes the reader, returning the bus.
    pub fn release(self) -> B {
        self.bus
    }

    /// Access to the underlying bus (mock inspection in tests).
    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Mutable access to the underlying bus.
    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    fn sample_selected(&mut self) -> bool {
        let mut zeros = 0u16;
        for _ in 0..self.debounce.check_max {
            if self.bus.signal_is_low() {
                zeros += 1;
                if zeros >= self.debounce.min_zeros {
                    return true;
                }
            }
            self.bus.delay_us(self.debounce.delay_us);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::MockMux;

    fn reader(bus: MockMux) -> MuxReader<MockMux> {
        MuxReader::new(bus)
    }

    #[test]
    fn all_open_reads_zero() {
        let mut r = reader(MockMux::new());
        assert_eq!(r.read_all(), 0);
    }

    #[test]
    fn closed_contacts_set_their_bits() {
        let mut bus = MockMux::new();
        bus.set_contact(0, true);
        bus.set_contact(2, true);
        bus.set_contact(15, true);

        let mut r = reader(bus);
        assert_eq!(r.read_all(), 0b1000_0000_0000_0101);
    }

    #[test]
    fn single_read_selects_address() {
        let mut r = reader(MockMux::new());
        r.bus_mut().set_contact(7, true);

        assert!(r.read(7));
        assert!(!r.read(6));
        assert_eq!(r.bus().selected, 6);
    }

    #[test]
    fn sweep_selects_ascending_addresses() {
        let mut r = reader(MockMux::new()).with_ports(4);
        r.read_all();
        assert_eq!(r.bus().select_history, [0, 1, 2, 3]);
    }

    #[test]
    fn early_exit_on_threshold() {
        let mut bus = MockMux::new();
        bus.set_contact(0, true);

        let mut r = reader(bus).with_ports(1);
        assert!(r.read(0));

        // A firmly-closed contact resolves after min_zeros samples; the
        // delay between samples only runs for the first min_zeros - 1.
        assert_eq!(
            r.bus().delayed_us,
            (CHECK_MIN_ZEROS as u64 - 1) * CHECK_DELAY_US as u64
        );
    }

    #[test]
    fn open_channel_exhausts_budget() {
        let mut r = reader(MockMux::new()).with_ports(1);
        assert!(!r.read(0));
        assert_eq!(
            r.bus().delayed_us,
            CHECK_MAX as u64 * CHECK_DELAY_US as u64
        );
    }

    #[test]
    fn glitch_below_threshold_is_rejected() {
        let mut bus = MockMux::new();
        // A bounce burst of min_zeros - 1 low readings, then the line
        // settles high again: must read as open.
        let burst = CHECK_MIN_ZEROS as usize - 1;
        let mut script = alloc::vec![true; burst];
        script.resize(CHECK_MAX as usize, false);
        bus.push_samples(0, &script);

        let mut r = reader(bus).with_ports(1);
        assert!(!r.read(0));
    }

    #[test]
    fn scattered_lows_accumulate() {
        let mut bus = MockMux::new();
        // Lows need not be consecutive; an alternating line still
        // reaches the threshold within the budget.
        let mut script = alloc::vec::Vec::new();
        for i in 0..CHECK_MAX as usize {
            script.push(i % 2 == 0);
        }
        bus.push_samples(0, &script);

        let mut r = reader(bus).with_ports(1);
        assert!(r.read(0));
    }

    #[test]
    fn ports_clamped() {
        let r = reader(MockMux::new()).with_ports(0);
        assert_eq!(r.ports(), 1);
        let r = reader(MockMux::new()).with_ports(200);
        assert_eq!(r.ports(), PORTS_MAX);
    }

    #[test]
    fn custom_debounce_budget() {
        let mut bus = MockMux::new();
        bus.set_contact(0, true);

        let mut r = reader(bus).with_ports(1).with_debounce(Debounce {
            check_max: 10,
            min_zeros: 3,
            delay_us: 50,
        });

        assert!(r.read(0));
        assert_eq!(r.bus().delayed_us, 2 * 50);
    }
}
