//! Mock implementations for testing without hardware.
//!
//! This module provides test doubles for all hardware and network traits,
//! enabling development and testing on desktop without physical hardware.
//!
//! # Available Mocks
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockMux`] | [`MuxBus`] | Steady contact levels plus scripted noise |
//! | [`MockClock`] | [`Clock`] | Controllable time source |
//! | [`MockProbe`] | [`LinkProbe`] | Settable/scripted reachability |
//! | [`MockLink`] | [`ControllerLink`] | Captures sent frames, injectable failures |
//! | [`MockDisplay`] | [`StatusDisplay`] | Records render calls |
//!
//! # Example
//!
//! ```rust
//! use rs_trackstate::mux::MuxReader;
//! use rs_trackstate::hal::MockMux;
//!
//! let mut bus = MockMux::new();
//! bus.set_contact(5, true);
//!
//! let mut reader = MuxReader::new(bus);
//! assert_eq!(reader.read_all(), 1 << 5);
//! ```
//!
//! [`MuxBus`]: crate::traits::MuxBus
//! [`Clock`]: crate::traits::Clock
//! [`LinkProbe`]: crate::traits::LinkProbe
//! [`ControllerLink`]: crate::traits::ControllerLink
//! [`StatusDisplay`]: crate::traits::StatusDisplay

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use crate::mcan::TrackFrame;
use crate::traits::{
    Clock, ControllerLink, LinkProbe, MuxBus, StatusDisplay, StatusView,
};

// ============================================================================
// Hardware Mocks
// ============================================================================

/// Mock multiplexer bus.
///
/// Each channel has a steady contact level plus an optional script of
/// raw line readings that are consumed one per sample before falling
/// back to the steady level. Scripts make bounce and noise testable:
/// push the exact sequence of low readings the line would produce.
///
/// # Example
///
/// ```rust
/// use rs_trackstate::hal::MockMux;
/// use rs_trackstate::traits::MuxBus;
///
/// let mut mux = MockMux::new();
/// mux.set_contact(2, true);
///
/// mux.select(2);
/// assert!(mux.signal_is_low());
/// mux.select(3);
/// assert!(!mux.signal_is_low());
/// ```
#[derive(Debug, Default)]
pub struct MockMux {
    /// Currently selected channel address.
    pub selected: u8,
    /// Every address latched via `select`, in order.
    pub select_history: Vec<u8>,
    /// Total number of `delay_us` calls.
    pub delay_calls: u32,
    /// Accumulated requested delay in microseconds.
    pub delayed_us: u64,
    contacts: [bool; 16],
    scripts: [VecDeque<bool>; 16],
}

impl MockMux {
    /// Creates a mux with all contacts open and no scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the steady level of a contact (`true` = closed, line low).
    pub fn set_contact(&mut self, channel: u8, closed: bool) {
        self.contacts[channel as usize & 0x0F] = closed;
    }

    /// Queues raw line readings for a channel (`true` = line reads
    /// low). Consumed one per sample, ahead of the steady level.
    pub fn push_samples(&mut self, channel: u8, readings: &[bool]) {
        self.scripts[channel as usize & 0x0F].extend(readings.iter().copied());
    }

    /// Clears recorded history and pending scripts, keeping levels.
    pub fn reset_history(&mut self) {
        self.select_history.clear();
        self.delay_calls = 0;
        self.delayed_us = 0;
        for s in &mut self.scripts {
            s.clear();
        }
    }
}

impl MuxBus for MockMux {
    fn select(&mut self, addr: u8) {
        self.selected = addr;
        self.select_history.push(addr);
    }

    fn signal_is_low(&mut self) -> bool {
        let ch = self.selected as usize & 0x0F;
        self.scripts[ch]
            .pop_front()
            .unwrap_or(self.contacts[ch])
    }

    fn delay_us(&mut self, us: u32) {
        self.delay_calls += 1;
        self.delayed_us += us as u64;
    }
}

/// Mock clock with controllable time.
///
/// # Example
///
/// ```rust
/// use rs_trackstate::hal::MockClock;
/// use rs_trackstate::traits::Clock;
///
/// let mut clock = MockClock::new();
/// clock.advance(150);
/// assert_eq!(clock.now_ms(), 150);
/// ```
#[derive(Debug, Default)]
pub struct MockClock {
    now_ms: u64,
}

impl MockClock {
    /// Creates a clock starting at time zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by `ms` milliseconds.
    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    /// Sets the absolute time.
    pub fn set(&mut self, ms: u64) {
        self.now_ms = ms;
    }
}

impl Clock for MockClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

// ============================================================================
// Network Mocks
// ============================================================================

/// Mock reachability probe.
///
/// Returns queued results first, then the steady `up` value. Counts
/// calls so tests can assert the probe cadence.
#[derive(Debug, Default)]
pub struct MockProbe {
    /// Steady result once the queue is empty.
    pub up: bool,
    /// Number of probe calls so far.
    pub calls: u32,
    queued: VecDeque<bool>,
}

impl MockProbe {
    /// Creates a probe that always succeeds.
    pub fn up() -> Self {
        Self {
            up: true,
            ..Self::default()
        }
    }

    /// Creates a probe that always fails.
    pub fn down() -> Self {
        Self::default()
    }

    /// Queues one-shot probe results ahead of the steady value.
    pub fn queue_results(&mut self, results: &[bool]) {
        self.queued.extend(results.iter().copied());
    }
}

impl LinkProbe for MockProbe {
    fn probe(&mut self) -> bool {
        self.calls += 1;
        self.queued.pop_front().unwrap_or(self.up)
    }
}

/// Mock station link.
///
/// Captures every frame written while connected, and can be told to
/// fail the connect or to fail sends after a fixed number of frames.
#[derive(Debug, Default)]
pub struct MockLink {
    /// All frames successfully "sent" over the lifetime of the mock.
    pub frames: Vec<TrackFrame>,
    /// Number of connect calls.
    pub connect_calls: u32,
    /// Number of close calls.
    pub close_calls: u32,
    /// When true, `connect` fails.
    pub fail_connect: bool,
    /// When set, `send_frame` fails once this many frames were sent.
    pub fail_after: Option<usize>,
    connected: bool,
}

impl MockLink {
    /// Creates a link that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ControllerLink for MockLink {
    type Error = ();

    fn connect(&mut self) -> Result<(), ()> {
        self.connect_calls += 1;
        if self.fail_connect {
            return Err(());
        }
        self.connected = true;
        Ok(())
    }

    fn send_frame(&mut self, frame: &TrackFrame) -> Result<(), ()> {
        if !self.connected {
            return Err(());
        }
        if let Some(limit) = self.fail_after {
            if self.frames.len() >= limit {
                return Err(());
            }
        }
        self.frames.push(*frame);
        Ok(())
    }

    fn close(&mut self) {
        self.close_calls += 1;
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }
}

// ============================================================================
// Display Mock
// ============================================================================

/// Mock status display that records every call.
#[derive(Debug, Default)]
pub struct MockDisplay {
    /// Every rendered view, in order.
    pub renders: Vec<StatusView>,
    /// Every message shown, in order.
    pub messages: Vec<(String, Option<String>)>,
    /// Number of init calls.
    pub init_calls: u32,
    /// Number of clear calls.
    pub clear_calls: u32,
}

impl MockDisplay {
    /// Creates an empty display recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently rendered view, if any.
    pub fn last_render(&self) -> Option<&StatusView> {
        self.renders.last()
    }
}

impl StatusDisplay for MockDisplay {
    type Error = ();

    fn init(&mut self) -> Result<(), ()> {
        self.init_calls += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), ()> {
        self.clear_calls += 1;
        Ok(())
    }

    fn render(&mut self, view: &StatusView) -> Result<(), ()> {
        self.renders.push(view.clone());
        Ok(())
    }

    fn show_message(&mut self, line1: &str, line2: Option<&str>) -> Result<(), ()> {
        self.messages
            .push((String::from(line1), line2.map(String::from)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mux_scripts_run_before_steady_level() {
        let mut mux = MockMux::new();
        mux.set_contact(0, true);
        mux.push_samples(0, &[false, false]);

        mux.select(0);
        assert!(!mux.signal_is_low());
        assert!(!mux.signal_is_low());
        // Script exhausted, steady level takes over.
        assert!(mux.signal_is_low());
    }

    #[test]
    fn mux_records_selects_and_delays() {
        let mut mux = MockMux::new();
        mux.select(1);
        mux.select(9);
        mux.delay_us(250);

        assert_eq!(mux.select_history, [1, 9]);
        assert_eq!(mux.delay_calls, 1);
        assert_eq!(mux.delayed_us, 250);
    }

    #[test]
    fn probe_queue_then_steady() {
        let mut probe = MockProbe::up();
        probe.queue_results(&[false]);

        assert!(!probe.probe());
        assert!(probe.probe());
        assert_eq!(probe.calls, 2);
    }

    #[test]
    fn link_requires_connect() {
        let mut link = MockLink::new();
        let frame = TrackFrame::from_bytes([0; 13]);

        assert!(link.send_frame(&frame).is_err());
        link.connect().unwrap();
        assert!(link.send_frame(&frame).is_ok());

        link.close();
        assert!(!link.is_connected());
        assert!(link.send_frame(&frame).is_err());
    }

    #[test]
    fn link_fail_after_limit() {
        let mut link = MockLink::new();
        link.fail_after = Some(1);
        link.connect().unwrap();

        let frame = TrackFrame::from_bytes([0; 13]);
        assert!(link.send_frame(&frame).is_ok());
        assert!(link.send_frame(&frame).is_err());
        assert_eq!(link.frames.len(), 1);
    }
}
