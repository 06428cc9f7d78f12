//! Contact state tracking: current/recent vectors, diff, and latch.
//!
//! [`ContactStates`] holds two 16-bit vectors: `current` (just sampled)
//! and `recent` (last value reported to the network). The diff between
//! them yields the per-contact transitions for one poll cycle, and the
//! explicit [`latch`](ContactStates::latch) commits `current` as the new
//! baseline.
//!
//! # Ordering and latch discipline
//!
//! [`changes`](ContactStates::changes) always yields transitions in
//! ascending channel order - downstream contact numbering depends on it.
//! The sequence is idempotent: nothing mutates until `latch` is called.
//! The poll loop must latch exactly once per cycle, after consuming the
//! transitions; latching early loses them permanently, never latching
//! reports them again next cycle.
//!
//! # Example
//!
//! ```rust
//! use rs_trackstate::states::ContactStates;
//!
//! let mut states = ContactStates::new();
//! states.set_current(0b101);
//!
//! let changed: Vec<_> = states.changes().collect();
//! assert_eq!(changed.len(), 2);
//! assert_eq!(changed[0].channel, 0);
//! assert_eq!(changed[1].channel, 2);
//!
//! states.latch();
//! assert!(!states.is_changed());
//! ```

use crate::mux::{PORTS_DEFAULT, PORTS_MAX};
use crate::traits::display::ContactSummary;

/// One contact's confirmed change between two poll cycles.
///
/// `old != new` by construction: transitions only come out of the diff
/// between `recent` and `current`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transition {
    /// Channel address, 0-based.
    pub channel: u8,
    /// State last reported to the network.
    pub old: bool,
    /// Freshly sampled state.
    pub new: bool,
}

/// Tracks the current and last-reported contact state vectors.
///
/// Pure state comparison: no I/O, no side effects beyond the explicit
/// latch.
#[derive(Clone, Debug)]
pub struct ContactStates {
    current: u16,
    recent: u16,
    ports: u8,
}

impl Default for ContactStates {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactStates {
    /// Creates a tracker for the default 16 channels, all open.
    pub fn new() -> Self {
        Self {
            current: 0,
            recent: 0,
            ports: PORTS_DEFAULT,
        }
    }

    /// Sets the number of tracked channels (clamped to 1..=16).
    ///
    /// Bits at or above the channel count are masked off on every
    /// `set_current`, so a noisy unused mux input can never produce a
    /// transition.
    pub fn with_ports(mut self, ports: u8) -> Self {
        self.ports = ports.clamp(1, PORTS_MAX);
        self.current &= self.mask();
        self.recent &= self.mask();
        self
    }

    /// Number of tracked channels.
    #[inline]
    pub fn ports(&self) -> u8 {
        self.ports
    }

    /// Records the latest full sample.
    pub fn set_current(&mut self, vector: u16) {
        self.current = vector & self.mask();
    }

    /// The just-sampled vector.
    #[inline]
    pub fn current(&self) -> u16 {
        self.current
    }

    /// The last latched (reported) vector.
    #[inline]
    pub fn recent(&self) -> u16 {
        self.recent
    }

    /// Whether the current sample differs from the latched baseline.
    #[inline]
    pub fn is_changed(&self) -> bool {
        self.current != self.recent
    }

    /// Yields one [`Transition`] per differing bit, in strictly
    /// ascending channel order.
    ///
    /// Calling this twice without an intervening `set_current` or
    /// `latch` yields the same sequence both times.
    pub fn changes(&self) -> Changes {
        Changes {
            current: self.current,
            recent: self.recent,
            channel: 0,
            ports: self.ports,
        }
    }

    /// Commits `current` as the new baseline: `recent := current`.
    pub fn latch(&mut self) {
        self.recent = self.current;
    }

    /// Fixed-width textual summary of the current vector for the status
    /// display: `#` for a closed contact, `-` for open, channel 0 first.
    pub fn summary(&self) -> ContactSummary {
        let mut s = ContactSummary::new();
        for ch in 0..self.ports {
            let c = if self.current & (1 << ch) != 0 { '#' } else { '-' };
            let _ = s.push(c);
        }
        s
    }

    fn mask(&self) -> u16 {
        if self.ports >= 16 {
            u16::MAX
        } else {
            (1u16 << self.ports) - 1
        }
    }
}

/// Iterator over the transitions of one poll cycle.
///
/// Returned by [`ContactStates::changes`]. Borrows nothing: it snapshots
/// both vectors, so it stays valid (and repeatable) however often it is
/// recreated.
#[derive(Clone, Debug)]
pub struct Changes {
    current: u16,
    recent: u16,
    channel: u8,
    ports: u8,
}

impl Iterator for Changes {
    type Item = Transition;

    fn next(&mut self) -> Option<Transition> {
        while self.channel < self.ports {
            let ch = self.channel;
            self.channel += 1;

            let bit = 1u16 << ch;
            if (self.current ^ self.recent) & bit != 0 {
                return Some(Transition {
                    channel: ch,
                    old: self.recent & bit != 0,
                    new: self.current & bit != 0,
                });
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn fresh_tracker_is_unchanged() {
        let states = ContactStates::new();
        assert!(!states.is_changed());
        assert_eq!(states.changes().count(), 0);
    }

    #[test]
    fn identical_sample_is_unchanged() {
        let mut states = ContactStates::new();
        states.set_current(0);
        assert!(!states.is_changed());
        assert_eq!(states.changes().count(), 0);
    }

    #[test]
    fn two_bits_rise_in_order() {
        let mut states = ContactStates::new();
        states.set_current(0b101);

        let changed: Vec<_> = states.changes().collect();
        assert_eq!(
            changed,
            [
                Transition { channel: 0, old: false, new: true },
                Transition { channel: 2, old: false, new: true },
            ]
        );
    }

    #[test]
    fn changes_is_idempotent() {
        let mut states = ContactStates::new();
        states.set_current(0b1100_0000_0000_0001);

        let first: Vec<_> = states.changes().collect();
        let second: Vec<_> = states.changes().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn latch_clears_changes() {
        let mut states = ContactStates::new();
        states.set_current(0xFFFF);
        assert!(states.is_changed());

        states.latch();
        assert!(!states.is_changed());
        assert_eq!(states.changes().count(), 0);
        assert_eq!(states.recent(), 0xFFFF);
    }

    #[test]
    fn falling_edges_report_old_true() {
        let mut states = ContactStates::new();
        states.set_current(0b10);
        states.latch();

        states.set_current(0);
        let changed: Vec<_> = states.changes().collect();
        assert_eq!(
            changed,
            [Transition { channel: 1, old: true, new: false }]
        );
    }

    #[test]
    fn mixed_edges_stay_ascending() {
        let mut states = ContactStates::new();
        states.set_current(0b0000_1010);
        states.latch();

        // channel 1 falls, channel 2 rises, channel 3 stays set
        states.set_current(0b0000_1100);
        let changed: Vec<_> = states.changes().collect();
        assert_eq!(
            changed,
            [
                Transition { channel: 1, old: true, new: false },
                Transition { channel: 2, old: false, new: true },
            ]
        );
    }

    #[test]
    fn ports_mask_ignores_high_bits() {
        let mut states = ContactStates::new().with_ports(4);
        states.set_current(0xFFF0);
        assert!(!states.is_changed());

        states.set_current(0xFFFF);
        let changed: Vec<_> = states.changes().collect();
        assert_eq!(changed.len(), 4);
        assert!(changed.iter().all(|t| t.channel < 4));
    }

    #[test]
    fn summary_renders_fixed_width() {
        let mut states = ContactStates::new();
        states.set_current(0b1000_0000_0000_0101);
        assert_eq!(states.summary().as_str(), "#-#------------#");

        let mut narrow = ContactStates::new().with_ports(4);
        narrow.set_current(0b0110);
        assert_eq!(narrow.summary().as_str(), "-##-");
    }
}
