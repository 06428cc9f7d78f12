//! Liveness-gated transport to the central station.
//!
//! The station link is assumed unreliable: it is wireless, and the peer
//! may reboot at any time. The sensor therefore prioritizes liveness of
//! local sampling over guaranteed delivery - occupancy reporting is
//! best-effort and self-correcting, because the full state is
//! re-derivable from every subsequent change.
//!
//! [`Transport`] pairs a [`LinkProbe`] with a [`ControllerLink`]:
//! [`refresh`](Transport::refresh) runs the bounded probe and records
//! link health, and [`send_batch`](Transport::send_batch) opens a
//! short-lived connection, writes the cycle's frames in order, and
//! closes deterministically. A failure anywhere aborts the remainder of
//! the batch; the frames are dropped, never queued or retried, and the
//! next cycle starts a fresh probe+connect from scratch.

use crate::mcan::TrackFrame;
use crate::traits::{ControllerLink, LinkProbe};

/// Probe-gated, drop-on-failure frame transport.
///
/// # Example
///
/// ```rust
/// use rs_trackstate::transport::Transport;
/// use rs_trackstate::hal::{MockLink, MockProbe};
/// use rs_trackstate::mcan::{DeviceHash, FrameEncoder};
///
/// let mut transport = Transport::new(MockProbe::up(), MockLink::new());
/// assert!(transport.refresh());
///
/// let frame = FrameEncoder::track_state(DeviceHash::from_uid(1))
///     .encode_track_state(0, 64, false, true, 0);
/// assert_eq!(transport.send_batch(&[frame]), 1);
/// ```
pub struct Transport<P: LinkProbe, L: ControllerLink> {
    probe: P,
    link: L,
    link_up: bool,
}

impl<P: LinkProbe, L: ControllerLink> Transport<P, L> {
    /// Creates a transport. Link health starts as down until the first
    /// successful [`refresh`](Self::refresh).
    pub fn new(probe: P, link: L) -> Self {
        Self {
            probe,
            link,
            link_up: false,
        }
    }

    /// Runs the reachability probe once and records the result.
    ///
    /// Bounded by the probe's configured timeout; any failure reads as
    /// `false`.
    pub fn refresh(&mut self) -> bool {
        self.link_up = self.probe.probe();
        self.link_up
    }

    /// Link health as of the most recent probe or send attempt.
    #[inline]
    pub fn link_up(&self) -> bool {
        self.link_up
    }

    /// Sends a batch of frames over a short-lived connection.
    ///
    /// Returns the number of frames actually written. Does nothing when
    /// the last probe failed or the batch is empty. A connect or send
    /// failure aborts the remaining frames for this cycle and flips
    /// link health to down; the connection is closed either way. No
    /// error escapes to the caller.
    pub fn send_batch(&mut self, frames: &[TrackFrame]) -> usize {
        if !self.link_up || frames.is_empty() {
            return 0;
        }

        if self.link.connect().is_err() {
            self.link_up = false;
            return 0;
        }

        let mut sent = 0;
        for frame in frames {
            match self.link.send_frame(frame) {
                Ok(()) => sent += 1,
                Err(_) => {
                    self.link_up = false;
                    break;
                }
            }
        }

        self.link.close();
        sent
    }

    /// Access to the underlying link (mock inspection in tests).
    pub fn link(&self) -> &L {
        &self.link
    }

    /// Mutable access to the underlying link.
    pub fn link_mut(&mut self) -> &mut L {
        &mut self.link
    }

    /// Mutable access to the underlying probe.
    pub fn probe_mut(&mut self) -> &mut P {
        &mut self.probe
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::{MockLink, MockProbe};
    use crate::mcan::{DeviceHash, FrameEncoder};

    fn frames(n: u16) -> alloc::vec::Vec<TrackFrame> {
        let encoder = FrameEncoder::track_state(DeviceHash::from_uid(42));
        (0..n)
            .map(|i| encoder.encode_track_state(0, 64 + i, false, true, 0))
            .collect()
    }

    #[test]
    fn starts_down() {
        let transport = Transport::new(MockProbe::up(), MockLink::new());
        assert!(!transport.link_up());
    }

    #[test]
    fn refresh_records_probe_result() {
        let mut transport = Transport::new(MockProbe::down(), MockLink::new());
        assert!(!transport.refresh());

        transport.probe_mut().up = true;
        assert!(transport.refresh());
        assert!(transport.link_up());
    }

    #[test]
    fn batch_sent_in_order_and_closed() {
        let mut transport = Transport::new(MockProbe::up(), MockLink::new());
        transport.refresh();

        let batch = frames(3);
        assert_eq!(transport.send_batch(&batch), 3);

        let link = transport.link();
        assert_eq!(link.frames, batch);
        assert_eq!(link.connect_calls, 1);
        assert_eq!(link.close_calls, 1);
        assert!(!link.is_connected());
    }

    #[test]
    fn no_send_without_probe() {
        let mut transport = Transport::new(MockProbe::down(), MockLink::new());
        transport.refresh();

        assert_eq!(transport.send_batch(&frames(2)), 0);
        assert_eq!(transport.link().connect_calls, 0);
    }

    #[test]
    fn empty_batch_is_free() {
        let mut transport = Transport::new(MockProbe::up(), MockLink::new());
        transport.refresh();
        assert_eq!(transport.send_batch(&[]), 0);
        assert_eq!(transport.link().connect_calls, 0);
    }

    #[test]
    fn connect_failure_drops_batch() {
        let mut link = MockLink::new();
        link.fail_connect = true;

        let mut transport = Transport::new(MockProbe::up(), link);
        transport.refresh();

        assert_eq!(transport.send_batch(&frames(2)), 0);
        assert!(!transport.link_up());
        assert!(transport.link().frames.is_empty());
    }

    #[test]
    fn mid_batch_failure_aborts_remainder() {
        let mut link = MockLink::new();
        link.fail_after = Some(2);

        let mut transport = Transport::new(MockProbe::up(), link);
        transport.refresh();

        assert_eq!(transport.send_batch(&frames(5)), 2);
        assert!(!transport.link_up());

        // Connection still closed deterministically.
        assert_eq!(transport.link().close_calls, 1);
        assert_eq!(transport.link().frames.len(), 2);
    }

    #[test]
    fn recovers_on_next_refresh() {
        let mut link = MockLink::new();
        link.fail_connect = true;

        let mut transport = Transport::new(MockProbe::up(), link);
        transport.refresh();
        transport.send_batch(&frames(1));
        assert!(!transport.link_up());

        // Peer comes back: a fresh probe+connect succeeds.
        transport.link_mut().fail_connect = false;
        assert!(transport.refresh());
        assert_eq!(transport.send_batch(&frames(1)), 1);
    }
}
