//! Network abstraction traits for the central station link.
//!
//! The occupancy sensor talks to exactly one peer: the central station
//! listening for CAN-over-TCP frames. Two traits cover that link:
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`LinkProbe`] | Bounded-time reachability check, run once per cycle |
//! | [`ControllerLink`] | Short-lived connect / send / close bursts |
//!
//! # Design
//!
//! The probe is deliberately separate from the send path: liveness is
//! re-checked every change event (and at an idle cadence) without paying
//! the cost of a full connection, and the send path is only entered when
//! the most recent probe succeeded. Both operations are **sync-first**,
//! matching blocking I/O on ESP32; every call must be bounded by the
//! implementation's configured timeout so a dead peer can never stall
//! the sampling loop.

use crate::mcan::TrackFrame;

/// Bounded-time reachability probe of the central station.
///
/// Implementations must return within a small fixed timeout. Any failure
/// mode - timeout, unreachable host, refused connection - is reported as
/// `false`, never as a panic or an error the caller has to handle.
///
/// The std HAL provides [`TcpProbe`](crate::hal::tcp::TcpProbe), which
/// attempts a TCP connect with `connect_timeout`. Targets with raw-socket
/// access can implement an ICMP echo instead.
pub trait LinkProbe {
    /// Probe the peer once. Returns `true` iff the peer answered within
    /// the configured timeout.
    fn probe(&mut self) -> bool;
}

/// Short-lived connection to the central station.
///
/// The sensor never holds a connection open across poll cycles: each
/// change event opens, sends its batch, and closes. Implementations must
/// apply their configured timeouts to `connect` and `send_frame` so no
/// call blocks indefinitely.
///
/// # Implementation Notes
///
/// - `close` must be infallible and idempotent; it is called whether or
///   not the batch completed
/// - `send_frame` on a link that is not connected is an error, not a
///   panic
pub trait ControllerLink {
    /// Error type for link operations.
    type Error;

    /// Open a connection to the station, bounded by the connect timeout.
    fn connect(&mut self) -> Result<(), Self::Error>;

    /// Transmit one 13-byte frame, bounded by the write timeout.
    fn send_frame(&mut self, frame: &TrackFrame) -> Result<(), Self::Error>;

    /// Close the connection. Safe to call when already closed.
    fn close(&mut self);

    /// Whether a connection is currently open.
    fn is_connected(&self) -> bool;
}
