//! # rs-trackstate
//!
//! Firmware library for a model-railway track-occupancy sensor: up to 16
//! track contacts polled through a 74HC4067 multiplexer, debounced,
//! diffed against a 16-bit state vector, and reported to a Märklin
//! central station as 13-byte CAN frames over a best-effort TCP link.
//!
//! ## Features
//!
//! - **Noise-tolerant sampling**: early-exit threshold filter per channel,
//!   bounded worst-case latency
//! - **Strict transition semantics**: ascending channel order, explicit
//!   latch, idempotent diff
//! - **Stable device identity**: 16-bit hash derived from the MAC address,
//!   tagged onto every frame
//! - **Degraded operation**: reachability-probed, drop-on-failure
//!   transport that never blocks the sampling loop
//!
//! ## Architecture
//!
//! The crate is structured to allow testing on desktop without hardware:
//!
//! - `traits` - Hardware, network, and display abstractions
//! - `mux` - Debounced multiplexer channel reader
//! - `states` - Contact state tracking with diff and latch
//! - `mcan` - Device hash and CAN frame construction
//! - `transport` - Liveness-gated frame transport
//! - `monitor` - Poll loop tying everything together
//! - `hal` - Concrete implementations (mock for testing, TCP for std,
//!   esp32 for hardware)
//!
//! ## Example
//!
//! ```rust
//! use rs_trackstate::{
//!     config::Config,
//!     hal::{MockClock, MockDisplay, MockLink, MockMux, MockProbe},
//!     mcan::DeviceHash,
//!     monitor::TrackMonitor,
//! };
//!
//! let config = Config::default();
//! let hash = DeviceHash::from_mac([0x24, 0x6F, 0x28, 0xAE, 0x52, 0x7C]);
//!
//! let mut monitor = TrackMonitor::new(
//!     MockMux::new(),
//!     MockProbe::up(),
//!     MockLink::new(),
//!     MockDisplay::new(),
//!     MockClock::new(),
//!     hash,
//!     &config,
//! );
//!
//! // Take the baseline sample, then poll.
//! monitor.start();
//! monitor.bus_mut().set_contact(2, true);
//!
//! let outcome = monitor.run_cycle();
//! assert!(outcome.changed);
//! assert_eq!(outcome.frames_sent, 1);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

/// Typed, validated configuration for the sensor module.
pub mod config;
/// Hardware abstraction layer with mock implementations for testing.
pub mod hal;
/// Märklin CAN frame construction: device hash and track-state commands.
pub mod mcan;
/// Poll loop orchestration: sample, diff, send, latch.
pub mod monitor;
/// Debounced channel reader for the 74HC4067 multiplexer.
pub mod mux;
/// Contact state tracking: current/recent vectors, diff, and latch.
pub mod states;
/// Core traits for hardware, network, and display abstraction.
pub mod traits;
/// Liveness-gated transport to the central station.
pub mod transport;

// Re-exports for convenience
pub use config::{Config, ConfigError, DeviceConfig, SamplingConfig, StationConfig, WifiConfig};
pub use mcan::{DeviceHash, FrameEncoder, TrackFrame, CMD_TRACK_STATE, CS_TCP_PORT, FRAME_LEN};
pub use monitor::{CycleOutcome, TrackMonitor};
pub use mux::{Debounce, MuxReader, CHECK_DELAY_US, CHECK_MAX, CHECK_MIN_ZEROS, PORTS_MAX};
pub use states::{Changes, ContactStates, Transition};
pub use traits::{
    // Hardware
    Clock,
    ContactSummary,
    // Network
    ControllerLink,
    LinkProbe,
    MuxBus,
    // Display
    StatusDisplay,
    StatusView,
};
pub use transport::Transport;
