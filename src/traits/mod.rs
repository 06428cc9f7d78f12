//! Trait definitions for hardware abstraction, networking, and display.
//!
//! This module defines the core abstractions that allow rs-trackstate to:
//! - Run on different hardware (ESP32, desktop mock)
//! - Use different station link implementations
//! - Render status to different display devices
//!
//! # Submodules
//!
//! - `hardware`: Multiplexer bus and clock traits
//! - `network`: Station reachability probe and frame link traits
//! - `display`: Status screen rendering trait
//!
//! # Hardware Abstraction
//!
//! The key hardware traits are:
//!
//! - [`MuxBus`]: 74HC4067 address select, signal sampling, sample spacing
//! - [`Clock`]: Time source for `no_std` environments
//!
//! # Network Abstraction
//!
//! The station link splits into [`LinkProbe`] (bounded liveness check)
//! and [`ControllerLink`] (short-lived connect/send/close bursts), so
//! the poll loop can gate sending on reachability without ever blocking
//! past the configured timeouts.

pub mod display;
pub mod hardware;
pub mod network;

pub use display::*;
pub use hardware::*;
pub use network::*;
