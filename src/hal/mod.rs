//! Hardware Abstraction Layer implementations.
//!
//! This module contains concrete implementations of the traits
//! defined in [`crate::traits`] for various platforms.
//!
//! # Available Implementations
//!
//! - `mock`: Test implementations for desktop development
//! - `tcp`: std TCP station link (requires `std` feature)
//! - `esp32`: ESP32 with a 74HC4067 mux board (requires `esp32` feature)

pub mod mock;

#[cfg(feature = "std")]
pub mod tcp;

#[cfg(feature = "esp32")]
pub mod esp32;

pub use mock::*;

#[cfg(feature = "std")]
pub use tcp::{TcpLink, TcpProbe};

#[cfg(feature = "esp32")]
pub use esp32::*;
