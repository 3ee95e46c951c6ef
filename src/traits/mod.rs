//! Trait definitions for hardware abstraction and the telegram channel.
//!
//! This module defines the abstractions that allow rs-railpanel to:
//! - Drive different hardware (ESP32 GPIO, desktop mocks)
//! - Receive telegrams from different transports
//!
//! # Submodules
//!
//! - `hardware`: shift-register bus and status indicator lines
//! - `network`: telegram channel source
//!
//! # Hardware Abstraction
//!
//! The key hardware traits are:
//!
//! - [`ShiftBus`]: clock/data/strobe lines of the register chain
//! - [`StatusLines`]: received/acknowledge/error indicator outputs

pub mod hardware;
pub mod network;

pub use hardware::*;
pub use network::*;
