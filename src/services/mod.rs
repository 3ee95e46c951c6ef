//! Network and drive services around the panel controller.
//!
//! All services share the single `PanelController` through
//! [`SharedPanelState`]: the MQTT event loop feeds telegrams in, the drive
//! loop advances the timeline and shifts the register out. Requires the
//! `mqtt` feature.
//!
//! ```ignore
//! use std::sync::Arc;
//! use rs_railpanel::services::{MqttChannel, SharedPanelState, run_drive_loop};
//!
//! let state = Arc::new(SharedPanelState::new(controller));
//! tokio::spawn(MqttChannel::new(Arc::clone(&state), config.mqtt).run());
//! run_drive_loop(state, transmitter).await;
//! ```

pub mod driver;
pub mod mqtt;
pub mod shared;

pub use driver::*;
pub use mqtt::*;
pub use shared::*;
