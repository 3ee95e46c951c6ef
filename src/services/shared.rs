//! Unified shared state for the panel services.
//!
//! `SharedPanelState` wraps the single [`PanelController`] behind one
//! exclusive lock so the MQTT event loop and the periodic drive loop never
//! interleave at sub-operation granularity: each inbound telegram, pulse
//! expiry pass and transmission snapshot is atomic with respect to the
//! others.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use rs_railpanel::services::SharedPanelState;
//!
//! let state = Arc::new(SharedPanelState::new(controller));
//!
//! // MQTT event loop:
//! state.handle_telegram(ChannelKind::TrainTracking, payload);
//!
//! // Drive loop:
//! let snapshot = state.with_controller(|c| {
//!     c.update(state.now_ms()).unwrap();
//!     c.snapshot().to_vec()
//! });
//! ```

use std::sync::Mutex;
use std::time::Instant;

use crate::panel::{PanelController, TelegramOutcome};
use crate::traits::{ChannelKind, StatusLines};

/// Shared, serialized access to the panel controller.
///
/// # Thread Safety
///
/// A single `Mutex` serializes everything. Contention is negligible: the
/// drive loop holds the lock for one update-plus-snapshot per 100 ms tick
/// and telegram bursts are short. All timestamps come from the same
/// `start_time` so pulse deadlines are consistent across services.
pub struct SharedPanelState<S: StatusLines> {
    controller: Mutex<PanelController<S>>,
    start_time: Instant,
}

impl<S: StatusLines> SharedPanelState<S> {
    /// Wrap a controller; `now_ms()` counts from this moment.
    pub fn new(controller: PanelController<S>) -> Self {
        Self {
            controller: Mutex::new(controller),
            start_time: Instant::now(),
        }
    }

    /// Milliseconds since the state was created.
    pub fn now_ms(&self) -> u64 {
        self.start_time.elapsed().as_millis() as u64
    }

    /// Run a closure with exclusive access to the controller.
    pub fn with_controller<R>(&self, f: impl FnOnce(&mut PanelController<S>) -> R) -> R {
        let mut guard = self.controller.lock().unwrap();
        f(&mut guard)
    }

    /// Feed one raw telegram to the controller, stamped with the shared
    /// time base.
    pub fn handle_telegram(
        &self,
        kind: ChannelKind,
        payload: &[u8],
    ) -> Result<TelegramOutcome, S::Error> {
        let now_ms = self.now_ms();
        self.with_controller(|c| c.handle_telegram(kind, payload, now_ms))
    }
}
