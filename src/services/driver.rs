//! Periodic drive loop: advance the timeline and push the register out.
//!
//! Every transmit period the loop expires pulse deadlines and indicator
//! flashes, runs the silence watchdog, takes a register snapshot under the
//! lock and shifts it out. Transmissions run whether or not anything
//! changed, so a pulse expiry becomes visible on hardware within one
//! period.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use crate::traits::{ShiftBus, StatusLines};
use crate::transmit::{ShiftTransmitter, TRANSMIT_INTERVAL_MS};

use super::shared::SharedPanelState;

/// Raise the error indicator after this much channel silence.
pub const WATCHDOG_SILENCE_MS: u64 = 60_000;

/// Run the drive loop forever.
///
/// The transmitter lives outside the lock: the snapshot is copied out under
/// the lock (so it is consistent) and clocked out without holding anything.
pub async fn run_drive_loop<S, B>(
    state: Arc<SharedPanelState<S>>,
    mut transmitter: ShiftTransmitter<B>,
) where
    S: StatusLines + Send + 'static,
    S::Error: Debug,
    B: ShiftBus,
    B::Error: Debug,
{
    let mut ticker = tokio::time::interval(Duration::from_millis(TRANSMIT_INTERVAL_MS));
    let mut watchdog_tripped = false;
    loop {
        ticker.tick().await;
        let now_ms = state.now_ms();

        let snapshot = state.with_controller(|c| {
            if let Err(e) = c.update(now_ms) {
                eprintln!("[Panel] indicator update failed: {:?}", e);
            }
            match c.check_silence(now_ms, WATCHDOG_SILENCE_MS) {
                Ok(silent) => {
                    if silent && !watchdog_tripped {
                        eprintln!("[Panel] no telegram for {}s", WATCHDOG_SILENCE_MS / 1000);
                    }
                    watchdog_tripped = silent;
                }
                Err(e) => eprintln!("[Panel] watchdog indicator failed: {:?}", e),
            }
            c.snapshot().to_vec()
        });

        if let Err(e) = transmitter.transmit(&snapshot) {
            eprintln!("[Panel] transmission failed: {:?}", e);
        }
    }
}
