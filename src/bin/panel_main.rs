//! Panel daemon: MQTT telegrams in, shift-register frames out.
//!
//! Usage: `panel_main <config.json>`
//!
//! Builds with the `mqtt` feature. Without the `esp32` feature the hardware
//! lines are the recording mocks, which makes a broker-connected dry run
//! possible on any desktop.

use std::sync::Arc;

use rs_railpanel::config::Config;
use rs_railpanel::hal::{MockShiftBus, MockStatusLines};
use rs_railpanel::panel::PanelController;
use rs_railpanel::services::{run_drive_loop, MqttChannel, SharedPanelState};
use rs_railpanel::transmit::ShiftTransmitter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "panel.json".to_string());

    println!();
    println!("================================");
    println!("  rs-railpanel");
    println!("================================");
    println!();

    // =========================================================================
    // Load configuration (the only fatal failure in the system)
    // =========================================================================
    let config = Config::load(&config_path)?;
    println!("[OK] config loaded from {}", config_path);

    let register = config.build_register();
    let index = config.build_index();
    println!(
        "[OK] {} bits, {} rules loaded ({} skipped)",
        register.len(),
        index.len(),
        index.skipped()
    );

    // =========================================================================
    // Hardware lines
    // =========================================================================
    // Mock lines on desktop; swap in the esp32 implementations when built
    // for hardware.
    let lines = MockStatusLines::new();
    let transmitter = ShiftTransmitter::new(MockShiftBus::new());
    println!("[OK] hardware lines initialized (mock)");

    // =========================================================================
    // Controller and services
    // =========================================================================
    let controller = PanelController::new(register, index, lines)
        .map_err(|e| anyhow::anyhow!("status line init failed: {:?}", e))?;
    let state = Arc::new(SharedPanelState::new(controller));

    let channel = MqttChannel::new(Arc::clone(&state), config.mqtt.clone());
    tokio::spawn(async move {
        if let Err(e) = channel.run().await {
            eprintln!("[MQTT] channel stopped: {:?}", e);
        }
    });
    println!(
        "[OK] MQTT channel started ({}:{})",
        config.mqtt.host, config.mqtt.port
    );

    println!();
    println!("Driving panel (10Hz transmit)...");
    println!();

    run_drive_loop(state, transmitter).await;
    Ok(())
}
