//! Integration tests for the panel controller: config in, telegrams in,
//! register and indicator effects out.

use rs_railpanel::{
    config::Config,
    hal::{MockShiftBus, MockStatusLines},
    panel::{PanelController, TelegramOutcome},
    register::PULSE_CLEAR_MS,
    transmit::ShiftTransmitter,
    traits::ChannelKind,
};

fn panel_from(config_json: &str) -> PanelController<MockStatusLines> {
    let config = Config::from_json_str(config_json).unwrap();
    PanelController::new(
        config.build_register(),
        config.build_index(),
        MockStatusLines::new(),
    )
    .unwrap()
}

#[test]
fn pulse_rule_sets_then_clears_bit() {
    let mut panel = panel_from(
        r#"{"bits": 1, "rules": [
            {"station": "HKI", "action": "PULSE", "type": "OCCUPY", "bit": 0}
        ]}"#,
    );

    panel
        .handle_telegram(
            ChannelKind::TrainTracking,
            br#"{"station": "HKI", "type": "OCCUPY", "trackSection": null}"#,
            1000,
        )
        .unwrap();
    assert!(panel.bit(0), "bit set immediately");

    panel.update(1000 + PULSE_CLEAR_MS).unwrap();
    assert!(!panel.bit(0), "bit cleared after the pulse delay");
}

#[test]
fn non_matching_telegram_leaves_bits_and_acknowledge_alone() {
    let mut panel = panel_from(
        r#"{"bits": 1, "rules": [
            {"station": "HKI", "action": "PULSE", "type": "OCCUPY", "bit": 0}
        ]}"#,
    );

    let outcome = panel
        .handle_telegram(
            ChannelKind::TrainTracking,
            br#"{"station": "HKI", "type": "RELEASE"}"#,
            0,
        )
        .unwrap();

    match outcome {
        TelegramOutcome::Dispatched(summary) => assert_eq!(summary.matched, 0),
        TelegramOutcome::Rejected => panic!("telegram was well-formed"),
    }
    assert!(!panel.bit(0));
    assert!(!panel.status_lines().acknowledge);
    // The received flash still fires: the telegram itself was fine.
    assert!(panel.status_lines().received);
}

#[test]
fn auto_rule_follows_occupancy() {
    let mut panel = panel_from(
        r#"{"bits": 1, "rules": [{"station": "A", "action": "AUTO", "bit": 0}]}"#,
    );

    panel
        .handle_telegram(
            ChannelKind::TrainTracking,
            br#"{"station": "A", "type": "OCCUPY"}"#,
            0,
        )
        .unwrap();
    assert!(panel.bit(0));

    panel
        .handle_telegram(
            ChannelKind::TrainTracking,
            br#"{"station": "A", "type": "RELEASE"}"#,
            10,
        )
        .unwrap();
    assert!(!panel.bit(0));
}

#[test]
fn routeset_rule_matches_only_at_the_right_section_position() {
    let config = r#"{"bits": 4, "rules": [
        {"station": "X", "type": "ROUTESET", "to": "Y", "action": "SET", "bit": 2}
    ]}"#;
    let telegram = br#"{
        "trainNumber": 7, "routeType": "T",
        "routesections": [
            {"stationCode": "X", "sectionId": "0"},
            {"stationCode": "Y", "sectionId": "1"},
            {"stationCode": "Z", "sectionId": "2"}
        ]
    }"#;

    let mut panel = panel_from(config);
    let outcome = panel
        .handle_telegram(ChannelKind::RouteSet, telegram, 0)
        .unwrap();

    // The rule can only match at index 0, where next begins with Y.
    match outcome {
        TelegramOutcome::Dispatched(summary) => assert_eq!(summary.matched, 1),
        TelegramOutcome::Rejected => panic!("telegram was well-formed"),
    }
    assert!(panel.bit(2));
}

#[test]
fn malformed_payload_raises_error_and_keeps_processing() {
    let mut panel = panel_from(
        r#"{"bits": 1, "rules": [{"station": "A", "action": "SET", "bit": 0}]}"#,
    );

    let outcome = panel
        .handle_telegram(ChannelKind::TrainTracking, b"{broken", 500)
        .unwrap();
    assert_eq!(outcome, TelegramOutcome::Rejected);
    assert!(panel.error());
    assert_eq!(panel.last_message_ms(), Some(500));
    assert!(!panel.bit(0));

    // The next good telegram processes normally and clears the error.
    panel
        .handle_telegram(
            ChannelKind::TrainTracking,
            br#"{"station": "A", "type": "OCCUPY"}"#,
            600,
        )
        .unwrap();
    assert!(!panel.error());
    assert!(panel.bit(0));
}

#[test]
fn initial_pattern_reaches_the_wire_in_reverse_index_order() {
    let config = Config::from_json_str(r#"{"bits": 5, "initialPattern": "110"}"#).unwrap();
    let register = config.build_register();

    let mut tx = ShiftTransmitter::new(MockShiftBus::new());
    tx.transmit(register.snapshot()).unwrap();

    // Logical [1,1,0,0,0]; wire order is b4..b0.
    assert_eq!(
        tx.bus().clocked_bits(),
        vec![false, false, false, true, true]
    );
    assert_eq!(tx.bus().strobe_count(), 1);
}

#[test]
fn snapshot_transmits_current_panel_state() {
    let mut panel = panel_from(
        r#"{"bits": 3, "rules": [
            {"station": "A", "action": "SET", "bit": 0},
            {"station": "B", "action": "SET", "bit": 2}
        ]}"#,
    );

    for (station, now) in [("A", 0u64), ("B", 10)] {
        let payload = format!(r#"{{"station": "{}", "type": "OCCUPY"}}"#, station);
        panel
            .handle_telegram(ChannelKind::TrainTracking, payload.as_bytes(), now)
            .unwrap();
    }

    let mut tx = ShiftTransmitter::new(MockShiftBus::new());
    tx.transmit(panel.snapshot()).unwrap();
    assert_eq!(tx.bus().clocked_bits(), vec![true, false, true]);
}
