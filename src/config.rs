//! JSON configuration: register size, initial pattern, rule table, broker.
//!
//! A config file looks like:
//!
//! ```json
//! {
//!   "bits": 16,
//!   "initialPattern": "0100000000000000",
//!   "rules": [
//!     {"station": "HKI", "type": "OCCUPY", "action": "PULSE", "bit": 0}
//!   ],
//!   "mqtt": {"host": "broker.example.net", "port": 1883}
//! }
//! ```
//!
//! `bits` is mandatory; everything else has defaults. A file that cannot be
//! read or parsed aborts startup (the only unrecoverable error in the
//! system); individual bad rules are skipped later by the index build.
//!
//! # Example
//!
//! ```rust
//! use rs_railpanel::config::{Config, MqttConfig};
//!
//! let config = Config::from_json_str(r#"{"bits": 8}"#).unwrap();
//! assert_eq!(config.bits, 8);
//!
//! // Or build programmatically
//! let config = Config::new(16)
//!     .with_initial_pattern("01")
//!     .with_mqtt(MqttConfig::default().with_host("192.168.1.10"));
//! ```

use std::path::Path;

use anyhow::Context;
use serde::Deserialize;

use crate::register::BitRegister;
use crate::rules::{RawRule, RuleIndex};

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Number of output bits in the register chain.
    pub bits: usize,
    /// Startup bit pattern, '0'/'1' per position; short patterns zero-pad.
    #[serde(default)]
    pub initial_pattern: Option<String>,
    /// The rule table, validated during the index build.
    #[serde(default)]
    pub rules: Vec<RawRule>,
    /// Broker connection settings.
    #[serde(default)]
    pub mqtt: MqttConfig,
}

impl Config {
    /// Create a config with the given bit count and all defaults.
    pub fn new(bits: usize) -> Self {
        Self {
            bits,
            initial_pattern: None,
            rules: Vec::new(),
            mqtt: MqttConfig::default(),
        }
    }

    /// Set the startup pattern.
    pub fn with_initial_pattern(mut self, pattern: &str) -> Self {
        self.initial_pattern = Some(pattern.to_string());
        self
    }

    /// Set the rule table.
    pub fn with_rules(mut self, rules: Vec<RawRule>) -> Self {
        self.rules = rules;
        self
    }

    /// Set the MQTT configuration.
    pub fn with_mqtt(mut self, mqtt: MqttConfig) -> Self {
        self.mqtt = mqtt;
        self
    }

    /// Parse a config from a JSON string.
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("invalid panel config")
    }

    /// Load a config file.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        Self::from_json_str(&text)
            .with_context(|| format!("cannot parse config file {}", path.display()))
    }

    /// Build the bit register this config describes.
    pub fn build_register(&self) -> BitRegister {
        BitRegister::new(self.bits, self.initial_pattern.as_deref())
    }

    /// Build the rule index, skipping invalid rules with a log line.
    pub fn build_index(&self) -> RuleIndex {
        RuleIndex::build(self.rules.clone(), self.bits)
    }
}

// ============================================================================
// MQTT Config
// ============================================================================

/// MQTT broker and subscription settings.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MqttConfig {
    /// Broker hostname or IP.
    pub host: String,
    /// Broker port.
    pub port: u16,
    /// Client ID (should be unique per panel).
    pub client_id: String,
    /// Subscription topic for train-tracking telegrams.
    pub tracking_topic: String,
    /// Subscription topic for route-set telegrams.
    pub routeset_topic: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 1883,
            client_id: "rs-railpanel".to_string(),
            tracking_topic: "train-tracking/#".to_string(),
            routeset_topic: "routesets/#".to_string(),
            keep_alive_secs: 30,
        }
    }
}

impl MqttConfig {
    /// Set the broker host.
    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    /// Set the broker port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the client ID.
    pub fn with_client_id(mut self, id: &str) -> Self {
        self.client_id = id.to_string();
        self
    }

    /// Set both subscription topics.
    pub fn with_topics(mut self, tracking: &str, routeset: &str) -> Self {
        self.tracking_topic = tracking.to_string();
        self.routeset_topic = routeset.to_string();
        self
    }

    /// The topic prefix a subscription filter covers (filter minus any
    /// trailing wildcard), used to classify inbound publishes.
    pub fn topic_prefix(filter: &str) -> &str {
        filter.strip_suffix('#').unwrap_or(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_parses_with_defaults() {
        let c = Config::from_json_str(r#"{"bits": 4}"#).unwrap();
        assert_eq!(c.bits, 4);
        assert_eq!(c.initial_pattern, None);
        assert!(c.rules.is_empty());
        assert_eq!(c.mqtt.host, "localhost");
        assert_eq!(c.mqtt.tracking_topic, "train-tracking/#");
    }

    #[test]
    fn missing_bits_is_an_error() {
        assert!(Config::from_json_str(r#"{"rules": []}"#).is_err());
    }

    #[test]
    fn full_config_parses() {
        let c = Config::from_json_str(
            r#"{
                "bits": 2,
                "initialPattern": "10",
                "rules": [{"station": "HKI", "action": "SET", "bit": 1}],
                "mqtt": {"host": "broker", "port": 8883, "clientId": "p1"}
            }"#,
        )
        .unwrap();

        assert_eq!(c.initial_pattern.as_deref(), Some("10"));
        assert_eq!(c.mqtt.host, "broker");
        assert_eq!(c.mqtt.port, 8883);
        // Unspecified mqtt fields keep their defaults.
        assert_eq!(c.mqtt.keep_alive_secs, 30);

        let reg = c.build_register();
        assert_eq!(reg.snapshot(), &[true, false]);

        let index = c.build_index();
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("HKI")[0].bit, 1);
    }

    #[test]
    fn index_build_rejects_out_of_range_bits() {
        let c = Config::from_json_str(
            r#"{"bits": 1, "rules": [
                {"station": "A", "action": "SET", "bit": 0},
                {"station": "B", "action": "SET", "bit": 5}
            ]}"#,
        )
        .unwrap();
        let index = c.build_index();
        assert_eq!(index.len(), 1);
        assert_eq!(index.skipped(), 1);
    }

    #[test]
    fn topic_prefix_strips_wildcards() {
        assert_eq!(MqttConfig::topic_prefix("train-tracking/#"), "train-tracking/");
        assert_eq!(MqttConfig::topic_prefix("routesets/#"), "routesets/");
        assert_eq!(MqttConfig::topic_prefix("plain/topic"), "plain/topic");
    }

    #[test]
    fn builder_chain() {
        let c = Config::new(8)
            .with_initial_pattern("1")
            .with_mqtt(MqttConfig::default().with_host("10.0.0.2").with_port(1884));
        assert_eq!(c.bits, 8);
        assert_eq!(c.mqtt.host, "10.0.0.2");
        assert_eq!(c.mqtt.port, 1884);
    }
}
