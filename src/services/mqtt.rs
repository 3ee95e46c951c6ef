//! MQTT telegram channel for the panel.
//!
//! Subscribes to the two telegram streams and routes every publish to the
//! shared panel state:
//!
//! **Subscribe Topics** (configurable, defaults shown):
//! - `train-tracking/#` - occupancy/release telegrams (JSON)
//! - `routesets/#` - route-set telegrams (JSON)
//!
//! Connection errors are logged and retried; `rumqttc` reconnects on the
//! next poll and the subscriptions are re-issued on every connection
//! acknowledge. A corrupt payload is the panel's problem (error indicator,
//! log line), never the channel's: the loop keeps polling.

use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Packet, QoS};

use crate::config::MqttConfig;
use crate::traits::{ChannelKind, StatusLines};

use super::shared::SharedPanelState;

/// MQTT channel handler bound to a shared panel state.
pub struct MqttChannel<S: StatusLines> {
    state: Arc<SharedPanelState<S>>,
    config: MqttConfig,
}

impl<S> MqttChannel<S>
where
    S: StatusLines + Send + 'static,
    S::Error: Debug,
{
    /// Create a channel handler for the given shared state.
    pub fn new(state: Arc<SharedPanelState<S>>, config: MqttConfig) -> Self {
        Self { state, config }
    }

    /// Connect, subscribe and pump telegrams into the panel. Runs until the
    /// task is dropped.
    pub async fn run(self) -> anyhow::Result<()> {
        let mut options = MqttOptions::new(
            self.config.client_id.clone(),
            self.config.host.clone(),
            self.config.port,
        );
        options.set_keep_alive(Duration::from_secs(u64::from(self.config.keep_alive_secs)));

        let (client, mut eventloop) = AsyncClient::new(options, 64);
        println!(
            "[MQTT] connecting to {}:{}",
            self.config.host, self.config.port
        );

        let tracking_prefix = MqttConfig::topic_prefix(&self.config.tracking_topic).to_string();
        let routeset_prefix = MqttConfig::topic_prefix(&self.config.routeset_topic).to_string();

        loop {
            match eventloop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    println!("[MQTT] connected, subscribing");
                    self.subscribe(&client).await?;
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let kind = if publish.topic.starts_with(&tracking_prefix) {
                        ChannelKind::TrainTracking
                    } else if publish.topic.starts_with(&routeset_prefix) {
                        ChannelKind::RouteSet
                    } else {
                        eprintln!("[MQTT] unexpected topic: {}", publish.topic);
                        continue;
                    };

                    if let Err(e) = self.state.handle_telegram(kind, &publish.payload) {
                        eprintln!("[MQTT] status lines failed: {:?}", e);
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("[MQTT] error: {:?}", e);
                    tokio::time::sleep(Duration::from_secs(1)).await;
                }
            }
        }
    }

    async fn subscribe(&self, client: &AsyncClient) -> anyhow::Result<()> {
        for topic in [&self.config.tracking_topic, &self.config.routeset_topic] {
            client.subscribe(topic.clone(), QoS::AtMostOnce).await?;
            println!("[MQTT] subscribed to {}", topic);
        }
        Ok(())
    }
}
