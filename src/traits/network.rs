//! Network abstraction for the telegram channel.
//!
//! The panel consumes two streams of railway telegrams (train-tracking and
//! route-set), typically delivered over MQTT. This trait keeps the core
//! independent of the concrete client so tests can feed payloads directly.
//!
//! # Topics
//!
//! ```text
//! train-tracking/#   - occupancy/release telegrams (JSON)
//! routesets/#        - route-set telegrams (JSON)
//! ```

/// Which telegram stream a payload arrived on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelKind {
    /// Train-tracking occupancy/release telegram.
    TrainTracking,
    /// Route-set telegram.
    RouteSet,
}

/// A raw telegram received from a subscription, before normalization.
#[derive(Clone, Debug)]
pub struct Telegram {
    /// Stream the telegram arrived on.
    pub kind: ChannelKind,
    /// Raw payload bytes (JSON).
    pub payload: Vec<u8>,
    /// Topic the message was published to, for diagnostics.
    pub topic: String,
}

/// Telegram channel trait - a subscribed source of raw telegrams.
///
/// Uses a **sync-first design**: `try_recv` is non-blocking so the panel's
/// single-owner loop can drain pending telegrams between ticks. The async
/// MQTT service in [`crate::services`] drives the panel directly instead of
/// going through this trait; the trait exists for polling main loops and for
/// test doubles.
pub trait TelegramChannel {
    /// Error type for channel operations.
    type Error;

    /// Subscribe to both telegram streams.
    fn subscribe(&mut self) -> Result<(), Self::Error>;

    /// Try to receive the next telegram (non-blocking).
    ///
    /// Returns `None` if nothing is pending. This should never block.
    fn try_recv(&mut self) -> Option<Telegram>;

    /// Check if the channel is currently connected.
    fn is_connected(&self) -> bool;
}

impl Telegram {
    /// Create a new telegram.
    pub fn new(kind: ChannelKind, topic: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            kind,
            topic: topic.into(),
            payload: payload.into(),
        }
    }
}
