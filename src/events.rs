//! Telegram wire shapes and normalization into canonical events.
//!
//! Two JSON payload shapes arrive from the telegram channel and are
//! normalized into the tagged [`Event`] union:
//!
//! Train-tracking:
//! ```json
//! {"timestamp": "...", "trainNumber": 123, "station": "HKI",
//!  "trackSection": "001", "type": "OCCUPY",
//!  "previousStation": "PSL", "nextStation": "TKL",
//!  "previousTrackSection": "002", "nextTrackSection": "003"}
//! ```
//!
//! Route-set:
//! ```json
//! {"messageTime": "...", "trainNumber": 123, "routeType": "T",
//!  "routesections": [{"stationCode": "HKI", "sectionId": "001"}]}
//! ```
//!
//! A payload that cannot be parsed produces a [`NormalizeError`]; the caller
//! treats it as one corrupt telegram and keeps processing the stream.

use std::fmt;

use serde::Deserialize;

use crate::traits::ChannelKind;

// ============================================================================
// Event Types
// ============================================================================

/// Occupancy telegram type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrackingEventType {
    /// A train entered the track section.
    Occupy,
    /// A train left the track section.
    Release,
}

impl TrackingEventType {
    /// Returns the telegram type as its wire string.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TrackingEventType::Occupy => "OCCUPY",
            TrackingEventType::Release => "RELEASE",
        }
    }
}

/// Route-set telegram type.
///
/// `T` and `S` establish a path (train route / shunting route), `C` cancels
/// one; the distinction matters to the AUTO action and to rule trigger
/// matching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub enum RouteType {
    /// Train route.
    T,
    /// Shunting route.
    S,
    /// Cancellation.
    C,
}

/// One station/section step of a route-set telegram.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSection {
    /// Station code of the section.
    pub station_code: String,
    /// Track-section identifier within the station.
    pub section_id: String,
}

/// A normalized train-tracking telegram.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainTrackingEvent {
    /// Telegram timestamp, as delivered (diagnostics only).
    #[serde(default)]
    pub timestamp: Option<String>,
    /// Train number; number or string depending on the feed (diagnostics
    /// only).
    #[serde(default)]
    pub train_number: Option<serde_json::Value>,
    /// Station the telegram refers to.
    pub station: String,
    /// Track section within the station, when reported.
    #[serde(default)]
    pub track_section: Option<String>,
    /// Occupancy or release.
    #[serde(rename = "type")]
    pub event_type: TrackingEventType,
    /// Station the train came from.
    #[serde(default)]
    pub previous_station: Option<String>,
    /// Station the train continues to.
    #[serde(default)]
    pub next_station: Option<String>,
    /// Track section the train came from.
    #[serde(default)]
    pub previous_track_section: Option<String>,
    /// Track section the train continues to.
    #[serde(default)]
    pub next_track_section: Option<String>,
}

/// A normalized route-set telegram with its ordered section sequence.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSetEvent {
    /// Telegram timestamp, as delivered (diagnostics only).
    #[serde(default)]
    pub message_time: Option<String>,
    /// Train number (diagnostics only).
    #[serde(default)]
    pub train_number: Option<serde_json::Value>,
    /// Route type of the whole telegram.
    pub route_type: RouteType,
    /// Ordered sections of the route.
    #[serde(rename = "routesections")]
    pub sections: Vec<RouteSection>,
}

/// Canonical internal event, tagged by telegram stream.
#[derive(Clone, Debug)]
pub enum Event {
    /// Train-tracking occupancy/release.
    Tracking(TrainTrackingEvent),
    /// Route establishment/cancellation.
    RouteSet(RouteSetEvent),
}

// ============================================================================
// Normalization
// ============================================================================

/// Error produced when a raw payload cannot be normalized.
#[derive(Debug)]
pub struct NormalizeError {
    /// Stream the corrupt payload arrived on.
    pub kind: ChannelKind,
    source: serde_json::Error,
}

impl fmt::Display for NormalizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stream = match self.kind {
            ChannelKind::TrainTracking => "train-tracking",
            ChannelKind::RouteSet => "route-set",
        };
        write!(f, "malformed {} telegram: {}", stream, self.source)
    }
}

impl std::error::Error for NormalizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Normalize a raw payload from the given stream into an [`Event`].
pub fn normalize(kind: ChannelKind, payload: &[u8]) -> Result<Event, NormalizeError> {
    let wrap = |source| NormalizeError { kind, source };
    match kind {
        ChannelKind::TrainTracking => serde_json::from_slice(payload)
            .map(Event::Tracking)
            .map_err(wrap),
        ChannelKind::RouteSet => serde_json::from_slice(payload)
            .map(Event::RouteSet)
            .map_err(wrap),
    }
}
