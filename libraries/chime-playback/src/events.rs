//! Playback events
//!
//! Delta notifications for hosts that prefer reacting to changes over
//! re-reading the full snapshot. The snapshot remains authoritative; these
//! only say *that* something changed and roughly what.

use crate::error::PlaybackError;
use crate::types::PlaybackStatus;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Events emitted by the playback engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerEvent {
    /// Playback status changed
    StateChanged { status: PlaybackStatus },

    /// A different track became current
    TrackChanged {
        track_id: String,
        previous_track_id: Option<String>,
    },

    /// Playback position advanced or jumped
    PositionUpdate {
        position: Duration,
        duration: Option<Duration>,
    },

    /// Volume level or mute state changed
    VolumeChanged { level: f32, muted: bool },

    /// An engine-detected error was recorded
    Error { error: PlaybackError },
}
