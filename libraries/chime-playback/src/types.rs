//! Core types for the playback engine

use crate::error::PlaybackError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One playable audio item
///
/// Immutable value owned by whatever supplied the queue (search results,
/// recommendation feed, favorites list). The engine never mutates a track.
/// Only `audio_uri` is required; missing display metadata is the
/// presentation layer's problem, not the engine's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track identifier from the backend
    pub id: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album name (optional)
    pub album: Option<String>,

    /// Genre (optional)
    pub genre: Option<String>,

    /// Track duration as reported by the backend, if known ahead of load
    pub duration: Option<Duration>,

    /// Artwork image URI (optional)
    pub artwork_uri: Option<String>,

    /// Streamable audio source URI
    pub audio_uri: String,
}

/// Repeat mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepeatMode {
    /// Stop when the queue ends
    Off,

    /// Wrap around to the start of the queue
    All,

    /// Restart the current track on every natural end
    One,
}

/// Queue navigation mode
///
/// The two flags are orthogonal: shuffle affects *which* track is chosen
/// next, repeat affects *whether* the sequence wraps or restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationMode {
    pub shuffle: bool,
    pub repeat: RepeatMode,
}

impl Default for NavigationMode {
    fn default() -> Self {
        Self {
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}

/// Playback status
///
/// Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// No track loaded
    Idle,

    /// Source assigned, metadata not yet known
    Loading,

    /// Currently playing
    Playing,

    /// Paused mid-track
    Paused,

    /// Queue finished; the last track is retained for display
    Ended,

    /// Playback failed; exited only by a fresh selection or explicit retry
    Error,
}

/// The engine's single externally-visible state
///
/// Recomputed on every transition. Consumers treat this as read-only and
/// re-render from it; the engine never exposes mutable internals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub status: PlaybackStatus,
    pub current_track: Option<Track>,
    pub current_index: Option<usize>,
    pub position: Duration,
    pub duration: Option<Duration>,
    /// Numeric volume level, 0.0 to 1.0. Independent of `muted`: the
    /// UI-facing "effective silence" predicate is `muted || volume == 0.0`.
    pub volume: f32,
    pub muted: bool,
    pub mode: NavigationMode,
    pub last_error: Option<PlaybackError>,
}

/// Configuration for the playback engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Initial volume (0.0-1.0, default: 0.7)
    pub volume: f32,

    /// Initial shuffle flag (default: off)
    pub shuffle: bool,

    /// Initial repeat mode (default: Off)
    pub repeat: RepeatMode,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            volume: 0.7,
            shuffle: false,
            repeat: RepeatMode::Off,
        }
    }
}
