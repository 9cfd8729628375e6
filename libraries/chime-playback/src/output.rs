//! Platform-agnostic media output trait
//!
//! Abstracts the single playable media element (an HTML `<audio>` element,
//! a native decoder, a test double) behind a command surface the engine
//! drives and an event stream the host feeds back in.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Identity of one `load` call.
///
/// The engine mints a fresh token for every source assignment and the host
/// must echo it on every event produced by that load. Events carrying any
/// other token are stale (they belong to a track no longer selected) and
/// are discarded by the engine. This is what keeps a late `Ended` from a
/// rapidly-switched-away track from triggering an unwanted advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadToken(pub(crate) u64);

/// Playback refusal from the media device
///
/// Browser autoplay policies and decode refusals land here; this is a
/// normal, recoverable outcome, not a crash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct PlayRejected {
    pub reason: String,
}

impl PlayRejected {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The one media device an engine instance owns
///
/// The engine is the only writer of the device's source, position, and
/// gain. All methods are synchronous with respect to engine state; real
/// I/O behind them reports back through [`MediaEvent`]s.
pub trait MediaOutput: Send {
    /// Assign a new source URI. Completion is reported asynchronously via
    /// `LoadStart` / `DurationKnown` / `CanPlay` events tagged with `token`.
    fn load(&mut self, uri: &str, token: LoadToken);

    /// Request start of playback.
    ///
    /// The return value is the device's start-of-playback verdict: `Err`
    /// models a rejected play promise (autoplay policy, decode error).
    fn play(&mut self) -> Result<(), PlayRejected>;

    /// Request pause. Never fails.
    fn pause(&mut self);

    /// Set the playback position. Callers clamp; the device trusts them.
    fn seek(&mut self, position: Duration);

    /// Set the effective output gain (0.0-1.0, already mute-resolved).
    fn set_gain(&mut self, gain: f32);
}

/// Asynchronous notification from the media device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaEvent {
    /// Token of the `load` this event belongs to
    pub token: LoadToken,
    pub kind: MediaEventKind,
}

/// What the media device reported
///
/// For a single track, events arrive in the order they logically occurred:
/// `LoadStart`, then `DurationKnown` once, interleaved `TimeUpdate`s, then
/// exactly one of `Ended` or `Error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEventKind {
    /// The device started fetching the assigned source
    LoadStart,

    /// Enough data is buffered to begin playback
    CanPlay,

    /// Track duration became known
    DurationKnown(Duration),

    /// Playback position advanced
    TimeUpdate(Duration),

    /// The track played to its natural end
    Ended,

    /// Terminal failure for the current track (network, unsupported format)
    Error(String),
}

impl MediaEvent {
    pub fn new(token: LoadToken, kind: MediaEventKind) -> Self {
        Self { token, kind }
    }
}
