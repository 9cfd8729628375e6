//! Error types for the playback engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Playback errors
///
/// Every engine-detected error is also mirrored into
/// `PlayerSnapshot::last_error`, so a rendering layer can always display a
/// consistent state without catching anything at the call site.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PlaybackError {
    /// Caller asked for a queue position that does not exist
    #[error("index {index} out of range for queue of length {len}")]
    InvalidIndex { index: usize, len: usize },

    /// Seek attempted before the track's duration is known
    #[error("cannot seek before track metadata is known")]
    SeekBeforeMetadata,

    /// Media output refused to start playback (autoplay policy, decode
    /// refusal). Recoverable by an explicit user-gesture retry.
    #[error("playback rejected: {0}")]
    PlaybackRejected(String),

    /// Terminal failure reported by the media output for the current track
    #[error("media error: {0}")]
    Media(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
