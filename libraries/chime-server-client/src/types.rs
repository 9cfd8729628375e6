//! Types for Chime backend API requests and responses.

use chime_playback::Track;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for connecting to a Chime backend.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL of the server (e.g., "https://api.chime.example.com")
    pub url: String,
}

impl ServerConfig {
    /// Create a new server config with just the URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

// =============================================================================
// Catalog Types
// =============================================================================

/// A song as returned by the server.
///
/// The backend is loose about metadata; only the id and the audio URI are
/// reliably present. Everything else is display garnish.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RemoteSong {
    pub id: String,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub genre: Option<String>,
    /// Artwork image URL
    pub image: Option<String>,
    pub duration_seconds: Option<u64>,
    /// Streamable audio URL
    pub track: String,
}

impl From<RemoteSong> for Track {
    fn from(song: RemoteSong) -> Self {
        Track {
            id: song.id,
            title: song.title.unwrap_or_default(),
            artist: song.artist.unwrap_or_default(),
            album: song.album,
            genre: song.genre,
            duration: song.duration_seconds.map(Duration::from_secs),
            artwork_uri: song.image,
            audio_uri: song.track,
        }
    }
}

/// Envelope for the recommendation feed endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct RecommendedResponse {
    pub recommended: Vec<RemoteSong>,
}

/// Envelope for the trending endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct TrendingResponse {
    pub trending: Vec<RemoteSong>,
}

/// Envelope for the single-song endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct SongResponse {
    pub song: RemoteSong,
}

// =============================================================================
// Download Types
// =============================================================================

/// Progress of an in-flight song download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadProgress {
    pub song_id: String,
    pub bytes_received: u64,
    pub bytes_total: Option<u64>,
    /// Whole-number percentage, 0 to 100. Stays at 0 when the server sends
    /// no content length, then jumps to 100 on completion.
    pub percent: u8,
}
