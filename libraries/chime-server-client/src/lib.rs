//! Chime Player Backend Client
//!
//! HTTP client library for the Chime Player backend API.
//!
//! # Features
//!
//! - **Catalog**: Recommendation feed and single-song lookup
//! - **Download**: Save a song's audio file with progress reporting
//! - **Interactions**: Fire-and-forget delivery of play/skip/favorite
//!   events to the recommendation backend
//!
//! # Example
//!
//! ```ignore
//! use chime_server_client::{ChimeServerClient, HttpInteractionSink, ServerConfig};
//! use chime_playback::Track;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ServerConfig::new("https://api.chime.example.com");
//!     let client = ChimeServerClient::new(config)?;
//!
//!     // Build a playback queue from the recommendation feed
//!     let queue: Vec<Track> = client
//!         .recommended(1)
//!         .await?
//!         .into_iter()
//!         .map(Track::from)
//!         .collect();
//!     println!("Got {} songs", queue.len());
//!
//!     // Wire interaction recording into a playback engine
//!     // engine.set_interaction_sink(Box::new(HttpInteractionSink::new(&client)));
//!
//!     Ok(())
//! }
//! ```

mod client;
mod download;
mod error;
mod interaction;
mod types;

// Re-export main types
pub use client::ChimeServerClient;
pub use error::{Result, ServerClientError};
pub use interaction::HttpInteractionSink;
pub use types::{DownloadProgress, RemoteSong, ServerConfig};
