//! Chime Player - Playback Engine
//!
//! Platform-agnostic playback state management for Chime Player.
//!
//! This crate provides:
//! - A playback state machine (Idle, Loading, Playing, Paused, Ended, Error)
//! - Queue navigation (sequential, shuffle, repeat Off/All/One)
//! - Volume control (linear 0.0-1.0, independent mute)
//! - Stale-event filtering across track switches
//! - Best-effort interaction recording (play, skip, favorite)
//!
//! # Architecture
//!
//! `chime-playback` owns no real audio device and performs no I/O. The host
//! platform implements [`MediaOutput`] (load/play/pause/seek/gain commands)
//! and feeds asynchronous device callbacks back in as [`MediaEvent`]s. The
//! engine is the single writer of playback state; every UI surface renders
//! from [`PlayerSnapshot`] and dispatches commands, holding no playback
//! state of its own.
//!
//! # Example: Basic Playback
//!
//! ```rust,no_run
//! use chime_playback::{
//!     LoadToken, MediaEvent, MediaEventKind, MediaOutput, PlayRejected,
//!     PlaybackEngine, PlayerConfig, Track,
//! };
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//!
//! // Implement MediaOutput for your platform's audio element. The host is
//! // responsible for echoing the load token back on every media event so
//! // the engine can discard callbacks from abandoned loads.
//! struct MyAudioElement {
//!     last_token: Arc<Mutex<Option<LoadToken>>>,
//! }
//!
//! impl MediaOutput for MyAudioElement {
//!     fn load(&mut self, uri: &str, token: LoadToken) {
//!         *self.last_token.lock().unwrap() = Some(token);
//!         // ... point the decoder at `uri`
//!     }
//!     fn play(&mut self) -> Result<(), PlayRejected> { Ok(()) }
//!     fn pause(&mut self) { /* ... */ }
//!     fn seek(&mut self, position: Duration) { /* ... */ }
//!     fn set_gain(&mut self, gain: f32) { /* ... */ }
//! }
//!
//! let token_cell = Arc::new(Mutex::new(None));
//! let output = MyAudioElement { last_token: token_cell.clone() };
//! let mut engine = PlaybackEngine::new(Box::new(output), PlayerConfig::default());
//!
//! let queue = vec![Track {
//!     id: "track1".to_string(),
//!     title: "My Song".to_string(),
//!     artist: "Artist Name".to_string(),
//!     album: Some("Album Name".to_string()),
//!     genre: None,
//!     duration: None,
//!     artwork_uri: None,
//!     audio_uri: "https://cdn.example.com/track1.mp3".to_string(),
//! }];
//!
//! // Select starts a load; playback begins once the device reports readiness
//! engine.select_track(queue, 0).unwrap();
//! let token = token_cell.lock().unwrap().unwrap();
//! engine.handle_media_event(MediaEvent::new(token, MediaEventKind::CanPlay));
//! ```
//!
//! # Example: Shuffle and Repeat
//!
//! ```rust
//! use chime_playback::{MediaOutput, PlayRejected, LoadToken, PlaybackEngine, PlayerConfig, RepeatMode};
//! # use std::time::Duration;
//! # struct Silent;
//! # impl MediaOutput for Silent {
//! #     fn load(&mut self, _: &str, _: LoadToken) {}
//! #     fn play(&mut self) -> Result<(), PlayRejected> { Ok(()) }
//! #     fn pause(&mut self) {}
//! #     fn seek(&mut self, _: Duration) {}
//! #     fn set_gain(&mut self, _: f32) {}
//! # }
//!
//! let mut engine = PlaybackEngine::new(Box::new(Silent), PlayerConfig::default());
//! engine.toggle_shuffle();
//! engine.set_repeat(RepeatMode::All);
//! ```

mod engine;
mod error;
mod events;
mod interaction;
pub mod navigator;
mod output;
mod types;
mod volume;

// Public exports
pub use engine::PlaybackEngine;
pub use error::{PlaybackError, Result};
pub use events::PlayerEvent;
pub use interaction::{Interaction, InteractionKind, InteractionSink, NullSink};
pub use output::{LoadToken, MediaEvent, MediaEventKind, MediaOutput, PlayRejected};
pub use types::{
    NavigationMode, PlaybackStatus, PlayerConfig, PlayerSnapshot, RepeatMode, Track,
};
pub use volume::VolumeControl;
