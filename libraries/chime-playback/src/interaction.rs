//! Interaction recording at the playback boundary
//!
//! The engine emits best-effort notifications (play, skip, favorite) to an
//! external analytics/recommendation collaborator. Playback correctness is
//! strict; these are fire-and-forget. Implementations must swallow their
//! own failures and must never block the transport path.

use serde::{Deserialize, Serialize};

/// What the listener did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
    Play,
    Skip,
    Favorite,
}

impl InteractionKind {
    /// Wire name used by the backend API
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionKind::Play => "play",
            InteractionKind::Skip => "skip",
            InteractionKind::Favorite => "favorite",
        }
    }
}

/// One recorded interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub track_id: String,
    pub kind: InteractionKind,
}

impl Interaction {
    pub fn new(track_id: impl Into<String>, kind: InteractionKind) -> Self {
        Self {
            track_id: track_id.into(),
            kind,
        }
    }
}

/// Sink for interaction notifications
///
/// The signature is infallible on purpose: failures stay inside the sink
/// (logged, never surfaced, never blocking playback).
pub trait InteractionSink: Send {
    fn record(&mut self, interaction: Interaction);
}

/// Sink that drops everything; the engine's default
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl InteractionSink for NullSink {
    fn record(&mut self, _interaction: Interaction) {}
}
