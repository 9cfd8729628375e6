//! Volume and mute state
//!
//! Volume is a linear 0.0-1.0 level matching the media element's own gain
//! scale. Mute is tracked separately so un-muting restores the prior
//! numeric level; setting the level to exactly 0.0 does *not* imply muted.

/// Volume controller, independent of track identity
#[derive(Debug, Clone, PartialEq)]
pub struct VolumeControl {
    /// Volume level (0.0-1.0)
    level: f32,

    /// Mute state (preserves the level)
    muted: bool,
}

impl VolumeControl {
    /// Create a new volume controller, clamping the initial level
    pub fn new(level: f32) -> Self {
        Self {
            level: level.clamp(0.0, 1.0),
            muted: false,
        }
    }

    /// Set the volume level, clamped to [0.0, 1.0]
    pub fn set_level(&mut self, level: f32) {
        self.level = level.clamp(0.0, 1.0);
    }

    /// Bump the level by a delta, clamped to [0.0, 1.0]
    ///
    /// Used by keyboard-shortcut volume steps (±0.1).
    pub fn adjust(&mut self, delta: f32) {
        self.set_level(self.level + delta);
    }

    /// Get the current level (0.0-1.0)
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Toggle mute without touching the level
    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Gain to hand the media device: 0.0 when muted, the level otherwise
    pub fn effective_gain(&self) -> f32 {
        if self.muted { 0.0 } else { self.level }
    }
}

impl Default for VolumeControl {
    fn default() -> Self {
        Self::new(0.7)
    }
}
