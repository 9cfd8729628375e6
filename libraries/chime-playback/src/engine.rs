//! Playback engine - the single source of truth for "what's playing"
//!
//! Owns one media output and the active queue, mediates user transport
//! commands, folds asynchronous media events into state, and decides what
//! happens when a track ends. Every UI surface is expected to be a
//! stateless view over [`PlayerSnapshot`] plus a command dispatcher; the
//! engine keeps no per-view state.
//!
//! The engine assumes a single-threaded, event-driven host. All operations
//! are synchronous with respect to engine state; real I/O behind the media
//! output reports back through [`MediaEvent`]s consumed one at a time.

use crate::error::{PlaybackError, Result};
use crate::events::PlayerEvent;
use crate::interaction::{Interaction, InteractionKind, InteractionSink, NullSink};
use crate::navigator;
use crate::output::{LoadToken, MediaEvent, MediaEventKind, MediaOutput};
use crate::types::{NavigationMode, PlaybackStatus, PlayerConfig, PlayerSnapshot, RepeatMode, Track};
use crate::volume::VolumeControl;
use rand::thread_rng;
use std::time::Duration;
use tracing::{debug, warn};

/// Central playback state machine
///
/// ```text
/// Idle --select_track--> Loading --DurationKnown/CanPlay--> Playing|Paused
///   Playing <--play/pause--> Paused
///   Playing --Ended--> (end-of-track policy) --> Loading | Ended
///   Loading|Playing --Error--> Error  (exited by fresh select or retry)
/// ```
pub struct PlaybackEngine {
    output: Box<dyn MediaOutput>,
    sink: Box<dyn InteractionSink>,

    // Queue
    queue: Vec<Track>,
    current_index: Option<usize>,

    // Transport state
    status: PlaybackStatus,
    position: Duration,
    duration: Option<Duration>,

    // Intent to start playing once the pending load resolves. Queued across
    // the Loading state instead of racing the load.
    pending_autoplay: bool,

    // Settings
    volume: VolumeControl,
    mode: NavigationMode,

    last_error: Option<PlaybackError>,

    // Identity of the most recent load; events carrying any other token
    // belong to a track no longer selected and are dropped.
    token: LoadToken,
    token_counter: u64,

    pending_events: Vec<PlayerEvent>,
}

impl PlaybackEngine {
    /// Create a new engine owning `output`
    ///
    /// The engine is the only writer of the device's source, position, and
    /// gain for its entire lifetime. The initial gain is pushed immediately.
    pub fn new(mut output: Box<dyn MediaOutput>, config: PlayerConfig) -> Self {
        let volume = VolumeControl::new(config.volume);
        output.set_gain(volume.effective_gain());

        Self {
            output,
            sink: Box::new(NullSink),
            queue: Vec::new(),
            current_index: None,
            status: PlaybackStatus::Idle,
            position: Duration::ZERO,
            duration: None,
            pending_autoplay: false,
            volume,
            mode: NavigationMode {
                shuffle: config.shuffle,
                repeat: config.repeat,
            },
            last_error: None,
            token: LoadToken(0),
            token_counter: 0,
            pending_events: Vec::new(),
        }
    }

    /// Attach an interaction sink (play/skip/favorite notifications)
    pub fn set_interaction_sink(&mut self, sink: Box<dyn InteractionSink>) {
        self.sink = sink;
    }

    // ===== Transport Commands =====

    /// Replace the active queue and select the track at `index`
    ///
    /// Selecting the already-current track (same id) while it is playing
    /// toggles to paused without reloading the source; while paused it
    /// resumes. Song-grid and trending-list clicks rely on this. An
    /// out-of-range index changes nothing and surfaces `InvalidIndex`.
    pub fn select_track(&mut self, queue: Vec<Track>, index: usize) -> Result<()> {
        if index >= queue.len() {
            let err = PlaybackError::InvalidIndex {
                index,
                len: queue.len(),
            };
            self.last_error = Some(err.clone());
            self.push_event(PlayerEvent::Error { error: err.clone() });
            return Err(err);
        }

        let same_track = self
            .current_track()
            .is_some_and(|current| current.id == queue[index].id);

        self.queue = queue;
        self.current_index = Some(index);

        if same_track {
            match self.status {
                PlaybackStatus::Playing => {
                    self.output.pause();
                    self.set_status(PlaybackStatus::Paused);
                    return Ok(());
                }
                PlaybackStatus::Paused => return self.start_playback(),
                PlaybackStatus::Loading => {
                    // Re-clicked while still loading: keep the load, keep
                    // the intent to play.
                    self.pending_autoplay = true;
                    return Ok(());
                }
                PlaybackStatus::Ended => {
                    self.output.seek(Duration::ZERO);
                    self.position = Duration::ZERO;
                    return self.start_playback();
                }
                PlaybackStatus::Idle | PlaybackStatus::Error => {}
            }
        }

        self.begin_load_at(index)
    }

    /// Start or resume playback
    ///
    /// During a load the intent is queued and honored once metadata
    /// arrives. A device rejection (autoplay policy) lands in the snapshot
    /// as `PlaybackRejected` with the attempted track still exposed, so the
    /// UI can retry on an explicit user gesture.
    pub fn play(&mut self) -> Result<()> {
        match self.status {
            PlaybackStatus::Playing => Ok(()),
            PlaybackStatus::Loading => {
                self.pending_autoplay = true;
                Ok(())
            }
            PlaybackStatus::Ended => {
                if self.current_index.is_none() {
                    return Ok(());
                }
                self.output.seek(Duration::ZERO);
                self.position = Duration::ZERO;
                self.start_playback()
            }
            PlaybackStatus::Paused | PlaybackStatus::Idle | PlaybackStatus::Error => {
                if self.current_index.is_none() {
                    return Ok(());
                }
                self.start_playback()
            }
        }
    }

    /// Pause playback. No-op (not an error) unless currently playing.
    pub fn pause(&mut self) {
        if self.status == PlaybackStatus::Playing {
            self.output.pause();
            self.set_status(PlaybackStatus::Paused);
        }
    }

    /// Seek to a position in the current track
    ///
    /// Clamped to `[0, duration]`. Rejected (not queued) with
    /// `SeekBeforeMetadata` while the duration is still unknown.
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        let Some(duration) = self.duration else {
            let err = PlaybackError::SeekBeforeMetadata;
            self.last_error = Some(err.clone());
            return Err(err);
        };

        let clamped = position.min(duration);
        self.output.seek(clamped);
        self.position = clamped;
        self.push_event(PlayerEvent::PositionUpdate {
            position: clamped,
            duration: self.duration,
        });
        Ok(())
    }

    /// Seek relative to the current position (±10 s transport buttons)
    pub fn seek_by(&mut self, delta_seconds: f64) -> Result<()> {
        let target = if delta_seconds >= 0.0 {
            self.position + Duration::from_secs_f64(delta_seconds)
        } else {
            self.position
                .saturating_sub(Duration::from_secs_f64(-delta_seconds))
        };
        self.seek(target)
    }

    /// Skip to the next track
    ///
    /// Shuffle picks a random other track; otherwise sequential, wrapping
    /// only under repeat-all. With nothing further the engine stops with
    /// status `Ended`, retaining the current track for display.
    pub fn next(&mut self) -> Result<()> {
        if self.current_index.is_none() {
            return Ok(());
        }
        self.record_interaction(InteractionKind::Skip);

        match self.pick_next_index() {
            Some(next) => self.begin_load_at(next),
            None => {
                self.output.pause();
                self.finish_queue();
                Ok(())
            }
        }
    }

    /// Skip to the previous track (always sequential)
    pub fn previous(&mut self) -> Result<()> {
        if self.current_index.is_none() {
            return Ok(());
        }
        self.record_interaction(InteractionKind::Skip);

        match self.pick_previous_index() {
            Some(prev) => self.begin_load_at(prev),
            None => {
                self.output.pause();
                self.finish_queue();
                Ok(())
            }
        }
    }

    // ===== Navigation Mode =====

    /// Toggle shuffle. Picks are re-rolled at each advance; no shuffled
    /// order is persisted.
    pub fn toggle_shuffle(&mut self) {
        self.mode.shuffle = !self.mode.shuffle;
    }

    /// Set the repeat mode
    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.mode.repeat = repeat;
    }

    /// Cycle repeat Off -> All -> One -> Off (single-button UIs)
    pub fn cycle_repeat(&mut self) {
        self.mode.repeat = match self.mode.repeat {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        };
    }

    // ===== Volume =====

    /// Set the volume level (clamped to 0.0-1.0)
    pub fn set_volume(&mut self, level: f32) {
        self.volume.set_level(level);
        self.apply_gain();
    }

    /// Bump the volume by a delta (keyboard shortcuts)
    pub fn adjust_volume(&mut self, delta: f32) {
        self.volume.adjust(delta);
        self.apply_gain();
    }

    /// Toggle mute; un-muting restores the prior level
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_gain();
    }

    // ===== Interactions =====

    /// Record a favorite for the current track (best-effort)
    pub fn favorite_current(&mut self) {
        self.record_interaction(InteractionKind::Favorite);
    }

    // ===== Media Events =====

    /// Fold one media event into engine state
    ///
    /// Events whose token does not match the current load are stale -
    /// they belong to a track that was switched away from - and are
    /// discarded before anything else happens.
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        if event.token != self.token {
            debug!(?event.token, current = ?self.token, "discarding stale media event");
            return;
        }

        match event.kind {
            MediaEventKind::LoadStart => {
                self.set_status(PlaybackStatus::Loading);
            }
            MediaEventKind::TimeUpdate(position) => {
                self.position = position;
                self.push_event(PlayerEvent::PositionUpdate {
                    position,
                    duration: self.duration,
                });
            }
            MediaEventKind::DurationKnown(duration) => {
                self.duration = Some(duration);
                self.resolve_loading();
            }
            MediaEventKind::CanPlay => {
                self.resolve_loading();
            }
            MediaEventKind::Ended => {
                self.on_track_ended();
            }
            MediaEventKind::Error(reason) => {
                warn!(%reason, "media output reported an error");
                let err = PlaybackError::Media(reason);
                self.last_error = Some(err.clone());
                self.set_status(PlaybackStatus::Error);
                self.push_event(PlayerEvent::Error { error: err });
            }
        }
    }

    // ===== State Queries =====

    /// Current playback status
    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    /// Current navigation mode
    pub fn mode(&self) -> NavigationMode {
        self.mode
    }

    /// The currently selected track, if any
    pub fn current_track(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.queue.get(i))
    }

    /// Index of the current track in the queue
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// The active queue
    pub fn queue(&self) -> &[Track] {
        &self.queue
    }

    /// Complete externally-visible state at this instant
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            status: self.status,
            current_track: self.current_track().cloned(),
            current_index: self.current_index,
            position: self.position,
            duration: self.duration,
            volume: self.volume.level(),
            muted: self.volume.is_muted(),
            mode: self.mode,
            last_error: self.last_error.clone(),
        }
    }

    /// Drain pending delta events
    pub fn take_events(&mut self) -> Vec<PlayerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internals =====

    /// Load the track at `index` from the active queue
    fn begin_load_at(&mut self, index: usize) -> Result<()> {
        let previous_id = self.current_track().map(|t| t.id.clone());
        let track = self.queue[index].clone();

        self.current_index = Some(index);
        self.token_counter += 1;
        self.token = LoadToken(self.token_counter);
        self.position = Duration::ZERO;
        self.duration = None;
        self.pending_autoplay = true;
        self.last_error = None;

        debug!(track_id = %track.id, token = ?self.token, "loading track");
        self.output.load(&track.audio_uri, self.token);
        self.set_status(PlaybackStatus::Loading);
        self.push_event(PlayerEvent::TrackChanged {
            track_id: track.id,
            previous_track_id: previous_id,
        });
        Ok(())
    }

    /// Ask the device to start and settle the resulting status
    fn start_playback(&mut self) -> Result<()> {
        match self.output.play() {
            Ok(()) => {
                self.last_error = None;
                self.set_status(PlaybackStatus::Playing);
                self.record_interaction(InteractionKind::Play);
                Ok(())
            }
            Err(rejected) => {
                let err = PlaybackError::PlaybackRejected(rejected.reason);
                self.last_error = Some(err.clone());
                self.set_status(PlaybackStatus::Error);
                self.push_event(PlayerEvent::Error { error: err.clone() });
                Err(err)
            }
        }
    }

    /// Clear `Loading` once metadata/buffering arrives, honoring a queued
    /// play intent
    fn resolve_loading(&mut self) {
        if self.status != PlaybackStatus::Loading {
            return;
        }
        if self.pending_autoplay {
            self.pending_autoplay = false;
            let _ = self.start_playback();
        } else {
            self.set_status(PlaybackStatus::Paused);
        }
    }

    /// End-of-track policy, in priority order:
    /// 1. repeat-one restarts the current track (navigator not consulted)
    /// 2. shuffle advances to a uniformly random other track
    /// 3. sequential next, wrapping to 0 under repeat-all
    /// 4. otherwise the queue is finished: status `Ended`, last track kept
    fn on_track_ended(&mut self) {
        if self.current_index.is_none() {
            return;
        }

        if self.mode.repeat == RepeatMode::One {
            self.output.seek(Duration::ZERO);
            self.position = Duration::ZERO;
            let _ = self.start_playback();
            return;
        }

        match self.pick_next_index() {
            Some(next) => {
                let _ = self.begin_load_at(next);
            }
            None => self.finish_queue(),
        }
    }

    fn pick_next_index(&mut self) -> Option<usize> {
        let index = self.current_index?;
        let len = self.queue.len();

        if self.mode.shuffle {
            navigator::random_other(len, index, &mut thread_rng())
        } else {
            match navigator::sequential_next(len, index) {
                Some(next) => Some(next),
                None if self.mode.repeat == RepeatMode::All && len > 0 => Some(0),
                None => None,
            }
        }
    }

    fn pick_previous_index(&self) -> Option<usize> {
        let index = self.current_index?;
        let len = self.queue.len();

        match navigator::sequential_previous(index) {
            Some(prev) => Some(prev),
            None if self.mode.repeat == RepeatMode::All && len > 0 => Some(len - 1),
            None => None,
        }
    }

    /// Stop at the end of the queue, keeping the last track for display
    fn finish_queue(&mut self) {
        if let Some(duration) = self.duration {
            self.position = duration;
        }
        self.set_status(PlaybackStatus::Ended);
    }

    fn set_status(&mut self, status: PlaybackStatus) {
        if self.status != status {
            self.status = status;
            self.push_event(PlayerEvent::StateChanged { status });
        }
    }

    fn apply_gain(&mut self) {
        self.output.set_gain(self.volume.effective_gain());
        self.push_event(PlayerEvent::VolumeChanged {
            level: self.volume.level(),
            muted: self.volume.is_muted(),
        });
    }

    fn record_interaction(&mut self, kind: InteractionKind) {
        let id = self.current_track().map(|t| t.id.clone());
        if let Some(track_id) = id {
            self.sink.record(Interaction::new(track_id, kind));
        }
    }

    fn push_event(&mut self, event: PlayerEvent) {
        self.pending_events.push(event);
    }
}
