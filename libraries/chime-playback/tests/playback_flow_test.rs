//! Integration tests for the playback engine
//!
//! These tests drive full playback scenarios: select, load resolution,
//! track endings, repeat/shuffle navigation, errors, and interaction
//! recording, through a scripted media output double.

use chime_playback::{
    Interaction, InteractionKind, InteractionSink, LoadToken, MediaEvent, MediaEventKind,
    MediaOutput, PlayRejected, PlaybackEngine, PlaybackStatus, PlayerConfig, RepeatMode, Track,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ===== Test Helpers =====

#[derive(Debug, Clone, PartialEq)]
enum OutputCall {
    Load(String, LoadToken),
    Play,
    Pause,
    Seek(Duration),
    SetGain(f32),
}

/// Media output double that records every command it receives
struct ScriptedOutput {
    calls: Arc<Mutex<Vec<OutputCall>>>,
    reject_play: bool,
}

impl MediaOutput for ScriptedOutput {
    fn load(&mut self, uri: &str, token: LoadToken) {
        self.calls
            .lock()
            .unwrap()
            .push(OutputCall::Load(uri.to_string(), token));
    }

    fn play(&mut self) -> Result<(), PlayRejected> {
        self.calls.lock().unwrap().push(OutputCall::Play);
        if self.reject_play {
            Err(PlayRejected::new("autoplay blocked"))
        } else {
            Ok(())
        }
    }

    fn pause(&mut self) {
        self.calls.lock().unwrap().push(OutputCall::Pause);
    }

    fn seek(&mut self, position: Duration) {
        self.calls.lock().unwrap().push(OutputCall::Seek(position));
    }

    fn set_gain(&mut self, gain: f32) {
        self.calls.lock().unwrap().push(OutputCall::SetGain(gain));
    }
}

/// Interaction sink that records everything it is handed
#[derive(Clone, Default)]
struct RecordingSink {
    recorded: Arc<Mutex<Vec<Interaction>>>,
}

impl InteractionSink for RecordingSink {
    fn record(&mut self, interaction: Interaction) {
        self.recorded.lock().unwrap().push(interaction);
    }
}

/// Engine plus handles into its collaborators
struct Harness {
    engine: PlaybackEngine,
    calls: Arc<Mutex<Vec<OutputCall>>>,
    interactions: Arc<Mutex<Vec<Interaction>>>,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(PlayerConfig::default())
    }

    fn with_config(config: PlayerConfig) -> Self {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let output = ScriptedOutput {
            calls: calls.clone(),
            reject_play: false,
        };
        let mut engine = PlaybackEngine::new(Box::new(output), config);

        let sink = RecordingSink::default();
        let interactions = sink.recorded.clone();
        engine.set_interaction_sink(Box::new(sink));

        Self {
            engine,
            calls,
            interactions,
        }
    }

    fn current_token(&self) -> LoadToken {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find_map(|c| match c {
                OutputCall::Load(_, token) => Some(*token),
                _ => None,
            })
            .expect("no load call recorded")
    }

    fn load_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, OutputCall::Load(..)))
            .count()
    }

    /// Deliver a media event tagged with the most recent load's token
    fn media(&mut self, kind: MediaEventKind) {
        let token = self.current_token();
        self.engine.handle_media_event(MediaEvent::new(token, kind));
    }

    /// Complete the pending load with a known duration
    fn settle(&mut self, duration_secs: u64) {
        self.media(MediaEventKind::DurationKnown(Duration::from_secs(
            duration_secs,
        )));
    }

    fn interactions_of(&self, kind: InteractionKind) -> Vec<String> {
        self.interactions
            .lock()
            .unwrap()
            .iter()
            .filter(|i| i.kind == kind)
            .map(|i| i.track_id.clone())
            .collect()
    }
}

fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Track {}", id),
        artist: "Artist".to_string(),
        album: Some("Album".to_string()),
        genre: Some("Electronic".to_string()),
        duration: None,
        artwork_uri: None,
        audio_uri: format!("https://cdn.example.com/audio/{}.mp3", id),
    }
}

fn queue(ids: &[&str]) -> Vec<Track> {
    ids.iter().map(|id| track(id)).collect()
}

// ===== Select / Load / Play =====

#[test]
fn full_select_to_playing_flow() {
    let mut h = Harness::new();

    h.engine.select_track(queue(&["a", "b", "c"]), 1).unwrap();
    assert_eq!(h.engine.status(), PlaybackStatus::Loading);
    assert_eq!(h.engine.current_track().unwrap().id, "b");

    h.settle(200);
    let snapshot = h.engine.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Playing);
    assert_eq!(snapshot.current_index, Some(1));
    assert_eq!(snapshot.duration, Some(Duration::from_secs(200)));
    assert_eq!(snapshot.position, Duration::ZERO);
}

#[test]
fn selecting_different_track_replaces_load() {
    let mut h = Harness::new();
    let q = queue(&["a", "b"]);

    h.engine.select_track(q.clone(), 0).unwrap();
    h.settle(100);
    h.engine.select_track(q, 1).unwrap();

    assert_eq!(h.engine.status(), PlaybackStatus::Loading);
    assert_eq!(h.load_count(), 2);
    // New load means fresh timing state until the device reports in
    let snapshot = h.engine.snapshot();
    assert_eq!(snapshot.position, Duration::ZERO);
    assert_eq!(snapshot.duration, None);
}

#[test]
fn reselect_toggles_between_playing_and_paused() {
    let mut h = Harness::new();
    let q = queue(&["a", "b"]);

    h.engine.select_track(q.clone(), 0).unwrap();
    h.settle(100);

    for _ in 0..3 {
        h.engine.select_track(q.clone(), 0).unwrap();
        assert_eq!(h.engine.status(), PlaybackStatus::Paused);
        h.engine.select_track(q.clone(), 0).unwrap();
        assert_eq!(h.engine.status(), PlaybackStatus::Playing);
    }
    // The source was loaded exactly once through all toggles
    assert_eq!(h.load_count(), 1);
}

#[test]
fn pause_resume_preserves_position() {
    let mut h = Harness::new();

    h.engine.select_track(queue(&["a"]), 0).unwrap();
    h.settle(300);
    h.media(MediaEventKind::TimeUpdate(Duration::from_secs(42)));

    h.engine.pause();
    assert_eq!(h.engine.status(), PlaybackStatus::Paused);
    assert_eq!(h.engine.snapshot().position, Duration::from_secs(42));

    h.engine.play().unwrap();
    assert_eq!(h.engine.status(), PlaybackStatus::Playing);
    assert_eq!(h.engine.snapshot().position, Duration::from_secs(42));
}

#[test]
fn play_on_empty_engine_is_a_quiet_no_op() {
    let mut h = Harness::new();
    h.engine.play().unwrap();
    h.engine.pause();
    h.engine.next().unwrap();
    h.engine.previous().unwrap();
    assert_eq!(h.engine.status(), PlaybackStatus::Idle);
    assert_eq!(h.load_count(), 0);
}

// ===== End-of-Track Policy =====

#[test]
fn sequential_advance_on_ended() {
    let mut h = Harness::new();

    h.engine.select_track(queue(&["a", "b", "c"]), 0).unwrap();
    h.settle(100);
    h.media(MediaEventKind::Ended);

    assert_eq!(h.engine.current_track().unwrap().id, "b");
    h.settle(100);
    assert_eq!(h.engine.status(), PlaybackStatus::Playing);
}

#[test]
fn queue_exhaustion_ends_and_retains_last_track() {
    let mut h = Harness::new();

    h.engine.select_track(queue(&["a", "b"]), 1).unwrap();
    h.settle(150);
    h.media(MediaEventKind::Ended);

    let snapshot = h.engine.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Ended);
    assert_eq!(snapshot.current_track.unwrap().id, "b");
    // Position parks at the end of the track
    assert_eq!(snapshot.position, Duration::from_secs(150));
}

#[test]
fn repeat_all_wraps_to_first_track() {
    let mut h = Harness::new();
    h.engine.set_repeat(RepeatMode::All);

    h.engine.select_track(queue(&["a", "b"]), 1).unwrap();
    h.settle(100);
    h.media(MediaEventKind::Ended);

    assert_eq!(h.engine.current_index(), Some(0));
    assert_eq!(h.engine.status(), PlaybackStatus::Loading);
}

#[test]
fn repeat_all_natural_endings_visit_in_order_and_wrap() {
    let mut h = Harness::new();
    h.engine.set_repeat(RepeatMode::All);
    h.engine.select_track(queue(&["a", "b", "c"]), 0).unwrap();

    let mut visited = vec![h.engine.current_track().unwrap().id.clone()];
    for _ in 0..3 {
        h.settle(100);
        h.media(MediaEventKind::Ended);
        visited.push(h.engine.current_track().unwrap().id.clone());
    }

    assert_eq!(visited, vec!["a", "b", "c", "a"]);
}

#[test]
fn single_track_queue_ends_cleanly_without_reload() {
    let mut h = Harness::new();

    h.engine.select_track(queue(&["a"]), 0).unwrap();
    h.settle(90);
    h.media(MediaEventKind::Ended);

    let snapshot = h.engine.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Ended);
    assert_eq!(snapshot.current_track.unwrap().id, "a");
    assert_eq!(h.load_count(), 1);
}

#[test]
fn repeat_one_restarts_without_reload() {
    let mut h = Harness::new();
    h.engine.set_repeat(RepeatMode::One);

    h.engine.select_track(queue(&["a", "b"]), 0).unwrap();
    h.settle(100);
    h.media(MediaEventKind::TimeUpdate(Duration::from_secs(99)));
    h.media(MediaEventKind::Ended);

    let snapshot = h.engine.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Playing);
    assert_eq!(snapshot.current_index, Some(0));
    assert_eq!(snapshot.position, Duration::ZERO);
    assert_eq!(h.load_count(), 1);
    assert!(h
        .calls
        .lock()
        .unwrap()
        .contains(&OutputCall::Seek(Duration::ZERO)));
}

#[test]
fn repeat_one_takes_priority_over_shuffle() {
    let mut h = Harness::new();
    h.engine.set_repeat(RepeatMode::One);
    h.engine.toggle_shuffle();

    h.engine.select_track(queue(&["a", "b", "c"]), 1).unwrap();
    h.settle(100);
    h.media(MediaEventKind::Ended);

    assert_eq!(h.engine.current_index(), Some(1));
    assert_eq!(h.load_count(), 1);
}

#[test]
fn shuffle_advances_to_a_different_track() {
    let mut h = Harness::new();
    h.engine.toggle_shuffle();

    h.engine.select_track(queue(&["a", "b", "c", "d"]), 2).unwrap();
    h.settle(100);

    for _ in 0..20 {
        let before = h.engine.current_index().unwrap();
        h.media(MediaEventKind::Ended);
        let after = h.engine.current_index().unwrap();
        assert_ne!(before, after, "shuffle repeated the current track");
        assert!(after < 4);
        h.settle(100);
    }
}

#[test]
fn shuffle_on_single_track_queue_replays_it() {
    let mut h = Harness::new();
    h.engine.toggle_shuffle();

    h.engine.select_track(queue(&["only"]), 0).unwrap();
    h.settle(100);
    h.media(MediaEventKind::Ended);

    assert_eq!(h.engine.current_index(), Some(0));
    assert_eq!(h.engine.status(), PlaybackStatus::Loading);
}

#[test]
fn playback_continues_after_resuming_from_ended() {
    let mut h = Harness::new();

    h.engine.select_track(queue(&["a"]), 0).unwrap();
    h.settle(100);
    h.media(MediaEventKind::Ended);
    assert_eq!(h.engine.status(), PlaybackStatus::Ended);

    // Pressing play restarts the retained track from the top
    h.engine.play().unwrap();
    assert_eq!(h.engine.status(), PlaybackStatus::Playing);
    assert_eq!(h.engine.snapshot().position, Duration::ZERO);
}

// ===== Manual Navigation =====

#[test]
fn manual_next_ignores_repeat_one() {
    let mut h = Harness::new();
    h.engine.set_repeat(RepeatMode::One);

    h.engine.select_track(queue(&["a", "b"]), 0).unwrap();
    h.settle(100);
    h.engine.next().unwrap();

    // Repeat-one holds a track only when it *ends*; a skip is a skip
    assert_eq!(h.engine.current_track().unwrap().id, "b");
}

#[test]
fn next_at_queue_end_without_repeat_stops() {
    let mut h = Harness::new();

    h.engine.select_track(queue(&["a", "b"]), 1).unwrap();
    h.settle(100);
    h.engine.next().unwrap();

    assert_eq!(h.engine.status(), PlaybackStatus::Ended);
    assert_eq!(h.engine.current_track().unwrap().id, "b");
    assert!(h.calls.lock().unwrap().contains(&OutputCall::Pause));
}

#[test]
fn previous_is_sequential_even_under_shuffle() {
    let mut h = Harness::new();
    h.engine.toggle_shuffle();

    h.engine.select_track(queue(&["a", "b", "c"]), 2).unwrap();
    h.settle(100);
    h.engine.previous().unwrap();

    assert_eq!(h.engine.current_track().unwrap().id, "b");
}

#[test]
fn previous_at_start_wraps_only_under_repeat_all() {
    let mut h = Harness::new();
    h.engine.select_track(queue(&["a", "b", "c"]), 0).unwrap();
    h.settle(100);

    h.engine.previous().unwrap();
    assert_eq!(h.engine.status(), PlaybackStatus::Ended);

    let mut h = Harness::new();
    h.engine.set_repeat(RepeatMode::All);
    h.engine.select_track(queue(&["a", "b", "c"]), 0).unwrap();
    h.settle(100);

    h.engine.previous().unwrap();
    assert_eq!(h.engine.current_track().unwrap().id, "c");
}

#[test]
fn cycle_repeat_walks_all_modes() {
    let mut h = Harness::new();
    assert_eq!(h.engine.mode().repeat, RepeatMode::Off);
    h.engine.cycle_repeat();
    assert_eq!(h.engine.mode().repeat, RepeatMode::All);
    h.engine.cycle_repeat();
    assert_eq!(h.engine.mode().repeat, RepeatMode::One);
    h.engine.cycle_repeat();
    assert_eq!(h.engine.mode().repeat, RepeatMode::Off);
}

// ===== Stale Events =====

#[test]
fn rapid_switching_ignores_all_stale_events() {
    let mut h = Harness::new();
    let q = queue(&["a", "b", "c"]);

    h.engine.select_track(q.clone(), 0).unwrap();
    let token_a = h.current_token();
    h.engine.select_track(q.clone(), 1).unwrap();
    let token_b = h.current_token();
    h.engine.select_track(q, 2).unwrap();

    // Everything the first two loads can still emit must bounce off
    for token in [token_a, token_b] {
        h.engine
            .handle_media_event(MediaEvent::new(token, MediaEventKind::CanPlay));
        h.engine.handle_media_event(MediaEvent::new(
            token,
            MediaEventKind::DurationKnown(Duration::from_secs(30)),
        ));
        h.engine
            .handle_media_event(MediaEvent::new(token, MediaEventKind::Ended));
        h.engine.handle_media_event(MediaEvent::new(
            token,
            MediaEventKind::Error("aborted".to_string()),
        ));
    }

    let snapshot = h.engine.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Loading);
    assert_eq!(snapshot.current_index, Some(2));
    assert_eq!(snapshot.duration, None);
    assert_eq!(snapshot.last_error, None);

    // The live load still resolves normally
    h.settle(100);
    assert_eq!(h.engine.status(), PlaybackStatus::Playing);
}

#[test]
fn duplicate_track_ids_in_queue_are_distinguished_by_load() {
    let mut h = Harness::new();
    // Same song appearing twice (e.g. a playlist with a repeat)
    let q = queue(&["a", "b"]);
    let q = vec![q[0].clone(), q[1].clone(), q[0].clone()];

    h.engine.select_track(q, 0).unwrap();
    let first = h.current_token();
    h.settle(100);
    h.engine.next().unwrap();
    h.engine.next().unwrap();
    assert_eq!(h.engine.current_index(), Some(2));

    // A late event from position 0's load must not touch position 2
    h.engine
        .handle_media_event(MediaEvent::new(first, MediaEventKind::Ended));
    assert_eq!(h.engine.current_index(), Some(2));
}

// ===== Errors =====

#[test]
fn media_error_surfaces_and_stays() {
    let mut h = Harness::new();

    h.engine.select_track(queue(&["a", "b"]), 0).unwrap();
    h.settle(100);
    h.media(MediaEventKind::Error("decode failed".to_string()));

    let snapshot = h.engine.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Error);
    assert_eq!(snapshot.current_track.unwrap().id, "a");
    assert!(snapshot
        .last_error
        .is_some_and(|e| e.to_string().contains("decode failed")));
    // No silent skip to the next track
    assert_eq!(h.load_count(), 1);
}

#[test]
fn fresh_selection_clears_error_state() {
    let mut h = Harness::new();
    let q = queue(&["a", "b"]);

    h.engine.select_track(q.clone(), 0).unwrap();
    h.settle(100);
    h.media(MediaEventKind::Error("network".to_string()));
    assert_eq!(h.engine.status(), PlaybackStatus::Error);

    h.engine.select_track(q, 1).unwrap();
    let snapshot = h.engine.snapshot();
    assert_eq!(snapshot.status, PlaybackStatus::Loading);
    assert_eq!(snapshot.last_error, None);
}

#[test]
fn invalid_index_leaves_current_playback_untouched() {
    let mut h = Harness::new();
    let q = queue(&["a", "b"]);

    h.engine.select_track(q.clone(), 0).unwrap();
    h.settle(100);

    assert!(h.engine.select_track(q, 7).is_err());
    // Still playing the same track
    assert_eq!(h.engine.status(), PlaybackStatus::Playing);
    assert_eq!(h.engine.current_track().unwrap().id, "a");
    assert_eq!(h.load_count(), 1);
}

// ===== Seeking =====

#[test]
fn relative_seeks_move_by_ten_seconds() {
    let mut h = Harness::new();

    h.engine.select_track(queue(&["a"]), 0).unwrap();
    h.settle(300);
    h.media(MediaEventKind::TimeUpdate(Duration::from_secs(60)));

    h.engine.seek_by(10.0).unwrap();
    assert_eq!(h.engine.snapshot().position, Duration::from_secs(70));

    h.engine.seek_by(-10.0).unwrap();
    assert_eq!(h.engine.snapshot().position, Duration::from_secs(60));
}

// ===== Interactions =====

#[test]
fn play_skip_and_favorite_reach_the_sink() {
    let mut h = Harness::new();

    h.engine.select_track(queue(&["a", "b"]), 0).unwrap();
    h.settle(100);
    h.engine.favorite_current();
    h.engine.next().unwrap();
    h.settle(100);

    assert_eq!(h.interactions_of(InteractionKind::Play), vec!["a", "b"]);
    assert_eq!(h.interactions_of(InteractionKind::Skip), vec!["a"]);
    assert_eq!(h.interactions_of(InteractionKind::Favorite), vec!["a"]);
}

#[test]
fn favorite_with_no_track_records_nothing() {
    let mut h = Harness::new();
    h.engine.favorite_current();
    assert!(h.interactions.lock().unwrap().is_empty());
}

// ===== Volume =====

#[test]
fn config_volume_is_applied_at_startup() {
    let h = Harness::with_config(PlayerConfig {
        volume: 0.25,
        ..PlayerConfig::default()
    });

    let first_gain = h.calls.lock().unwrap().iter().find_map(|c| match c {
        OutputCall::SetGain(g) => Some(*g),
        _ => None,
    });
    assert_eq!(first_gain, Some(0.25));
}

#[test]
fn mute_silences_without_losing_level() {
    let mut h = Harness::new();
    h.engine.set_volume(0.6);
    h.engine.toggle_mute();

    let snapshot = h.engine.snapshot();
    assert!(snapshot.muted);
    assert_eq!(snapshot.volume, 0.6);

    let last_gain = h
        .calls
        .lock()
        .unwrap()
        .iter()
        .rev()
        .find_map(|c| match c {
            OutputCall::SetGain(g) => Some(*g),
            _ => None,
        });
    assert_eq!(last_gain, Some(0.0));
}

#[test]
fn volume_persists_across_track_changes() {
    let mut h = Harness::new();
    h.engine.set_volume(0.3);

    h.engine.select_track(queue(&["a", "b"]), 0).unwrap();
    h.settle(100);
    h.engine.next().unwrap();
    h.settle(100);

    assert_eq!(h.engine.snapshot().volume, 0.3);
}
