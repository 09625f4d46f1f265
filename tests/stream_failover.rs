use std::time::{Duration, Instant};

use matchday_lib::errors::MatchdayError;
use matchday_lib::model::{ClearKey, Match, MatchStatus, StreamEntry, StreamKind};
use matchday_lib::playback::{PlaybackController, PlaybackOptions, PlaybackPhase, PlayerSlot};
use matchday_lib::selector::{SelectOutcome, StreamSelector};

/// Records every SDK call so tests can assert exact call sequences.
#[derive(Default)]
struct RecordingPlayer {
    calls: Vec<String>,
    fail_loads: usize,
}

impl RecordingPlayer {
    fn count(&self, prefix: &str) -> usize {
        self.calls.iter().filter(|c| c.starts_with(prefix)).count()
    }
}

impl PlayerSlot for RecordingPlayer {
    fn configure_drm(&mut self, key: Option<&ClearKey>) {
        match key {
            Some(k) => self.calls.push(format!("drm:{}", k.key_id)),
            None => self.calls.push("drm:none".to_string()),
        }
    }

    fn load(&mut self, url: &str) -> Result<(), String> {
        self.calls.push(format!("load:{}", url));
        if self.fail_loads > 0 {
            self.fail_loads -= 1;
            return Err("manifest rejected".to_string());
        }
        Ok(())
    }

    fn play(&mut self) {
        self.calls.push("play".to_string());
    }

    fn embed(&mut self, url: &str) {
        self.calls.push(format!("embed:{}", url));
    }

    fn teardown(&mut self) {
        self.calls.push("teardown".to_string());
    }
}

fn adaptive(url: &str) -> StreamEntry {
    StreamEntry { url: url.to_string(), ..Default::default() }
}

fn controller() -> PlaybackController {
    PlaybackController::new(PlaybackOptions::default())
}

#[test]
fn switching_streams_tears_down_exactly_once_before_load() {
    let mut player = RecordingPlayer::default();
    let mut ctrl = controller();

    ctrl.play_stream(&mut player, &adaptive("https://cdn/a.m3u8")).unwrap();
    assert_eq!(player.count("teardown"), 0, "first load has no prior context");

    ctrl.play_stream(&mut player, &adaptive("https://cdn/b.m3u8")).unwrap();
    assert_eq!(player.count("teardown"), 1);
    let teardown_pos = player.calls.iter().position(|c| c == "teardown").unwrap();
    let second_load = player.calls.iter().position(|c| c == "load:https://cdn/b.m3u8").unwrap();
    assert!(teardown_pos < second_load);
}

#[test]
fn single_error_retries_once_after_backoff_only() {
    let mut player = RecordingPlayer::default();
    let mut ctrl = controller();
    let t0 = Instant::now();

    ctrl.play_stream(&mut player, &adaptive("https://cdn/a.m3u8")).unwrap();
    assert_eq!(ctrl.phase(), PlaybackPhase::Playing);

    ctrl.on_error("segment 404", t0);
    assert_eq!(ctrl.phase(), PlaybackPhase::Retrying);
    assert_eq!(ctrl.pending_retry(), Some(t0 + Duration::from_secs(2)));

    // Backoff not elapsed: nothing fires.
    assert!(!ctrl.poll_retry(&mut player, t0 + Duration::from_secs(1)));
    assert_eq!(player.count("load:"), 1);

    // Backoff elapsed: exactly one retry on the same URL.
    assert!(ctrl.poll_retry(&mut player, t0 + Duration::from_secs(2)));
    assert_eq!(player.count("load:https://cdn/a.m3u8"), 2);
    assert_eq!(ctrl.phase(), PlaybackPhase::Playing);

    // Second consecutive error on the same context: persistent failure.
    ctrl.on_error("segment 404 again", t0 + Duration::from_secs(3));
    assert_eq!(ctrl.phase(), PlaybackPhase::Failed);
    assert!(ctrl.pending_retry().is_none());
    assert!(!ctrl.poll_retry(&mut player, t0 + Duration::from_secs(10)));
    assert_eq!(player.count("load:"), 2);
}

#[test]
fn selecting_a_new_stream_cancels_the_pending_retry() {
    let mut player = RecordingPlayer::default();
    let mut ctrl = controller();
    let t0 = Instant::now();

    ctrl.play_stream(&mut player, &adaptive("https://cdn/a.m3u8")).unwrap();
    ctrl.on_error("stall", t0);

    // User switches servers before the backoff elapses.
    ctrl.play_stream(&mut player, &adaptive("https://cdn/b.m3u8")).unwrap();
    assert!(ctrl.pending_retry().is_none());

    assert!(!ctrl.poll_retry(&mut player, t0 + Duration::from_secs(5)));
    assert_eq!(player.count("load:https://cdn/a.m3u8"), 1, "no retry against torn-down context");
    assert_eq!(player.count("load:https://cdn/b.m3u8"), 1);
}

#[test]
fn drm_keys_never_leak_between_streams() {
    let mut player = RecordingPlayer::default();
    let mut ctrl = controller();

    let mut protected = adaptive("https://cdn/drm.mpd");
    protected.clearkey =
        Some(ClearKey { key_id: "kid-1".to_string(), key: "aabbcc".to_string() });
    ctrl.play_stream(&mut player, &protected).unwrap();
    assert!(player.calls.contains(&"drm:kid-1".to_string()));

    // Next stream has no keys: the previous ones must be cleared.
    ctrl.play_stream(&mut player, &adaptive("https://cdn/clear.m3u8")).unwrap();
    assert_eq!(player.calls.last().unwrap(), "play");
    assert!(player.calls.contains(&"drm:none".to_string()));
}

#[test]
fn drm_disabled_always_clears_keys() {
    let mut player = RecordingPlayer::default();
    let mut ctrl = PlaybackController::new(PlaybackOptions {
        drm_enabled: false,
        ..Default::default()
    });

    let mut protected = adaptive("https://cdn/drm.mpd");
    protected.clearkey =
        Some(ClearKey { key_id: "kid-1".to_string(), key: "aabbcc".to_string() });
    ctrl.play_stream(&mut player, &protected).unwrap();
    assert_eq!(player.count("drm:none"), 1);
    assert_eq!(player.count("drm:kid-1"), 0);
}

#[test]
fn embeds_bypass_sdk_and_retry_logic() {
    let mut player = RecordingPlayer::default();
    let mut ctrl = controller();

    let stream = StreamEntry {
        url: "https://embed.example/x".to_string(),
        kind: StreamKind::Embed,
        ..Default::default()
    };
    ctrl.play_stream(&mut player, &stream).unwrap();
    assert_eq!(player.calls, vec!["embed:https://embed.example/x"]);
    assert_eq!(ctrl.phase(), PlaybackPhase::Playing);

    // Errors reported against an embed are ignored; the frame manages
    // its own playback.
    ctrl.on_error("irrelevant", Instant::now());
    assert_eq!(ctrl.phase(), PlaybackPhase::Playing);
    assert!(ctrl.pending_retry().is_none());
}

#[test]
fn failed_retry_load_is_a_persistent_error() {
    let mut player = RecordingPlayer::default();
    let mut ctrl = controller();
    let t0 = Instant::now();

    ctrl.play_stream(&mut player, &adaptive("https://cdn/a.m3u8")).unwrap();
    ctrl.on_error("stall", t0);
    player.fail_loads = 1;
    assert!(ctrl.poll_retry(&mut player, t0 + Duration::from_secs(2)));
    assert_eq!(ctrl.phase(), PlaybackPhase::Failed);
}

#[test]
fn reselecting_the_active_server_never_touches_the_player() {
    let mut player = RecordingPlayer::default();
    let mut ctrl = controller();
    let mut selector = StreamSelector::new();

    let m = Match {
        status: MatchStatus::Live,
        streams: vec![adaptive("https://cdn/a.m3u8"), adaptive("https://cdn/b.m3u8")],
        ..Default::default()
    };
    selector.for_match(&m).unwrap();

    if let SelectOutcome::Switch(stream) = selector.select(0).unwrap() {
        ctrl.play_stream(&mut player, &stream).unwrap();
    }
    let calls_after_first = player.calls.len();

    // Same index again: selector reports AlreadyActive, so the glue layer
    // never reaches the controller and no teardown/reload happens.
    assert_eq!(selector.select(0).unwrap(), SelectOutcome::AlreadyActive);
    assert_eq!(player.calls.len(), calls_after_first);
    assert_eq!(player.count("teardown"), 0);
}

#[test]
fn zero_playable_streams_never_invokes_playback() {
    let mut selector = StreamSelector::new();
    let m = Match {
        streams: vec![StreamEntry::default(), StreamEntry { url: "  ".to_string(), ..Default::default() }],
        ..Default::default()
    };
    assert_eq!(selector.for_match(&m).unwrap_err(), MatchdayError::NoPlayableStream);
    assert!(selector.server_buttons().is_empty());
}
