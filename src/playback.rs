//! Playback control: binds the active stream to the external player and
//! owns the retry-on-error policy.
//!
//! The player itself sits behind the `PlayerSlot` capability trait; the
//! controller is the only component allowed to drive it, and it always tears
//! the previous context down before establishing a new one.

use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::errors::MatchdayError;
use crate::model::{ClearKey, StreamEntry, StreamKind};

/// Capability interface over the external player SDK and the single
/// player/embed slot it renders into.
pub trait PlayerSlot {
    /// Configure ClearKey material, or clear any previously configured keys
    /// when `None` is passed.
    fn configure_drm(&mut self, key: Option<&ClearKey>);
    /// Load an adaptive manifest. Errors are synchronous load failures;
    /// asynchronous playback errors arrive via `PlaybackController::on_error`.
    fn load(&mut self, url: &str) -> Result<(), String>;
    fn play(&mut self);
    /// Render a passive embedded frame in the slot.
    fn embed(&mut self, url: &str);
    /// Tear down whatever the slot currently shows.
    fn teardown(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackPhase {
    #[default]
    Idle,
    Loading,
    Playing,
    /// An error occurred and one retry is pending.
    Retrying,
    /// The retry was spent (or load failed hard); a persistent error state
    /// the shell surfaces in the player area.
    Failed,
}

#[derive(Debug, Clone)]
pub struct PlaybackOptions {
    /// ClearKey configuration on/off; when off, keys are still cleared on
    /// every load so nothing leaks from a previous stream.
    pub drm_enabled: bool,
    /// Fixed wait before the single retry after a playback error.
    pub retry_backoff: Duration,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self { drm_enabled: true, retry_backoff: Duration::from_secs(2) }
    }
}

#[derive(Debug)]
struct ActiveContext {
    url: String,
    kind: StreamKind,
    /// Whether the single retry for this context has been spent.
    retried: bool,
}

#[derive(Debug, Default)]
pub struct PlaybackController {
    options: PlaybackOptions,
    phase: PlaybackPhase,
    context: Option<ActiveContext>,
    /// Deadline of the pending retry, tagged with the epoch it belongs to so
    /// a retry never fires against a torn-down context.
    retry_at: Option<(Instant, u64)>,
    epoch: u64,
}

impl PlaybackController {
    pub fn new(options: PlaybackOptions) -> Self {
        Self { options, ..Default::default() }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn current_url(&self) -> Option<&str> {
        self.context.as_ref().map(|c| c.url.as_str())
    }

    /// Bind a stream to the player. Tears down the prior context first
    /// (exactly once), cancels any pending retry, then either renders the
    /// embed or configures DRM and starts adaptive playback.
    pub fn play_stream(
        &mut self,
        player: &mut dyn PlayerSlot,
        stream: &StreamEntry,
    ) -> Result<(), MatchdayError> {
        if self.context.take().is_some() {
            player.teardown();
        }
        self.retry_at = None;
        self.epoch += 1;

        match stream.kind {
            StreamKind::Embed => {
                // The embedded page manages its own playback; no SDK, no retry.
                player.embed(&stream.url);
                self.context = Some(ActiveContext {
                    url: stream.url.clone(),
                    kind: StreamKind::Embed,
                    retried: false,
                });
                self.phase = PlaybackPhase::Playing;
                Ok(())
            }
            StreamKind::Adaptive => {
                self.phase = PlaybackPhase::Loading;
                let key = if self.options.drm_enabled { stream.clearkey.as_ref() } else { None };
                player.configure_drm(key);
                self.context = Some(ActiveContext {
                    url: stream.url.clone(),
                    kind: StreamKind::Adaptive,
                    retried: false,
                });
                if let Err(detail) = player.load(&stream.url) {
                    self.phase = PlaybackPhase::Failed;
                    return Err(MatchdayError::Playback(detail));
                }
                player.play();
                self.phase = PlaybackPhase::Playing;
                Ok(())
            }
        }
    }

    /// Playback/DRM error callback from the player SDK.
    ///
    /// First error on a context schedules one retry after the backoff;
    /// further errors (or an error while a retry is already pending) leave
    /// the controller in the persistent `Failed` state.
    pub fn on_error(&mut self, detail: &str, now: Instant) {
        let Some(ctx) = self.context.as_ref() else {
            return;
        };
        if ctx.kind == StreamKind::Embed {
            debug!("ignoring player error for embedded stream: {}", detail);
            return;
        }
        if ctx.retried || self.retry_at.is_some() {
            warn!("playback failed after retry: {}", detail);
            self.retry_at = None;
            self.phase = PlaybackPhase::Failed;
            return;
        }
        warn!("playback error, retrying in {:?}: {}", self.options.retry_backoff, detail);
        self.retry_at = Some((now + self.options.retry_backoff, self.epoch));
        self.phase = PlaybackPhase::Retrying;
    }

    /// Drive a pending retry. Called from the cooperative loop; fires at
    /// most once per context and only when the backoff has elapsed.
    /// Returns true when a retry was attempted.
    pub fn poll_retry(&mut self, player: &mut dyn PlayerSlot, now: Instant) -> bool {
        let Some((at, epoch)) = self.retry_at else {
            return false;
        };
        if now < at || epoch != self.epoch {
            return false;
        }
        self.retry_at = None;
        let Some(ctx) = self.context.as_mut() else {
            return false;
        };
        ctx.retried = true;
        let url = ctx.url.clone();
        debug!("retrying playback of {}", url);
        self.phase = PlaybackPhase::Loading;
        match player.load(&url) {
            Ok(()) => {
                player.play();
                self.phase = PlaybackPhase::Playing;
            }
            Err(detail) => {
                warn!("retry load failed: {}", detail);
                self.phase = PlaybackPhase::Failed;
            }
        }
        true
    }

    /// Deadline of the pending retry, if one is scheduled.
    pub fn pending_retry(&self) -> Option<Instant> {
        self.retry_at.map(|(at, _)| at)
    }

    /// Release the player slot and return to idle. Any pending retry is
    /// cancelled with the context it belonged to.
    pub fn stop(&mut self, player: &mut dyn PlayerSlot) {
        if self.context.take().is_some() {
            player.teardown();
        }
        self.retry_at = None;
        self.epoch += 1;
        self.phase = PlaybackPhase::Idle;
    }
}
