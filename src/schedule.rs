//! Countdown scheduling: the one periodic tick of the page.
//!
//! Every second, each displayed badge is recomputed from wall-clock time.
//! The tick is the only place outside ingestion where a match's status
//! moves, and the only move it makes is the forward upcoming->live
//! promotion when a scheduled start is reached.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use tokio::task::JoinHandle;

use crate::classify::{classify, BadgeState};
use crate::state::{AppState, MatchKey};

pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// What one tick changed, for logging and tests.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Matches promoted upcoming -> live this tick.
    pub promoted: Vec<MatchKey>,
    /// Number of badges whose displayed text changed.
    pub retexted: usize,
}

/// Run one tick over every displayed badge. Pure computation plus bounded
/// per-badge state updates; no I/O.
pub fn run_tick(state: &mut AppState, now: DateTime<Utc>) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    let AppState { store, badges, .. } = state;

    for slot in badges.iter_mut() {
        let Some(m) = store.get_mut(&slot.key) else {
            continue;
        };
        let badge = classify(m.status, m.start_time.as_deref(), m.score.as_deref(), now);

        // An upcoming match whose start has passed goes live: promote the
        // stored match and flip the badge. This is the only status mutation
        // outside ingestion, and it only ever moves forward.
        if badge.state == BadgeState::Live && m.promote_live() {
            info!("match went live: {:?}", slot.key);
            outcome.promoted.push(slot.key.clone());
        }

        // Ended is terminal: strip schedule/live markers, idempotently.
        if slot.text != badge.text {
            outcome.retexted += 1;
        }
        slot.apply(&badge);
    }

    outcome
}

/// Lock the shared state for a tick, recovering from a poisoned lock. A
/// panic elsewhere must not freeze every badge on screen; `run_tick` only
/// recomputes badges from the store, so a half-finished mutation elsewhere
/// cannot corrupt it further.
fn lock_for_tick(state: &Mutex<AppState>) -> MutexGuard<'_, AppState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("state lock poisoned; ticking on recovered state");
            poisoned.into_inner()
        }
    }
}

/// Drives `run_tick` once per second for the lifetime of the page session.
///
/// Start is idempotent: a second start request while a loop is running is a
/// no-op. Stop exists for testability; normal operation never calls it.
#[derive(Debug, Default)]
pub struct CountdownScheduler {
    handle: Option<JoinHandle<()>>,
}

impl CountdownScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Spawn the tick loop. Requires the match-set to already be ingested;
    /// the first tick therefore always observes a populated store.
    pub fn start(&mut self, state: Arc<Mutex<AppState>>) {
        if self.is_running() {
            debug!("countdown scheduler already running");
            return;
        }
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_PERIOD);
            // The immediate first tick would race the ingestion render.
            interval.tick().await;
            loop {
                interval.tick().await;
                let now = Utc::now();
                let mut state = lock_for_tick(&state);
                run_tick(&mut state, now);
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for CountdownScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
