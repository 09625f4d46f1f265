//! Ingestion events from the external match-data source.
//!
//! The core never talks to the realtime database itself; the glue layer
//! delivers parsed snapshots (or failures) as events. Readiness is a single
//! awaited signal with a bounded timeout, not an event racing a poll loop.

use std::time::Duration;

use chrono::{DateTime, Utc};
use log::{info, warn};
use tokio::sync::mpsc;

use crate::classify::parse_start_time;
use crate::errors::MatchdayError;
use crate::model::{MatchStatus, Snapshot};
use crate::state::{AppState, MatchKey};

/// Status line shown when a fresh snapshot lands.
pub const STATUS_CONNECTED: &str = "Connected";

#[derive(Debug, Clone, PartialEq)]
pub enum IngestEvent {
    /// A parsed match-set snapshot is ready.
    Ready(Snapshot),
    /// The source failed (network/auth/parse); opaque reason for display.
    Failed(String),
}

/// Apply an ingest event to the application state.
///
/// A ready snapshot replaces the match-set wholesale and rebuilds the badge
/// board. A failure only updates the status line: whatever was rendered
/// before (cached or previous snapshot) stays up, so the page never blanks.
/// Returns whether fresh data was applied.
pub fn apply(state: &mut AppState, event: IngestEvent, now: DateTime<Utc>) -> bool {
    match event {
        IngestEvent::Ready(snapshot) => {
            info!("snapshot ready: {} matches", snapshot.match_count());
            for key in invalid_start_times(&snapshot) {
                // Degrades per badge (empty countdown); flagged once here.
                let raw = snapshot.category(&key.category)[key.index]
                    .start_time
                    .clone()
                    .unwrap_or_default();
                warn!("{}", MatchdayError::InvalidStartTime(raw).diagnostics());
            }
            state.store.replace_all(snapshot);
            state.selection.clear();
            state.rebuild_badges(now);
            state.source_status = Some(STATUS_CONNECTED.to_string());
            true
        }
        IngestEvent::Failed(reason) => {
            let error = MatchdayError::Ingestion(reason);
            warn!("{}", error.diagnostics());
            state.source_status = Some(error.status_line());
            false
        }
    }
}

/// Upcoming matches whose raw start timestamp does not parse. Their badges
/// render an empty countdown; callers may want to log or surface them.
pub fn invalid_start_times(snapshot: &Snapshot) -> Vec<MatchKey> {
    let mut keys = Vec::new();
    for (category, matches) in &snapshot.categories {
        for (index, m) in matches.iter().enumerate() {
            if m.status != MatchStatus::Upcoming {
                continue;
            }
            if let Some(raw) = m.start_time.as_deref() {
                if parse_start_time(raw).is_none() {
                    keys.push(MatchKey::new(category.clone(), index));
                }
            }
        }
    }
    keys
}

/// Wait for the first ingest event with a bounded timeout. A closed channel
/// or an elapsed timeout degrades to a `Failed` event so the caller always
/// has exactly one readiness outcome to apply.
pub async fn await_snapshot(rx: &mut mpsc::Receiver<IngestEvent>, wait: Duration) -> IngestEvent {
    match tokio::time::timeout(wait, rx.recv()).await {
        Ok(Some(event)) => event,
        Ok(None) => IngestEvent::Failed("source closed before first snapshot".to_string()),
        Err(_) => IngestEvent::Failed(format!("no snapshot within {}s", wait.as_secs())),
    }
}
