//! Stream selection: filtering a match's stream entries down to playable
//! candidates and tracking which one is active.
//!
//! The selector never touches the player. It reports `Switch` outcomes and
//! the caller hands those to the playback controller; reselecting the index
//! that is already active is a no-op so redundant reloads never happen.

use log::debug;

use crate::errors::MatchdayError;
use crate::model::{Match, StreamEntry};

/// Server-row button view-model, one per playable stream.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerButton {
    pub index: usize,
    pub label: String,
    pub active: bool,
    /// Blink styling hint: set when the selected match is live.
    pub live: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectOutcome {
    /// The index was already active; nothing to do.
    AlreadyActive,
    /// A different stream was chosen; the caller should switch playback.
    Switch(StreamEntry),
}

#[derive(Debug, Default)]
pub struct StreamSelector {
    streams: Vec<StreamEntry>,
    active: Option<usize>,
    match_is_live: bool,
}

impl StreamSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the selector to a match: keep only entries with a non-empty URL
    /// (malformed entries are silently dropped) and reset the active index.
    /// Errors with `NoPlayableStream` when nothing survives the filter.
    pub fn for_match(&mut self, m: &Match) -> Result<&[StreamEntry], MatchdayError> {
        let playable: Vec<StreamEntry> =
            m.streams.iter().filter(|s| s.is_playable()).cloned().collect();
        let dropped = m.streams.len() - playable.len();
        if dropped > 0 {
            debug!("dropped {} stream entries without a URL", dropped);
        }

        self.active = None;
        self.match_is_live = m.is_live();
        if playable.is_empty() {
            self.streams.clear();
            return Err(MatchdayError::NoPlayableStream);
        }
        self.streams = playable;
        Ok(&self.streams)
    }

    /// Make the stream at `index` active. No-op when it already is.
    pub fn select(&mut self, index: usize) -> Result<SelectOutcome, MatchdayError> {
        let stream = self.streams.get(index).ok_or(MatchdayError::NoPlayableStream)?;
        if self.active == Some(index) {
            return Ok(SelectOutcome::AlreadyActive);
        }
        self.active = Some(index);
        Ok(SelectOutcome::Switch(stream.clone()))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    pub fn streams(&self) -> &[StreamEntry] {
        &self.streams
    }

    /// Server-row buttons for the current match. Labels fall back to
    /// "Server {n}" and the active button carries the live-blink hint when
    /// the match is live.
    pub fn server_buttons(&self) -> Vec<ServerButton> {
        self.streams
            .iter()
            .enumerate()
            .map(|(index, s)| {
                let active = self.active == Some(index);
                ServerButton {
                    index,
                    label: s
                        .name
                        .as_deref()
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .map(str::to_string)
                        .unwrap_or_else(|| format!("Server {}", index + 1)),
                    active,
                    live: active && self.match_is_live,
                }
            })
            .collect()
    }
}
