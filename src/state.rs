//! Application state: the match store, the single selection, and the badge
//! board the countdown tick works against.
//!
//! One `AppState` owns everything mutable on the page. Components receive it
//! by reference; there are no ambient globals.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::classify::{classify, Badge, BadgeState};
use crate::model::{Match, Snapshot};

/// Identity of a match within the current snapshot generation:
/// category name plus index into that category's list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MatchKey {
    pub category: String,
    pub index: usize,
}

impl MatchKey {
    pub fn new(category: impl Into<String>, index: usize) -> Self {
        Self { category: category.into(), index }
    }
}

/// Holds the current set of matches per category. Replaced wholesale on each
/// ingestion refresh; mutated in place only by the countdown tick's
/// upcoming->live promotion.
#[derive(Debug, Default)]
pub struct MatchStore {
    categories: BTreeMap<String, Vec<Match>>,
}

impl MatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole match-set with a fresh snapshot.
    pub fn replace_all(&mut self, snapshot: Snapshot) {
        self.categories = snapshot.categories;
    }

    /// Matches for a category; unknown categories normalize to empty.
    pub fn category(&self, name: &str) -> &[Match] {
        self.categories.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn get(&self, key: &MatchKey) -> Option<&Match> {
        self.categories.get(&key.category)?.get(key.index)
    }

    pub fn get_mut(&mut self, key: &MatchKey) -> Option<&mut Match> {
        self.categories.get_mut(&key.category)?.get_mut(key.index)
    }

    pub fn is_empty(&self) -> bool {
        self.categories.values().all(Vec::is_empty)
    }
}

/// The one selection that exists per page session: which match is open in
/// the player area, and which of its streams is active.
#[derive(Debug, Default)]
pub struct SelectionState {
    pub selected: Option<MatchKey>,
    /// Index into the filtered playable-stream list, 0 on every new match.
    pub active_stream: usize,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a match, resetting the active stream to the first entry.
    /// Returns false when the match was already selected.
    pub fn select_match(&mut self, key: MatchKey) -> bool {
        if self.selected.as_ref() == Some(&key) {
            return false;
        }
        self.selected = Some(key);
        self.active_stream = 0;
        true
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.active_stream = 0;
    }
}

/// Displayed badge for one match. Derived state: it must always equal
/// `classify(status, start_time, now)` after a tick; it never drifts.
#[derive(Debug, Clone)]
pub struct BadgeSlot {
    pub key: MatchKey,
    pub state: BadgeState,
    pub text: String,
}

impl BadgeSlot {
    pub fn apply(&mut self, badge: &Badge) {
        self.state = badge.state;
        self.text = badge.text.clone();
    }
}

#[derive(Debug, Default)]
pub struct AppState {
    pub store: MatchStore,
    pub selection: SelectionState,
    /// Every currently displayed badge, across all categories.
    pub badges: Vec<BadgeSlot>,
    /// Category shown by the shell right now.
    pub current_category: String,
    /// Transient data-source status line ("Connected", error text).
    pub source_status: Option<String>,
}

impl AppState {
    pub fn new(default_category: impl Into<String>) -> Self {
        Self { current_category: default_category.into(), ..Default::default() }
    }

    /// Rebuild the badge board from the store. Called after every ingestion
    /// refresh so the tick only ever walks current matches.
    pub fn rebuild_badges(&mut self, now: DateTime<Utc>) {
        let mut slots = Vec::new();
        for (category, matches) in &self.store.categories {
            for (index, m) in matches.iter().enumerate() {
                let badge = classify(m.status, m.start_time.as_deref(), m.score.as_deref(), now);
                let mut slot = BadgeSlot {
                    key: MatchKey::new(category.clone(), index),
                    state: badge.state,
                    text: String::new(),
                };
                slot.apply(&badge);
                slots.push(slot);
            }
        }
        self.badges = slots;
    }

    pub fn badge_for(&self, key: &MatchKey) -> Option<&BadgeSlot> {
        self.badges.iter().find(|s| &s.key == key)
    }
}
