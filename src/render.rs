//! Match list rendering: pure view-model computation, no UI toolkit calls.
//!
//! The shell takes the view-models produced here and turns them into real
//! widgets/elements; nothing in this module touches the display.

use chrono::{DateTime, Utc};

use crate::classify::{classify, Badge};
use crate::model::{Match, Team};
use crate::selector::ServerButton;
use crate::state::MatchKey;

pub const FALLBACK_TITLE: &str = "Unknown Tournament";
pub const PLACEHOLDER_TEXT: &str = "No matches";

#[derive(Debug, Clone, PartialEq)]
pub struct TeamView {
    pub name: String,
    pub logo: String,
    /// Accessibility label for the logo; filled only when accessible labels
    /// are enabled in config.
    pub alt: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CardView {
    /// Index of the match in the *unsorted* category list, so activating the
    /// card can hand the right match to the stream selector.
    pub key: MatchKey,
    pub title: String,
    pub home: TeamView,
    pub away: TeamView,
    pub badge: Badge,
}

/// Rendered category: either a card list or exactly one placeholder.
#[derive(Debug, Clone)]
pub struct CategoryView {
    pub category: String,
    pub cards: Vec<CardView>,
    pub placeholder: Option<String>,
}

/// Player-area view-model produced when a match is selected.
#[derive(Debug, Clone)]
pub struct PlayerPanel {
    pub title: String,
    pub buttons: Vec<ServerButton>,
    /// Set instead of buttons when the match has no playable stream.
    pub unavailable: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct MatchListRenderer {
    pub accessible_labels: bool,
}

impl MatchListRenderer {
    pub fn new(accessible_labels: bool) -> Self {
        Self { accessible_labels }
    }

    /// Order and render one category's matches.
    ///
    /// Sort: live first, then upcoming soonest-first, then ended
    /// most-recent-first. Live-vs-live keeps snapshot order (stable sort).
    pub fn render(&self, category: &str, matches: &[Match], now: DateTime<Utc>) -> CategoryView {
        if matches.is_empty() {
            return CategoryView {
                category: category.to_string(),
                cards: Vec::new(),
                placeholder: Some(PLACEHOLDER_TEXT.to_string()),
            };
        }

        let mut order: Vec<usize> = (0..matches.len()).collect();
        order.sort_by(|&a, &b| compare_matches(&matches[a], &matches[b]));

        let cards = order
            .into_iter()
            .map(|index| {
                let m = &matches[index];
                CardView {
                    key: MatchKey::new(category, index),
                    title: m
                        .title
                        .as_deref()
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .unwrap_or(FALLBACK_TITLE)
                        .to_string(),
                    home: self.team_view(m.team1.as_ref(), "Team 1"),
                    away: self.team_view(m.team2.as_ref(), "Team 2"),
                    badge: classify(m.status, m.start_time.as_deref(), m.score.as_deref(), now),
                }
            })
            .collect();

        CategoryView { category: category.to_string(), cards, placeholder: None }
    }

    fn team_view(&self, team: Option<&Team>, fallback: &str) -> TeamView {
        let name = team
            .and_then(|t| t.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(fallback)
            .to_string();
        let logo = team.and_then(|t| t.logo.clone()).unwrap_or_default();
        let alt = self.accessible_labels.then(|| format!("{} logo", name));
        TeamView { name, logo, alt }
    }
}

fn lifecycle_rank(m: &Match) -> u8 {
    use crate::model::MatchStatus::*;
    match m.status {
        Live => 0,
        Upcoming => 1,
        Ended => 2,
    }
}

fn compare_matches(a: &Match, b: &Match) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    let rank = lifecycle_rank(a).cmp(&lifecycle_rank(b));
    if rank != Ordering::Equal {
        return rank;
    }
    let (ta, tb) = (
        a.start_time.as_deref().and_then(crate::classify::parse_start_time),
        b.start_time.as_deref().and_then(crate::classify::parse_start_time),
    );
    match (ta, tb) {
        (Some(ta), Some(tb)) => match a.status {
            // Upcoming: earliest first. Ended: latest first. Live: stable.
            crate::model::MatchStatus::Upcoming => ta.cmp(&tb),
            crate::model::MatchStatus::Ended => tb.cmp(&ta),
            crate::model::MatchStatus::Live => Ordering::Equal,
        },
        _ => Ordering::Equal,
    }
}

/// Build the player-area view-model for a selected match from the state of
/// its stream selector. An empty server row surfaces as the "unavailable"
/// message instead of buttons.
pub fn player_panel(m: &Match, selector: &crate::selector::StreamSelector) -> PlayerPanel {
    let buttons = selector.server_buttons();
    let unavailable = buttons
        .is_empty()
        .then(|| crate::errors::MatchdayError::NoPlayableStream.status_line());
    PlayerPanel { title: player_title(m), buttons, unavailable }
}

/// Player-area heading: "{home} vs {away}" with the usual team fallbacks.
pub fn player_title(m: &Match) -> String {
    let name = |team: Option<&Team>, fallback: &str| {
        team.and_then(|t| t.name.as_deref())
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(fallback)
            .to_string()
    };
    format!("{} vs {}", name(m.team1.as_ref(), "Team 1"), name(m.team2.as_ref(), "Team 2"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::model::MatchStatus;

    fn upcoming(start: &str) -> Match {
        Match { status: MatchStatus::Upcoming, start_time: Some(start.to_string()), ..Default::default() }
    }

    #[test]
    fn empty_category_renders_single_placeholder() {
        let view = MatchListRenderer::default().render("cricket", &[], Utc::now());
        assert!(view.cards.is_empty());
        assert_eq!(view.placeholder.as_deref(), Some(PLACEHOLDER_TEXT));
    }

    #[test]
    fn fallbacks_cover_missing_title_and_teams() {
        let now = Utc.with_ymd_and_hms(2026, 8, 26, 12, 0, 0).unwrap();
        let view = MatchListRenderer::new(true).render("cricket", &[Match::default()], now);
        let card = &view.cards[0];
        assert_eq!(card.title, FALLBACK_TITLE);
        assert_eq!(card.home.name, "Team 1");
        assert_eq!(card.away.name, "Team 2");
        assert_eq!(card.home.alt.as_deref(), Some("Team 1 logo"));
        assert_eq!(card.home.logo, "");
    }

    #[test]
    fn player_title_uses_team_fallbacks() {
        assert_eq!(player_title(&Match::default()), "Team 1 vs Team 2");
    }

    #[test]
    fn upcoming_sorts_soonest_first_and_ended_latest_first() {
        let mk_ended = |start: &str| Match {
            status: MatchStatus::Ended,
            start_time: Some(start.to_string()),
            ..Default::default()
        };
        let matches = vec![
            upcoming("2026-08-27T12:00:00Z"),
            upcoming("2026-08-26T18:00:00Z"),
            mk_ended("2026-08-20T12:00:00Z"),
            mk_ended("2026-08-24T12:00:00Z"),
        ];
        let now = Utc.with_ymd_and_hms(2026, 8, 26, 12, 0, 0).unwrap();
        let view = MatchListRenderer::default().render("football", &matches, now);
        let indices: Vec<usize> = view.cards.iter().map(|c| c.key.index).collect();
        assert_eq!(indices, vec![1, 0, 3, 2]);
    }
}
