//! Badge classification: pure lifecycle-state and badge-text computation.
//!
//! `classify` is the single source of truth for what a match badge shows.
//! It has no side effects and is safe to call at any frequency; the
//! countdown tick calls it once per badge per second.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};

use crate::model::MatchStatus;

/// Visual state tag of a badge, mirrored into the shell's styling layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeState {
    Schedule,
    Live,
    Ended,
}

impl BadgeState {
    pub fn tag(&self) -> &'static str {
        match self {
            BadgeState::Schedule => "schedule",
            BadgeState::Live => "live",
            BadgeState::Ended => "ended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub state: BadgeState,
    pub text: String,
}

/// Parse a start timestamp as delivered by the source. Accepts RFC 3339,
/// a bare `YYYY-MM-DDTHH:MM:SS` (assumed UTC), or integer epoch
/// seconds/milliseconds. Returns None for anything else.
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(epoch) = raw.parse::<i64>() {
        // Millisecond timestamps are 13 digits for current dates.
        let secs = if epoch.abs() >= 1_000_000_000_000 { epoch / 1000 } else { epoch };
        return Utc.timestamp_opt(secs, 0).single();
    }
    None
}

/// Format the remaining seconds as `Starts in {d}d:{h}h:{m}min:{s}sec`,
/// floor-truncated at each unit boundary.
pub fn format_countdown(mut remaining: i64) -> String {
    let days = remaining / 86_400;
    remaining %= 86_400;
    let hours = remaining / 3_600;
    remaining %= 3_600;
    let mins = remaining / 60;
    let secs = remaining % 60;
    format!("Starts in {}d:{}h:{}min:{}sec", days, hours, mins, secs)
}

/// Compute a badge from a match's status, raw start time, optional final
/// score and the current wall-clock time.
///
/// - live -> `LIVE`
/// - ended -> final score when present, `ENDED` otherwise
/// - upcoming with start in the past (or exactly now) -> `LIVE`; this is
///   the transition the countdown tick acts on
/// - upcoming with an unparseable start -> empty text, schedule state
pub fn classify(
    status: MatchStatus,
    start_time: Option<&str>,
    score: Option<&str>,
    now: DateTime<Utc>,
) -> Badge {
    match status {
        MatchStatus::Live => Badge { state: BadgeState::Live, text: "LIVE".to_string() },
        MatchStatus::Ended => {
            let text = score
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| "ENDED".to_string());
            Badge { state: BadgeState::Ended, text }
        }
        MatchStatus::Upcoming => {
            let start = match start_time.and_then(parse_start_time) {
                Some(start) => start,
                None => return Badge { state: BadgeState::Schedule, text: String::new() },
            };
            let remaining = (start - now).num_seconds();
            if remaining <= 0 {
                Badge { state: BadgeState::Live, text: "LIVE".to_string() }
            } else {
                Badge { state: BadgeState::Schedule, text: format_countdown(remaining) }
            }
        }
    }
}
