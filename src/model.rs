//! Match data model and the ingestion snapshot contract.
//!
//! The snapshot shape is fixed by the external data source:
//! `{ category: [ {title, team1, team2, status, startTime, score?, streams} ] }`.
//! Everything here is lenient on missing fields; fallbacks are applied at
//! render time, not at parse time.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle status of a match. Transitions only move forward
/// (upcoming -> live -> ended); they never regress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum MatchStatus {
    #[default]
    Upcoming,
    Live,
    Ended,
}

impl From<String> for MatchStatus {
    fn from(s: String) -> Self {
        // Unknown strings fall into the countdown path, same as "upcoming".
        match s.trim().to_lowercase().as_str() {
            "live" => MatchStatus::Live,
            "ended" => MatchStatus::Ended,
            _ => MatchStatus::Upcoming,
        }
    }
}

impl From<MatchStatus> for String {
    fn from(s: MatchStatus) -> Self {
        match s {
            MatchStatus::Upcoming => "upcoming".to_string(),
            MatchStatus::Live => "live".to_string(),
            MatchStatus::Ended => "ended".to_string(),
        }
    }
}

/// How a stream entry is played back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum StreamKind {
    /// Adaptive manifest loaded through the player SDK.
    #[default]
    Adaptive,
    /// Passive embedded frame; the embedded page manages its own playback.
    Embed,
}

impl From<String> for StreamKind {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "iframe" | "embed" => StreamKind::Embed,
            _ => StreamKind::Adaptive,
        }
    }
}

impl From<StreamKind> for String {
    fn from(k: StreamKind) -> Self {
        match k {
            StreamKind::Adaptive => "hls".to_string(),
            StreamKind::Embed => "iframe".to_string(),
        }
    }
}

/// ClearKey DRM material: explicit plaintext key-id/key pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearKey {
    #[serde(alias = "keyId", alias = "kid")]
    pub key_id: String,
    pub key: String,
}

/// One playable candidate source for a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StreamEntry {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: StreamKind,
    #[serde(default)]
    pub clearkey: Option<ClearKey>,
}

impl StreamEntry {
    /// A stream is playable when it carries a non-empty URL.
    pub fn is_playable(&self) -> bool {
        !self.url.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Team {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub logo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub team1: Option<Team>,
    #[serde(default)]
    pub team2: Option<Team>,
    #[serde(default)]
    pub status: MatchStatus,
    /// Raw start timestamp as delivered by the source (ISO-8601 or epoch).
    /// Parsed lazily by the classifier so bad data degrades per badge.
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub score: Option<String>,
    #[serde(default)]
    pub streams: Vec<StreamEntry>,
}

impl Match {
    pub fn is_live(&self) -> bool {
        self.status == MatchStatus::Live
    }

    /// Forward-only promotion used by the countdown tick when a scheduled
    /// start time is reached. Live and ended matches are left untouched.
    pub fn promote_live(&mut self) -> bool {
        if self.status == MatchStatus::Upcoming {
            self.status = MatchStatus::Live;
            true
        } else {
            false
        }
    }
}

/// A full match-set snapshot keyed by category, as delivered by ingestion.
/// Categories absent from the map are treated as empty lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Snapshot {
    pub categories: BTreeMap<String, Vec<Match>>,
}

impl Snapshot {
    pub fn category(&self, name: &str) -> &[Match] {
        self.categories.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn match_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parsing_is_lenient() {
        assert_eq!(MatchStatus::from("LIVE".to_string()), MatchStatus::Live);
        assert_eq!(MatchStatus::from(" ended ".to_string()), MatchStatus::Ended);
        assert_eq!(MatchStatus::from("scheduled".to_string()), MatchStatus::Upcoming);
        assert_eq!(MatchStatus::from("???".to_string()), MatchStatus::Upcoming);
    }

    #[test]
    fn promote_live_never_regresses() {
        let mut m = Match { status: MatchStatus::Ended, ..Default::default() };
        assert!(!m.promote_live());
        assert_eq!(m.status, MatchStatus::Ended);

        m.status = MatchStatus::Upcoming;
        assert!(m.promote_live());
        assert_eq!(m.status, MatchStatus::Live);
        assert!(!m.promote_live());
    }

    #[test]
    fn snapshot_deserializes_external_contract() {
        let json = r#"{
            "cricket": [{
                "title": "Asia Cup Final",
                "team1": {"name": "India", "logo": "in.png"},
                "team2": {"name": "Pakistan", "logo": "pk.png"},
                "status": "upcoming",
                "startTime": "2026-09-01T14:00:00Z",
                "streams": [
                    {"url": "https://cdn.example/a.m3u8", "name": "Server A"},
                    {"url": "https://embed.example/x", "type": "iframe"},
                    {"url": ""}
                ]
            }],
            "football": []
        }"#;
        let snap: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snap.category("cricket").len(), 1);
        assert!(snap.category("football").is_empty());
        assert!(snap.category("tennis").is_empty());

        let m = &snap.category("cricket")[0];
        assert_eq!(m.status, MatchStatus::Upcoming);
        assert_eq!(m.streams[1].kind, StreamKind::Embed);
        assert!(!m.streams[2].is_playable());
    }
}
