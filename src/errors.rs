use thiserror::Error;

/// Error taxonomy for the match core.
///
/// All of these are recoverable at the page level: ingestion failures fall
/// back to cached/empty lists, malformed entries get render-time
/// placeholders, and playback failures surface in the player area only.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatchdayError {
    /// The ingestion collaborator could not deliver a match-set.
    #[error("ingestion failed: {0}")]
    Ingestion(String),

    /// The selected match has zero stream entries with a usable URL.
    #[error("no playable stream for this match")]
    NoPlayableStream,

    /// The external player reported an unrecoverable playback error.
    #[error("playback failed: {0}")]
    Playback(String),

    /// A start timestamp could not be parsed.
    #[error("unparseable start time: {0:?}")]
    InvalidStartTime(String),

    /// The snapshot cache could not be read or written.
    #[error("snapshot cache error: {0}")]
    Cache(String),
}

impl MatchdayError {
    /// User-facing status line for the non-fatal degradation path.
    pub fn status_line(&self) -> String {
        match self {
            MatchdayError::Ingestion(reason) => format!("Source error: {}", reason),
            MatchdayError::NoPlayableStream => "Stream unavailable".to_string(),
            MatchdayError::Playback(reason) => format!("Playback error: {}", reason),
            MatchdayError::InvalidStartTime(_) => "Schedule unavailable".to_string(),
            MatchdayError::Cache(_) => "Cache unavailable".to_string(),
        }
    }

    /// Detailed diagnostic text for logs and debug overlays.
    pub fn diagnostics(&self) -> String {
        match self {
            MatchdayError::Ingestion(reason) => {
                format!("Ingestion Failure\nReason: {}\nFalling back to cached or empty match lists", reason)
            }
            MatchdayError::NoPlayableStream => {
                "No Playable Stream\nEvery stream entry for the selected match has an empty URL\nPick another match".to_string()
            }
            MatchdayError::Playback(reason) => {
                format!("Playback Failure\nReason: {}\nRetry already exhausted for this stream", reason)
            }
            MatchdayError::InvalidStartTime(raw) => {
                format!("Invalid Start Time\nRaw value: {:?}\nCountdown rendered empty", raw)
            }
            MatchdayError::Cache(reason) => {
                format!("Cache Error\nReason: {}\nContinuing without cached snapshot", reason)
            }
        }
    }
}
