use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An arena tournament listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tournament {
    pub id: String,
    pub full_name: String,
    pub variant: VariantDescriptor,
    pub clock: Clock,
    pub status: TournamentStatus,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub finishes_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub nb_players: u32,
    #[serde(default)]
    pub rated: bool,
    #[serde(default)]
    pub minutes: u32,
    pub max_rating: Option<RatingCap>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariantDescriptor {
    pub key: String,
    pub short: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clock {
    /// Initial time, in seconds.
    pub limit: u32,
    /// Increment per move, in seconds.
    pub increment: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingCap {
    pub perf: Option<String>,
    pub rating: i32,
}

/// Lifecycle state, carried on the wire as 10/20/30.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u16")]
pub enum TournamentStatus {
    Pending,
    InProgress,
    Finished,
    Unknown(u16),
}

impl From<u16> for TournamentStatus {
    fn from(code: u16) -> Self {
        match code {
            10 => TournamentStatus::Pending,
            20 => TournamentStatus::InProgress,
            30 => TournamentStatus::Finished,
            other => TournamentStatus::Unknown(other),
        }
    }
}

impl From<TournamentStatus> for u16 {
    fn from(status: TournamentStatus) -> Self {
        match status {
            TournamentStatus::Pending => 10,
            TournamentStatus::InProgress => 20,
            TournamentStatus::Finished => 30,
            TournamentStatus::Unknown(code) => code,
        }
    }
}

impl TournamentStatus {
    pub fn label(self) -> &'static str {
        match self {
            TournamentStatus::Pending => "Starting Soon",
            TournamentStatus::InProgress => "In Progress",
            TournamentStatus::Finished => "Finished",
            TournamentStatus::Unknown(_) => "Unknown",
        }
    }
}
