use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A player as returned by `/user/{username}` or inside a leaderboard list.
///
/// Leaderboard entries only carry a subset of the fields, so everything beyond
/// the identity is optional or defaulted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    #[serde(default)]
    pub id: String,
    pub username: String,
    pub title: Option<String>,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub patron: bool,
    pub profile: Option<Profile>,
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub created_at: Option<DateTime<Utc>>,
    pub play_time: Option<PlayTime>,
    #[serde(default)]
    pub perfs: BTreeMap<String, Performance>,
    pub count: Option<GameCount>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Profile {
    pub bio: Option<String>,
    pub country: Option<String>,
    pub flag: Option<String>,
}

impl Profile {
    /// Older accounts carry `country`; newer ones only `flag`.
    pub fn country(&self) -> Option<&str> {
        self.country.as_deref().or(self.flag.as_deref())
    }
}

/// Cumulative play time, in seconds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PlayTime {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub tv: u64,
}

/// Rating statistics for one variant.
///
/// Profiles report the recent delta as `prog`, leaderboards as `progress`.
/// Puzzle-style entries (`storm`, `racer`, `streak`) have neither rating nor
/// games and decode with zeroes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Performance {
    #[serde(default)]
    pub rating: i32,
    #[serde(default)]
    pub games: u32,
    #[serde(default, rename = "prog", alias = "progress")]
    pub progress: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameCount {
    #[serde(default)]
    pub win: u32,
    #[serde(default)]
    pub loss: u32,
    #[serde(default)]
    pub draw: u32,
    #[serde(default)]
    pub all: u32,
}
