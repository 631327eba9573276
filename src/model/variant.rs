use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Time-control categories the server publishes a leaderboard for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    #[default]
    Bullet,
    Blitz,
    Rapid,
    Classical,
    Correspondence,
}

impl Variant {
    pub const ALL: [Variant; 5] = [
        Variant::Bullet,
        Variant::Blitz,
        Variant::Rapid,
        Variant::Classical,
        Variant::Correspondence,
    ];

    /// Key used both in URL paths and as the `perfs` map key.
    pub fn key(self) -> &'static str {
        match self {
            Variant::Bullet => "bullet",
            Variant::Blitz => "blitz",
            Variant::Rapid => "rapid",
            Variant::Classical => "classical",
            Variant::Correspondence => "correspondence",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Variant::Bullet => "Bullet",
            Variant::Blitz => "Blitz",
            Variant::Rapid => "Rapid",
            Variant::Classical => "Classical",
            Variant::Correspondence => "Correspondence",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown leaderboard variant: {}", s))
    }
}
