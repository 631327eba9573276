use serde::Serialize;
use tracing::{error, info, warn};

use crate::lichess::Critical;
use crate::model::{Player, Variant};
use crate::profile::signed_progress;

/// Capture of the selection a fetch was dispatched for.
///
/// Only the ticket of the latest dispatch may resolve the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub variant: Variant,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBadge {
    Gold,
    Silver,
    Bronze,
    TopTen,
    Standard,
}

impl RankBadge {
    pub fn for_rank(rank: usize) -> Self {
        match rank {
            1 => RankBadge::Gold,
            2 => RankBadge::Silver,
            3 => RankBadge::Bronze,
            4..=10 => RankBadge::TopTen,
            _ => RankBadge::Standard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub badge: RankBadge,
    pub username: String,
    pub title: Option<String>,
    pub patron: bool,
    pub online: bool,
    pub rating: i32,
    pub progress: i32,
}

/// Rank by position. The server orders by rating; no re-sort happens here.
pub fn rank(variant: Variant, players: &[Player]) -> Vec<RankedEntry> {
    players
        .iter()
        .enumerate()
        .map(|(index, player)| {
            let perf = player.perfs.get(variant.key()).copied().unwrap_or_default();
            RankedEntry {
                rank: index + 1,
                badge: RankBadge::for_rank(index + 1),
                username: player.username.clone(),
                title: player.title.clone(),
                patron: player.patron,
                online: player.online,
                rating: perf.rating,
                progress: perf.progress,
            }
        })
        .collect()
}

/// Transient state of the leaderboard view.
#[derive(Debug, Default)]
pub struct LeaderboardView {
    selected: Variant,
    generation: u64,
    entries: Vec<RankedEntry>,
    loading: bool,
    unavailable: bool,
}

impl LeaderboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Variant {
        self.selected
    }

    pub fn entries(&self) -> &[RankedEntry] {
        &self.entries
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    /// Switch variant and dispatch a fetch for it. Any in-flight ticket goes stale.
    pub fn select(&mut self, variant: Variant) -> FetchTicket {
        self.selected = variant;
        self.refresh()
    }

    /// Re-dispatch for the current variant.
    pub fn refresh(&mut self) -> FetchTicket {
        self.generation += 1;
        self.loading = true;
        FetchTicket { variant: self.selected, generation: self.generation }
    }

    /// Apply a fetch outcome. Returns false when the ticket was stale and the
    /// result was discarded. A failed fetch empties the list.
    pub fn resolve(&mut self, ticket: FetchTicket, result: Critical<Vec<Player>>) -> bool {
        if ticket.generation != self.generation || ticket.variant != self.selected {
            warn!(
                stale = %ticket.variant,
                current = %self.selected,
                "Discarding out-of-date leaderboard response"
            );
            return false;
        }
        self.loading = false;
        match result {
            Ok(players) => {
                self.entries = rank(ticket.variant, &players);
                self.unavailable = false;
                info!(variant = %ticket.variant, count = self.entries.len(), "Leaderboard updated");
            }
            Err(e) => {
                error!(error = %e, variant = %ticket.variant, "Error fetching leaderboard");
                self.entries.clear();
                self.unavailable = true;
            }
        }
        true
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardPage {
    pub variant: Variant,
    pub variant_name: &'static str,
    pub entries: Vec<RankedEntry>,
    pub unavailable: bool,
}

impl LeaderboardPage {
    pub fn from_view(view: &LeaderboardView) -> Self {
        LeaderboardPage {
            variant: view.selected(),
            variant_name: view.selected().display_name(),
            entries: view.entries().to_vec(),
            unavailable: view.is_unavailable(),
        }
    }

    pub fn render(&self) -> String {
        let mut lines = vec![format!("{} Leaderboard", self.variant_name)];
        if self.entries.is_empty() {
            lines.push("No Data Available".to_string());
            return lines.join("\n");
        }
        for entry in &self.entries {
            let name = match &entry.title {
                Some(title) => format!("{} {}", title, entry.username),
                None => entry.username.clone(),
            };
            let progress = signed_progress(entry.progress)
                .map(|p| format!(" ({})", p))
                .unwrap_or_default();
            lines.push(format!("#{:<3} {} {}{}", entry.rank, name, entry.rating, progress));
        }
        lines.join("\n")
    }
}
