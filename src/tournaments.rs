use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::lichess::Critical;
use crate::model::{Clock, Tournament, TournamentStatus};

/// Which slice of the fetched batch is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TournamentFilter {
    #[default]
    Starting,
    All,
    Finished,
}

impl TournamentFilter {
    pub fn matches(self, status: TournamentStatus) -> bool {
        match self {
            TournamentFilter::Starting => status == TournamentStatus::Pending,
            TournamentFilter::All => true,
            TournamentFilter::Finished => status == TournamentStatus::Finished,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TournamentFilter::Starting => "Starting Soon",
            TournamentFilter::All => "All Tournaments",
            TournamentFilter::Finished => "Recently Finished",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub starting: usize,
    pub all: usize,
    pub finished: usize,
}

impl FilterCounts {
    pub fn get(&self, filter: TournamentFilter) -> usize {
        match filter {
            TournamentFilter::Starting => self.starting,
            TournamentFilter::All => self.all,
            TournamentFilter::Finished => self.finished,
        }
    }
}

/// Transient state of the tournament list view.
///
/// Switching filters is a pure re-derivation; only [`TournamentBoard::finish_refresh`]
/// changes the underlying batch.
#[derive(Debug, Default)]
pub struct TournamentBoard {
    tournaments: Vec<Tournament>,
    filter: TournamentFilter,
    loading: bool,
    unavailable: bool,
}

impl TournamentBoard {
    pub fn new(filter: TournamentFilter) -> Self {
        Self { filter, ..Self::default() }
    }

    pub fn filter(&self) -> TournamentFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: TournamentFilter) {
        self.filter = filter;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// True when the last refresh failed and the empty list is a stand-in.
    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    pub fn begin_refresh(&mut self) {
        self.loading = true;
    }

    /// Replace the batch with a fresh fetch. A failure degrades to an empty batch.
    pub fn finish_refresh(&mut self, result: Critical<Vec<Tournament>>) {
        self.loading = false;
        match result {
            Ok(tournaments) => {
                info!(count = tournaments.len(), "Tournament list refreshed");
                self.tournaments = tournaments;
                self.unavailable = false;
            }
            Err(e) => {
                error!(error = %e, "Error fetching tournaments");
                self.tournaments.clear();
                self.unavailable = true;
            }
        }
    }

    pub fn tournaments(&self) -> &[Tournament] {
        &self.tournaments
    }

    pub fn filtered(&self) -> Vec<&Tournament> {
        self.tournaments
            .iter()
            .filter(|t| self.filter.matches(t.status))
            .collect()
    }

    pub fn counts(&self) -> FilterCounts {
        let count = |filter: TournamentFilter| {
            self.tournaments.iter().filter(|t| filter.matches(t.status)).count()
        };
        FilterCounts {
            starting: count(TournamentFilter::Starting),
            all: count(TournamentFilter::All),
            finished: count(TournamentFilter::Finished),
        }
    }
}

/// `3 + 2"`, or `1:30 + 0"` when the base time has leftover seconds.
pub fn format_time_control(clock: &Clock) -> String {
    let minutes = clock.limit / 60;
    let seconds = clock.limit % 60;
    let base = if seconds > 0 {
        format!("{}:{:02}", minutes, seconds)
    } else {
        minutes.to_string()
    };
    format!("{} + {}\"", base, clock.increment)
}

/// Short date-time such as "Mar 5, 02:30 PM", or "TBD" when unscheduled.
pub fn format_date_time(at: Option<DateTime<Utc>>, tz: Tz) -> String {
    match at {
        Some(dt) => dt.with_timezone(&tz).format("%b %-d, %I:%M %p").to_string(),
        None => "TBD".to_string(),
    }
}

/// Display fields for one tournament.
#[derive(Debug, Clone, Serialize)]
pub struct TournamentCard {
    pub id: String,
    pub name: String,
    pub variant: String,
    pub status: String,
    pub time_control: String,
    pub players: u32,
    pub starts: String,
    pub ends: Option<String>,
    pub rated: bool,
    pub minutes: u32,
    pub max_rating: Option<i32>,
}

impl TournamentCard {
    pub fn from_tournament(t: &Tournament, tz: Tz) -> Self {
        TournamentCard {
            id: t.id.clone(),
            name: t.full_name.clone(),
            variant: t.variant.key.clone(),
            status: t.status.label().to_string(),
            time_control: format_time_control(&t.clock),
            players: t.nb_players,
            starts: format_date_time(t.starts_at, tz),
            ends: t.finishes_at.map(|dt| format_date_time(Some(dt), tz)),
            rated: t.rated,
            minutes: t.minutes,
            max_rating: t.max_rating.as_ref().map(|cap| cap.rating),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TournamentsPage {
    pub filter: TournamentFilter,
    pub counts: FilterCounts,
    pub tournaments: Vec<TournamentCard>,
    pub unavailable: bool,
}

impl TournamentsPage {
    pub fn from_board(board: &TournamentBoard, tz: Tz) -> Self {
        TournamentsPage {
            filter: board.filter(),
            counts: board.counts(),
            tournaments: board
                .filtered()
                .into_iter()
                .map(|t| TournamentCard::from_tournament(t, tz))
                .collect(),
            unavailable: board.is_unavailable(),
        }
    }

    pub fn render(&self) -> String {
        let mut lines = vec!["Chess Tournaments".to_string()];
        let filters = [TournamentFilter::Starting, TournamentFilter::All, TournamentFilter::Finished]
            .into_iter()
            .map(|f| {
                let marker = if f == self.filter { "*" } else { "" };
                format!("{}{} ({})", marker, f.label(), self.counts.get(f))
            })
            .collect::<Vec<String>>()
            .join(" | ");
        lines.push(filters);

        if self.tournaments.is_empty() {
            lines.push("No Tournaments Found".to_string());
            lines.push("No tournaments match your current filter criteria".to_string());
            return lines.join("\n");
        }

        for t in &self.tournaments {
            lines.push(format!("{} [{}]", t.name, t.status));
            let mut details = format!(
                "  {} | {} players | Starts: {}",
                t.time_control, t.players, t.starts
            );
            if let Some(ends) = &t.ends {
                details.push_str(&format!(" | Ends: {}", ends));
            }
            details.push_str(&format!(
                " | {} | {}min",
                if t.rated { "Rated" } else { "Unrated" },
                t.minutes
            ));
            if let Some(max) = t.max_rating {
                details.push_str(&format!(" | Max Rating: {}", max));
            }
            lines.push(details);
        }
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_control_pads_seconds() {
        assert_eq!(format_time_control(&Clock { limit: 180, increment: 2 }), "3 + 2\"");
        assert_eq!(format_time_control(&Clock { limit: 90, increment: 0 }), "1:30 + 0\"");
        assert_eq!(format_time_control(&Clock { limit: 65, increment: 1 }), "1:05 + 1\"");
        assert_eq!(format_time_control(&Clock { limit: 30, increment: 0 }), "0:30 + 0\"");
    }

    #[test]
    fn missing_start_renders_tbd() {
        assert_eq!(format_date_time(None, Tz::UTC), "TBD");
    }
}
