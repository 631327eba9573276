use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::lichess::ChessServer;
use crate::model::{GameCount, Performance, Player};
use crate::tournaments::TournamentCard;

/// Shown for any failed search, whether the user is missing or the server failed.
pub const SEARCH_ERROR_MESSAGE: &str = "User not found or API error occurred";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RatingLine {
    pub variant: String,
    pub label: String,
    pub rating: i32,
    pub games: u32,
    pub progress: i32,
}

/// Everything the profile panel displays for one player.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileCard {
    pub username: String,
    pub title: Option<String>,
    pub online: bool,
    pub patron: bool,
    pub bio: Option<String>,
    pub country: Option<String>,
    pub joined: Option<String>,
    pub hours_played: Option<u64>,
    pub ratings: Vec<RatingLine>,
    pub stats: Option<GameCount>,
    pub created_tournaments: Vec<TournamentCard>,
}

/// Outcome of one search. Replaced wholesale by the next search.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ProfileState {
    /// Nothing searched yet.
    Empty,
    Found { card: Box<ProfileCard> },
    Error { message: String },
}

/// Played variants only, highest rating first.
pub fn sorted_ratings(player: &Player) -> Vec<(&str, &Performance)> {
    let mut ratings: Vec<(&str, &Performance)> = player
        .perfs
        .iter()
        .filter(|(_, perf)| perf.games > 0)
        .map(|(variant, perf)| (variant.as_str(), perf))
        .collect();
    ratings.sort_by(|(_, a), (_, b)| b.rating.cmp(&a.rating));
    ratings
}

/// Long-form date such as "March 5, 2020", in the given zone.
pub fn join_date(created_at: DateTime<Utc>, tz: Tz) -> String {
    created_at.with_timezone(&tz).format("%B %-d, %Y").to_string()
}

/// Whole hours, truncated.
pub fn play_time_hours(seconds: u64) -> u64 {
    seconds / 3600
}

/// Split camel-cased perf keys for display: `ultraBullet` -> `ultra Bullet`.
pub fn variant_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len() + 2);
    for c in key.chars() {
        if c.is_ascii_uppercase() && !label.is_empty() {
            label.push(' ');
        }
        label.push(c);
    }
    label
}

/// Signed rendering of a rating delta; `None` when nothing changed.
pub fn signed_progress(progress: i32) -> Option<String> {
    match progress {
        0 => None,
        p if p > 0 => Some(format!("+{}", p)),
        p => Some(p.to_string()),
    }
}

impl ProfileCard {
    pub fn from_player(player: &Player, tz: Tz) -> Self {
        let profile = player.profile.as_ref();
        let ratings = sorted_ratings(player)
            .into_iter()
            .map(|(variant, perf)| RatingLine {
                variant: variant.to_string(),
                label: variant_label(variant),
                rating: perf.rating,
                games: perf.games,
                progress: perf.progress,
            })
            .collect();
        ProfileCard {
            username: player.username.clone(),
            title: player.title.clone(),
            online: player.online,
            patron: player.patron,
            bio: profile.and_then(|p| p.bio.clone()),
            country: profile.and_then(|p| p.country()).map(str::to_string),
            joined: player.created_at.map(|dt| join_date(dt, tz)),
            hours_played: player.play_time.map(|pt| play_time_hours(pt.total)),
            ratings,
            stats: player.count,
            created_tournaments: Vec::new(),
        }
    }
}

/// Run one profile search. A blank query leaves the view empty without a request.
///
/// The player's created-tournament history is fetched best-effort after the
/// profile itself and never turns a found profile into an error.
#[instrument(level = "info", skip(server, tz))]
pub fn search<S: ChessServer + ?Sized>(server: &S, query: &str, tz: Tz) -> ProfileState {
    let username = query.trim();
    if username.is_empty() {
        return ProfileState::Empty;
    }
    match server.fetch_player(username) {
        Ok(player) => {
            let mut card = ProfileCard::from_player(&player, tz);
            let history = server.fetch_user_tournament_history(&player.username);
            card.created_tournaments = history
                .into_inner()
                .iter()
                .map(|t| TournamentCard::from_tournament(t, tz))
                .collect();
            info!(username = %card.username, ratings = card.ratings.len(), "Profile found");
            ProfileState::Found { card: Box::new(card) }
        }
        Err(e) => {
            error!(error = %e, not_found = e.is_not_found(), "Profile search failed");
            ProfileState::Error { message: SEARCH_ERROR_MESSAGE.to_string() }
        }
    }
}

/// Plain-text rendering of the profile view.
pub fn render(state: &ProfileState) -> String {
    let card = match state {
        ProfileState::Empty => {
            return "Enter a Lichess username above to view their profile".to_string();
        }
        ProfileState::Error { message } => return message.clone(),
        ProfileState::Found { card } => card,
    };

    let mut lines = Vec::new();
    let status = if card.online { "online" } else { "offline" };
    match &card.title {
        Some(title) => lines.push(format!("{} {} ({})", title, card.username, status)),
        None => lines.push(format!("{} ({})", card.username, status)),
    }
    if let Some(bio) = &card.bio {
        lines.push(bio.clone());
    }
    if let Some(country) = &card.country {
        lines.push(format!("Country: {}", country));
    }
    if let Some(joined) = &card.joined {
        lines.push(format!("Joined {}", joined));
    }
    if let Some(hours) = card.hours_played {
        lines.push(format!("{} hours played", hours));
    }

    lines.push("Ratings & Performance".to_string());
    for line in &card.ratings {
        let progress = signed_progress(line.progress)
            .map(|p| format!(" ({})", p))
            .unwrap_or_default();
        lines.push(format!("  {}: {}{} in {} games", line.label, line.rating, progress, line.games));
    }

    if let Some(stats) = card.stats {
        lines.push("Game Statistics".to_string());
        lines.push(format!(
            "  Wins {} / Losses {} / Draws {} / Total Games {}",
            stats.win, stats.loss, stats.draw, stats.all
        ));
    }

    if !card.created_tournaments.is_empty() {
        lines.push(format!("Created tournaments: {}", card.created_tournaments.len()));
        for t in &card.created_tournaments {
            lines.push(format!("  {} [{}]", t.name, t.status));
        }
    }

    lines.join("\n")
}
