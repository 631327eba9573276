use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info, info_span, instrument, warn};

use crate::model::{Player, Tournament, Variant};

pub const DEFAULT_BASE_URL: &str = "https://lichess.org/api";

/// Largest `count` the `/player/top` endpoint accepts.
pub const MAX_LEADERBOARD_SIZE: u32 = 200;

/// Failures surfaced by the chess server binding.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("user `{0}` not found")]
    NotFound(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(#[from] ureq::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

/// Result of a core-path fetch. Failures must reach the caller.
pub type Critical<T> = Result<T, ApiError>;

/// Result of a supplementary fetch. Always carries data (possibly empty);
/// the cause is kept when the data had to be substituted.
#[derive(Debug)]
pub struct BestEffort<T> {
    pub data: T,
    pub degraded: Option<ApiError>,
}

impl<T> BestEffort<T> {
    pub fn ok(data: T) -> Self {
        Self { data, degraded: None }
    }

    pub fn degraded(data: T, cause: ApiError) -> Self {
        Self { data, degraded: Some(cause) }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}

impl<T: Default> BestEffort<T> {
    /// Collapse a critical result, substituting the default on failure.
    pub fn from_critical(result: Critical<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::degraded(T::default(), e),
        }
    }
}

/// Read-only operations the dashboard needs from a chess server.
///
/// Each call performs exactly one request. No caching, no retries.
pub trait ChessServer {
    fn fetch_player(&self, username: &str) -> Critical<Player>;

    /// Ranked players for `variant`, in the order the server returned them.
    fn fetch_leaderboard(&self, variant: Variant, limit: u32) -> Critical<Vec<Player>>;

    fn fetch_tournaments(&self) -> Critical<Vec<Tournament>>;

    fn fetch_user_tournament_history(&self, username: &str) -> BestEffort<Vec<Tournament>>;
}

/// Blocking client for the Lichess REST API.
#[derive(Clone)]
pub struct Lichess {
    base_url: String,
    agent: ureq::Agent,
}

impl fmt::Debug for Lichess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lichess").field("base_url", &self.base_url).finish()
    }
}

impl Default for Lichess {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, None)
    }
}

impl Lichess {
    /// Create a client rooted at `base_url`. `None` leaves requests without a timeout.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Self {
        let config = ureq::Agent::config_builder().timeout_global(timeout).build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::Agent::new_with_config(config),
        }
    }

    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Issue one GET and return the body of a 2xx response.
    fn get(&self, path: &str) -> Result<String, ApiError> {
        let url = self.url_for(path);
        let response_result = {
            let _span = info_span!("lichess_fetch", url = %url).entered();
            self.agent.get(&url).header("Accept", "application/json").call()
        };
        match response_result {
            Ok(response) => {
                let mut body_reader = response.into_body();
                body_reader.read_to_string().map_err(|e| {
                    error!(error = %e, url = %url, "Failed to read response body");
                    ApiError::Transport(e)
                })
            }
            Err(ureq::Error::StatusCode(code)) => {
                warn!(status = code, url = %url, "Non-success status from server");
                Err(ApiError::Status(code))
            }
            Err(e) => {
                error!(error = %e, url = %url, "Request failed");
                Err(ApiError::Transport(e))
            }
        }
    }
}

impl ChessServer for Lichess {
    #[instrument(level = "info", skip(self))]
    fn fetch_player(&self, username: &str) -> Critical<Player> {
        let username = validate_username(username)?;
        let body = self.get(&format!("/user/{}", username)).map_err(|e| match e {
            ApiError::Status(404) => ApiError::NotFound(username.to_string()),
            other => other,
        })?;
        let player = decode_player(&body)?;
        info!(username = %player.username, perfs = player.perfs.len(), "Fetched player");
        Ok(player)
    }

    #[instrument(level = "info", skip(self))]
    fn fetch_leaderboard(&self, variant: Variant, limit: u32) -> Critical<Vec<Player>> {
        if limit == 0 || limit > MAX_LEADERBOARD_SIZE {
            return Err(ApiError::InvalidRequest(format!(
                "leaderboard size must be between 1 and {}, got {}",
                MAX_LEADERBOARD_SIZE, limit
            )));
        }
        let body = self.get(&format!("/player/top/{}/{}", limit, variant.key()))?;
        let players = decode_leaderboard(&body)?;
        info!(variant = %variant, count = players.len(), "Fetched leaderboard");
        Ok(players)
    }

    #[instrument(level = "info", skip(self))]
    fn fetch_tournaments(&self) -> Critical<Vec<Tournament>> {
        let body = self.get("/tournament")?;
        let tournaments = decode_tournaments(&body)?;
        info!(count = tournaments.len(), "Fetched tournaments");
        Ok(tournaments)
    }

    #[instrument(level = "info", skip(self))]
    fn fetch_user_tournament_history(&self, username: &str) -> BestEffort<Vec<Tournament>> {
        let result = validate_username(username)
            .and_then(|name| self.get(&format!("/user/{}/tournament/created", name)))
            .and_then(|body| decode_tournament_history(&body));
        if let Err(e) = &result {
            error!(error = %e, "Error fetching user tournaments");
        }
        BestEffort::from_critical(result)
    }
}

/// Trim the search input and reject names the server could never hold.
pub fn validate_username(raw: &str) -> Result<&str, ApiError> {
    let username = raw.trim();
    if username.is_empty() {
        return Err(ApiError::InvalidRequest("username must not be empty".to_string()));
    }
    let valid = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(ApiError::NotFound(username.to_string()));
    }
    Ok(username)
}

#[derive(Deserialize)]
struct LeaderboardEnvelope {
    #[serde(default)]
    users: Option<Vec<Player>>,
}

#[derive(Deserialize)]
struct TournamentEnvelope {
    #[serde(default)]
    created: Option<Vec<Tournament>>,
    #[serde(default)]
    started: Option<Vec<Tournament>>,
    #[serde(default)]
    finished: Option<Vec<Tournament>>,
}

pub fn decode_player(body: &str) -> Critical<Player> {
    Ok(serde_json::from_str(body)?)
}

/// A missing or null `users` list decodes as an empty leaderboard.
pub fn decode_leaderboard(body: &str) -> Critical<Vec<Player>> {
    let envelope: LeaderboardEnvelope = serde_json::from_str(body)?;
    Ok(envelope.users.unwrap_or_default())
}

/// Merge the server's `created`, `started` and `finished` buckets into one batch.
/// Missing or null buckets count as empty.
pub fn decode_tournaments(body: &str) -> Critical<Vec<Tournament>> {
    let envelope: TournamentEnvelope = serde_json::from_str(body)?;
    let mut tournaments = envelope.created.unwrap_or_default();
    tournaments.extend(envelope.started.unwrap_or_default());
    tournaments.extend(envelope.finished.unwrap_or_default());
    Ok(tournaments)
}

/// The history endpoint streams newline-delimited JSON; a plain array is accepted too.
pub fn decode_tournament_history(body: &str) -> Critical<Vec<Tournament>> {
    let trimmed = body.trim_start();
    if trimmed.starts_with('[') {
        return Ok(serde_json::from_str(trimmed)?);
    }
    serde_json::Deserializer::from_str(trimmed)
        .into_iter::<Tournament>()
        .map(|item| item.map_err(ApiError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_ignores_trailing_slash_on_base() {
        let client = Lichess::new("https://example.invalid/api/", None);
        assert_eq!(client.url_for("/tournament"), "https://example.invalid/api/tournament");
    }

    #[test]
    fn leaderboard_size_is_checked_before_any_request() {
        // Unroutable base: reaching the network would fail with Transport instead.
        let client = Lichess::new("http://127.0.0.1:9", None);
        let zero = client.fetch_leaderboard(Variant::Blitz, 0).unwrap_err();
        assert!(matches!(zero, ApiError::InvalidRequest(_)), "error was: {}", zero);
        let too_many = client
            .fetch_leaderboard(Variant::Blitz, MAX_LEADERBOARD_SIZE + 1)
            .unwrap_err();
        assert!(matches!(too_many, ApiError::InvalidRequest(_)), "error was: {}", too_many);
    }

    #[test]
    fn history_swallows_invalid_username() {
        let client = Lichess::new("http://127.0.0.1:9", None);
        let history = client.fetch_user_tournament_history("   ");
        assert!(history.data.is_empty());
        assert!(history.is_degraded());
    }
}
