use std::time::Duration;

use chrono_tz::Tz;
use lambda_runtime::{Error, LambdaEvent};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};

use crate::leaderboard::{LeaderboardPage, LeaderboardView};
use crate::lichess::{ChessServer, DEFAULT_BASE_URL, Lichess};
use crate::model::Variant;
use crate::profile::{self, ProfileState};
use crate::tournaments::{TournamentBoard, TournamentFilter, TournamentsPage};

/// Views reachable by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Profile,
    Leaderboard,
    Tournaments,
}

impl Route {
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = match trimmed.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        match normalized {
            "/" => Some(Route::Profile),
            "/leaderboard" => Some(Route::Leaderboard),
            "/tournaments" => Some(Route::Tournaments),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: u32,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_leaderboard_size() -> u32 {
    50
}

fn default_timezone() -> String {
    "UTC".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            leaderboard_size: default_leaderboard_size(),
            timezone: default_timezone(),
            timeout_secs: None,
        }
    }
}

impl Config {
    /// Zone for rendering dates. Unknown names fall back to UTC.
    pub fn tz(&self) -> Tz {
        match self.timezone.parse::<Tz>() {
            Ok(tz) => tz,
            Err(e) => {
                warn!(timezone = %self.timezone, error = %e, "Unknown timezone, using UTC");
                Tz::UTC
            }
        }
    }

    pub fn client(&self) -> Lichess {
        Lichess::new(&self.api_base_url, self.timeout_secs.map(Duration::from_secs))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(default = "default_path")]
    pub path: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub variant: Variant,
    #[serde(default)]
    pub filter: TournamentFilter,
    #[serde(default)]
    pub config: Config,
}

fn default_path() -> String {
    "/".to_string()
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", content = "data", rename_all = "snake_case")]
pub enum Page {
    Profile(ProfileState),
    Leaderboard(LeaderboardPage),
    Tournaments(TournamentsPage),
    NotFound { path: String },
}

impl Page {
    pub fn render(&self) -> String {
        match self {
            Page::Profile(state) => profile::render(state),
            Page::Leaderboard(page) => page.render(),
            Page::Tournaments(page) => page.render(),
            Page::NotFound { path } => format!("No view at {}", path),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Response {
    pub message: String,
    pub page: Page,
}

#[instrument(skip(event))]
pub async fn handler(event: LambdaEvent<Request>) -> Result<Response, Error> {
    let payload = event.payload;
    let client = payload.config.client();
    Ok(serve(payload, client).await)
}

/// Render the requested view against `server`. Never fails: every fetch error
/// ends in a renderable page.
pub async fn serve<S>(request: Request, server: S) -> Response
where
    S: ChessServer + Send + 'static,
{
    let tz = request.config.tz();
    let page = match Route::from_path(&request.path) {
        Some(Route::Profile) => {
            let query = request.username.unwrap_or_default();
            // ureq is blocking; keep it off the async worker threads.
            let result = tokio::task::spawn_blocking(move || profile::search(&server, &query, tz)).await;
            match result {
                Ok(state) => Page::Profile(state),
                Err(e) => {
                    error!(error = %e, "Profile task join error");
                    Page::Profile(ProfileState::Error {
                        message: profile::SEARCH_ERROR_MESSAGE.to_string(),
                    })
                }
            }
        }
        Some(Route::Leaderboard) => {
            let mut view = LeaderboardView::new();
            let ticket = view.select(request.variant);
            let limit = request.config.leaderboard_size;
            let result = tokio::task::spawn_blocking(move || {
                server.fetch_leaderboard(ticket.variant, limit)
            })
            .await;
            match result {
                Ok(fetched) => {
                    view.resolve(ticket, fetched);
                }
                Err(e) => error!(error = %e, "Leaderboard task join error"),
            }
            Page::Leaderboard(LeaderboardPage::from_view(&view))
        }
        Some(Route::Tournaments) => {
            let mut board = TournamentBoard::new(request.filter);
            board.begin_refresh();
            let result = tokio::task::spawn_blocking(move || server.fetch_tournaments()).await;
            match result {
                Ok(fetched) => board.finish_refresh(fetched),
                Err(e) => {
                    error!(error = %e, "Tournament task join error");
                    board.finish_refresh(Ok(Vec::new()));
                }
            }
            Page::Tournaments(TournamentsPage::from_board(&board, tz))
        }
        None => {
            warn!(path = %request.path, "No view for path");
            Page::NotFound { path: request.path }
        }
    };

    let message = page.render();
    info!(bytes = message.len(), "Rendered page");
    Response { message, page }
}
