#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chess_dashboard_lambda_rust::lichess::{
    decode_leaderboard, decode_player, decode_tournament_history, decode_tournaments, ApiError,
    BestEffort, ChessServer, Critical,
};
use chess_dashboard_lambda_rust::model::{Player, Tournament, Variant};

pub const USER: &str = include_str!("../fixtures/user.json");
pub const LEADERBOARD_BULLET: &str = include_str!("../fixtures/leaderboard_bullet.json");
pub const LEADERBOARD_BLITZ: &str = include_str!("../fixtures/leaderboard_blitz.json");
pub const TOURNAMENTS: &str = include_str!("../fixtures/tournaments.json");
pub const TOURNAMENTS_EMPTY: &str = include_str!("../fixtures/tournaments_empty.json");
pub const HISTORY: &str = include_str!("../fixtures/history.ndjson");

/// Canned server. `None` bodies answer the way the real server fails:
/// 404 for players, 500 for everything else.
#[derive(Debug, Clone, Default)]
pub struct StubServer {
    pub player: Option<&'static str>,
    pub leaderboard: Option<&'static str>,
    pub tournaments: Option<&'static str>,
    pub history: Option<&'static str>,
    pub calls: Arc<AtomicUsize>,
}

impl StubServer {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn hit(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl ChessServer for StubServer {
    fn fetch_player(&self, username: &str) -> Critical<Player> {
        self.hit();
        match self.player {
            Some(body) => decode_player(body),
            None => Err(ApiError::NotFound(username.to_string())),
        }
    }

    fn fetch_leaderboard(&self, _variant: Variant, _limit: u32) -> Critical<Vec<Player>> {
        self.hit();
        match self.leaderboard {
            Some(body) => decode_leaderboard(body),
            None => Err(ApiError::Status(500)),
        }
    }

    fn fetch_tournaments(&self) -> Critical<Vec<Tournament>> {
        self.hit();
        match self.tournaments {
            Some(body) => decode_tournaments(body),
            None => Err(ApiError::Status(500)),
        }
    }

    fn fetch_user_tournament_history(&self, _username: &str) -> BestEffort<Vec<Tournament>> {
        self.hit();
        BestEffort::from_critical(match self.history {
            Some(body) => decode_tournament_history(body),
            None => Err(ApiError::Status(500)),
        })
    }
}
