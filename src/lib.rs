pub mod handler;
pub mod leaderboard;
pub mod lichess;
pub mod model;
pub mod profile;
pub mod tournaments;
