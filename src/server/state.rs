// src/server/state.rs

//! Application state for the backend server.
//!
//! Holds references to the main actor addresses (game session manager and
//! leaderboard). Used to share state between HTTP/WebSocket handlers and the
//! actor system.

use actix::Addr;
use crate::leaderboard::LeaderboardServer;
use crate::server::game_session::server::GameSessionManager;

/// Shared application state, injected into HTTP/WebSocket handlers.
pub struct AppState {
    /// Address of the game session manager actor (handles session lifecycle).
    pub game_session_manager: Addr<GameSessionManager>,
    /// Address of the leaderboard actor (handles score persistence).
    pub leaderboard: Addr<LeaderboardServer>,
}

impl AppState {
    /// Create a new AppState with the given actor addresses.
    pub fn new(
        game_session_manager: Addr<GameSessionManager>,
        leaderboard: Addr<LeaderboardServer>,
    ) -> Self {
        AppState {
            game_session_manager,
            leaderboard,
        }
    }
}
