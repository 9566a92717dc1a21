//! Main entry point for the backend server.
//!
//! Initializes the actor system, configures application state, and launches
//! the HTTP server with the game session WebSocket and leaderboard endpoints.

use actix::Actor;
use actix_web::{web, App, HttpServer};

use config::leaderboard::LEADERBOARD_FILE;
use leaderboard::store::LeaderboardStore;
use leaderboard::LeaderboardServer;
use server::game_session::server::GameSessionManager;

pub mod config;
mod game;
mod leaderboard;
mod server;

#[cfg(test)]
mod tests;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger from environment variable (default to info level).
    env_logger::init();

    // Start the leaderboard actor (owns the score file).
    let leaderboard = LeaderboardServer::new(LeaderboardStore::new(LEADERBOARD_FILE)).start();

    // Start the GameSessionManager actor (handles all game sessions).
    let game_session_manager = GameSessionManager::new(leaderboard.clone()).start();

    // Shared application state for HTTP/WebSocket handlers.
    let state = web::Data::new(server::state::AppState::new(
        game_session_manager,
        leaderboard,
    ));

    // Start the HTTP server with WebSocket endpoints.
    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
            )
            .app_data(state.clone())
            .configure(crate::server::router::config)
    })
    .bind(("127.0.0.1", 8080))?
    .run()
    .await
}
