//! HTTP and WebSocket routing configuration.
//!
//! Defines the endpoints for game session creation, the game WebSocket, and
//! the leaderboard API.

use actix_web::web;
use crate::leaderboard::server::get_leaderboard;
use crate::server::game_session::session::{create_game, ws_game};

/// Configure the application's HTTP/WebSocket routes.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/game")
            .route(web::post().to(create_game))
    )
    .service(
        web::resource("/api/leaderboard")
            .route(web::get().to(get_leaderboard))
    )
    .service(
        web::resource("/ws/game/{game_id}")
            .to(ws_game)
    );
}
