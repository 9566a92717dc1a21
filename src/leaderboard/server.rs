/// Leaderboard server actor.
///
/// Owns the file-backed score store. Game sessions submit finished scores
/// with fire-and-forget messages; the HTTP layer queries the top scores.
/// Storage failures never propagate past this actor.

use actix::prelude::*;
use actix_web::{web, Error, HttpResponse};
use log::info;

use crate::leaderboard::store::{LeaderboardStore, ScoreEntry};

pub struct LeaderboardServer {
    store: LeaderboardStore,
}

impl LeaderboardServer {
    pub fn new(store: LeaderboardStore) -> Self {
        Self { store }
    }
}

impl Actor for LeaderboardServer {
    type Context = Context<Self>;
}

/// Message: fetch the top scores, best first.
#[derive(Message)]
#[rtype(result = "Vec<ScoreEntry>")]
pub struct GetTopScores;

/// Message: persist a finished session's score. Fire-and-forget.
#[derive(Message)]
#[rtype(result = "()")]
pub struct SaveScore {
    pub name: String,
    pub score: u32,
    pub max_combo: Option<u32>,
}

/// Message: wipe the leaderboard.
#[derive(Message)]
#[rtype(result = "()")]
pub struct ClearLeaderboard;

impl Handler<GetTopScores> for LeaderboardServer {
    type Result = MessageResult<GetTopScores>;

    fn handle(&mut self, _: GetTopScores, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.store.load())
    }
}

impl Handler<SaveScore> for LeaderboardServer {
    type Result = ();

    fn handle(&mut self, msg: SaveScore, _: &mut Context<Self>) -> Self::Result {
        info!("[Leaderboard] Saving score {} for {}", msg.score, msg.name);
        self.store
            .save_score(ScoreEntry::new(msg.name, msg.score, msg.max_combo));
    }
}

impl Handler<ClearLeaderboard> for LeaderboardServer {
    type Result = ();

    fn handle(&mut self, _: ClearLeaderboard, _: &mut Context<Self>) -> Self::Result {
        self.store.clear();
    }
}

/// HTTP handler: return the current top scores as JSON.
pub async fn get_leaderboard(
    data: web::Data<crate::server::state::AppState>,
) -> Result<HttpResponse, Error> {
    let scores = data
        .leaderboard
        .send(GetTopScores)
        .await
        .map_err(actix_web::error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok().json(scores))
}
