use actix::prelude::*;
use actix::MessageResult;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;
use log::{debug, info};

use crate::config::game::{MOLE_VISIBLE_MS, SPAWN_INTERVAL_MS};
use crate::game::state::GameState;
use crate::game::types::{GamePhase, SoundEvent};
use crate::leaderboard::server::{LeaderboardServer, SaveScore};
use crate::server::game_session::messages::{
    ClientAction, ProcessClientMessage, RegisterSession, ServerMessage, UnregisterSession,
};
use crate::server::game_session::session::GameSessionActor;

/// Session controller actor.
///
/// Sole owner of one `GameState`. All timer callbacks and client actions are
/// serialized through the actor mailbox, so no two mutations ever interleave.
/// Timers are `SpawnHandle`s on the actor context and are always canceled
/// before the state they drive is reset.
pub struct GameSession {
    pub game_id: Uuid,
    pub state: GameState,
    pub sound_enabled: bool,
    clients: HashMap<Uuid, Addr<GameSessionActor>>,
    leaderboard: Addr<LeaderboardServer>,

    /// 1 Hz pre-game countdown timer, active only while `CountingDown`.
    countdown_timer: Option<SpawnHandle>,
    /// 1 Hz session clock, active only while `Playing`.
    tick_timer: Option<SpawnHandle>,
    /// Fixed-interval mole spawn timer, active only while `Playing`.
    spawn_timer: Option<SpawnHandle>,
    /// One-shot timer that lowers the current mole. Canceled and re-armed on
    /// every activation, so at most one is outstanding and it always belongs
    /// to the most recently spawned mole.
    despawn_timer: Option<SpawnHandle>,

    /// Guards against submitting the same session's score twice.
    score_saved: bool,
}

impl Actor for GameSession {
    type Context = Context<Self>;
}

impl GameSession {
    pub fn new(game_id: Uuid, player_name: String, leaderboard: Addr<LeaderboardServer>) -> Self {
        let mut state = GameState::new();
        state.set_player_name(player_name);
        Self {
            game_id,
            state,
            sound_enabled: true,
            clients: HashMap::new(),
            leaderboard,
            countdown_timer: None,
            tick_timer: None,
            spawn_timer: None,
            despawn_timer: None,
            score_saved: false,
        }
    }

    fn broadcast(&self, msg: ServerMessage) {
        for addr in self.clients.values() {
            addr.do_send(msg.clone());
        }
    }

    /// Push a fresh snapshot to every connected client.
    fn send_state(&self) {
        self.broadcast(ServerMessage::UpdateState {
            state: self.state.clone(),
            sound_enabled: self.sound_enabled,
        });
    }

    /// Forward sound cues to clients and react to session-ending events.
    /// Cues are best-effort and muted when sound is disabled; game-end
    /// handling always runs.
    fn dispatch_events(&mut self, events: Vec<SoundEvent>, ctx: &mut Context<Self>) {
        for event in events {
            if event == SoundEvent::GameEnd {
                self.on_game_ended(ctx);
            }
            if self.sound_enabled {
                self.broadcast(ServerMessage::Sound { event });
            }
        }
    }

    /// Begin the pre-game countdown and arm its 1 Hz timer.
    fn start_countdown(&mut self, ctx: &mut Context<Self>) {
        if !matches!(self.state.phase, GamePhase::Idle | GamePhase::Ended) {
            // Out-of-phase request (already counting down or playing); inert.
            return;
        }
        self.state.start_countdown();
        self.score_saved = false;
        if let Some(handle) = self.countdown_timer.take() {
            ctx.cancel_future(handle);
        }
        let handle = ctx.run_interval(Duration::from_secs(1), |act, ctx| {
            act.on_countdown_tick(ctx);
        });
        self.countdown_timer = Some(handle);
        info!("[GameSession] Countdown started: game_id={}", self.game_id);
        self.send_state();
    }

    fn on_countdown_tick(&mut self, ctx: &mut Context<Self>) {
        let events = self.state.decrement_countdown();
        if self.state.phase == GamePhase::Playing {
            if let Some(handle) = self.countdown_timer.take() {
                ctx.cancel_future(handle);
            }
            self.start_clock(ctx);
            info!("[GameSession] Play started: game_id={}", self.game_id);
        }
        self.dispatch_events(events, ctx);
        self.send_state();
    }

    /// Start the session clock: the 1 Hz tick timer and the spawn timer.
    /// Idempotent; any already-running timers are stopped first.
    fn start_clock(&mut self, ctx: &mut Context<Self>) {
        self.stop_clock(ctx);
        let tick = ctx.run_interval(Duration::from_secs(1), |act, ctx| {
            act.on_tick(ctx);
        });
        let spawn = ctx.run_interval(Duration::from_millis(SPAWN_INTERVAL_MS), |act, ctx| {
            act.on_spawn_tick(ctx);
        });
        self.tick_timer = Some(tick);
        self.spawn_timer = Some(spawn);
    }

    /// Cancel the tick, spawn, and despawn timers. Safe to call when the
    /// clock is already stopped.
    fn stop_clock(&mut self, ctx: &mut Context<Self>) {
        for handle in [
            self.tick_timer.take(),
            self.spawn_timer.take(),
            self.despawn_timer.take(),
        ]
        .into_iter()
        .flatten()
        {
            ctx.cancel_future(handle);
        }
    }

    /// Cancel every timer the session owns, countdown included. Used before
    /// resets so a late-firing timer can never touch a reset session.
    fn stop_all_timers(&mut self, ctx: &mut Context<Self>) {
        self.stop_clock(ctx);
        if let Some(handle) = self.countdown_timer.take() {
            ctx.cancel_future(handle);
        }
    }

    fn on_tick(&mut self, ctx: &mut Context<Self>) {
        if self.state.phase != GamePhase::Playing {
            self.stop_clock(ctx);
            return;
        }
        let events = self.state.decrement_time(Instant::now());
        self.dispatch_events(events, ctx);
        self.send_state();
    }

    fn on_spawn_tick(&mut self, ctx: &mut Context<Self>) {
        if self.state.phase != GamePhase::Playing {
            self.stop_clock(ctx);
            return;
        }
        let events = self.state.spawn_mole(&mut rand::rng());

        // Re-arm the despawn timer for the mole that just came up. The old
        // handle is canceled first so only the newest activation has one.
        if self.state.active_mole_id.is_some() {
            if let Some(handle) = self.despawn_timer.take() {
                ctx.cancel_future(handle);
            }
            let handle = ctx.run_later(Duration::from_millis(MOLE_VISIBLE_MS), |act, ctx| {
                act.on_despawn(ctx);
            });
            self.despawn_timer = Some(handle);
        }

        self.dispatch_events(events, ctx);
        self.send_state();
    }

    fn on_despawn(&mut self, ctx: &mut Context<Self>) {
        self.despawn_timer = None;
        let events = self.state.deactivate_mole();
        self.dispatch_events(events, ctx);
        self.send_state();
    }

    /// The session just reached `Ended`: stop every timer and submit the score.
    fn on_game_ended(&mut self, ctx: &mut Context<Self>) {
        self.stop_all_timers(ctx);
        info!(
            "[GameSession] Game over: game_id={} player={:?} score={} max_combo={}",
            self.game_id, self.state.player_name, self.state.score, self.state.max_combo
        );
        if !self.score_saved && !self.state.player_name.is_empty() {
            self.score_saved = true;
            // Fire-and-forget; persistence failures stay in the leaderboard actor.
            self.leaderboard.do_send(SaveScore {
                name: self.state.player_name.clone(),
                score: self.state.score,
                max_combo: Some(self.state.max_combo),
            });
        }
    }
}

impl Handler<ProcessClientMessage> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: ProcessClientMessage, ctx: &mut Context<Self>) -> Self::Result {
        match msg.msg {
            ClientAction::SetPlayerName { name } => {
                self.state.set_player_name(name);
                self.send_state();
            }
            ClientAction::StartCountdown => {
                self.start_countdown(ctx);
            }
            ClientAction::Whack { mole_id } => {
                let (outcome, events) = self.state.whack_mole(mole_id, Instant::now());
                match outcome {
                    Some(outcome) => {
                        self.dispatch_events(events, ctx);
                        self.broadcast(ServerMessage::WhackResult { outcome });
                        self.send_state();
                    }
                    None => {
                        // Whack outside of play; inert.
                        debug!(
                            "[GameSession] Ignoring whack in phase {:?}: game_id={}",
                            self.state.phase, self.game_id
                        );
                    }
                }
            }
            ClientAction::ToggleSound => {
                self.sound_enabled = !self.sound_enabled;
                self.send_state();
            }
            ClientAction::ResetGame => {
                // Timers first, then state, so nothing fires into the reset.
                self.stop_all_timers(ctx);
                self.state.reset_game();
                self.score_saved = false;
                self.send_state();
            }
            ClientAction::EndGame => {
                let events = self.state.end_game();
                self.dispatch_events(events, ctx);
                self.send_state();
            }
        }
    }
}

impl Handler<RegisterSession> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: RegisterSession, _: &mut Context<Self>) -> Self::Result {
        msg.addr.do_send(ServerMessage::UpdateState {
            state: self.state.clone(),
            sound_enabled: self.sound_enabled,
        });
        self.clients.insert(msg.client_id, msg.addr);
    }
}

impl Handler<UnregisterSession> for GameSession {
    type Result = ();

    fn handle(&mut self, msg: UnregisterSession, _: &mut Context<Self>) -> Self::Result {
        self.clients.remove(&msg.client_id);
    }
}

/// Manager actor keeping track of every live game session.
pub struct GameSessionManager {
    sessions: HashMap<Uuid, Addr<GameSession>>,
    leaderboard: Addr<LeaderboardServer>,
}

impl GameSessionManager {
    pub fn new(leaderboard: Addr<LeaderboardServer>) -> Self {
        Self {
            sessions: HashMap::new(),
            leaderboard,
        }
    }

    pub fn create_game(&mut self, player_name: String) -> Uuid {
        let game_id = Uuid::new_v4();
        let session = GameSession::new(game_id, player_name, self.leaderboard.clone()).start();
        self.sessions.insert(game_id, session);
        info!("[GameSessionManager] Created game_id={}", game_id);
        game_id
    }
}

impl Actor for GameSessionManager {
    type Context = Context<Self>;
}

#[derive(Message)]
#[rtype(result = "Uuid")]
pub struct CreateGame {
    pub player_name: String,
}

impl Handler<CreateGame> for GameSessionManager {
    type Result = MessageResult<CreateGame>;

    fn handle(&mut self, msg: CreateGame, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.create_game(msg.player_name))
    }
}

#[derive(Message)]
#[rtype(result = "Result<Addr<GameSession>, String>")]
pub struct GetGameSession {
    pub game_id: Uuid,
}

impl Handler<GetGameSession> for GameSessionManager {
    type Result = Result<Addr<GameSession>, String>;

    fn handle(&mut self, msg: GetGameSession, _: &mut Context<Self>) -> Self::Result {
        self.sessions
            .get(&msg.game_id)
            .cloned()
            .ok_or_else(|| "Game session not found".to_string())
    }
}
