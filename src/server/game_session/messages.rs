use actix::prelude::*;
use serde::{Serialize, Deserialize};
use uuid::Uuid;

use super::session::GameSessionActor;
use crate::game::state::GameState;
use crate::game::types::{SoundEvent, WhackOutcome};

/// Actions a client may send into a game session over the WebSocket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ClientAction {
    SetPlayerName { name: String },
    StartCountdown,
    Whack { mole_id: u8 },
    ToggleSound,
    ResetGame,
    EndGame,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct ProcessClientMessage {
    pub msg: ClientAction,
}

/// Messages pushed from the session to its connected clients.
#[derive(Message, Clone, Serialize, Deserialize, Debug)]
#[rtype(result = "()")]
pub enum ServerMessage {
    /// Full read-only snapshot of the session, sent after every mutation.
    UpdateState {
        state: GameState,
        sound_enabled: bool,
    },
    /// Sound cue for the client's audio layer. Best-effort.
    Sound { event: SoundEvent },
    /// Result of the client's last whack attempt.
    WhackResult { outcome: WhackOutcome },
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct RegisterSession {
    pub client_id: Uuid,
    pub addr: Addr<GameSessionActor>,
}

#[derive(Message)]
#[rtype(result = "()")]
pub struct UnregisterSession {
    pub client_id: Uuid,
}
