use serde::{Serialize, Deserialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

/// Phase of a game session. Transitions are driven by `GameState`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Idle,
    CountingDown,
    Playing,
    Ended,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mole {
    pub id: u8,
    pub is_active: bool,
    pub position: Position,
}

impl Mole {
    pub fn new(id: u8, position: Position) -> Self {
        Self {
            id,
            is_active: false,
            position,
        }
    }
}

/// Sound cues produced by state transitions. The state machine never plays
/// anything itself; cues are collected and dispatched by the session actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundEvent {
    Whack,
    Miss,
    MoleAppear,
    GameStart,
    GameEnd,
    Tick,
    Combo(u32),
}

/// Result of a whack attempt, reported back to the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WhackOutcome {
    Hit { combo: u32, points: u32 },
    Miss,
}
