use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Serialize, Deserialize};

use crate::config::game::{
    COMBO_TIMEOUT_MS, COUNTDOWN_DURATION, GAME_DURATION, GRID_COL, MAX_COMBO_MULTIPLIER,
    MOLE_COUNT, POINTS_PER_HIT, TICK_WARNING_SECS,
};
use crate::game::spawn::select_next_mole;
use crate::game::types::{GamePhase, Mole, Position, SoundEvent, WhackOutcome};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub phase: GamePhase,
    pub moles: Vec<Mole>,
    pub active_mole_id: Option<u8>,
    pub score: u32,
    pub combo: u32,
    pub max_combo: u32,
    pub time_left: u32,
    pub countdown: Option<u32>,
    pub player_name: String,
    /// Id of the most recently spawned mole, remembered within one playing
    /// period so the selector never repeats it back-to-back.
    pub last_spawned_mole: Option<u8>,
    /// Timestamp of the last successful hit, for combo-timeout detection.
    /// Not part of the snapshot sent to clients.
    #[serde(skip)]
    pub last_hit: Option<Instant>,
}

impl GameState {
    /// Create a fresh session in `Idle` with all 12 moles down.
    pub fn new() -> Self {
        let moles = (1..=MOLE_COUNT)
            .map(|id| {
                let index = id - 1;
                Mole::new(id, Position {
                    row: index / GRID_COL,
                    col: index % GRID_COL,
                })
            })
            .collect();

        GameState {
            phase: GamePhase::Idle,
            moles,
            active_mole_id: None,
            score: 0,
            combo: 0,
            max_combo: 0,
            time_left: GAME_DURATION,
            countdown: None,
            player_name: String::new(),
            last_spawned_mole: None,
            last_hit: None,
        }
    }

    /// Store the player name. Valid in any phase, never transitions.
    pub fn set_player_name(&mut self, name: String) {
        self.player_name = name;
    }

    /// Begin the pre-game countdown. Only meaningful from `Idle` or `Ended`;
    /// inert otherwise.
    pub fn start_countdown(&mut self) {
        match self.phase {
            GamePhase::Idle | GamePhase::Ended => {
                self.phase = GamePhase::CountingDown;
                self.countdown = Some(COUNTDOWN_DURATION);
            }
            _ => {}
        }
    }

    /// Advance the countdown by one second. When it reaches zero the session
    /// transitions to `Playing` with a full round reset.
    pub fn decrement_countdown(&mut self) -> Vec<SoundEvent> {
        if self.phase != GamePhase::CountingDown {
            return Vec::new();
        }
        if let Some(countdown) = self.countdown {
            if countdown > 0 {
                self.countdown = Some(countdown - 1);
            }
        }
        if self.countdown == Some(0) {
            self.countdown = None;
            self.begin_play();
            return vec![SoundEvent::GameStart];
        }
        Vec::new()
    }

    // Full round reset on entry into Playing.
    fn begin_play(&mut self) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.combo = 0;
        self.max_combo = 0;
        self.time_left = GAME_DURATION;
        self.active_mole_id = None;
        self.last_hit = None;
        self.last_spawned_mole = None;
        self.deactivate_all();
    }

    /// Select and raise the next mole, never repeating the previous one.
    /// Invoked by the session clock on each spawn tick.
    pub fn spawn_mole<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<SoundEvent> {
        if self.phase != GamePhase::Playing {
            return Vec::new();
        }
        let mole_id = select_next_mole(rng, self.last_spawned_mole);
        self.last_spawned_mole = Some(mole_id);
        self.activate_mole(mole_id)
    }

    /// Raise the mole with the given id, lowering every other mole first so
    /// at most one is ever up. Inert outside `Playing`.
    pub fn activate_mole(&mut self, mole_id: u8) -> Vec<SoundEvent> {
        if self.phase != GamePhase::Playing {
            return Vec::new();
        }
        // Lower every mole first; `active_mole_id` only moves if the target
        // exists. The hit resolver tolerates the two disagreeing.
        self.deactivate_all();

        if let Some(mole) = self.moles.iter_mut().find(|m| m.id == mole_id) {
            mole.is_active = true;
            self.active_mole_id = Some(mole_id);
            return vec![SoundEvent::MoleAppear];
        }
        Vec::new()
    }

    /// Lower all moles. A mole that disappears unhit breaks the streak.
    pub fn deactivate_mole(&mut self) -> Vec<SoundEvent> {
        self.deactivate_all();
        self.active_mole_id = None;
        if self.combo > 0 {
            self.combo = 0;
        }
        Vec::new()
    }

    /// Resolve a whack attempt against the current activation state.
    ///
    /// A hit is valid iff the mole exists, is up, and agrees with
    /// `active_mole_id`. Anything else is a miss and unconditionally breaks
    /// the combo. Returns `None` when called outside `Playing`.
    pub fn whack_mole(
        &mut self,
        mole_id: u8,
        now: Instant,
    ) -> (Option<WhackOutcome>, Vec<SoundEvent>) {
        if self.phase != GamePhase::Playing {
            return (None, Vec::new());
        }

        let combo_timeout = Duration::from_millis(COMBO_TIMEOUT_MS);
        let is_valid_hit = self
            .moles
            .iter()
            .find(|m| m.id == mole_id)
            .map(|m| m.is_active && self.active_mole_id == Some(mole_id))
            .unwrap_or(false);

        if is_valid_hit {
            if let Some(mole) = self.moles.iter_mut().find(|m| m.id == mole_id) {
                mole.is_active = false;
            }
            self.active_mole_id = None;

            // Continue the streak if the previous hit was recent enough.
            let within_timeout = self
                .last_hit
                .map(|t| now.saturating_duration_since(t) <= combo_timeout)
                .unwrap_or(true);
            self.combo = if within_timeout { self.combo + 1 } else { 1 };
            if self.combo > self.max_combo {
                self.max_combo = self.combo;
            }
            self.last_hit = Some(now);

            let multiplier = self.combo.min(MAX_COMBO_MULTIPLIER);
            let points = POINTS_PER_HIT * multiplier;
            self.score += points;

            let mut events = vec![SoundEvent::Whack];
            if self.combo >= 2 {
                events.push(SoundEvent::Combo(self.combo));
            }
            (Some(WhackOutcome::Hit { combo: self.combo, points }), events)
        } else {
            // Any miss breaks the streak, regardless of its length.
            self.combo = 0;
            self.last_hit = None;
            (Some(WhackOutcome::Miss), vec![SoundEvent::Miss])
        }
    }

    /// Advance the session clock by one second. Ends the session when the
    /// timer runs out, and decays a stale combo even without a new miss.
    pub fn decrement_time(&mut self, now: Instant) -> Vec<SoundEvent> {
        if self.phase != GamePhase::Playing {
            return Vec::new();
        }
        let mut events = Vec::new();

        if self.time_left > 0 {
            self.time_left -= 1;

            if self.time_left > 0 && self.time_left <= TICK_WARNING_SECS {
                events.push(SoundEvent::Tick);
            }

            // Combo decays when the last hit is too old.
            if let Some(last_hit) = self.last_hit {
                if now.saturating_duration_since(last_hit)
                    > Duration::from_millis(COMBO_TIMEOUT_MS)
                {
                    self.combo = 0;
                }
            }
        }

        if self.time_left == 0 {
            events.extend(self.finish());
        }
        events
    }

    /// Force the session to `Ended`, same effects as the timer running out.
    pub fn end_game(&mut self) -> Vec<SoundEvent> {
        match self.phase {
            GamePhase::Playing | GamePhase::CountingDown => self.finish(),
            _ => Vec::new(),
        }
    }

    fn finish(&mut self) -> Vec<SoundEvent> {
        self.phase = GamePhase::Ended;
        self.active_mole_id = None;
        self.combo = 0;
        self.countdown = None;
        self.deactivate_all();
        vec![SoundEvent::GameEnd]
    }

    /// Return to a neutral `Idle` state with score and timers cleared.
    /// The player name survives the reset.
    pub fn reset_game(&mut self) {
        self.phase = GamePhase::Idle;
        self.score = 0;
        self.combo = 0;
        self.max_combo = 0;
        self.time_left = GAME_DURATION;
        self.active_mole_id = None;
        self.last_hit = None;
        self.last_spawned_mole = None;
        self.countdown = None;
        self.deactivate_all();
    }

    fn deactivate_all(&mut self) {
        for mole in &mut self.moles {
            mole.is_active = false;
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
