/// Game configuration constants.
///
/// This module defines the main gameplay parameters such as session duration,
/// countdown duration, mole timing, and grid dimensions.
pub const GAME_DURATION: u32 = 120; // Duration of a session in seconds.

/// Duration (in seconds) of the pre-game countdown before play begins.
pub const COUNTDOWN_DURATION: u32 = 5;

/// Interval (in milliseconds) between mole spawns while playing.
pub const SPAWN_INTERVAL_MS: u64 = 800;

/// Time (in milliseconds) a mole stays up before disappearing unhit.
pub const MOLE_VISIBLE_MS: u64 = 2500;

/// Maximum gap (in milliseconds) between hits before the combo breaks.
pub const COMBO_TIMEOUT_MS: u64 = 3000;

/// Base points awarded per successful hit, before the combo multiplier.
pub const POINTS_PER_HIT: u32 = 100;

/// The combo multiplier is clamped to this value for scoring.
pub const MAX_COMBO_MULTIPLIER: u32 = 5;

/// Number of moles on the board.
pub const MOLE_COUNT: u8 = 12;

/// Number of rows in the mole grid.
pub const GRID_ROW: u8 = 3;

/// Number of columns in the mole grid.
pub const GRID_COL: u8 = 4;

/// Tick sounds play during the last this-many seconds of a session.
pub const TICK_WARNING_SECS: u32 = 10;
