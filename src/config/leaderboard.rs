/// Leaderboard configuration constants.
///
/// This module defines parameters for score persistence, such as the
/// number of entries kept and the storage location.
pub const LEADERBOARD_LIMIT: usize = 10; // Number of top scores kept.

/// Path of the JSON file backing the leaderboard.
pub const LEADERBOARD_FILE: &str = "leaderboard.json";
