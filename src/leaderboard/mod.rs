/// Leaderboard module: score persistence actor and its JSON-file store.
pub mod server;
pub mod store;

pub use server::LeaderboardServer;
