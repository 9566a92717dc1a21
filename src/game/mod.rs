/// Pure game logic: session state machine, hit resolution, and mole
/// selection. No timers or I/O live here; the server layer drives these
/// transitions and dispatches the sound events they return.
pub mod spawn;
pub mod state;
pub mod types;

pub use state::GameState;
