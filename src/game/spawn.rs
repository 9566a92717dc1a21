use rand::Rng;

use crate::config::game::MOLE_COUNT;

/// Pick the next mole to activate: a uniformly random id in `1..=MOLE_COUNT`
/// that is never the id spawned immediately before.
///
/// Resamples until the constraint is satisfied (expected attempts are
/// bounded: 12/11 draws on average for a 12-mole board). The RNG is injected
/// so callers can seed it in tests.
pub fn select_next_mole<R: Rng + ?Sized>(rng: &mut R, excluding: Option<u8>) -> u8 {
    loop {
        let id = rng.random_range(1..=MOLE_COUNT);
        if excluding == Some(id) && MOLE_COUNT > 1 {
            continue;
        }
        return id;
    }
}
