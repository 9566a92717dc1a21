use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::game::{COUNTDOWN_DURATION, GAME_DURATION, MOLE_COUNT};
use crate::game::state::GameState;
use crate::game::types::{GamePhase, SoundEvent, WhackOutcome};

/// Run the countdown to completion, leaving the session in `Playing`.
fn playing_state() -> GameState {
    let mut state = GameState::new();
    state.start_countdown();
    for _ in 0..COUNTDOWN_DURATION {
        state.decrement_countdown();
    }
    assert_eq!(state.phase, GamePhase::Playing);
    state
}

fn active_count(state: &GameState) -> usize {
    state.moles.iter().filter(|m| m.is_active).count()
}

#[test]
fn test_initial_state() {
    let state = GameState::new();
    assert_eq!(state.phase, GamePhase::Idle);
    assert_eq!(state.moles.len(), MOLE_COUNT as usize);
    assert_eq!(active_count(&state), 0);
    assert_eq!(state.score, 0);
    assert_eq!(state.time_left, GAME_DURATION);
    // Ids are 1..=12 laid out row-major on a 3x4 grid.
    assert_eq!(state.moles[0].id, 1);
    assert_eq!(state.moles[4].position.row, 1);
    assert_eq!(state.moles[4].position.col, 0);
    assert_eq!(state.moles[11].position.row, 2);
    assert_eq!(state.moles[11].position.col, 3);
}

#[test]
fn test_countdown_reaches_playing_with_fresh_round() {
    let mut state = GameState::new();
    state.set_player_name("alice".into());
    state.start_countdown();
    assert_eq!(state.phase, GamePhase::CountingDown);
    assert_eq!(state.countdown, Some(COUNTDOWN_DURATION));

    for _ in 0..COUNTDOWN_DURATION - 1 {
        assert!(state.decrement_countdown().is_empty());
        assert_eq!(state.phase, GamePhase::CountingDown);
    }
    let events = state.decrement_countdown();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(events, vec![SoundEvent::GameStart]);
    assert_eq!(state.time_left, GAME_DURATION);
    assert_eq!(state.countdown, None);
    assert_eq!(state.last_spawned_mole, None);
    assert_eq!(active_count(&state), 0);
    assert_eq!(state.player_name, "alice");
}

#[test]
fn test_start_countdown_inert_while_playing() {
    let mut state = playing_state();
    state.start_countdown();
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.countdown, None);
}

#[test]
fn test_at_most_one_mole_active_across_spawns() {
    let mut state = playing_state();
    let mut rng = StdRng::seed_from_u64(3);
    for _ in 0..200 {
        let events = state.spawn_mole(&mut rng);
        assert_eq!(events, vec![SoundEvent::MoleAppear]);
        assert_eq!(active_count(&state), 1);
        assert_eq!(
            state.active_mole_id,
            state.moles.iter().find(|m| m.is_active).map(|m| m.id)
        );
    }
}

#[test]
fn test_no_two_adjacent_spawns_repeat() {
    let mut state = playing_state();
    let mut rng = StdRng::seed_from_u64(9);
    let mut previous = None;
    for _ in 0..500 {
        state.spawn_mole(&mut rng);
        let current = state.active_mole_id;
        assert!(current.is_some());
        assert_ne!(current, previous);
        previous = current;
    }
}

#[test]
fn test_spawn_inert_outside_playing() {
    let mut state = GameState::new();
    let mut rng = StdRng::seed_from_u64(1);
    assert!(state.spawn_mole(&mut rng).is_empty());
    assert_eq!(active_count(&state), 0);
    assert_eq!(state.last_spawned_mole, None);
}

#[test]
fn test_valid_hit_scores_and_builds_combo() {
    let mut state = playing_state();
    let now = Instant::now();

    state.activate_mole(7);
    let (outcome, events) = state.whack_mole(7, now);
    assert_eq!(outcome, Some(WhackOutcome::Hit { combo: 1, points: 100 }));
    assert_eq!(events, vec![SoundEvent::Whack]);
    assert_eq!(state.score, 100);
    assert_eq!(state.active_mole_id, None);
    assert_eq!(active_count(&state), 0);

    state.activate_mole(2);
    let (outcome, events) = state.whack_mole(2, now + Duration::from_millis(500));
    assert_eq!(outcome, Some(WhackOutcome::Hit { combo: 2, points: 200 }));
    assert_eq!(events, vec![SoundEvent::Whack, SoundEvent::Combo(2)]);
    assert_eq!(state.score, 300);
    assert_eq!(state.max_combo, 2);
}

#[test]
fn test_hit_within_window_extends_combo() {
    // Two quick hits bring the combo to 2; a third within 1000ms makes 3.
    let mut state = playing_state();
    let base = Instant::now();
    state.activate_mole(1);
    state.whack_mole(1, base);
    state.activate_mole(2);
    state.whack_mole(2, base + Duration::from_millis(800));
    assert_eq!(state.combo, 2);

    let score_before = state.score;
    state.activate_mole(7);
    let (outcome, _) = state.whack_mole(7, base + Duration::from_millis(1800));
    assert_eq!(outcome, Some(WhackOutcome::Hit { combo: 3, points: 300 }));
    assert_eq!(state.score, score_before + 300);
}

#[test]
fn test_stale_hit_restarts_combo_at_one() {
    let mut state = playing_state();
    let base = Instant::now();
    state.activate_mole(4);
    state.whack_mole(4, base);
    state.activate_mole(5);
    state.whack_mole(5, base + Duration::from_millis(1000));
    assert_eq!(state.combo, 2);

    // Next hit lands after the 3000ms window: streak restarts, not breaks.
    state.activate_mole(6);
    let (outcome, _) = state.whack_mole(6, base + Duration::from_millis(4500));
    assert_eq!(outcome, Some(WhackOutcome::Hit { combo: 1, points: 100 }));
    assert_eq!(state.max_combo, 2);
}

#[test]
fn test_multiplier_caps_at_five() {
    let mut state = playing_state();
    let mut now = Instant::now();
    for i in 0..8u8 {
        let id = (i % MOLE_COUNT) + 1;
        state.activate_mole(id);
        let (outcome, _) = state.whack_mole(id, now);
        let expected_points = 100 * u32::from(i + 1).min(5);
        assert_eq!(
            outcome,
            Some(WhackOutcome::Hit { combo: u32::from(i) + 1, points: expected_points })
        );
        now += Duration::from_millis(400);
    }
    // 100+200+300+400+500 then three capped hits at 500.
    assert_eq!(state.score, 1500 + 3 * 500);
    assert_eq!(state.max_combo, 8);
}

#[test]
fn test_miss_on_inactive_board_breaks_combo() {
    let mut state = playing_state();
    let now = Instant::now();
    state.activate_mole(3);
    state.whack_mole(3, now);
    state.activate_mole(8);
    state.whack_mole(8, now + Duration::from_millis(200));
    assert_eq!(state.combo, 2);

    // No mole is up; any whack is a miss.
    let (outcome, events) = state.whack_mole(3, now + Duration::from_millis(400));
    assert_eq!(outcome, Some(WhackOutcome::Miss));
    assert_eq!(events, vec![SoundEvent::Miss]);
    assert_eq!(state.combo, 0);
    assert_eq!(state.last_hit, None);
    assert_eq!(state.score, 300); // unchanged
}

#[test]
fn test_whack_wrong_mole_is_a_miss() {
    let mut state = playing_state();
    state.activate_mole(5);
    let (outcome, _) = state.whack_mole(6, Instant::now());
    assert_eq!(outcome, Some(WhackOutcome::Miss));
    assert_eq!(state.combo, 0);
    // Mole 5 is still up; the miss does not clear it.
    assert_eq!(state.active_mole_id, Some(5));
}

#[test]
fn test_whack_nonexistent_mole_is_a_miss() {
    let mut state = playing_state();
    state.activate_mole(5);
    let (outcome, _) = state.whack_mole(99, Instant::now());
    assert_eq!(outcome, Some(WhackOutcome::Miss));
}

#[test]
fn test_whack_outside_playing_is_inert() {
    let mut state = GameState::new();
    let (outcome, events) = state.whack_mole(1, Instant::now());
    assert_eq!(outcome, None);
    assert!(events.is_empty());
    assert_eq!(state.combo, 0);
    assert_eq!(state.score, 0);
}

#[test]
fn test_max_combo_never_below_combo() {
    let mut state = playing_state();
    let mut now = Instant::now();
    let mut rng = StdRng::seed_from_u64(77);
    for step in 0..100 {
        state.spawn_mole(&mut rng);
        // Alternate hits and deliberate misses.
        let target = if step % 7 == 0 { 0 } else { state.active_mole_id.unwrap() };
        state.whack_mole(target, now);
        assert!(state.max_combo >= state.combo);
        now += Duration::from_millis(300);
    }
}

#[test]
fn test_activate_unknown_mole_clears_board_only() {
    let mut state = playing_state();
    state.activate_mole(4);
    let events = state.activate_mole(99);
    assert!(events.is_empty());
    assert_eq!(active_count(&state), 0);
    // The stale pointer is tolerated: whacking it still counts as a miss
    // because the mole itself is down.
    assert_eq!(state.active_mole_id, Some(4));
    let (outcome, _) = state.whack_mole(4, Instant::now());
    assert_eq!(outcome, Some(WhackOutcome::Miss));
}

#[test]
fn test_expired_mole_breaks_streak() {
    let mut state = playing_state();
    state.activate_mole(3);
    state.whack_mole(3, Instant::now());
    assert_eq!(state.combo, 1);

    // Mole 3 comes up again and times out unhit.
    state.activate_mole(3);
    let events = state.deactivate_mole();
    assert!(events.is_empty());
    assert_eq!(state.active_mole_id, None);
    assert_eq!(active_count(&state), 0);
    assert_eq!(state.combo, 0);
}

#[test]
fn test_combo_decays_without_new_miss() {
    let mut state = playing_state();
    let base = Instant::now();
    state.activate_mole(2);
    state.whack_mole(2, base);
    assert_eq!(state.combo, 1);

    // A tick more than 3000ms after the hit clears the combo.
    state.decrement_time(base + Duration::from_millis(3500));
    assert_eq!(state.combo, 0);
    assert_eq!(state.max_combo, 1);
    assert_eq!(state.phase, GamePhase::Playing);
}

#[test]
fn test_time_running_out_ends_the_session() {
    let mut state = playing_state();
    state.time_left = 1;
    state.activate_mole(9);
    state.combo = 3;

    let events = state.decrement_time(Instant::now());
    assert_eq!(state.phase, GamePhase::Ended);
    assert_eq!(state.time_left, 0);
    assert_eq!(state.active_mole_id, None);
    assert_eq!(active_count(&state), 0);
    assert_eq!(state.combo, 0);
    assert!(events.contains(&SoundEvent::GameEnd));
}

#[test]
fn test_tick_sound_in_final_ten_seconds() {
    let mut state = playing_state();
    state.time_left = 12;
    let now = Instant::now();
    assert!(state.decrement_time(now).is_empty()); // 11 left
    assert_eq!(state.decrement_time(now), vec![SoundEvent::Tick]); // 10 left
    state.time_left = 1;
    // The final tick is the game end, not a warning.
    assert_eq!(state.decrement_time(now), vec![SoundEvent::GameEnd]);
}

#[test]
fn test_decrement_time_inert_outside_playing() {
    let mut state = GameState::new();
    assert!(state.decrement_time(Instant::now()).is_empty());
    assert_eq!(state.time_left, GAME_DURATION);
}

#[test]
fn test_forced_end_matches_timer_end() {
    let mut state = playing_state();
    state.activate_mole(1);
    state.combo = 2;
    let events = state.end_game();
    assert_eq!(events, vec![SoundEvent::GameEnd]);
    assert_eq!(state.phase, GamePhase::Ended);
    assert_eq!(state.active_mole_id, None);
    assert_eq!(state.combo, 0);
    assert_eq!(active_count(&state), 0);

    // Ending an already-ended session is inert.
    assert!(state.end_game().is_empty());
}

#[test]
fn test_reset_then_countdown_reproduces_initial_playing_state() {
    let mut state = playing_state();
    let mut rng = StdRng::seed_from_u64(11);
    let now = Instant::now();
    state.spawn_mole(&mut rng);
    state.whack_mole(state.active_mole_id.unwrap_or(0), now);
    state.end_game();

    state.reset_game();
    assert_eq!(state.phase, GamePhase::Idle);
    assert_eq!(state.score, 0);
    assert_eq!(state.time_left, GAME_DURATION);
    assert_eq!(state.countdown, None);

    state.start_countdown();
    for _ in 0..COUNTDOWN_DURATION {
        state.decrement_countdown();
    }
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0);
    assert_eq!(state.combo, 0);
    assert_eq!(state.max_combo, 0);
    assert_eq!(state.time_left, GAME_DURATION);
    assert_eq!(state.last_spawned_mole, None);
    assert_eq!(active_count(&state), 0);
}

#[test]
fn test_restart_from_ended_without_reset() {
    let mut state = playing_state();
    state.score = 700;
    state.end_game();

    // startCountdown is valid straight from Ended.
    state.start_countdown();
    assert_eq!(state.phase, GamePhase::CountingDown);
    for _ in 0..COUNTDOWN_DURATION {
        state.decrement_countdown();
    }
    assert_eq!(state.phase, GamePhase::Playing);
    assert_eq!(state.score, 0);
}

#[test]
fn test_client_action_round_trips_as_json() {
    use crate::server::game_session::messages::ClientAction;

    let action: ClientAction = serde_json::from_str(r#"{"Whack":{"mole_id":7}}"#).unwrap();
    match action {
        ClientAction::Whack { mole_id } => assert_eq!(mole_id, 7),
        other => panic!("unexpected action: {:?}", other),
    }

    let action: ClientAction = serde_json::from_str(r#""StartCountdown""#).unwrap();
    assert!(matches!(action, ClientAction::StartCountdown));
}

#[test]
fn test_snapshot_serializes_without_hit_timestamp() {
    let mut state = playing_state();
    state.activate_mole(1);
    state.whack_mole(1, Instant::now());
    let json = serde_json::to_string(&state).unwrap();
    assert!(json.contains("\"score\":100"));
    assert!(!json.contains("last_hit"));
}
