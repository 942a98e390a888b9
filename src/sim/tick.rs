//! Fixed timestep simulation tick
//!
//! Advances one frame of gameplay: difficulty ramp, spawn scheduling,
//! indicator lifecycle, item descent, catch scoring and the session machine.

use rand::Rng;
use rand_pcg::Pcg32;

use super::collision::{circle_box_overlap, player_hitbox};
use super::state::{FallingItem, GamePhase, GameState, Indicator, ItemKind, SpawnIntent, ITEM_KINDS};
use crate::consts::*;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Steering direction: -1, 0 or 1 (out-of-range values clamp to their sign)
    pub direction: i8,
    /// Start a run from the menu
    pub start: bool,
    /// Abandon the session and return to the menu
    pub reset: bool,
    /// Idle/demo mode - the autopilot steers instead of `direction`
    pub idle_mode: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // A reset discards all in-flight indicators/items/intents atomically
    if input.reset {
        state.reset_to_menu();
        return;
    }

    match state.phase {
        GamePhase::Menu => {
            if input.start {
                state.start_run();
            }
            return;
        }
        // Terminal: nothing advances until an explicit reset
        GamePhase::GameOver { .. } => return,
        GamePhase::Playing => {}
    }

    // A bad frame must not run the simulation backwards
    let dt = dt.max(0.0);

    state.time_ticks += 1;

    let direction = if input.idle_mode {
        idle_direction(state)
    } else {
        input.direction.signum()
    };
    state.player.advance(dt, direction as f32);

    // Fixed intra-tick order keeps replays deterministic: ramp, spawn
    // countdown, intent materialization, indicator countdown, then items.
    update_spawning(state, dt);
    update_items(state, dt);
    update_boost(state, dt);
}

/// Difficulty ramp, spawn countdown and the indicator/intent pipeline
fn update_spawning(state: &mut GameState, dt: f32) {
    state.difficulty.advance(dt);

    state.spawn_timer -= dt;
    if state.spawn_timer <= 0.0 {
        spawn_indicator(state);
        // Ramp changes apply from the next spawn onward
        state.spawn_timer = state.difficulty.spawn_interval;
    }

    // Materialize queued spawns whose indicator delay has run out
    let mut due: Vec<(f32, &'static ItemKind)> = Vec::new();
    state.pending.retain_mut(|intent| {
        intent.delay -= dt;
        if intent.delay <= 0.0 {
            due.push((intent.x, intent.kind));
            false
        } else {
            true
        }
    });
    for (x, kind) in due {
        let id = state.next_entity_id();
        let fall_speed = state.difficulty.fall_speed * kind.speed_mult;
        state.items.push(FallingItem::new(id, kind, x, fall_speed));
    }

    for indicator in &mut state.indicators {
        indicator.advance(dt);
    }
    state.indicators.retain(|indicator| !indicator.expired());
}

/// Emit one indicator and queue its item drop
fn spawn_indicator(state: &mut GameState) {
    let x = state
        .rng_mut()
        .random_range(SPAWN_MARGIN..FIELD_WIDTH - SPAWN_MARGIN);
    let kind = pick_kind(state.rng_mut());

    state
        .indicators
        .push(Indicator::new(kind, x, INDICATOR_DURATION));
    // The item drops the moment its indicator finishes
    state.pending.push(SpawnIntent {
        kind,
        x,
        delay: INDICATOR_DURATION,
    });
}

/// Two-stage weighted draw: the rare pool collectively gets `RARE_CHANCE`
/// regardless of its size, the remainder goes uniformly to the common pool
fn pick_kind(rng: &mut Pcg32) -> &'static ItemKind {
    let roll: f32 = rng.random();

    let rare: Vec<&'static ItemKind> = ITEM_KINDS.iter().filter(|k| k.rare).collect();
    if roll < RARE_CHANCE && !rare.is_empty() {
        return rare[rng.random_range(0..rare.len())];
    }

    let common: Vec<&'static ItemKind> = ITEM_KINDS.iter().filter(|k| !k.rare).collect();
    if common.is_empty() {
        // Degenerate catalog: fall back to the full table
        return &ITEM_KINDS[rng.random_range(0..ITEM_KINDS.len())];
    }
    common[rng.random_range(0..common.len())]
}

/// Item descent, catch detection and scoring
fn update_items(state: &mut GameState, dt: f32) {
    let hitbox = player_hitbox(&state.player);

    // Collect catches first, apply scoring after (deferred to avoid holding
    // the item borrow while mutating score/boost state)
    let mut caught: Vec<&'static ItemKind> = Vec::new();
    for item in &mut state.items {
        item.advance(dt);
        if item.active && circle_box_overlap(item.pos, item.radius(), &hitbox) {
            // Deactivate immediately so an item can never score twice
            item.active = false;
            caught.push(item.kind);
        }
    }
    state.items.retain(|item| item.active);

    for kind in caught {
        if kind.grants_boost {
            activate_boost(state);
        }
        state.score += kind.score;
        log::debug!(
            "caught {} ({:+}), score {}",
            kind.name,
            kind.score,
            state.score
        );

        if state.score >= WIN_SCORE && state.phase == GamePhase::Playing {
            state.phase = GamePhase::GameOver { won: true };
            log::info!("run won with score {}", state.score);
        }
    }
}

fn activate_boost(state: &mut GameState) {
    state.boost.active = true;
    state.boost.remaining = BOOST_DURATION;
    state.player.set_boost(true);
    log::info!("superpower activated");
}

fn update_boost(state: &mut GameState, dt: f32) {
    if !state.boost.active {
        return;
    }
    state.boost.remaining -= dt;
    if state.boost.remaining <= 0.0 {
        state.boost.active = false;
        state.boost.remaining = 0.0;
        state.player.set_boost(false);
        log::info!("superpower expired");
    }
}

/// Demo autopilot: sidestep bombs about to land, otherwise chase the lowest
/// beneficial item (or the next indicator when nothing is falling yet)
fn idle_direction(state: &GameState) -> i8 {
    let px = state.player.x;

    let threat = state
        .items
        .iter()
        .filter(|item| item.active && !item.kind.fruit)
        .filter(|item| item.pos.y > FIELD_HEIGHT * 0.5)
        .filter(|item| (item.pos.x - px).abs() < PLAYER_SIZE)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
    if let Some(bomb) = threat {
        return if bomb.pos.x >= px { -1 } else { 1 };
    }

    let target_x = state
        .items
        .iter()
        .filter(|item| item.active && item.kind.fruit)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|item| item.pos.x)
        .or_else(|| state.indicators.first().map(|indicator| indicator.x));

    match target_x {
        Some(x) if x - px > 10.0 => 1,
        Some(x) if x - px < -10.0 => -1,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use rand::SeedableRng;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.start_run();
        state
    }

    /// Drop an item of `kind` right on the player's hitbox center, not moving
    fn plant_item(state: &mut GameState, kind: &'static ItemKind) {
        let hitbox = player_hitbox(&state.player);
        let id = state.next_entity_id();
        state.items.push(FallingItem {
            id,
            kind,
            pos: hitbox.center,
            fall_speed: 0.0,
            active: true,
        });
    }

    fn kind_by_name(name: &str) -> &'static ItemKind {
        ITEM_KINDS.iter().find(|k| k.name == name).unwrap()
    }

    #[test]
    fn menu_ignores_everything_but_start() {
        let mut state = GameState::new(1);
        tick(&mut state, &TickInput { direction: 1, ..Default::default() }, SIM_DT);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.time_ticks, 0);
        assert!(state.indicators.is_empty());

        tick(&mut state, &TickInput { start: true, ..Default::default() }, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn game_over_is_terminal_until_reset() {
        let mut state = playing_state(2);
        state.phase = GamePhase::GameOver { won: true };
        let ticks_before = state.time_ticks;

        tick(&mut state, &TickInput { direction: 1, start: true, ..Default::default() }, SIM_DT);
        assert_eq!(state.phase, GamePhase::GameOver { won: true });
        assert_eq!(state.time_ticks, ticks_before);

        tick(&mut state, &TickInput { reset: true, ..Default::default() }, SIM_DT);
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn first_tick_emits_indicator_and_intent() {
        let mut state = playing_state(3);
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.indicators.len(), 1);
        assert_eq!(state.pending.len(), 1);
        assert!(state.items.is_empty());
        assert_eq!(state.indicators[0].x, state.pending[0].x);
    }

    #[test]
    fn indicator_delay_is_exact() {
        let mut state = playing_state(4);
        let input = TickInput::default();

        // First tick creates the first indicator
        tick(&mut state, &input, SIM_DT);
        let x = state.indicators[0].x;

        let mut ticks_after_creation = 0u32;
        while state.items.is_empty() {
            tick(&mut state, &input, SIM_DT);
            ticks_after_creation += 1;
            assert!(ticks_after_creation < 200, "item never materialized");
        }

        // The indicator's own tick counts toward the delay, so the item lands
        // within one tick of the nominal duration
        let elapsed = (ticks_after_creation + 1) as f32 * SIM_DT;
        assert!((elapsed - INDICATOR_DURATION).abs() <= 2.0 * SIM_DT);
        assert_eq!(state.items[0].pos.x, x);

        // Its indicator expired on the same tick
        assert!(state.indicators.iter().all(|i| i.x != x || i.life > 0.0));
    }

    #[test]
    fn materialized_item_uses_current_difficulty_speed() {
        let mut state = playing_state(5);
        let input = TickInput::default();
        while state.items.is_empty() {
            tick(&mut state, &input, SIM_DT);
        }
        let item = &state.items[0];
        let expected = state.difficulty.fall_speed * item.kind.speed_mult;
        assert_eq!(item.fall_speed, expected);
    }

    #[test]
    fn rare_fraction_converges_to_ten_percent() {
        let mut rng = Pcg32::seed_from_u64(42);
        let draws = 10_000;
        let rare = (0..draws)
            .filter(|_| pick_kind(&mut rng).rare)
            .count();
        let fraction = rare as f64 / draws as f64;
        assert!(
            (0.08..=0.12).contains(&fraction),
            "rare fraction {fraction} outside tolerance"
        );
    }

    #[test]
    fn pick_kind_draws_common_kinds_uniformly() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut counts = std::collections::HashMap::new();
        for _ in 0..10_000 {
            let kind = pick_kind(&mut rng);
            *counts.entry(kind.name).or_insert(0u32) += 1;
        }
        // All five kinds show up; each common kind gets roughly (0.9/4)
        for kind in ITEM_KINDS.iter() {
            let n = counts.get(kind.name).copied().unwrap_or(0);
            assert!(n > 0, "{} never drawn", kind.name);
            if !kind.rare {
                assert!((1500..3000).contains(&n), "{}: {}", kind.name, n);
            }
        }
    }

    #[test]
    fn catching_fruit_scores_once() {
        let mut state = playing_state(6);
        plant_item(&mut state, kind_by_name("apple"));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, SCORE_FRUIT);
        // The item was removed on catch; another tick cannot re-score it
        assert!(state.items.iter().all(|i| i.fall_speed != 0.0));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, SCORE_FRUIT);
    }

    #[test]
    fn catching_bomb_deducts_score() {
        let mut state = playing_state(7);
        plant_item(&mut state, kind_by_name("bomb"));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, SCORE_BAD);
        assert!(state.score < 0, "score has no floor");
    }

    #[test]
    fn win_transition_at_threshold() {
        let mut state = playing_state(8);
        state.score = WIN_SCORE - SCORE_FRUIT / 2;
        plant_item(&mut state, kind_by_name("apple"));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, WIN_SCORE + SCORE_FRUIT / 2);
        assert_eq!(state.phase, GamePhase::GameOver { won: true });
    }

    #[test]
    fn below_threshold_stays_playing() {
        let mut state = playing_state(9);
        plant_item(&mut state, kind_by_name("orange"));
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, SCORE_FRUIT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn guava_activates_superpower() {
        let mut state = playing_state(10);
        plant_item(&mut state, kind_by_name("guava"));

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, SCORE_RARE);
        assert!(state.boost.active);
        assert!(state.player.boosted);
        assert_eq!(state.player.speed(), PLAYER_SPEED * BOOST_MULTIPLIER);
    }

    #[test]
    fn superpower_expires_after_duration() {
        let mut state = playing_state(11);
        plant_item(&mut state, kind_by_name("guava"));
        // Activation tick already counts toward the duration
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.boost.active);

        // One tick shy of 5.0s cumulative: still boosted
        for _ in 0..598 {
            update_boost(&mut state, SIM_DT);
        }
        assert!(state.boost.active);
        assert!(state.boost.remaining > 0.0);

        for _ in 0..2 {
            update_boost(&mut state, SIM_DT);
        }
        assert!(!state.boost.active);
        assert_eq!(state.boost.remaining, 0.0);
        assert!(!state.player.boosted);
        assert_eq!(state.player.speed(), PLAYER_SPEED);
    }

    #[test]
    fn reset_then_start_is_idempotent() {
        let mut state = playing_state(12);
        // Dirty the session
        for _ in 0..300 {
            tick(&mut state, &TickInput { direction: 1, ..Default::default() }, SIM_DT);
        }
        state.score = -40;

        let fresh = |state: &mut GameState| {
            tick(state, &TickInput { reset: true, ..Default::default() }, SIM_DT);
            tick(state, &TickInput { start: true, ..Default::default() }, SIM_DT);
            (
                state.score,
                state.time_ticks,
                state.spawn_timer,
                state.indicators.len(),
                state.items.len(),
                state.pending.len(),
                state.difficulty.clone(),
                state.boost,
                state.player.clone(),
            )
        };

        let first = fresh(&mut state);
        let second = fresh(&mut state);
        assert_eq!(first, second);
        assert_eq!(first.0, 0);
        assert_eq!(first.3, 0);
        assert_eq!(first.6, crate::sim::state::Difficulty::default());
    }

    #[test]
    fn negative_dt_does_not_corrupt_state() {
        let mut state = playing_state(13);
        tick(&mut state, &TickInput::default(), SIM_DT);

        let player_x = state.player.x;
        let spawn_timer = state.spawn_timer;
        let lives: Vec<f32> = state.indicators.iter().map(|i| i.life).collect();

        tick(&mut state, &TickInput { direction: 1, ..Default::default() }, -5.0);

        assert_eq!(state.player.x, player_x);
        assert_eq!(state.spawn_timer, spawn_timer);
        let lives_after: Vec<f32> = state.indicators.iter().map(|i| i.life).collect();
        assert_eq!(lives, lives_after);
    }

    #[test]
    fn out_of_range_direction_clamps_to_sign() {
        let mut a = playing_state(14);
        let mut b = playing_state(14);
        tick(&mut a, &TickInput { direction: 5, ..Default::default() }, SIM_DT);
        tick(&mut b, &TickInput { direction: 1, ..Default::default() }, SIM_DT);
        assert_eq!(a.player.x, b.player.x);
    }

    #[test]
    fn same_seed_same_inputs_same_run() {
        let mut a = playing_state(99_999);
        let mut b = playing_state(99_999);

        for i in 0..2_000u32 {
            let input = TickInput {
                direction: match i % 3 {
                    0 => -1,
                    1 => 0,
                    _ => 1,
                },
                ..Default::default()
            };
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.score, b.score);
        assert_eq!(a.player.x, b.player.x);
        assert_eq!(a.items.len(), b.items.len());
        assert_eq!(a.indicators.len(), b.indicators.len());
        for (x, y) in a.items.iter().zip(b.items.iter()) {
            assert_eq!(x.pos, y.pos);
            assert_eq!(x.kind.name, y.kind.name);
        }
    }

    #[test]
    fn idle_autopilot_chases_fruit_and_dodges_bombs() {
        let mut state = playing_state(15);

        // Fruit low and to the right: steer right
        let id = state.next_entity_id();
        state.items.push(FallingItem {
            id,
            kind: kind_by_name("apple"),
            pos: Vec2::new(state.player.x + 400.0, 800.0),
            fall_speed: 100.0,
            active: true,
        });
        assert_eq!(idle_direction(&state), 1);

        // Bomb about to land on us: dodging wins over chasing
        let id = state.next_entity_id();
        state.items.push(FallingItem {
            id,
            kind: kind_by_name("bomb"),
            pos: Vec2::new(state.player.x + 20.0, 900.0),
            fall_speed: 100.0,
            active: true,
        });
        assert_eq!(idle_direction(&state), -1);
    }
}
