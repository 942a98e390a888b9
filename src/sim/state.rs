//! Game state and core simulation types
//!
//! Everything the simulation mutates lives here; `tick` drives it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::*;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Start screen, simulation idle
    Menu,
    /// Active gameplay
    Playing,
    /// Run ended; `won` is set when the score threshold was reached
    GameOver { won: bool },
}

/// One entry of the falling-item catalog
///
/// Kinds are tagged data, not behavior: a single [`FallingItem`] type covers
/// all of them, parameterized by its catalog entry.
#[derive(Debug, PartialEq)]
pub struct ItemKind {
    pub name: &'static str,
    /// Flat render color (0xRRGGBB)
    pub color: u32,
    /// Beneficial to catch
    pub fruit: bool,
    /// Drawn from the rare pool (fixed 10% collective chance)
    pub rare: bool,
    /// Catching this kind activates the speed superpower
    pub grants_boost: bool,
    /// Fall-speed multiplier on top of the current difficulty speed
    pub speed_mult: f32,
    /// Score delta applied on catch
    pub score: i32,
}

/// Process-wide item catalog, never mutated
pub static ITEM_KINDS: [ItemKind; 5] = [
    ItemKind {
        name: "apple",
        color: 0xe74c3c,
        fruit: true,
        rare: false,
        grants_boost: false,
        speed_mult: 1.0,
        score: SCORE_FRUIT,
    },
    ItemKind {
        name: "banana",
        color: 0xf1c40f,
        fruit: true,
        rare: false,
        grants_boost: false,
        speed_mult: 1.0,
        score: SCORE_FRUIT,
    },
    ItemKind {
        name: "orange",
        color: 0xe67e22,
        fruit: true,
        rare: false,
        grants_boost: false,
        speed_mult: 1.0,
        score: SCORE_FRUIT,
    },
    ItemKind {
        name: "bomb",
        color: 0x2c3e50,
        fruit: false,
        rare: false,
        grants_boost: false,
        // Bad items fall faster
        speed_mult: 1.5,
        score: SCORE_BAD,
    },
    ItemKind {
        name: "guava",
        color: 0x8bc34a,
        fruit: true,
        rare: true,
        grants_boost: true,
        speed_mult: 1.0,
        score: SCORE_RARE,
    },
];

/// The player-controlled catcher
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Horizontal center; vertical position is fixed on the ground
    pub x: f32,
    pub y: f32,
    /// Superpower speed/tint flag (renderer reads this for the gold tint)
    pub boosted: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            x: FIELD_WIDTH / 2.0,
            y: FIELD_HEIGHT - GROUND_HEIGHT,
            boosted: false,
        }
    }
}

impl Player {
    /// Sprite half-width, used for field clamping
    pub fn half_width(&self) -> f32 {
        PLAYER_SIZE / 2.0
    }

    /// Current horizontal speed in px/s
    pub fn speed(&self) -> f32 {
        if self.boosted {
            PLAYER_SPEED * BOOST_MULTIPLIER
        } else {
            PLAYER_SPEED
        }
    }

    /// Move by `direction` (-1, 0 or 1) for `dt` seconds, clamped to the field
    pub fn advance(&mut self, dt: f32, direction: f32) {
        if direction == 0.0 {
            return;
        }
        self.x += direction * self.speed() * dt;

        let half = self.half_width();
        self.x = self.x.clamp(half, FIELD_WIDTH - half);
    }

    pub fn set_boost(&mut self, active: bool) {
        self.boosted = active;
    }
}

/// A blinking warning shown at the x position where an item is about to drop
#[derive(Debug, Clone)]
pub struct Indicator {
    pub kind: &'static ItemKind,
    pub x: f32,
    /// Remaining lifetime in seconds
    pub life: f32,
    /// Total lifetime, kept for blink-rate interpolation
    pub max_life: f32,
}

impl Indicator {
    pub fn new(kind: &'static ItemKind, x: f32, duration: f32) -> Self {
        Self {
            kind,
            x,
            life: duration,
            max_life: duration,
        }
    }

    /// Count down; the indicator is removed once expired
    pub fn advance(&mut self, dt: f32) {
        self.life -= dt;
    }

    pub fn expired(&self) -> bool {
        self.life <= 0.0
    }

    /// Remaining life normalized to [0, 1]
    pub fn normalized_life(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }

    /// Blink alpha for rendering; the blink accelerates as time runs out
    pub fn blink_alpha(&self) -> f32 {
        let progress = 1.0 - self.normalized_life();
        let blink_speed = 10.0 + progress * 20.0;
        0.5 + (self.life * blink_speed).sin() * 0.5
    }
}

/// A queued (position, kind) pair awaiting materialization into a live item
#[derive(Debug, Clone)]
pub struct SpawnIntent {
    pub kind: &'static ItemKind,
    pub x: f32,
    /// Seconds until the item appears (the indicator's full duration)
    pub delay: f32,
}

/// A live falling item
#[derive(Debug, Clone)]
pub struct FallingItem {
    pub id: u32,
    pub kind: &'static ItemKind,
    pub pos: Vec2,
    /// Effective descent speed, fixed at materialization time
    pub fall_speed: f32,
    /// Cleared on catch or when the item leaves the field
    pub active: bool,
}

impl FallingItem {
    pub fn new(id: u32, kind: &'static ItemKind, x: f32, fall_speed: f32) -> Self {
        Self {
            id,
            kind,
            pos: Vec2::new(x, -ITEM_DESPAWN_MARGIN),
            fall_speed,
            active: true,
        }
    }

    /// Collision radius (items collide as circles)
    pub fn radius(&self) -> f32 {
        ITEM_SIZE / 2.0
    }

    /// Descend; deactivates without scoring once below the field margin
    pub fn advance(&mut self, dt: f32) {
        if !self.active {
            return;
        }
        self.pos.y += self.fall_speed * dt;
        if self.pos.y > FIELD_HEIGHT + ITEM_DESPAWN_MARGIN {
            self.active = false;
        }
    }
}

/// Spawn-rate and fall-speed ramp state
///
/// The ramp is saturating and monotonic: the interval only shrinks down to
/// its floor, the speed only grows up to its ceiling.
#[derive(Debug, Clone, PartialEq)]
pub struct Difficulty {
    pub spawn_interval: f32,
    pub fall_speed: f32,
    ramp_timer: f32,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self {
            spawn_interval: SPAWN_INTERVAL_BASE,
            fall_speed: ITEM_FALL_SPEED_BASE,
            ramp_timer: 0.0,
        }
    }
}

impl Difficulty {
    /// Accumulate elapsed time and ramp every `RAMP_PERIOD` seconds
    pub fn advance(&mut self, dt: f32) {
        self.ramp_timer += dt;
        if self.ramp_timer > RAMP_PERIOD {
            self.ramp_timer = 0.0;
            self.spawn_interval = (self.spawn_interval * SPAWN_INTERVAL_FACTOR).max(SPAWN_INTERVAL_MIN);
            self.fall_speed = (self.fall_speed * FALL_SPEED_FACTOR).min(FALL_SPEED_MAX);
            log::debug!(
                "difficulty up: interval {:.2}s, fall speed {:.0} px/s",
                self.spawn_interval,
                self.fall_speed
            );
        }
    }
}

/// Superpower countdown state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Boost {
    pub active: bool,
    /// Remaining seconds, exposed for the HUD countdown
    pub remaining: f32,
}

/// Complete game state
///
/// Owns every mutable piece of the simulation: the player, the live
/// indicator/item sets, the pending-spawn queue and the seeded RNG. Runs are
/// reproducible from the seed and the input sequence.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    pub phase: GamePhase,
    /// No floor: penalty items can push this negative
    pub score: i32,
    /// Ticks since the current run started
    pub time_ticks: u64,
    /// Seconds until the next indicator is emitted
    pub spawn_timer: f32,
    pub player: Player,
    pub indicators: Vec<Indicator>,
    pub items: Vec<FallingItem>,
    /// Queued spawns waiting out their indicator delay
    pub pending: Vec<SpawnIntent>,
    pub difficulty: Difficulty,
    pub boost: Boost,
    next_id: u32,
}

impl GameState {
    /// Create a fresh state at the menu with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            score: 0,
            time_ticks: 0,
            spawn_timer: 0.0,
            player: Player::default(),
            indicators: Vec::new(),
            items: Vec::new(),
            pending: Vec::new(),
            difficulty: Difficulty::default(),
            boost: Boost::default(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn rng_mut(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Begin a run: wipe the previous session and enter `Playing`
    pub fn start_run(&mut self) {
        self.clear_run();
        self.phase = GamePhase::Playing;
        log::info!("run started (seed {})", self.seed);
    }

    /// Return to the menu, discarding all in-flight indicators/items/intents
    pub fn reset_to_menu(&mut self) {
        self.clear_run();
        self.phase = GamePhase::Menu;
    }

    fn clear_run(&mut self) {
        self.score = 0;
        self.time_ticks = 0;
        self.spawn_timer = 0.0;
        self.player = Player::default();
        self.indicators.clear();
        self.items.clear();
        self.pending.clear();
        self.difficulty = Difficulty::default();
        self.boost = Boost::default();
    }
}
