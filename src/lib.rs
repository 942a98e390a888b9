//! Fruit Fall - a falling-fruit catching arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, session state)
//! - `renderer`: Canvas2D placeholder-shape rendering (wasm only)
//! - `ui`: DOM HUD and screen overlays (wasm only)
//! - `settings`: Player preferences persisted to LocalStorage

#[cfg(target_arch = "wasm32")]
pub mod renderer;
pub mod settings;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod ui;

pub use settings::Settings;

/// Game configuration constants
///
/// Fixed at process start; the only values derived from these at runtime are
/// the difficulty ramp's current spawn interval and fall speed.
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth catches)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Logical field dimensions; rendering scales to fit the window
    pub const FIELD_WIDTH: f32 = 1920.0;
    pub const FIELD_HEIGHT: f32 = 1080.0;
    /// Ground strip the player stands on
    pub const GROUND_HEIGHT: f32 = 40.0;

    /// Player sprite is square, anchored bottom-center
    pub const PLAYER_SIZE: f32 = 180.0;
    pub const PLAYER_SPEED: f32 = 800.0;
    /// Speed multiplier while the superpower is active
    pub const BOOST_MULTIPLIER: f32 = 2.5;
    /// Superpower duration in seconds
    pub const BOOST_DURATION: f32 = 5.0;

    /// Falling item sprite width (items collide as circles of half this)
    pub const ITEM_SIZE: f32 = 50.0;
    pub const ITEM_FALL_SPEED_BASE: f32 = 1200.0;
    /// Items spawn this far above the field and despawn this far below it
    pub const ITEM_DESPAWN_MARGIN: f32 = 50.0;

    /// Spawning
    pub const SPAWN_INTERVAL_BASE: f32 = 0.6;
    /// Keep spawn positions away from the field edges
    pub const SPAWN_MARGIN: f32 = 100.0;
    /// Warning blink shown before each item drops
    pub const INDICATOR_DURATION: f32 = 0.8;
    /// Collective probability mass of the rare kinds per spawn
    pub const RARE_CHANCE: f32 = 0.1;

    /// Difficulty ramps on a fixed wall-clock cadence
    pub const RAMP_PERIOD: f32 = 30.0;
    pub const SPAWN_INTERVAL_FACTOR: f32 = 0.9;
    pub const SPAWN_INTERVAL_MIN: f32 = 0.4;
    pub const FALL_SPEED_FACTOR: f32 = 1.1;
    pub const FALL_SPEED_MAX: f32 = 1000.0;

    /// Scoring
    pub const SCORE_FRUIT: i32 = 10;
    pub const SCORE_BAD: i32 = -5;
    pub const SCORE_RARE: i32 = 50;
    /// Reaching this score wins the run
    pub const WIN_SCORE: i32 = 300;

    /// Hitbox size relative to the player sprite
    pub const HITBOX_SCALE: f32 = 0.6;
}
