//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Fixed intra-tick update order
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{HitBox, circle_box_overlap, player_hitbox};
pub use state::{
    Boost, Difficulty, FallingItem, GamePhase, GameState, Indicator, ItemKind, Player,
    SpawnIntent, ITEM_KINDS,
};
pub use tick::{TickInput, tick};
