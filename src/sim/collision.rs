//! Overlap testing between the player's catch hitbox and falling items
//!
//! Items are treated as circles, the player as an axis-aligned box shrunk to
//! 60% of the sprite. The overlap check compares each axis independently
//! instead of doing a true circle-rectangle distance test; that makes corner
//! hits more generous, and the game's balance is tuned around it, so it must
//! not be "corrected" to the exact test.

use glam::Vec2;

use super::state::Player;
use crate::consts::*;

/// Axis-aligned catch hitbox
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitBox {
    pub center: Vec2,
    pub half_w: f32,
    pub half_h: f32,
}

/// The player's hitbox: centered on the sprite, scaled down so near-misses
/// at the sprite edges don't count as catches
pub fn player_hitbox(player: &Player) -> HitBox {
    let half = PLAYER_SIZE * HITBOX_SCALE / 2.0;
    HitBox {
        // Sprite is anchored bottom-center; the box sits over its middle
        center: Vec2::new(player.x, player.y - PLAYER_SIZE / 2.0),
        half_w: half,
        half_h: half,
    }
}

/// Per-axis circle-vs-box overlap
pub fn circle_box_overlap(center: Vec2, radius: f32, hitbox: &HitBox) -> bool {
    let dx = (center.x - hitbox.center.x).abs();
    let dy = (center.y - hitbox.center.y).abs();
    dx < radius + hitbox.half_w && dy < radius + hitbox.half_h
}
