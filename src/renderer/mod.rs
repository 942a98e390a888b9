//! Canvas2D placeholder-shape renderer
//!
//! Draws the 1920x1080 logical field letterboxed into the canvas element.
//! Reads simulation state and never mutates it; cosmetic-only state (the
//! superpower ghost trail) lives here, not in the sim.

use std::f64::consts::TAU;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::consts::*;
use crate::sim::GameState;

const SKY_COLOR: &str = "#1099bb";
const GROUND_COLOR: &str = "#5d4037";
const BORDER_COLOR: &str = "#ffffff";
const PLAYER_COLOR: &str = "#3498db";
const BOOST_TINT: &str = "#ffff00";
const INDICATOR_COLOR: &str = "#ffaa00";
const INDICATOR_RARE_COLOR: &str = "#ffd700";

/// Indicator ring geometry (drawn just below the top edge)
const INDICATOR_Y: f64 = 40.0;
const INDICATOR_RADIUS: f64 = 25.0;

/// Trail ghosts fade at this rate per second (0.05 alpha per 60 Hz frame)
const TRAIL_FADE_RATE: f32 = 3.0;

/// A fading afterimage of the player, spawned while boosted and moving
struct TrailGhost {
    x: f32,
    alpha: f32,
}

/// Renders the game into a 2D canvas context
pub struct CanvasRenderer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    trail: Vec<TrailGhost>,
    last_player_x: f32,
}

fn css_color(color: u32) -> String {
    format!("#{color:06x}")
}

impl CanvasRenderer {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Self {
            canvas,
            ctx,
            trail: Vec::new(),
            last_player_x: 0.0,
        })
    }

    /// Draw one frame
    pub fn render(&mut self, state: &GameState, dt: f32, trails_enabled: bool) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        let field_w = FIELD_WIDTH as f64;
        let field_h = FIELD_HEIGHT as f64;

        // Letterbox: scale the logical field to fit, centered
        let scale = (w / field_w).min(h / field_h);
        let offset_x = (w - field_w * scale) / 2.0;
        let offset_y = (h - field_h * scale) / 2.0;

        let ctx = self.ctx.clone();
        let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
        ctx.set_global_alpha(1.0);
        ctx.set_fill_style_str("#000000");
        ctx.fill_rect(0.0, 0.0, w, h);

        let _ = ctx.translate(offset_x, offset_y);
        let _ = ctx.scale(scale, scale);

        // Backdrop and ground
        ctx.set_fill_style_str(SKY_COLOR);
        ctx.fill_rect(0.0, 0.0, field_w, field_h);
        ctx.set_fill_style_str(GROUND_COLOR);
        ctx.fill_rect(
            0.0,
            (FIELD_HEIGHT - GROUND_HEIGHT) as f64,
            field_w,
            GROUND_HEIGHT as f64,
        );

        self.update_trail(state, dt, trails_enabled);
        self.draw_trail(&ctx);
        self.draw_player(&ctx, state);
        self.draw_items(&ctx, state);
        self.draw_indicators(&ctx, state);

        // Field border
        ctx.set_global_alpha(1.0);
        ctx.set_stroke_style_str(BORDER_COLOR);
        ctx.set_line_width(4.0);
        ctx.stroke_rect(0.0, 0.0, field_w, field_h);

        let _ = ctx.set_transform(1.0, 0.0, 0.0, 1.0, 0.0, 0.0);
    }

    /// Spawn a ghost while boosted and moving; fade and cull the rest
    fn update_trail(&mut self, state: &GameState, dt: f32, trails_enabled: bool) {
        let moving = state.player.x != self.last_player_x;
        self.last_player_x = state.player.x;

        if trails_enabled && state.player.boosted && moving {
            self.trail.push(TrailGhost {
                x: state.player.x,
                alpha: 0.5,
            });
        }

        for ghost in &mut self.trail {
            ghost.alpha -= TRAIL_FADE_RATE * dt;
        }
        self.trail.retain(|ghost| ghost.alpha > 0.0);
    }

    fn draw_trail(&self, ctx: &CanvasRenderingContext2d) {
        let y = (FIELD_HEIGHT - GROUND_HEIGHT - PLAYER_SIZE) as f64;
        let size = PLAYER_SIZE as f64;
        ctx.set_fill_style_str(BOOST_TINT);
        for ghost in &self.trail {
            ctx.set_global_alpha(ghost.alpha as f64);
            ctx.fill_rect(ghost.x as f64 - size / 2.0, y, size, size);
        }
        ctx.set_global_alpha(1.0);
    }

    fn draw_player(&self, ctx: &CanvasRenderingContext2d, state: &GameState) {
        let player = &state.player;
        let size = PLAYER_SIZE as f64;
        let color = if player.boosted { BOOST_TINT } else { PLAYER_COLOR };
        ctx.set_fill_style_str(color);
        // Sprite anchored bottom-center
        ctx.fill_rect(
            player.x as f64 - size / 2.0,
            player.y as f64 - size,
            size,
            size,
        );
    }

    fn draw_items(&self, ctx: &CanvasRenderingContext2d, state: &GameState) {
        for item in &state.items {
            ctx.set_fill_style_str(&css_color(item.kind.color));
            ctx.begin_path();
            let _ = ctx.arc(
                item.pos.x as f64,
                item.pos.y as f64,
                item.radius() as f64,
                0.0,
                TAU,
            );
            ctx.fill();
        }
    }

    fn draw_indicators(&self, ctx: &CanvasRenderingContext2d, state: &GameState) {
        ctx.set_line_width(4.0);
        for indicator in &state.indicators {
            let color = if indicator.kind.rare {
                INDICATOR_RARE_COLOR
            } else {
                INDICATOR_COLOR
            };
            ctx.set_stroke_style_str(color);
            ctx.set_global_alpha(indicator.blink_alpha().clamp(0.0, 1.0) as f64);
            ctx.begin_path();
            let _ = ctx.arc(
                indicator.x as f64,
                INDICATOR_Y,
                INDICATOR_RADIUS,
                0.0,
                TAU,
            );
            ctx.stroke();
        }
        ctx.set_global_alpha(1.0);
    }
}
