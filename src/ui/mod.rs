//! DOM HUD and screen overlays
//!
//! The sim exposes score, superpower countdown and session phase; this glue
//! mirrors them into the page's HUD elements and toggles the start and
//! game-over overlays. All lookups are by element id so a missing element
//! degrades to a no-op.

use web_sys::Document;

use crate::sim::{GamePhase, GameState};

/// Updates HUD text and screen visibility from game state
pub struct Hud {
    document: Document,
}

impl Hud {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    pub fn update(&self, state: &GameState, fps: u32, show_fps: bool) {
        self.set_text("#hud-score .hud-value", &state.score.to_string());

        // FPS counter
        if let Some(el) = self.document.get_element_by_id("hud-fps") {
            if show_fps {
                let _ = el.set_attribute("class", "hud-item");
                self.set_text("#hud-fps .hud-value", &fps.to_string());
            } else {
                let _ = el.set_attribute("class", "hud-item hidden");
            }
        }

        // Superpower countdown
        if let Some(el) = self.document.get_element_by_id("superpower") {
            if state.boost.active {
                let _ = el.set_attribute("class", "hud-item");
                self.set_text(
                    "#superpower .hud-value",
                    &format!("{:.1}", state.boost.remaining.max(0.0)),
                );
            } else {
                let _ = el.set_attribute("class", "hud-item hidden");
            }
        }

        self.set_hidden("start-screen", state.phase != GamePhase::Menu);

        // Game over / win overlay
        if let Some(el) = self.document.get_element_by_id("game-over") {
            match state.phase {
                GamePhase::GameOver { won } => {
                    let _ = el.set_attribute("class", "");
                    if let Some(title) = self.document.get_element_by_id("game-over-title") {
                        title.set_text_content(Some(if won { "You Win!" } else { "Game Over" }));
                    }
                    if let Some(score_el) = self.document.get_element_by_id("final-score") {
                        score_el.set_text_content(Some(&state.score.to_string()));
                    }
                }
                _ => {
                    let _ = el.set_attribute("class", "hidden");
                }
            }
        }
    }

    fn set_text(&self, selector: &str, text: &str) {
        if let Some(el) = self.document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(&self, id: &str, hidden: bool) {
        if let Some(el) = self.document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if hidden { "hidden" } else { "" });
        }
    }
}
