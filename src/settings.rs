//! Game settings and preferences
//!
//! Persisted to LocalStorage on the web build; defaults everywhere else.

use serde::{Deserialize, Serialize};

/// Player preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Show FPS counter in the HUD
    pub show_fps: bool,
    /// Ghost trail while the superpower is active
    pub trails: bool,

    // === Tilt steering (mobile) ===
    /// Degrees of tilt ignored around level
    pub tilt_dead_zone: f32,
    /// Degrees of tilt treated as full deflection
    pub tilt_max_angle: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_fps: true,
            trails: true,
            tilt_dead_zone: 5.0,
            tilt_max_angle: 20.0,
        }
    }
}

impl Settings {
    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "fruit_fall_settings";

    /// Tilt angle (degrees) to a steering direction in {-1, 0, 1}
    ///
    /// Keyboard input takes priority over tilt in the driver; this only maps
    /// the analog reading once it is the active source.
    pub fn tilt_to_direction(&self, tilt_degrees: f32) -> i8 {
        let magnitude = tilt_degrees.abs();
        if magnitude < self.tilt_dead_zone {
            return 0;
        }
        let span = (self.tilt_max_angle - self.tilt_dead_zone).max(f32::EPSILON);
        let value = ((magnitude - self.tilt_dead_zone) / span).clamp(0.0, 1.0);
        if value < 0.3 {
            0
        } else if tilt_degrees > 0.0 {
            1
        } else {
            -1
        }
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Ok(settings) = serde_json::from_str(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
