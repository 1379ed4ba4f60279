//! Game configuration and launch tuning
//!
//! Persisted as JSON in LocalStorage on the web; every field has a default so
//! partial documents are accepted.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{BALL_RADIUS, BASE_WIDTH};

/// Out-of-bounds margin used by the current game
pub const OUT_OF_BOUNDS_MARGIN: f32 = 10.0;
/// Wider margin from the first playable build
pub const WIDE_OUT_OF_BOUNDS_MARGIN: f32 = 50.0;
/// Drag distance (screen px) to launch force
pub const LAUNCH_FORCE_MULTIPLIER: f32 = 0.0003;
/// Drag distance (screen px) to forecast force
pub const FORECAST_FORCE_SCALE: f32 = 0.57;
/// Ball texture shipped with the page
pub const BALL_SPRITE: &str = "assets/basketball.png";

/// Configuration problems detected while loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{field} must be within [0, 1], got ({x}, {y})")]
    FractionOutOfRange { field: &'static str, x: f32, y: f32 },
    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },
}

/// Arena layout options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorldConfig {
    /// Ball spawn point as a fraction of the playfield (x from left, y from bottom)
    pub ball_entry: (f32, f32),
    pub ball_radius: f32,
    /// Ball texture path; `None` draws a plain ball
    pub sprite: Option<String>,
    /// Target position as a fraction of the playfield (from top-left)
    pub target_entry: (f32, f32),
    /// Playfield size in world units
    pub playfield: (f32, f32),
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            ball_entry: (0.5, 0.5),
            ball_radius: BALL_RADIUS,
            sprite: None,
            target_entry: (0.9, 0.2),
            playfield: (BASE_WIDTH, BASE_WIDTH),
        }
    }
}

impl WorldConfig {
    pub fn ball_entry(&self) -> Vec2 {
        Vec2::new(self.ball_entry.0, self.ball_entry.1)
    }

    pub fn target_entry(&self) -> Vec2 {
        Vec2::new(self.target_entry.0, self.target_entry.1)
    }

    pub fn playfield(&self) -> Vec2 {
        Vec2::new(self.playfield.0, self.playfield.1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fraction("ballEntry", self.ball_entry)?;
        check_fraction("targetEntry", self.target_entry)?;
        check_positive("ballRadius", self.ball_radius)?;
        check_positive("playfield.width", self.playfield.0)?;
        check_positive("playfield.height", self.playfield.1)?;
        Ok(())
    }
}

/// Launch and forecast constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LaunchTuning {
    /// Drag delta to applied force
    pub force_multiplier: f32,
    /// Drag delta to forecast force (independent of `force_multiplier`)
    pub forecast_force_scale: f32,
    /// Forecast gravity; negative pulls toward +y (down) in the forecast
    pub forecast_gravity: f32,
    pub forecast_steps: u32,
    pub forecast_time_step: f32,
    pub forecast_dot_radius: f32,
    /// Slack beyond the playfield edge before the ball respawns
    pub out_of_bounds_margin: f32,
}

impl Default for LaunchTuning {
    fn default() -> Self {
        Self {
            force_multiplier: LAUNCH_FORCE_MULTIPLIER,
            forecast_force_scale: FORECAST_FORCE_SCALE,
            forecast_gravity: -9.81,
            forecast_steps: 15,
            forecast_time_step: 0.5,
            forecast_dot_radius: 3.0,
            out_of_bounds_margin: OUT_OF_BOUNDS_MARGIN,
        }
    }
}

impl LaunchTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("forceMultiplier", self.force_multiplier)?;
        check_positive("forecastForceScale", self.forecast_force_scale)?;
        check_positive("forecastSteps", self.forecast_steps as f32)?;
        check_positive("forecastTimeStep", self.forecast_time_step)?;
        check_positive("forecastDotRadius", self.forecast_dot_radius)?;
        if self.out_of_bounds_margin < 0.0 {
            return Err(ConfigError::Negative {
                field: "outOfBoundsMargin",
                value: self.out_of_bounds_margin,
            });
        }
        Ok(())
    }
}

/// Sound preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AudioSettings {
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }
}

/// Everything the game shell needs at startup
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameConfig {
    pub world: WorldConfig,
    pub tuning: LaunchTuning,
    pub audio: AudioSettings,
    /// Presence relay address (e.g. `ws://localhost:3000`); `None` stays offline
    pub presence_url: Option<String>,
}

impl GameConfig {
    /// Setup of the shipped page: basketball near the bottom-left corner
    pub fn page_default() -> Self {
        let mut config = Self::default();
        config.world.ball_entry = (0.1, 0.1);
        config.world.sprite = Some(BALL_SPRITE.to_string());
        config
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.validate()?;
        self.tuning.validate()
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tinyball_config";

    /// Load config from LocalStorage, falling back to `fallback` (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load(fallback: Self) -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {}", e),
                }
            }
        }

        log::info!("Using default config");
        fallback
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(fallback: Self) -> Self {
        fallback
    }
}

fn check_fraction(field: &'static str, (x, y): (f32, f32)) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&x) && (0.0..=1.0).contains(&y) {
        Ok(())
    } else {
        Err(ConfigError::FractionOutOfRange { field, x, y })
    }
}

fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}
