//! Game tuning
//!
//! Every number the simulation uses lives here so a session can be tuned
//! without touching code. Persisted as JSON: LocalStorage on web, a file
//! named by `ORB_BLAST_CONFIG` on native.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Rgb;

/// Why a tuning document was rejected
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Player ===
    pub player_radius: f32,
    pub player_color: Rgb,
    /// Pixels per millisecond per held key
    pub player_speed: f32,
    /// Inset from the viewport edges
    pub player_bound: f32,

    // === Shots ===
    /// Pixels per millisecond
    pub shot_speed: f32,
    pub shot_interval_ms: f64,

    // === Particles ===
    pub particle_speed: f32,
    pub particle_fade: f32,
    pub particle_shrink: f32,
    pub particle_max_radius: f32,
    /// Hard cap on live particles
    pub max_particles: usize,

    // === Enemies ===
    pub enemy_radius_min: f32,
    pub enemy_radius_max: f32,
    /// Units per tick
    pub enemy_speed: f32,
    pub enemy_spawn_band: f32,
    pub enemy_spawn_interval_ms: f64,
    pub enemy_hit_shrink: f32,
    pub enemy_kill_radius: f32,
    pub enemy_shrink_duration_ms: f32,

    // === Frame ===
    pub trail_alpha: f32,
    pub max_frame_delta_ms: f64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player_radius: PLAYER_RADIUS,
            player_color: Rgb::WHITE,
            player_speed: PLAYER_SPEED,
            player_bound: PLAYER_BOUND,

            shot_speed: SHOT_SPEED,
            shot_interval_ms: SHOT_INTERVAL_MS,

            particle_speed: PARTICLE_SPEED,
            particle_fade: PARTICLE_FADE,
            particle_shrink: PARTICLE_SHRINK,
            particle_max_radius: PARTICLE_MAX_RADIUS,
            max_particles: MAX_PARTICLES,

            enemy_radius_min: ENEMY_RADIUS_MIN,
            enemy_radius_max: ENEMY_RADIUS_MAX,
            enemy_speed: ENEMY_SPEED,
            enemy_spawn_band: ENEMY_SPAWN_BAND,
            enemy_spawn_interval_ms: ENEMY_SPAWN_INTERVAL_MS,
            enemy_hit_shrink: ENEMY_HIT_SHRINK,
            enemy_kill_radius: ENEMY_KILL_RADIUS,
            enemy_shrink_duration_ms: ENEMY_SHRINK_DURATION_MS,

            trail_alpha: TRAIL_ALPHA,
            max_frame_delta_ms: MAX_FRAME_DELTA_MS,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON tuning document (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would break simulation invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        let floats = [
            ("player_radius", self.player_radius),
            ("player_speed", self.player_speed),
            ("player_bound", self.player_bound),
            ("shot_speed", self.shot_speed),
            ("particle_speed", self.particle_speed),
            ("particle_fade", self.particle_fade),
            ("particle_shrink", self.particle_shrink),
            ("particle_max_radius", self.particle_max_radius),
            ("enemy_radius_min", self.enemy_radius_min),
            ("enemy_radius_max", self.enemy_radius_max),
            ("enemy_speed", self.enemy_speed),
            ("enemy_spawn_band", self.enemy_spawn_band),
            ("enemy_hit_shrink", self.enemy_hit_shrink),
            ("enemy_kill_radius", self.enemy_kill_radius),
            ("enemy_shrink_duration_ms", self.enemy_shrink_duration_ms),
            ("trail_alpha", self.trail_alpha),
        ];
        for (name, value) in floats {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and >= 0 (got {value})"
                )));
            }
        }

        let intervals = [
            ("shot_interval_ms", self.shot_interval_ms),
            ("enemy_spawn_interval_ms", self.enemy_spawn_interval_ms),
            ("max_frame_delta_ms", self.max_frame_delta_ms),
        ];
        for (name, value) in intervals {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and > 0 (got {value})"
                )));
            }
        }

        if self.enemy_radius_min >= self.enemy_radius_max {
            return Err(ConfigError::Invalid(format!(
                "enemy_radius_min ({}) must be below enemy_radius_max ({})",
                self.enemy_radius_min, self.enemy_radius_max
            )));
        }
        if self.trail_alpha > 1.0 {
            return Err(ConfigError::Invalid("trail_alpha must be <= 1".into()));
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "orb_blast_config";

    /// Load tuning from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded tuning from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored tuning: {}", e),
                }
            }
        }

        log::info!("Using default tuning");
        Self::default()
    }

    /// Load tuning from the file named by `ORB_BLAST_CONFIG` (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Ok(path) = std::env::var("ORB_BLAST_CONFIG") else {
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded tuning from {}", path);
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring tuning in {}: {}", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Can't read tuning file {}: {}", path, e);
                Self::default()
            }
        }
    }
}
