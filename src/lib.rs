//! Orb Blast - dodge and shoot circles on a canvas
//!
//! Core modules:
//! - `sim`: Frame simulation (entities, collisions, spawning, game state)
//! - `renderer`: Drawing surface abstraction
//! - `platform`: Browser/native shells (loop handles, timers, headless runner)
//! - `highscores`: Single-value high score persistence
//! - `config`: Data-driven game tuning

pub mod config;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::GameConfig;
pub use highscores::{HighScoreStore, record_high_score};

use glam::Vec2;

/// Game configuration constants (defaults for [`GameConfig`])
pub mod consts {
    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 10.0;
    /// Pixels per millisecond while a direction key is held
    pub const PLAYER_SPEED: f32 = 1.0;
    /// Inset from every viewport edge the player can't cross
    pub const PLAYER_BOUND: f32 = 50.0;

    /// Shots travel at 1/1.5 px per ms
    pub const SHOT_SPEED: f32 = 1.0 / 1.5;
    /// Milliseconds between shots while fire is held
    pub const SHOT_INTERVAL_MS: f64 = 100.0;

    /// Particles travel at half a pixel per ms
    pub const PARTICLE_SPEED: f32 = 0.5;
    /// Alpha lost per tick
    pub const PARTICLE_FADE: f32 = 0.01;
    /// Radius lost per tick
    pub const PARTICLE_SHRINK: f32 = 0.001;
    pub const PARTICLE_MAX_RADIUS: f32 = 3.0;
    pub const MAX_PARTICLES: usize = 4096;

    /// Enemy defaults
    pub const ENEMY_RADIUS_MIN: f32 = 5.0;
    pub const ENEMY_RADIUS_MAX: f32 = 30.0;
    /// Units per tick toward the player
    pub const ENEMY_SPEED: f32 = 1.0;
    /// Width of the off-screen spawn band
    pub const ENEMY_SPAWN_BAND: f32 = 100.0;
    pub const ENEMY_SPAWN_INTERVAL_MS: f64 = 1000.0;
    /// Radius removed by one hit
    pub const ENEMY_HIT_SHRINK: f32 = 10.0;
    /// Enemies whose remaining radius would not exceed this die
    pub const ENEMY_KILL_RADIUS: f32 = 5.0;
    pub const ENEMY_SHRINK_DURATION_MS: f32 = 500.0;

    /// Gap under which two circles count as touching
    pub const CONTACT_GAP: f32 = 1.0;

    /// Overlay alpha painted each frame (motion trails)
    pub const TRAIL_ALPHA: f32 = 0.1;
    /// Largest frame delta fed to the simulation
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;
}

/// Angle (radians, standard `atan2(dy, dx)` convention) pointing from `from` to `to`
#[inline]
pub fn heading(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}
