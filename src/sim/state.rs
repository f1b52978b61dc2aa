//! Game state and input types
//!
//! One [`GameState`] per session. Everything the frame driver, the spawn
//! timers and the input listeners touch lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Enemy, Particle, Player, Rgb, Shot};
use super::spawn;
use crate::config::GameConfig;

/// Drawable area in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Player movement directions (screen space, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn unit(&self) -> Vec2 {
        match self {
            Direction::Up => Vec2::NEG_Y,
            Direction::Down => Vec2::Y,
            Direction::Left => Vec2::NEG_X,
            Direction::Right => Vec2::X,
        }
    }

    /// Map a keyboard key name (`KeyboardEvent.key`) to a direction
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "w" | "W" | "ArrowUp" => Some(Direction::Up),
            "s" | "S" | "ArrowDown" => Some(Direction::Down),
            "a" | "A" | "ArrowLeft" => Some(Direction::Left),
            "d" | "D" | "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }
}

/// Live input: held keys, pointer, fire button
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputState {
    /// Held directions in press order, no duplicates
    held: Vec<Direction>,
    /// Last known pointer position
    pub pointer: Vec2,
    /// Fire button is down
    pub firing: bool,
}

impl InputState {
    pub fn press(&mut self, direction: Direction) {
        if !self.held.contains(&direction) {
            self.held.push(direction);
        }
    }

    pub fn release(&mut self, direction: Direction) {
        self.held.retain(|d| *d != direction);
    }

    pub fn held(&self) -> &[Direction] {
        &self.held
    }

    /// Drop every held key and stop firing (window blur, restart)
    pub fn clear(&mut self) {
        self.held.clear();
        self.firing = false;
    }
}

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Player was touched; terminal
    GameOver,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub config: GameConfig,
    pub viewport: Viewport,
    pub phase: GamePhase,
    /// Enemies destroyed this session
    pub score: u64,
    pub player: Player,
    pub shots: Vec<Shot>,
    pub particles: Vec<Particle>,
    pub enemies: Vec<Enemy>,
    pub input: InputState,
    /// Timestamp of the previous frame (ms)
    pub last_frame_ms: Option<f64>,
    /// Frames simulated so far
    pub frames: u64,
    rng: Pcg32,
}

impl GameState {
    /// Start a session with the player centred in `viewport`
    pub fn new(seed: u64, viewport: Viewport, config: GameConfig) -> Self {
        Self {
            seed,
            player: Player::new(viewport, &config),
            config,
            viewport,
            phase: GamePhase::Playing,
            score: 0,
            shots: Vec::new(),
            particles: Vec::new(),
            enemies: Vec::new(),
            input: InputState::default(),
            last_frame_ms: None,
            frames: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Track a new drawing surface size
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
        self.player.clamp_to(self.viewport);
    }

    /// Enemy spawn timer callback
    pub fn spawn_enemy(&mut self) {
        if self.is_over() {
            return;
        }
        let enemy = spawn::spawn_enemy(&mut self.rng, self.viewport, &self.config);
        log::debug!(
            "Enemy spawned at ({:.0}, {:.0}) r={:.1}",
            enemy.circle.pos.x,
            enemy.circle.pos.y,
            enemy.circle.radius
        );
        self.enemies.push(enemy);
    }

    /// Shot timer callback: fire from the player at the current pointer
    pub fn fire_shot(&mut self) {
        if self.is_over() {
            return;
        }
        let shot = Shot::fire(&self.player, self.input.pointer, self.config.shot_speed);
        self.shots.push(shot);
    }

    /// Release a burst of `count` particles, truncated at the particle cap.
    /// Returns how many were actually added.
    pub fn spawn_particles(&mut self, origin: Vec2, color: Rgb, count: usize) -> usize {
        let room = self.config.max_particles.saturating_sub(self.particles.len());
        let count = if count > room {
            log::debug!("Particle cap reached, burst of {} cut to {}", count, room);
            room
        } else {
            count
        };
        let burst = spawn::particle_burst(
            &mut self.rng,
            origin,
            color,
            count,
            self.viewport,
            &self.config,
        );
        self.particles.extend(burst);
        count
    }

    /// Enter the terminal phase. Returns the final score the first time only.
    pub fn end_game(&mut self) -> Option<u64> {
        if self.is_over() {
            return None;
        }
        self.phase = GamePhase::GameOver;
        self.input.clear();
        log::info!("Game over: score {} after {} frames", self.score, self.frames);
        Some(self.score)
    }
}
