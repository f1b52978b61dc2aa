//! Entity types: player, shots, particles, enemies
//!
//! Every entity is a [`Circle`] plus its own movement rules. Drawing is shared
//! through [`Drawable`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Direction, Viewport};
use crate::config::GameConfig;
use crate::heading;
use crate::renderer::Drawable;

/// Opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `rgba(r, g, b, a)` for canvas fill styles
    pub fn to_css(&self, alpha: f32) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            alpha.clamp(0.0, 1.0)
        )
    }
}

/// Position, radius and color shared by every entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub pos: Vec2,
    pub radius: f32,
    pub color: Rgb,
}

impl Circle {
    pub fn new(pos: Vec2, radius: f32, color: Rgb) -> Self {
        Self { pos, radius, color }
    }
}

/// Negative or non-finite deltas move nothing
#[inline]
fn sanitize_delta(delta: f32) -> f32 {
    if delta.is_finite() { delta.max(0.0) } else { 0.0 }
}

/// Clamp one axis into `[inset, dim - inset]`, pinning to the centre when that range is empty
#[inline]
fn clamp_axis(value: f32, inset: f32, dim: f32) -> f32 {
    let lo = inset;
    let hi = dim - inset;
    if lo > hi { dim / 2.0 } else { value.clamp(lo, hi) }
}

/// The player's circle, moved by held direction keys
#[derive(Debug, Clone)]
pub struct Player {
    pub circle: Circle,
    /// Pixels per millisecond
    pub speed: f32,
    /// Margin kept from every viewport edge
    pub bound: f32,
}

impl Player {
    /// Spawn at the centre of the viewport
    pub fn new(viewport: Viewport, config: &GameConfig) -> Self {
        Self {
            circle: Circle::new(viewport.center(), config.player_radius, config.player_color),
            speed: config.player_speed,
            bound: config.player_bound,
        }
    }

    pub fn pos(&self) -> Vec2 {
        self.circle.pos
    }

    /// Move one step along `direction` and keep inside the bounded viewport
    pub fn update(&mut self, delta: f32, direction: Direction, viewport: Viewport) {
        let step = self.speed * sanitize_delta(delta);
        self.circle.pos += direction.unit() * step;
        self.clamp_to(viewport);
    }

    /// Pull the player back inside the viewport (after a resize, for instance)
    pub fn clamp_to(&mut self, viewport: Viewport) {
        let inset = self.bound + self.circle.radius;
        self.circle.pos.x = clamp_axis(self.circle.pos.x, inset, viewport.width);
        self.circle.pos.y = clamp_axis(self.circle.pos.y, inset, viewport.height);
    }
}

/// A projectile fired from the player toward a point
#[derive(Debug, Clone)]
pub struct Shot {
    pub circle: Circle,
    angle: f32,
    /// Pixels per millisecond
    speed: f32,
}

impl Shot {
    /// Fire from the player's centre at `target`; half the player's size, same color
    pub fn fire(player: &Player, target: Vec2, speed: f32) -> Self {
        let origin = player.pos();
        Self {
            circle: Circle::new(origin, player.circle.radius / 2.0, player.circle.color),
            angle: heading(origin, target),
            speed,
        }
    }

    /// Direction of travel, fixed at creation
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn velocity(&self) -> Vec2 {
        Vec2::from_angle(self.angle) * self.speed
    }

    pub fn update(&mut self, delta: f32) {
        self.circle.pos += self.velocity() * sanitize_delta(delta);
    }
}

/// A fading spark thrown out when an enemy is hit
#[derive(Debug, Clone)]
pub struct Particle {
    pub circle: Circle,
    angle: f32,
    speed: f32,
    /// 1 = opaque, 0 = gone
    pub alpha: f32,
    fade: f32,
    shrink: f32,
}

impl Particle {
    pub fn new(origin: Vec2, radius: f32, color: Rgb, target: Vec2, config: &GameConfig) -> Self {
        Self {
            circle: Circle::new(origin, radius.max(0.0), color),
            angle: heading(origin, target),
            speed: config.particle_speed,
            alpha: 1.0,
            fade: config.particle_fade,
            shrink: config.particle_shrink,
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Move, then fade and shrink by one tick's worth
    pub fn update(&mut self, delta: f32) {
        let velocity = Vec2::from_angle(self.angle) * self.speed;
        self.circle.pos += velocity * sanitize_delta(delta);
        self.circle.radius = (self.circle.radius - self.shrink).max(0.0);
        self.alpha = (self.alpha - self.fade).max(0.0);
    }

    /// Fully faded or shrunk away
    pub fn is_spent(&self) -> bool {
        self.alpha <= 0.0 || self.circle.radius <= 0.0
    }
}

/// Eased radius transition (quadratic ease-out)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusTween {
    pub from: f32,
    pub to: f32,
    elapsed_ms: f32,
    duration_ms: f32,
}

impl RadiusTween {
    pub fn new(from: f32, to: f32, duration_ms: f32) -> Self {
        Self {
            from,
            to,
            elapsed_ms: 0.0,
            duration_ms: duration_ms.max(0.0),
        }
    }

    /// Normalized progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    /// Current interpolated value
    pub fn value(&self) -> f32 {
        let t = self.progress();
        let eased = 1.0 - (1.0 - t) * (1.0 - t);
        self.from + (self.to - self.from) * eased
    }

    /// Advance by `delta_ms` and return the new value
    pub fn advance(&mut self, delta_ms: f32) -> f32 {
        self.elapsed_ms += sanitize_delta(delta_ms);
        self.value()
    }

    pub fn is_done(&self) -> bool {
        self.progress() >= 1.0
    }
}

/// Outcome of a shot landing on an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitResult {
    /// Enemy is shrinking but still alive
    Shrunk,
    /// Enemy is too small to survive the hit
    Destroyed,
}

/// An enemy circle homing in on the player
#[derive(Debug, Clone)]
pub struct Enemy {
    pub circle: Circle,
    /// Units per tick
    pub speed: f32,
    pub shrink: Option<RadiusTween>,
}

impl Enemy {
    pub fn new(pos: Vec2, radius: f32, color: Rgb, speed: f32) -> Self {
        Self {
            circle: Circle::new(pos, radius, color),
            speed,
            shrink: None,
        }
    }

    /// Radius this enemy is heading toward (its current radius when not shrinking)
    pub fn target_radius(&self) -> f32 {
        self.shrink.map(|t| t.to).unwrap_or(self.circle.radius)
    }

    /// Advance the shrink animation, then step toward the player
    pub fn update(&mut self, delta: f32, player_pos: Vec2) {
        if let Some(tween) = self.shrink.as_mut() {
            self.circle.radius = tween.advance(delta);
            if tween.is_done() {
                self.shrink = None;
            }
        }

        let dir = (player_pos - self.circle.pos).normalize_or_zero();
        self.circle.pos += dir * self.speed;
    }

    /// Start shrinking from the current radius toward `target`
    pub fn shrink_to(&mut self, target: f32, duration_ms: f32) {
        self.shrink = Some(RadiusTween::new(self.circle.radius, target, duration_ms));
    }

    /// Apply one hit: shrink by `amount` if that leaves more than `kill_radius`
    pub fn take_hit(&mut self, amount: f32, kill_radius: f32, duration_ms: f32) -> HitResult {
        let remaining = self.circle.radius - amount;
        if remaining > kill_radius {
            self.shrink_to(remaining, duration_ms);
            HitResult::Shrunk
        } else {
            HitResult::Destroyed
        }
    }
}

impl Drawable for Player {
    fn circle(&self) -> &Circle {
        &self.circle
    }
}

impl Drawable for Shot {
    fn circle(&self) -> &Circle {
        &self.circle
    }
}

impl Drawable for Particle {
    fn circle(&self) -> &Circle {
        &self.circle
    }

    fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl Drawable for Enemy {
    fn circle(&self) -> &Circle {
        &self.circle
    }
}
