//! Randomized spawning
//!
//! Pure helpers over an injected RNG so spawns replay exactly under a seed.

use glam::Vec2;
use rand::Rng;

use super::entity::{Enemy, Particle, Rgb};
use super::state::Viewport;
use crate::config::GameConfig;

/// Uniform value in `[lo, hi)`; collapses to `lo` for an empty range
#[inline]
pub fn uniform<R: Rng>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        lo + rng.random::<f32>() * (hi - lo)
    } else {
        lo
    }
}

/// Enemy radius in `[min, max)`
pub fn random_radius<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    uniform(rng, min, max)
}

/// Any opaque color
pub fn random_color<R: Rng>(rng: &mut R) -> Rgb {
    Rgb::new(rng.random(), rng.random(), rng.random())
}

/// One spawn coordinate along an axis of length `extent`
///
/// Half the time it lands in `[-radius - band, radius)` (the near edge),
/// otherwise in `[extent + radius, extent + radius + band)` (the far edge).
pub fn random_edge_coordinate<R: Rng>(
    rng: &mut R,
    radius: f32,
    extent: f32,
    band: f32,
) -> f32 {
    if rng.random_bool(0.5) {
        uniform(rng, -radius - band, radius)
    } else {
        let near = extent + radius;
        uniform(rng, near, near + band)
    }
}

/// Spawn point hugging the viewport edges
pub fn random_edge_position<R: Rng>(
    rng: &mut R,
    radius: f32,
    viewport: Viewport,
    band: f32,
) -> Vec2 {
    let x = random_edge_coordinate(rng, radius, viewport.width, band);
    let y = random_edge_coordinate(rng, radius, viewport.height, band);
    Vec2::new(x, y)
}

/// A fresh enemy with random size, color and edge position
pub fn spawn_enemy<R: Rng>(rng: &mut R, viewport: Viewport, config: &GameConfig) -> Enemy {
    let radius = random_radius(rng, config.enemy_radius_min, config.enemy_radius_max);
    let color = random_color(rng);
    let pos = random_edge_position(rng, radius, viewport, config.enemy_spawn_band);
    Enemy::new(pos, radius, color, config.enemy_speed)
}

/// Particles released by a hit on an enemy of `radius`: one per unit of diameter
#[inline]
pub fn burst_size(radius: f32) -> usize {
    if radius.is_finite() && radius > 0.0 {
        (2.0 * radius).ceil() as usize
    } else {
        0
    }
}

/// `count` particles flying from `origin` toward random points of the viewport
pub fn particle_burst<R: Rng>(
    rng: &mut R,
    origin: Vec2,
    color: Rgb,
    count: usize,
    viewport: Viewport,
    config: &GameConfig,
) -> Vec<Particle> {
    (0..count)
        .map(|_| {
            let radius = uniform(rng, 0.0, config.particle_max_radius);
            let target = Vec2::new(
                uniform(rng, 0.0, viewport.width),
                uniform(rng, 0.0, viewport.height),
            );
            Particle::new(origin, radius, color, target, config)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_radius_in_range() {
        let mut rng = rng();
        for _ in 0..1000 {
            let r = random_radius(&mut rng, 5.0, 30.0);
            assert!((5.0..30.0).contains(&r));
        }
    }

    #[test]
    fn test_empty_range_collapses() {
        let mut rng = rng();
        assert_eq!(uniform(&mut rng, 7.0, 7.0), 7.0);
        assert_eq!(uniform(&mut rng, 9.0, 3.0), 9.0);
    }

    #[test]
    fn test_edge_coordinates_hug_edges() {
        let mut rng = rng();
        let (mut near, mut far) = (0, 0);
        for _ in 0..2000 {
            let c = random_edge_coordinate(&mut rng, 10.0, 800.0, 100.0);
            if c < 10.0 {
                assert!(c >= -110.0);
                near += 1;
            } else {
                assert!((810.0..910.0).contains(&c));
                far += 1;
            }
        }
        // Both sides get used
        assert!(near > 800 && far > 800);
    }

    #[test]
    fn test_edge_position_uses_each_axis() {
        let mut rng = rng();
        let vp = Viewport::new(1000.0, 200.0);
        for _ in 0..500 {
            let p = random_edge_position(&mut rng, 5.0, vp, 100.0);
            assert!(p.x < 5.0 || p.x >= 1005.0);
            assert!(p.y < 5.0 || p.y >= 205.0);
            assert!(p.y < 305.0);
        }
    }

    #[test]
    fn test_same_seed_same_enemy() {
        let vp = Viewport::new(800.0, 600.0);
        let config = GameConfig::default();
        let a = spawn_enemy(&mut rng(), vp, &config);
        let b = spawn_enemy(&mut rng(), vp, &config);
        assert_eq!(a.circle, b.circle);
        assert!((5.0..30.0).contains(&a.circle.radius));
        assert_eq!(a.speed, config.enemy_speed);
    }

    #[test]
    fn test_burst_size() {
        assert_eq!(burst_size(20.0), 40);
        assert_eq!(burst_size(14.0), 28);
        assert_eq!(burst_size(14.3), 29);
        assert_eq!(burst_size(0.0), 0);
        assert_eq!(burst_size(f32::NAN), 0);
    }

    #[test]
    fn test_burst_particles() {
        let vp = Viewport::new(800.0, 600.0);
        let config = GameConfig::default();
        let origin = Vec2::new(100.0, 100.0);
        let color = Rgb::new(1, 2, 3);
        let burst = particle_burst(&mut rng(), origin, color, 40, vp, &config);
        assert_eq!(burst.len(), 40);
        for p in &burst {
            assert_eq!(p.circle.pos, origin);
            assert_eq!(p.circle.color, color);
            assert_eq!(p.alpha, 1.0);
            assert!(p.circle.radius >= 0.0 && p.circle.radius < config.particle_max_radius);
        }
    }
}
