//! Per-frame simulation driver
//!
//! Called once per display refresh. Fades the surface, advances every entity
//! by the elapsed time, resolves collisions and reports whether the loop
//! should keep running.

use super::collision::{circles_collide, outside_viewport};
use super::entity::HitResult;
use super::spawn::burst_size;
use super::state::GameState;
use crate::renderer::{Drawable, Surface, fade};

/// What the caller should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Schedule the next frame
    Continue,
    /// The player was touched this frame; stop the loop and record the score
    GameOver { score: u64 },
    /// The session already ended; nothing was simulated
    Halted,
}

/// Advance the session to `now_ms` and draw it
pub fn frame(state: &mut GameState, now_ms: f64, surface: &mut dyn Surface) -> FrameOutcome {
    if state.is_over() {
        return FrameOutcome::Halted;
    }

    fade(surface, state.config.trail_alpha);

    let delta = frame_delta(state, now_ms);
    state.frames += 1;

    state.player.draw(surface);

    update_shots(state, delta, surface);
    update_particles(state, delta, surface);
    update_player(state, delta);

    match update_enemies(state, delta, surface) {
        Some(score) => FrameOutcome::GameOver { score },
        None => FrameOutcome::Continue,
    }
}

/// Milliseconds since the previous frame, clamped to `[0, max_frame_delta_ms]`.
/// The first frame of a session has no predecessor and moves nothing.
fn frame_delta(state: &mut GameState, now_ms: f64) -> f32 {
    if !now_ms.is_finite() {
        return 0.0;
    }
    let delta = match state.last_frame_ms {
        Some(prev) => (now_ms - prev).clamp(0.0, state.config.max_frame_delta_ms),
        None => 0.0,
    };
    state.last_frame_ms = Some(now_ms);
    delta as f32
}

/// Cull shots that left the viewport, move and draw the rest
fn update_shots(state: &mut GameState, delta: f32, surface: &mut dyn Surface) {
    let viewport = state.viewport;
    state.shots.retain_mut(|shot| {
        if outside_viewport(&shot.circle, viewport) {
            return false;
        }
        shot.update(delta);
        shot.draw(surface);
        true
    });
}

fn update_particles(state: &mut GameState, delta: f32, surface: &mut dyn Surface) {
    state.particles.retain_mut(|particle| {
        particle.update(delta);
        particle.draw(surface);
        !particle.is_spent()
    });
}

/// Apply every held direction key
fn update_player(state: &mut GameState, delta: f32) {
    let viewport = state.viewport;
    for &direction in state.input.held() {
        state.player.update(delta, direction, viewport);
    }
}

/// Move enemies, check them against the player and every shot.
/// Returns the final score if the player was touched.
fn update_enemies(state: &mut GameState, delta: f32, surface: &mut dyn Surface) -> Option<u64> {
    let player_pos = state.player.pos();
    let hit_shrink = state.config.enemy_hit_shrink;
    let kill_radius = state.config.enemy_kill_radius;
    let shrink_ms = state.config.enemy_shrink_duration_ms;

    let mut i = 0;
    while i < state.enemies.len() {
        let enemy = &mut state.enemies[i];
        enemy.update(delta, player_pos);
        enemy.draw(surface);

        if circles_collide(&state.enemies[i].circle, &state.player.circle) {
            return state.end_game();
        }

        let mut destroyed = false;
        let mut j = 0;
        while j < state.shots.len() {
            let enemy = &state.enemies[i].circle;
            let shot = &state.shots[j].circle;
            if !circles_collide(enemy, shot) {
                j += 1;
                continue;
            }

            let count = burst_size(enemy.radius);
            let (origin, color) = (shot.pos, shot.color);
            state.spawn_particles(origin, color, count);
            state.shots.remove(j);

            match state.enemies[i].take_hit(hit_shrink, kill_radius, shrink_ms) {
                HitResult::Shrunk => {}
                HitResult::Destroyed => {
                    state.enemies.remove(i);
                    state.score += 1;
                    log::debug!("Enemy destroyed, score {}", state.score);
                    destroyed = true;
                    break;
                }
            }
        }

        if !destroyed {
            i += 1;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    use crate::config::GameConfig;
    use crate::renderer::{DrawCall, RecordingSurface};
    use crate::sim::entity::{Enemy, Rgb, Shot};
    use crate::sim::state::{Direction, GamePhase, Viewport};

    fn state() -> GameState {
        GameState::new(1234, Viewport::new(800.0, 600.0), GameConfig::default())
    }

    fn surface() -> RecordingSurface {
        RecordingSurface::new(800.0, 600.0)
    }

    /// A motionless enemy far from the player
    fn parked_enemy(pos: Vec2, radius: f32) -> Enemy {
        Enemy::new(pos, radius, Rgb::new(200, 10, 10), 0.0)
    }

    fn shot_at(state: &GameState, pos: Vec2) -> Shot {
        let mut shot = Shot::fire(&state.player, Vec2::ZERO, state.config.shot_speed);
        shot.circle.pos = pos;
        shot
    }

    #[test]
    fn test_frame_fades_then_draws_player() {
        let mut s = state();
        let mut surf = surface();
        assert_eq!(frame(&mut s, 0.0, &mut surf), FrameOutcome::Continue);
        assert!(matches!(surf.calls[0], DrawCall::Rect { alpha, .. } if alpha == 0.1));
        assert!(matches!(
            surf.calls[1],
            DrawCall::Circle { center, radius, .. } if center == Vec2::new(400.0, 300.0) && radius == 10.0
        ));
    }

    #[test]
    fn test_first_frame_moves_nothing() {
        let mut s = state();
        s.input.press(Direction::Up);
        frame(&mut s, 12_345.0, &mut surface());
        assert_eq!(s.player.pos(), Vec2::new(400.0, 300.0));
        frame(&mut s, 12_361.0, &mut surface());
        assert_eq!(s.player.pos(), Vec2::new(400.0, 284.0));
    }

    #[test]
    fn test_long_pause_is_clamped() {
        let mut s = state();
        s.input.press(Direction::Right);
        frame(&mut s, 0.0, &mut surface());
        frame(&mut s, 10_000.0, &mut surface());
        assert_eq!(s.player.pos().x, 500.0);
    }

    #[test]
    fn test_held_keys_combine() {
        let mut s = state();
        s.input.press(Direction::Up);
        s.input.press(Direction::Left);
        frame(&mut s, 0.0, &mut surface());
        frame(&mut s, 10.0, &mut surface());
        assert_eq!(s.player.pos(), Vec2::new(390.0, 290.0));
    }

    #[test]
    fn test_hit_on_large_enemy_shrinks_it() {
        let mut s = state();
        s.enemies.push(parked_enemy(Vec2::new(100.0, 100.0), 20.0));
        let shot = shot_at(&s, Vec2::new(100.0, 100.0));
        s.shots.push(shot);

        assert_eq!(frame(&mut s, 0.0, &mut surface()), FrameOutcome::Continue);
        assert_eq!(s.enemies.len(), 1);
        assert_eq!(s.enemies[0].target_radius(), 10.0);
        assert!(s.shots.is_empty());
        assert_eq!(s.score, 0);
        assert_eq!(s.particles.len(), 40);
    }

    #[test]
    fn test_hit_on_small_enemy_scores() {
        let mut s = state();
        s.enemies.push(parked_enemy(Vec2::new(100.0, 100.0), 14.0));
        let shot = shot_at(&s, Vec2::new(100.0, 100.0));
        s.shots.push(shot);

        frame(&mut s, 0.0, &mut surface());
        assert!(s.enemies.is_empty());
        assert!(s.shots.is_empty());
        assert_eq!(s.score, 1);
        assert_eq!(s.particles.len(), 28);
    }

    #[test]
    fn test_destroyed_enemy_scores_once() {
        let mut s = state();
        s.enemies.push(parked_enemy(Vec2::new(100.0, 100.0), 14.0));
        let first = shot_at(&s, Vec2::new(100.0, 100.0));
        let second = shot_at(&s, Vec2::new(102.0, 100.0));
        s.shots.push(first);
        s.shots.push(second);

        frame(&mut s, 0.0, &mut surface());
        assert_eq!(s.score, 1);
        assert_eq!(s.shots.len(), 1);
    }

    #[test]
    fn test_shrinking_enemy_animates_down() {
        let mut s = state();
        s.enemies.push(parked_enemy(Vec2::new(100.0, 100.0), 20.0));
        let shot = shot_at(&s, Vec2::new(100.0, 100.0));
        s.shots.push(shot);

        frame(&mut s, 0.0, &mut surface());
        assert_eq!(s.enemies[0].circle.radius, 20.0);
        frame(&mut s, 100.0, &mut surface());
        let r = s.enemies[0].circle.radius;
        assert!(r < 20.0 && r > 10.0);
        for t in 2..10 {
            frame(&mut s, t as f64 * 100.0, &mut surface());
        }
        assert_eq!(s.enemies[0].circle.radius, 10.0);
    }

    #[test]
    fn test_touching_player_ends_game() {
        let mut s = state();
        s.score = 4;
        s.enemies.push(parked_enemy(Vec2::new(405.0, 300.0), 8.0));

        assert_eq!(
            frame(&mut s, 0.0, &mut surface()),
            FrameOutcome::GameOver { score: 4 }
        );
        assert_eq!(s.phase, GamePhase::GameOver);

        let mut surf = surface();
        assert_eq!(frame(&mut s, 16.0, &mut surf), FrameOutcome::Halted);
        assert!(surf.calls.is_empty());
    }

    #[test]
    fn test_enemy_walks_into_player() {
        let mut s = state();
        let mut enemy = parked_enemy(Vec2::new(400.0, 200.5), 10.0);
        enemy.speed = 1.0;
        s.enemies.push(enemy);

        let mut outcome = FrameOutcome::Continue;
        for t in 0..200 {
            outcome = frame(&mut s, t as f64 * 16.0, &mut surface());
            if outcome != FrameOutcome::Continue {
                break;
            }
        }
        assert_eq!(outcome, FrameOutcome::GameOver { score: 0 });
        // One unit per tick: gap 99.5 - 20 - k drops under 1 at k = 79
        assert_eq!(s.frames, 79);
    }

    #[test]
    fn test_shots_leave_viewport() {
        let mut s = state();
        let gone = shot_at(&s, Vec2::new(-20.0, 300.0));
        let kept = shot_at(&s, Vec2::new(200.0, 300.0));
        s.shots.push(gone);
        s.shots.push(kept);
        frame(&mut s, 0.0, &mut surface());
        assert_eq!(s.shots.len(), 1);
        assert_eq!(s.shots[0].circle.pos, Vec2::new(200.0, 300.0));
    }

    #[test]
    fn test_particles_fade_out() {
        let mut s = state();
        s.spawn_particles(Vec2::new(300.0, 300.0), Rgb::WHITE, 10);
        for t in 0..150 {
            frame(&mut s, t as f64, &mut surface());
        }
        assert!(s.particles.is_empty());
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut s = state();
            s.input.pointer = Vec2::new(0.0, 0.0);
            let mut surf = surface();
            for t in 0..300u32 {
                if t % 60 == 0 {
                    s.spawn_enemy();
                }
                if t % 6 == 0 {
                    s.fire_shot();
                }
                if frame(&mut s, t as f64 * 16.0, &mut surf) != FrameOutcome::Continue {
                    break;
                }
            }
            s
        };

        let a = run();
        let b = run();
        assert_eq!(a.frames, b.frames);
        assert_eq!(a.score, b.score);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.particles.len(), b.particles.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.circle, eb.circle);
        }
    }
}
