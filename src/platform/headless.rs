//! Headless session runner
//!
//! Drives a full session without a browser: fixed frame times, interval
//! timers for spawning, a recording surface and an optional autopilot.

use std::cmp::Ordering;

use super::interval::IntervalTimer;
use crate::config::GameConfig;
use crate::highscores::{HighScoreStore, best_score, record_high_score};
use crate::renderer::RecordingSurface;
use crate::sim::{Direction, FrameOutcome, GameState, Viewport, frame};

/// Autopilot starts evading inside this distance
const EVADE_DISTANCE: f32 = 150.0;

/// Summary of a finished (or cut short) run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub frames: u64,
    pub score: u64,
    /// Best score in the store after the run
    pub best: u64,
    pub game_over: bool,
}

pub struct HeadlessRunner {
    pub state: GameState,
    pub surface: RecordingSurface,
    enemy_timer: IntervalTimer,
    fire_timer: IntervalTimer,
    clock_ms: f64,
    frame_ms: f64,
    autopilot: bool,
}

impl HeadlessRunner {
    /// 60 Hz session with the enemy timer already running
    pub fn new(seed: u64, viewport: Viewport, config: GameConfig) -> Self {
        let mut enemy_timer = IntervalTimer::new(config.enemy_spawn_interval_ms);
        enemy_timer.start();
        let fire_timer = IntervalTimer::new(config.shot_interval_ms);
        Self {
            state: GameState::new(seed, viewport, config),
            surface: RecordingSurface::new(viewport.width, viewport.height),
            enemy_timer,
            fire_timer,
            clock_ms: 0.0,
            frame_ms: 1000.0 / 60.0,
            autopilot: false,
        }
    }

    pub fn with_frame_ms(mut self, frame_ms: f64) -> Self {
        self.frame_ms = frame_ms.max(0.0);
        self
    }

    /// Let the built-in pilot steer and shoot
    pub fn with_autopilot(mut self, on: bool) -> Self {
        self.autopilot = on;
        self
    }

    pub fn timers_running(&self) -> bool {
        self.enemy_timer.is_running() || self.fire_timer.is_running()
    }

    /// Fire timers, then simulate one frame
    pub fn step(&mut self) -> FrameOutcome {
        if self.state.is_over() {
            self.stop_timers();
            return FrameOutcome::Halted;
        }

        if self.autopilot {
            self.steer();
        }

        if self.state.input.firing {
            self.fire_timer.start();
        } else {
            self.fire_timer.stop();
        }

        for _ in 0..self.enemy_timer.advance(self.frame_ms) {
            self.state.spawn_enemy();
        }
        for _ in 0..self.fire_timer.advance(self.frame_ms) {
            self.state.fire_shot();
        }

        self.surface.reset();
        let outcome = frame(&mut self.state, self.clock_ms, &mut self.surface);
        self.clock_ms += self.frame_ms;

        if outcome != FrameOutcome::Continue {
            self.stop_timers();
        }
        outcome
    }

    /// Step until game over or `max_frames`, recording the score on game over
    pub fn run(&mut self, max_frames: u64, store: &mut dyn HighScoreStore) -> RunReport {
        log::info!("Headless run: seed {}, up to {} frames", self.state.seed, max_frames);

        let mut best = None;
        for _ in 0..max_frames {
            match self.step() {
                FrameOutcome::Continue => {}
                FrameOutcome::GameOver { score } => {
                    best = match record_high_score(store, score) {
                        Ok(best) => Some(best),
                        Err(e) => {
                            log::warn!("Can't save high score: {}", e);
                            None
                        }
                    };
                    break;
                }
                FrameOutcome::Halted => break,
            }
        }

        RunReport {
            frames: self.state.frames,
            score: self.state.score,
            best: best.unwrap_or_else(|| best_score(store)),
            game_over: self.state.is_over(),
        }
    }

    fn stop_timers(&mut self) {
        self.enemy_timer.stop();
        self.fire_timer.stop();
    }

    /// Aim at the nearest enemy and back away from it when it gets close
    fn steer(&mut self) {
        let player = self.state.player.pos();
        let nearest = self
            .state
            .enemies
            .iter()
            .min_by(|a, b| {
                a.circle
                    .pos
                    .distance_squared(player)
                    .partial_cmp(&b.circle.pos.distance_squared(player))
                    .unwrap_or(Ordering::Equal)
            })
            .map(|e| e.circle.pos);

        let input = &mut self.state.input;
        for dir in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            input.release(dir);
        }

        let Some(target) = nearest else {
            input.firing = false;
            return;
        };

        input.pointer = target;
        input.firing = true;

        let away = player - target;
        if away.length() < EVADE_DISTANCE {
            input.press(if away.x < 0.0 { Direction::Left } else { Direction::Right });
            input.press(if away.y < 0.0 { Direction::Up } else { Direction::Down });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highscores::MemoryStore;
    use crate::sim::{Enemy, Rgb};

    fn runner(seed: u64) -> HeadlessRunner {
        HeadlessRunner::new(seed, Viewport::new(800.0, 600.0), GameConfig::default())
    }

    #[test]
    fn test_idle_player_gets_caught() {
        let mut r = runner(5);
        let mut store = MemoryStore::with_score(7);
        let report = r.run(10_000, &mut store);
        assert!(report.game_over);
        assert_eq!(report.score, 0);
        assert_eq!(report.best, 7);
        assert_eq!(store.read().unwrap(), 7);
        assert!(!r.timers_running());
    }

    #[test]
    fn test_enemies_spawn_each_second() {
        let mut r = runner(5).with_frame_ms(100.0);
        for _ in 0..10 {
            r.step();
        }
        assert_eq!(r.state.enemies.len(), 1);
        for _ in 0..10 {
            r.step();
        }
        assert_eq!(r.state.enemies.len(), 2);
    }

    #[test]
    fn test_firing_spawns_shots() {
        let mut r = runner(5).with_frame_ms(50.0);
        r.state.input.pointer = glam::Vec2::new(800.0, 300.0);
        r.state.input.firing = true;
        r.step();
        assert_eq!(r.state.shots.len(), 0);
        r.step();
        assert_eq!(r.state.shots.len(), 1);
        r.state.input.firing = false;
        for _ in 0..4 {
            r.step();
        }
        assert_eq!(r.state.shots.len(), 1);
    }

    #[test]
    fn test_autopilot_scores() {
        let mut r = runner(11).with_autopilot(true);
        let mut store = MemoryStore::new();
        let report = r.run(20_000, &mut store);
        assert!(report.score > 0);
        assert_eq!(report.score, r.state.score);
        assert_eq!(store.writes, usize::from(report.game_over));
    }

    #[test]
    fn test_game_over_records_new_best() {
        let mut r = runner(5);
        r.state.score = 9;
        let player = r.state.player.pos();
        r.state.enemies.push(Enemy::new(player, 10.0, Rgb::WHITE, 1.0));

        let mut store = MemoryStore::with_score(7);
        let report = r.run(10, &mut store);
        assert!(report.game_over);
        assert_eq!(report.frames, 1);
        assert_eq!(report.score, 9);
        assert_eq!(report.best, 9);
        assert_eq!(store.read().unwrap(), 9);
        assert_eq!(store.writes, 1);
    }

    #[test]
    fn test_runs_are_reproducible() {
        let a = runner(99).with_autopilot(true).run(3_000, &mut MemoryStore::new());
        let b = runner(99).with_autopilot(true).run(3_000, &mut MemoryStore::new());
        assert_eq!(a, b);
    }

    #[test]
    fn test_step_after_game_over_is_halted() {
        let mut r = runner(5);
        while r.step() == FrameOutcome::Continue {}
        assert_eq!(r.step(), FrameOutcome::Halted);
        assert_eq!(r.step(), FrameOutcome::Halted);
        assert!(!r.timers_running());
    }
}
