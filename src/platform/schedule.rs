//! Animation-frame and interval handle bookkeeping
//!
//! A session owns one animation-frame request and up to two intervals (enemy
//! spawn, fire). Every handle is cancelled at most once, however many times
//! teardown runs.

/// Host timer cancellation (the browser window on web)
pub trait Scheduler {
    fn cancel_animation_frame(&mut self, id: i32);
    fn clear_interval(&mut self, id: i32);
}

/// Handles owned by one running session
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoopHandles {
    animation_frame: Option<i32>,
    enemy_spawn: Option<i32>,
    fire: Option<i32>,
    torn_down: bool,
}

impl LoopHandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember the pending animation frame (each frame requests the next one)
    pub fn set_animation_frame(&mut self, id: i32) {
        self.animation_frame = Some(id);
    }

    /// Remember the enemy spawn interval, clearing any previous one
    pub fn set_enemy_spawn(&mut self, id: i32, scheduler: &mut dyn Scheduler) {
        if let Some(old) = self.enemy_spawn.replace(id) {
            scheduler.clear_interval(old);
        }
    }

    pub fn is_firing(&self) -> bool {
        self.fire.is_some()
    }

    /// Start the fire interval unless one is already running or the session ended.
    /// `start` is only called when a new interval is needed.
    pub fn start_fire(&mut self, start: impl FnOnce() -> Option<i32>) -> bool {
        if self.torn_down || self.fire.is_some() {
            return false;
        }
        self.fire = start();
        self.fire.is_some()
    }

    /// Stop the fire interval; returns whether one was running
    pub fn stop_fire(&mut self, scheduler: &mut dyn Scheduler) -> bool {
        match self.fire.take() {
            Some(id) => {
                scheduler.clear_interval(id);
                true
            }
            None => false,
        }
    }

    /// Cancel every outstanding handle. Returns how many were cancelled;
    /// a second call cancels nothing.
    pub fn teardown(&mut self, scheduler: &mut dyn Scheduler) -> usize {
        self.torn_down = true;
        let mut cancelled = 0;
        if let Some(id) = self.animation_frame.take() {
            scheduler.cancel_animation_frame(id);
            cancelled += 1;
        }
        if let Some(id) = self.enemy_spawn.take() {
            scheduler.clear_interval(id);
            cancelled += 1;
        }
        if let Some(id) = self.fire.take() {
            scheduler.clear_interval(id);
            cancelled += 1;
        }
        if cancelled > 0 {
            log::debug!("Session loop torn down ({} handles)", cancelled);
        }
        cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Records every cancellation
    #[derive(Default)]
    struct FakeScheduler {
        frames: Vec<i32>,
        intervals: Vec<i32>,
    }

    impl Scheduler for FakeScheduler {
        fn cancel_animation_frame(&mut self, id: i32) {
            self.frames.push(id);
        }

        fn clear_interval(&mut self, id: i32) {
            self.intervals.push(id);
        }
    }

    fn running() -> (LoopHandles, FakeScheduler) {
        let mut sched = FakeScheduler::default();
        let mut handles = LoopHandles::new();
        handles.set_animation_frame(1);
        handles.set_enemy_spawn(2, &mut sched);
        assert!(handles.start_fire(|| Some(3)));
        (handles, sched)
    }

    #[test]
    fn test_teardown_cancels_everything_once() {
        let (mut handles, mut sched) = running();
        assert_eq!(handles.teardown(&mut sched), 3);
        assert_eq!(handles.teardown(&mut sched), 0);
        assert_eq!(sched.frames, vec![1]);
        assert_eq!(sched.intervals, vec![2, 3]);
    }

    #[test]
    fn test_second_press_does_not_stack_fire_timers() {
        let (mut handles, mut sched) = running();
        let mut started = 0;
        assert!(!handles.start_fire(|| {
            started += 1;
            Some(4)
        }));
        assert_eq!(started, 0);
        assert!(handles.stop_fire(&mut sched));
        assert!(!handles.stop_fire(&mut sched));
        assert_eq!(sched.intervals, vec![3]);
    }

    #[test]
    fn test_no_fire_after_teardown() {
        let (mut handles, mut sched) = running();
        handles.teardown(&mut sched);
        assert!(!handles.start_fire(|| Some(9)));
        assert!(!handles.is_firing());
    }

    #[test]
    fn test_failed_start_leaves_fire_idle() {
        let mut handles = LoopHandles::new();
        assert!(!handles.start_fire(|| None));
        assert!(!handles.is_firing());
    }

    #[test]
    fn test_replacing_enemy_spawn_clears_old() {
        let mut sched = FakeScheduler::default();
        let mut handles = LoopHandles::new();
        handles.set_enemy_spawn(5, &mut sched);
        handles.set_enemy_spawn(6, &mut sched);
        assert_eq!(sched.intervals, vec![5]);
        handles.teardown(&mut sched);
        assert_eq!(sched.intervals, vec![5, 6]);
    }
}
