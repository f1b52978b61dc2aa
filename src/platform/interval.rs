//! Fixed-period timer driven by frame deltas
//!
//! Native stand-in for `setInterval`: accumulate elapsed time and report how
//! many periods passed.

/// Repeating timer; fires once per elapsed `period_ms` while running
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTimer {
    period_ms: f64,
    accumulator: f64,
    running: bool,
}

impl IntervalTimer {
    /// A stopped timer
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms: period_ms.max(f64::EPSILON),
            accumulator: 0.0,
            running: false,
        }
    }

    /// Start counting from zero (no-op when already running)
    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.accumulator = 0.0;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.accumulator = 0.0;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by `delta_ms`; returns how many times the timer fired
    pub fn advance(&mut self, delta_ms: f64) -> u32 {
        if !self.running || !delta_ms.is_finite() || delta_ms <= 0.0 {
            return 0;
        }
        self.accumulator += delta_ms;
        let mut fired = 0;
        while self.accumulator >= self.period_ms {
            self.accumulator -= self.period_ms;
            fired += 1;
        }
        fired
    }
}
