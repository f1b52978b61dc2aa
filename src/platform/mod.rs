//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Loop and timer handles (teardown exactly once)
//! - Fixed-period spawn timers without a browser
//! - Headless sessions on native
//! - Canvas, DOM and input wiring on web

pub mod headless;
pub mod interval;
pub mod schedule;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::{HeadlessRunner, RunReport};
pub use interval::IntervalTimer;
pub use schedule::{LoopHandles, Scheduler};
