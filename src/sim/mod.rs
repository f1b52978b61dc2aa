//! Frame simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - Viewport and surface are passed in, never looked up
//! - Seeded RNG only
//! - No wall-clock reads (timestamps arrive as arguments)

pub mod collision;
pub mod entity;
pub mod frame;
pub mod spawn;
pub mod state;

pub use collision::{circles_collide, edge_gap, outside_viewport};
pub use entity::{Circle, Enemy, HitResult, Particle, Player, RadiusTween, Rgb, Shot};
pub use frame::{FrameOutcome, frame};
pub use state::{Direction, GamePhase, GameState, InputState, Viewport};
