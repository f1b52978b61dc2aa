//! Drawing surface abstraction
//!
//! The simulation only ever clears, fills rectangles and fills circles. The
//! browser shell backs [`Surface`] with a 2D canvas; tests and the headless
//! runner use [`RecordingSurface`].

pub mod recording;

pub use recording::{DrawCall, RecordingSurface};

use glam::Vec2;

use crate::sim::{Circle, Rgb};

/// Minimal drawing primitives
pub trait Surface {
    /// Surface size in pixels
    fn size(&self) -> Vec2;
    /// Wipe everything
    fn clear(&mut self);
    /// Fill an axis-aligned rectangle, blended at `alpha`
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgb, alpha: f32);
    /// Fill a circle, blended at `alpha`
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32);
}

/// Anything that renders as a single filled circle
pub trait Drawable {
    fn circle(&self) -> &Circle;

    fn alpha(&self) -> f32 {
        1.0
    }

    fn draw(&self, surface: &mut dyn Surface) {
        let c = self.circle();
        surface.fill_circle(c.pos, c.radius, c.color, self.alpha());
    }
}

/// Paint a translucent black layer over the whole surface so moving circles leave trails
pub fn fade(surface: &mut dyn Surface, alpha: f32) {
    let size = surface.size();
    surface.fill_rect(Vec2::ZERO, size, Rgb::BLACK, alpha);
}
