//! A surface that remembers what was drawn

use glam::Vec2;

use super::Surface;
use crate::sim::Rgb;

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Clear,
    Rect {
        origin: Vec2,
        size: Vec2,
        color: Rgb,
        alpha: f32,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
}

/// Records draw calls instead of rasterizing them
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    pub size: Vec2,
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            calls: Vec::new(),
        }
    }

    /// Number of circles drawn since the last reset
    pub fn circle_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::Circle { .. }))
            .count()
    }

    pub fn reset(&mut self) {
        self.calls.clear();
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.calls.push(DrawCall::Clear);
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, color: Rgb, alpha: f32) {
        self.calls.push(DrawCall::Rect {
            origin,
            size,
            color,
            alpha,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.calls.push(DrawCall::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }
}
