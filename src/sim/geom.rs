//! Axis-aligned rectangles in world space
//!
//! Positions are f32 (the ground clamp produces fractional y), but overlap
//! is resolved on the integer pixel grid so it lines up with silhouette
//! masks. Coordinates truncate toward zero when snapping, matching how the
//! sprite grid is addressed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle with a float origin and pixel dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner in world coordinates
    pub pos: Vec2,
    pub width: u32,
    pub height: u32,
}

/// Integer overlap region of two rects, in world pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Clip {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: u32, height: u32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            width,
            height,
        }
    }

    /// Left edge on the pixel grid
    #[inline]
    pub fn left(&self) -> i32 {
        self.pos.x as i32
    }

    /// Top edge on the pixel grid
    #[inline]
    pub fn top(&self) -> i32 {
        self.pos.y as i32
    }

    /// One past the right edge on the pixel grid
    #[inline]
    pub fn right(&self) -> i32 {
        self.left() + self.width as i32
    }

    /// One past the bottom edge on the pixel grid
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.top() + self.height as i32
    }

    /// Horizontal midpoint in world coordinates
    #[inline]
    pub fn mid_x(&self) -> f32 {
        self.pos.x + self.width as f32 / 2.0
    }

    /// Pixel-grid overlap with another rect, `None` when disjoint.
    pub fn clip(&self, other: &Rect) -> Option<Clip> {
        let x = self.left().max(other.left());
        let y = self.top().max(other.top());
        let width = self.right().min(other.right()) - x;
        let height = self.bottom().min(other.bottom()) - y;
        if width <= 0 || height <= 0 {
            return None;
        }
        Some(Clip {
            x,
            y,
            width,
            height,
        })
    }
}
