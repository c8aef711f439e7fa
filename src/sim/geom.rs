//! Axis-aligned rectangles for hitboxes and the play area
//!
//! All entities are positioned by their top-left corner, with y growing
//! downward (screen convention).

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box: top-left corner plus size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict overlap test; boxes that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }

    /// True when this box lies entirely beyond a `w x h` area grown by `margin`
    pub fn is_beyond(&self, width: f32, height: f32, margin: f32) -> bool {
        self.right() < -margin
            || self.left() > width + margin
            || self.bottom() < -margin
            || self.top() > height + margin
    }

    /// True when this box lies fully inside a `w x h` area
    pub fn is_inside(&self, width: f32, height: f32) -> bool {
        self.left() >= 0.0 && self.top() >= 0.0 && self.right() <= width && self.bottom() <= height
    }
}

/// Clamp a top-left position so a box of `size` stays inside a `w x h` area.
///
/// When the area is smaller than the box the position collapses to 0 on
/// that axis.
pub fn clamp_into(pos: Vec2, size: Vec2, width: f32, height: f32) -> Vec2 {
    let max_x = (width - size.x).max(0.0);
    let max_y = (height - size.y).max(0.0);
    Vec2::new(pos.x.max(0.0).min(max_x), pos.y.max(0.0).min(max_y))
}
