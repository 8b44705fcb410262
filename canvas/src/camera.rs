//! Camera: the screen ⇄ world coordinate mapping.
//!
//! All geometry and hit-testing operate in world space; pointer events arrive
//! in screen space and cross through here exactly once, at the engine
//! boundary. Screen-space tolerances (hit slop, handle radius) cross via
//! [`Camera::screen_dist_to_world`] so they stay constant on screen at any
//! zoom.

#[cfg(test)]
#[path = "camera_test.rs"]
mod camera_test;

use serde::{Deserialize, Serialize};

/// A 2D point. Used for both screen and world coordinates; which space a
/// value is in is tracked by convention at function boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Viewport transform: pan offset in screen pixels, uniform zoom factor.
///
/// world = (screen - pan) / zoom
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl Camera {
    #[must_use]
    pub fn screen_to_world(&self, p: Point) -> Point {
        Point::new((p.x - self.pan_x) / self.zoom, (p.y - self.pan_y) / self.zoom)
    }

    #[must_use]
    pub fn world_to_screen(&self, p: Point) -> Point {
        Point::new(p.x * self.zoom + self.pan_x, p.y * self.zoom + self.pan_y)
    }

    /// Convert a screen-space distance (hit slop, handle radius) into world
    /// units at the current zoom.
    #[must_use]
    pub fn screen_dist_to_world(&self, d: f64) -> f64 {
        d / self.zoom
    }
}
