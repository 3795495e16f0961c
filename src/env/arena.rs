//! Rectangular arena bounds
//!
//! The arena is a static axis-aligned rectangle agents may not exit.
//! Containment is strict on both axes: a position exactly on an edge is
//! outside, matching the movement rule that rejects any step whose
//! candidate position is not strictly interior.

use anyhow::{anyhow, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangular bounds `[x_min, x_max] x [y_min, y_max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaBounds {
    /// Left edge
    pub x_min: f32,
    /// Right edge
    pub x_max: f32,
    /// Bottom edge
    pub y_min: f32,
    /// Top edge
    pub y_max: f32,
}

impl ArenaBounds {
    /// Create bounds, validating that each axis spans a positive range
    pub fn new(x_min: f32, x_max: f32, y_min: f32, y_max: f32) -> Result<Self> {
        if x_min >= x_max {
            return Err(anyhow!("x_min ({}) must be less than x_max ({})", x_min, x_max));
        }
        if y_min >= y_max {
            return Err(anyhow!("y_min ({}) must be less than y_max ({})", y_min, y_max));
        }
        Ok(Self { x_min, x_max, y_min, y_max })
    }

    /// Strict horizontal containment test
    pub fn contains_x(&self, x: f32) -> bool {
        x > self.x_min && x < self.x_max
    }

    /// Strict vertical containment test
    pub fn contains_y(&self, y: f32) -> bool {
        y > self.y_min && y < self.y_max
    }

    /// Strict containment on both axes
    pub fn contains(&self, x: f32, y: f32) -> bool {
        self.contains_x(x) && self.contains_y(y)
    }

    /// Derive tighter bounds by pulling each edge inward
    ///
    /// Used for the mobile-target family, which keeps a visual margin from
    /// the hard arena edge.
    pub fn shrink(&self, margin_x: f32, margin_y: f32) -> Result<Self> {
        Self::new(
            self.x_min + margin_x,
            self.x_max - margin_x,
            self.y_min + margin_y,
            self.y_max - margin_y,
        )
    }

    /// Uniformly sampled interior point
    pub fn random_point<R: Rng>(&self, rng: &mut R) -> (f32, f32) {
        (
            rng.gen_range(self.x_min..self.x_max),
            rng.gen_range(self.y_min..self.y_max),
        )
    }

    /// Geometric center of the rectangle
    pub fn center(&self) -> (f32, f32) {
        ((self.x_min + self.x_max) / 2.0, (self.y_min + self.y_max) / 2.0)
    }

    /// Width of the arena
    pub fn width(&self) -> f32 {
        self.x_max - self.x_min
    }

    /// Height of the arena
    pub fn height(&self) -> f32 {
        self.y_max - self.y_min
    }
}

impl Default for ArenaBounds {
    /// The standard 20 x 10 arena centered on the origin
    fn default() -> Self {
        Self { x_min: -10.0, x_max: 10.0, y_min: -5.0, y_max: 5.0 }
    }
}
