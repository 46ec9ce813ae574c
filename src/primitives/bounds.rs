//! Axis-aligned viewing windows.
//!
//! ## Purpose
//!
//! `Bounds` is the window an item prefers to be viewed in and the aggregate
//! window the solver grows to cover all of its items.
//!
//! ## Invariants
//!
//! * Producers keep `left <= right` and `bottom <= top`.
//! * `maximize` only ever grows the window.

// External dependencies
use serde::{Deserialize, Serialize};

/// Default half-extent of a window, used on every side.
pub const DEFAULT_BOUND_VALUE: f64 = 10.0;

/// An axis-aligned rectangle in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Smallest x.
    pub left: f64,
    /// Largest x.
    pub right: f64,
    /// Largest y.
    pub top: f64,
    /// Smallest y.
    pub bottom: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(
            -DEFAULT_BOUND_VALUE,
            DEFAULT_BOUND_VALUE,
            DEFAULT_BOUND_VALUE,
            -DEFAULT_BOUND_VALUE,
        )
    }
}

impl Bounds {
    /// Create a window from its four edges.
    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    /// Replace all four edges.
    pub fn set(&mut self, left: f64, right: f64, top: f64, bottom: f64) {
        *self = Self::new(left, right, top, bottom);
    }

    /// Grow this window to the union with `other`.
    ///
    /// Returns `true` if any edge moved.
    pub fn maximize(&mut self, other: &Bounds) -> bool {
        let mut changed = false;
        if other.left < self.left {
            self.left = other.left;
            changed = true;
        }
        if other.right > self.right {
            self.right = other.right;
            changed = true;
        }
        if other.top > self.top {
            self.top = other.top;
            changed = true;
        }
        if other.bottom < self.bottom {
            self.bottom = other.bottom;
            changed = true;
        }
        changed
    }

    /// Horizontal extent.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical extent.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }

    /// True if every edge is finite and the window is not inverted.
    pub fn is_valid(&self) -> bool {
        [self.left, self.right, self.top, self.bottom]
            .iter()
            .all(|v| v.is_finite())
            && self.left <= self.right
            && self.bottom <= self.top
    }
}
