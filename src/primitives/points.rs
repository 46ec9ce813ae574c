//! Sample points and graph trails.
//!
//! ## Purpose
//!
//! Analyzed items are sampled into `MultiPointXY` values: one abscissa and
//! every ordinate the relation admits there. Consecutive samples are then cut
//! into continuous `GraphTrail`s wherever the number of ordinates changes or
//! a branch jumps by more than the allowed amount.
//!
//! ## Key concepts
//!
//! * **Segment**: A maximal run of samples with the same ordinate count and
//!   no jump larger than `max_jump`.
//! * **Branch**: One ordinate index followed through a segment.
//!
//! ## Invariants
//!
//! * Segment boundaries start at 0, end at `points.len()` and are increasing.
//! * Only trails with at least two points are kept.

// External dependencies
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::primitives::features::trim_double;

// ============================================================================
// Points
// ============================================================================

/// A single point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PointXY {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
}

impl PointXY {
    /// Create a point.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Format as `(x, y)` with at most `digits` fraction digits.
    pub fn to_pair_string(&self, digits: usize) -> String {
        format!(
            "({}, {})",
            trim_double(self.x, digits),
            trim_double(self.y, digits)
        )
    }
}

/// One abscissa with any number of ordinates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MultiPointXY {
    /// Abscissa.
    pub x: f64,
    /// Ordinates at `x`, possibly empty.
    pub ys: Vec<f64>,
}

impl MultiPointXY {
    /// Create a sample.
    pub fn new(x: f64, ys: Vec<f64>) -> Self {
        Self { x, ys }
    }

    /// Create a sample with exactly one ordinate.
    pub fn single(x: f64, y: f64) -> Self {
        Self { x, ys: vec![y] }
    }
}

/// A continuous polyline through the plane.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GraphTrail {
    /// Vertices in drawing order.
    pub points: Vec<PointXY>,
}

impl GraphTrail {
    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True if the trail has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ============================================================================
// Trail Construction
// ============================================================================

/// Indices where a new segment starts, bracketed by `0` and `points.len()`.
pub fn segment_boundaries(points: &[MultiPointXY], max_jump: f64) -> Vec<usize> {
    let mut boundaries = vec![0];

    for (i, pair) in points.windows(2).enumerate() {
        let (prev, cur) = (&pair[0], &pair[1]);
        let split = cur.ys.len() != prev.ys.len()
            || cur
                .ys
                .iter()
                .zip(&prev.ys)
                .any(|(a, b)| (a - b).abs() > max_jump);
        if split {
            boundaries.push(i + 1);
        }
    }

    boundaries.push(points.len());
    boundaries
}

/// Cut samples into continuous trails, one per branch per segment.
pub fn trails_from(points: &[MultiPointXY], max_jump: f64) -> Vec<GraphTrail> {
    let boundaries = segment_boundaries(points, max_jump);
    let mut trails = Vec::new();

    for seg in boundaries.windows(2) {
        let (lo, hi) = (seg[0], seg[1]);
        if lo >= hi {
            continue;
        }
        for branch in 0..points[lo].ys.len() {
            let trail = GraphTrail {
                points: points[lo..hi]
                    .iter()
                    .map(|p| PointXY::new(p.x, p.ys[branch]))
                    .collect(),
            };
            if trail.len() > 1 {
                trails.push(trail);
            }
        }
    }

    trails
}
