//! Polar model fitting in `(r, theta)`.
//!
//! ## Purpose
//!
//! Fits the six polar curve families (conic, line, rose, trochoid,
//! lemniscate, and the all-terms "enchilada" catch-all) to samples of a
//! polar relation and ranks them by fit.
//!
//! ## Design notes
//!
//! * **Basis**: twelve generators per sample,
//!   `[1, r, 1/r, r^2, cos t, sin t, cos 2t, sin 2t, cos 3t, sin 3t, cos 4t, sin 4t]`.
//! * **Families**: each family owns a fixed list of signatures; the best
//!   signature of each family competes in the ranking.
//!
//! ## Key concepts
//!
//! * **Conic**: `a + b/r + c cos t + d sin t = 0`, a focus-directrix conic,
//!   or `a + b r = 0`, a circle about the pole.
//! * **Rose**: `r = a cos kt + b sin kt` for `k` in `1..=4`.
//! * **Trochoid**: `r = a + b cos kt + c sin kt`.
//! * **Lemniscate**: `r^2 = a cos 2t + b sin 2t`.
//! * **Line**: `1/r = a cos t + b sin t`.

// External dependencies
use serde::{Deserialize, Serialize};

// Internal dependencies
use crate::algorithms::builder::{CandidateModel, ComplexityRule, DataModelBuilder, select_best};
use crate::math::numbers::amplitude;
use crate::primitives::points::MultiPointXY;
use crate::primitives::tolerances::Tolerances;

/// Number of basis generators per polar sample.
pub const POLAR_GENERATORS: usize = 12;

const NUM_RS: usize = 4;
const NUM_THETAS: usize = 4;

// ============================================================================
// Families
// ============================================================================

/// The polar curve families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolarFamily {
    /// Every generator; never matched to a named shape.
    Enchilada,
    /// Limaçons and their relatives.
    Trochoid,
    /// Focus-directrix conics and circles about the pole.
    Conic,
    /// Rhodonea curves.
    Rose,
    /// Straight lines.
    Line,
    /// Lemniscates of Bernoulli.
    Lemniscate,
}

impl PolarFamily {
    /// Families in ranking order.
    pub const ALL: [PolarFamily; 6] = [
        Self::Enchilada,
        Self::Trochoid,
        Self::Conic,
        Self::Rose,
        Self::Line,
        Self::Lemniscate,
    ];

    /// Lowercase family name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Enchilada => "enchilada",
            Self::Trochoid => "trochoid",
            Self::Conic => "conic",
            Self::Rose => "rose",
            Self::Line => "line",
            Self::Lemniscate => "lemniscate",
        }
    }

    /// Signatures tried for this family.
    pub fn signatures(self) -> Vec<Vec<usize>> {
        match self {
            Self::Enchilada => vec![(0..POLAR_GENERATORS).collect()],
            Self::Trochoid => vec![
                vec![0, 1, 4, 5],
                vec![0, 1, 6, 7],
                vec![0, 1, 8, 9],
                vec![0, 1, 10, 11],
            ],
            Self::Conic => vec![vec![0, 2, 4, 5], vec![0, 1]],
            Self::Rose => vec![
                vec![1, 4, 5],
                vec![1, 6, 7],
                vec![1, 8, 9],
                vec![1, 10, 11],
            ],
            Self::Line => vec![vec![2, 4, 5]],
            Self::Lemniscate => vec![vec![3, 6, 7]],
        }
    }
}

/// Conic identity implied by a polar conic fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolarConicKind {
    /// Eccentricity within tolerance of 1.
    Parabola,
    /// Eccentricity below 1, or a circle about the pole.
    Ellipse,
    /// Eccentricity above 1.
    Hyperbola,
}

// ============================================================================
// Polar Model
// ============================================================================

/// The best fit of one family.
#[derive(Debug, Clone, PartialEq)]
pub struct PolarModel {
    /// Which family produced the fit.
    pub family: PolarFamily,

    /// The fitted candidate.
    pub model: CandidateModel,
}

impl PolarModel {
    /// Fit `family` on `builder`.
    pub fn fit(family: PolarFamily, builder: &PolarModelBuilder, tol: &Tolerances) -> Self {
        let model = CandidateModel::evaluate(
            builder.data(),
            &family.signatures(),
            ComplexityRule::Polar,
            tol,
        );
        Self { family, model }
    }

    /// Number of terms of the winning signature.
    pub fn degree(&self) -> usize {
        self.model.signature.len()
    }

    /// Frequency `k` of rose and trochoid fits (`1..=4`).
    pub fn frequency(&self) -> usize {
        self.model.which_signature + 1
    }

    /// Eccentricity and identity of a conic fit.
    ///
    /// A near-parabolic fit is snapped to eccentricity 1 by rescaling the
    /// constant coefficient. Returns `None` for other families.
    pub fn conic(&mut self, tol: &Tolerances) -> Option<(f64, PolarConicKind)> {
        if self.family != PolarFamily::Conic {
            return None;
        }
        if self.model.which_signature != 0 {
            return Some((0.0, PolarConicKind::Ellipse));
        }

        let e = amplitude(self.model.coefficient(2), self.model.coefficient(3));
        let a = self.model.coefficient(0).abs();
        let ecc = e / a;
        if (ecc - 1.0).abs() < tol.parabolic_eccentricity {
            if let Some(c0) = self.model.coefficients.get_mut(0) {
                *c0 /= ecc;
            }
            Some((1.0, PolarConicKind::Parabola))
        } else if ecc < 1.0 {
            Some((ecc, PolarConicKind::Ellipse))
        } else {
            Some((ecc, PolarConicKind::Hyperbola))
        }
    }

    /// Cartesian form of a conic fit.
    pub fn cartesian_equation(&self) -> Option<String> {
        if self.family != PolarFamily::Conic {
            return None;
        }
        let m = |i| self.model.coefficient(i);
        if self.model.which_signature == 0 {
            Some(format!(
                "({})^2*(x^2+y^2) = (({})+({})*x+({})*y)^2",
                m(0),
                m(1),
                m(2),
                m(3)
            ))
        } else {
            Some(format!("({})^2*(x^2+y^2) - ({})^2 = 0", m(1), m(0)))
        }
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Rows of polar generators, one per `(r, theta)` sample.
#[derive(Debug, Clone, Default)]
pub struct PolarModelBuilder {
    data: DataModelBuilder,
}

impl PolarModelBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying row store.
    pub fn data(&self) -> &DataModelBuilder {
        &self.data
    }

    /// Add the generators of one `(r, theta)` sample.
    pub fn add_polar(&mut self, r: f64, theta: f64) {
        let mut row = Vec::with_capacity(POLAR_GENERATORS);
        row.extend_from_slice(&[1.0, r, 1.0 / r, r * r]);
        for k in 1..=NUM_THETAS {
            let phi = k as f64 * theta;
            row.push(phi.cos());
            row.push(phi.sin());
        }
        debug_assert_eq!(row.len(), NUM_RS + 2 * NUM_THETAS);
        self.data.add_row(row);
    }

    /// Add one row per radius of `point`, reading `x` as the angle.
    pub fn add_point(&mut self, point: &MultiPointXY) {
        for &r in &point.ys {
            self.add_polar(r, point.x);
        }
    }

    /// Every family fitted, sorted by fit (stable).
    pub fn ranked_models(&self, tol: &Tolerances) -> Vec<PolarModel> {
        let mut models: Vec<PolarModel> = PolarFamily::ALL
            .iter()
            .map(|&f| PolarModel::fit(f, self, tol))
            .collect();
        models.sort_by(|a, b| a.model.fit.total_cmp(&b.model.fit));
        models
    }
}

/// The simplest acceptable polar family for a set of `(theta, r)` samples.
pub fn best_polar_model(points: &[MultiPointXY], tol: &Tolerances) -> Option<PolarModel> {
    let mut builder = PolarModelBuilder::new();
    for p in points {
        builder.add_point(p);
    }
    select_best(builder.ranked_models(tol), tol.polar_worst_fit, |m| {
        (m.model.fit, m.model.complexity)
    })
}
