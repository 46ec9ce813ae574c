//! Polynomial and rational model fitting in `(x, y)`.
//!
//! ## Purpose
//!
//! Fits implicit polynomial relations `sum c_ij x^j y^i = 0` to sample
//! points. Two concrete families are provided: the general quadratic
//! (conic) in two variables, and rational functions `y = N(x) / D(x)`.
//!
//! ## Design notes
//!
//! * **Basis layout**: column `i * (dx + 1) + j` holds `x^j y^i` for
//!   `0 <= i <= dy` and `0 <= j <= dx`.
//! * **Integer scaling**: extracted coefficients are rescaled to small
//!   integers where possible.
//!
//! ## Invariants
//!
//! * A rational model needs a builder with `dy >= 1`.

// Internal dependencies
use crate::algorithms::builder::{CandidateModel, ComplexityRule, DataModelBuilder, select_best};
use crate::math::numbers::make_integer;
use crate::math::polynomial::Polynomial;
use crate::primitives::points::MultiPointXY;
use crate::primitives::symbolic::PolynomialRelation;
use crate::primitives::tolerances::Tolerances;

// ============================================================================
// Builder
// ============================================================================

/// Rows of monomials `x^j y^i` up to the given degrees.
#[derive(Debug, Clone)]
pub struct PolynomialModelBuilder {
    x_degree: usize,
    y_degree: usize,
    data: DataModelBuilder,
}

impl PolynomialModelBuilder {
    /// A builder for monomials up to `x^x_degree y^y_degree`.
    pub fn new(x_degree: usize, y_degree: usize) -> Self {
        Self {
            x_degree,
            y_degree,
            data: DataModelBuilder::new(),
        }
    }

    /// Largest power of `x`.
    pub fn x_degree(&self) -> usize {
        self.x_degree
    }

    /// Largest power of `y`.
    pub fn y_degree(&self) -> usize {
        self.y_degree
    }

    /// The underlying row store.
    pub fn data(&self) -> &DataModelBuilder {
        &self.data
    }

    /// Add the row for one `(x, y)` sample.
    pub fn add_xy(&mut self, x: f64, y: f64) {
        let mut row = Vec::with_capacity((self.x_degree + 1) * (self.y_degree + 1));
        let mut yp = 1.0;
        for _ in 0..=self.y_degree {
            let mut xp = 1.0;
            for _ in 0..=self.x_degree {
                row.push(xp * yp);
                xp *= x;
            }
            yp *= y;
        }
        self.data.add_row(row);
    }

    /// Add one row per ordinate of `point`.
    pub fn add_point(&mut self, point: &MultiPointXY) {
        for &y in &point.ys {
            self.add_xy(point.x, y);
        }
    }

    /// Column index of `x^j y^i`.
    pub fn column(&self, j: usize, i: usize) -> usize {
        i * (self.x_degree + 1) + j
    }
}

// ============================================================================
// Quadratic Model
// ============================================================================

/// Best conic `a + b x + c x^2 + d y + e xy + f y^2 = 0` through the samples.
#[derive(Debug, Clone, PartialEq)]
pub struct QuadraticModel {
    /// The fitted candidate.
    pub model: CandidateModel,
}

impl QuadraticModel {
    /// Fit a conic on a builder of degrees at least `(2, 2)`.
    pub fn fit(builder: &PolynomialModelBuilder, tol: &Tolerances) -> Self {
        let mut signature = Vec::with_capacity(6);
        for i in 0..=builder.y_degree().min(2) {
            for j in 0..=builder.x_degree().min(2) {
                if i + j <= 2 {
                    signature.push(builder.column(j, i));
                }
            }
        }

        let mut model = CandidateModel::evaluate(
            builder.data(),
            &[signature],
            ComplexityRule::Polynomial,
            tol,
        );
        model.complexity = 0.0;
        Self { model }
    }

    /// Coefficients in the order `1, x, x^2, y, xy, y^2`, scaled to small
    /// integers where possible.
    pub fn integer_coefficients(&self, tol: &Tolerances) -> Vec<f64> {
        make_integer(&self.model.coefficients, tol.integer_limit)
    }

    /// The fitted conic as a relation in `x` and `y`.
    pub fn relation(&self, tol: &Tolerances) -> PolynomialRelation {
        let mv = self.integer_coefficients(tol);
        let c = |i: usize| mv.get(i).copied().unwrap_or(0.0);
        PolynomialRelation::conic([c(2), c(4), c(5), c(1), c(3), c(0)])
    }
}

// ============================================================================
// Rational Model
// ============================================================================

/// Best `D(x) y - N(x) = 0` through the samples.
#[derive(Debug, Clone, PartialEq)]
pub struct RationalModel {
    /// The fitted candidate.
    pub model: CandidateModel,

    numerator_degree: usize,
    denominator_degree: usize,
}

impl RationalModel {
    /// Fit numerator and denominator degrees, each capped at the builder's
    /// `x` degree. Returns `None` if the builder has no `y` column.
    pub fn fit(
        builder: &PolynomialModelBuilder,
        numerator_degree: usize,
        denominator_degree: usize,
        tol: &Tolerances,
    ) -> Option<Self> {
        if builder.y_degree() < 1 {
            return None;
        }
        let dx = builder.x_degree();
        let numerator_degree = numerator_degree.min(dx);
        let denominator_degree = denominator_degree.min(dx);

        let signature: Vec<usize> = (0..=numerator_degree)
            .chain((0..=denominator_degree).map(|i| builder.column(i, 1)))
            .collect();

        let model = CandidateModel::evaluate(
            builder.data(),
            &[signature],
            ComplexityRule::Polynomial,
            tol,
        );
        Some(Self {
            model,
            numerator_degree,
            denominator_degree,
        })
    }

    /// Degree of the numerator.
    pub fn numerator_degree(&self) -> usize {
        self.numerator_degree
    }

    /// Degree of the denominator.
    pub fn denominator_degree(&self) -> usize {
        self.denominator_degree
    }

    /// `N(x)`, highest power first, scaled to small integers where possible.
    pub fn numerator(&self, tol: &Tolerances) -> Polynomial<f64> {
        let n = self.numerator_degree;
        let c: Vec<f64> = (0..=n).map(|i| -self.model.coefficient(n - i)).collect();
        Polynomial::new_with(&make_integer(&c, tol.integer_limit), tol)
    }

    /// `D(x)`, highest power first, scaled to small integers where possible.
    pub fn denominator(&self, tol: &Tolerances) -> Polynomial<f64> {
        let n = self.numerator_degree;
        let d = self.denominator_degree;
        let mut c = vec![0.0; d + 1];
        for i in 0..=d {
            c[d - i] = self.model.coefficient(1 + i + n);
        }
        Polynomial::new_with(&make_integer(&c, tol.integer_limit), tol)
    }
}

// ============================================================================
// Polynomial Fit Search
// ============================================================================

/// Largest numerator or denominator degree tried by [`PolynomialFit`].
pub const RATIONAL_DEGREE: usize = 7;

/// One candidate of the polynomial search.
#[derive(Debug, Clone, PartialEq)]
pub enum PolynomialCandidate {
    /// A general conic.
    Quadratic(QuadraticModel),

    /// A rational function.
    Rational(RationalModel),
}

impl PolynomialCandidate {
    /// The fitted candidate model.
    pub fn model(&self) -> &CandidateModel {
        match self {
            Self::Quadratic(q) => &q.model,
            Self::Rational(r) => &r.model,
        }
    }
}

/// The conic and the 64 rational candidates fitted to one point set.
#[derive(Debug, Clone)]
pub struct PolynomialFit {
    best: Option<PolynomialCandidate>,
}

impl PolynomialFit {
    /// Fit every candidate and keep the simplest acceptable one.
    pub fn new(points: &[MultiPointXY], tol: &Tolerances) -> Self {
        let mut q_builder = PolynomialModelBuilder::new(2, 2);
        let mut r_builder = PolynomialModelBuilder::new(RATIONAL_DEGREE, 1);
        for p in points {
            q_builder.add_point(p);
            r_builder.add_point(p);
        }

        let size = RATIONAL_DEGREE + 1;
        let mut candidates = Vec::with_capacity(1 + size * size);
        candidates.push(PolynomialCandidate::Quadratic(QuadraticModel::fit(
            &q_builder, tol,
        )));
        for i in 0..size * size {
            if let Some(r) = RationalModel::fit(&r_builder, i / size, i % size, tol) {
                candidates.push(PolynomialCandidate::Rational(r));
            }
        }

        let best = select_best(candidates, tol.polynomial_worst_fit, |c| {
            (c.model().fit, c.model().complexity)
        });
        Self { best }
    }

    /// The chosen candidate, if any fit was acceptable.
    pub fn best_guess(&self) -> Option<&PolynomialCandidate> {
        self.best.as_ref()
    }
}
