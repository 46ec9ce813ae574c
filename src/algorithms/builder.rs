//! Least-squares model fitting over a bank of basis rows.
//!
//! ## Purpose
//!
//! A [`DataModelBuilder`] accumulates one row of basis-function values per
//! sample point. Fitting a model selects a subset of the basis columns (a
//! *signature*), takes the singular value decomposition of the reduced
//! design matrix, and reads the null-space direction off the last right
//! singular vector.
//!
//! ## Design notes
//!
//! * **Fit score**: `log10(s_min / s_max)`; `-inf` for an exact fit and
//!   `+inf` when too few usable rows remain.
//! * **Row filtering**: rows with NaN or oversized entries are skipped
//!   rather than clamped.
//! * **Candidates**: [`CandidateModel`] runs several signatures and keeps
//!   the best; ties go to the later signature.
//!
//! ## Key concepts
//!
//! * **Signature**: indices of basis columns that participate in a model.
//! * **Complexity**: number of terms, used to prefer simpler models among
//!   equally good fits.
//!
//! ## Invariants
//!
//! * Every stored row has the same length.
//! * A fit is `+inf` iff fewer than `rows_per_coefficient * len` rows qualify.

// External dependencies
use tracing::trace;

// Internal dependencies
use crate::math::matrix::Matrix;
use crate::primitives::tolerances::Tolerances;

// ============================================================================
// Model Fit
// ============================================================================

/// The outcome of fitting one signature.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFit {
    /// Null-space coefficients, one per signature entry.
    pub coefficients: Vec<f64>,

    /// `log10` of the smallest to largest singular value ratio.
    pub fit: f64,
}

impl ModelFit {
    /// A fit with no usable data.
    pub fn unusable() -> Self {
        Self {
            coefficients: Vec::new(),
            fit: f64::INFINITY,
        }
    }
}

// ============================================================================
// Data Model Builder
// ============================================================================

/// Rows of basis-function values, one per sample.
#[derive(Debug, Clone, Default)]
pub struct DataModelBuilder {
    rows: Vec<Vec<f64>>,
}

impl DataModelBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one row of basis values.
    pub fn add_row(&mut self, row: Vec<f64>) {
        self.rows.push(row);
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The stored rows.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Fit the columns named by `signature`.
    pub fn build_model(&self, signature: &[usize], tol: &Tolerances) -> ModelFit {
        let degree = signature.len();
        if degree == 0 {
            return ModelFit::unusable();
        }

        let selected: Vec<Vec<f64>> = self
            .rows
            .iter()
            .filter_map(|row| {
                let picked: Option<Vec<f64>> =
                    signature.iter().map(|&j| row.get(j).copied()).collect();
                picked.filter(|r| qualifies(r, tol.max_row_value))
            })
            .collect();

        if selected.len() < tol.rows_per_coefficient * degree {
            trace!(
                rows = selected.len(),
                needed = tol.rows_per_coefficient * degree,
                "too few qualifying rows"
            );
            return ModelFit::unusable();
        }

        let a = Matrix::from_rows(&selected);
        let s = a.singular_values();
        let ratio = s[degree - 1] / s[0];
        let coefficients = a.right_singular_vectors().column(degree - 1);
        let fit = if ratio == 0.0 {
            f64::NEG_INFINITY
        } else {
            ratio.log10()
        };

        trace!(?signature, fit, "model fitted");
        ModelFit { coefficients, fit }
    }
}

fn qualifies(row: &[f64], max_value: f64) -> bool {
    let mut largest = 0.0_f64;
    for v in row {
        if v.is_nan() {
            return false;
        }
        largest = largest.max(v.abs());
    }
    largest <= max_value
}

// ============================================================================
// Candidate Models
// ============================================================================

/// How pruning adjusts the complexity of a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplexityRule {
    /// Term count, reduced by `1/n` for each pruned coefficient.
    Polynomial,

    /// Term count plus `(k - 1) / k` for `k` alternative signatures.
    Polar,
}

/// The best of several signatures fitted on one builder.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateModel {
    /// Columns used by the winning signature.
    pub signature: Vec<usize>,

    /// Position of the winning signature among the alternatives.
    pub which_signature: usize,

    /// Pruned coefficients of the winning fit.
    pub coefficients: Vec<f64>,

    /// Fit score of the winning signature.
    pub fit: f64,

    /// Preference among acceptable fits; lower is simpler.
    pub complexity: f64,
}

impl CandidateModel {
    /// Fit each signature and keep the best.
    pub fn evaluate(
        builder: &DataModelBuilder,
        signatures: &[Vec<usize>],
        rule: ComplexityRule,
        tol: &Tolerances,
    ) -> Self {
        let mut best = ModelFit::unusable();
        let mut which = 0;

        for (i, sig) in signatures.iter().enumerate() {
            let m = builder.build_model(sig, tol);
            if m.fit <= best.fit {
                best = m;
                which = i;
            }
        }

        let signature = signatures.get(which).cloned().unwrap_or_default();
        let mut coefficients = best.coefficients;
        let pruned = prune(&mut coefficients, tol.prune_ratio);

        let complexity = match rule {
            ComplexityRule::Polynomial if best.fit < f64::INFINITY => {
                let n = coefficients.len().max(1) as f64;
                signature.len() as f64 - pruned as f64 / n
            }
            ComplexityRule::Polynomial => f64::INFINITY,
            ComplexityRule::Polar => {
                let k = signatures.len().max(1) as f64;
                signature.len() as f64 + (k - 1.0) / k
            }
        };

        Self {
            signature,
            which_signature: which,
            coefficients,
            fit: best.fit,
            complexity,
        }
    }

    /// Coefficient `i` of the fit, or 0 if absent.
    pub fn coefficient(&self, i: usize) -> f64 {
        self.coefficients.get(i).copied().unwrap_or(0.0)
    }

    /// True if the fit is at or below `worst_fit`.
    pub fn is_acceptable(&self, worst_fit: f64) -> bool {
        self.fit <= worst_fit
    }
}

/// Zero entries below `ratio` times the largest magnitude; returns the count.
pub fn prune(values: &mut [f64], ratio: f64) -> usize {
    let largest = values.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let threshold = largest * ratio;
    let mut count = 0;
    for v in values.iter_mut() {
        if v.abs() < threshold {
            *v = 0.0;
            count += 1;
        }
    }
    count
}

/// Stable sort by fit, keep fits at or below `worst_fit`, then take the
/// simplest; the earliest wins ties.
pub fn select_best<M>(
    mut models: Vec<M>,
    worst_fit: f64,
    score: impl Fn(&M) -> (f64, f64),
) -> Option<M> {
    models.sort_by(|a, b| score(a).0.total_cmp(&score(b).0));

    let mut best: Option<M> = None;
    for m in models {
        let (fit, complexity) = score(&m);
        if fit > worst_fit {
            break;
        }
        match &best {
            Some(b) if complexity >= score(b).1 => {}
            _ => best = Some(m),
        }
    }
    best
}
