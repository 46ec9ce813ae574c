//! Analyzed items: equations and data columns with their samples.
//!
//! ## Purpose
//!
//! An analyzed item is what the solver holds for each user input. It knows
//! how to sample itself over a window, cut the samples into continuous
//! trails, pick a classifier and cache the classification result.
//!
//! ## Design notes
//!
//! * **Sampling**: equations are solved for the ordinate at evenly spaced
//!   abscissas. Where the number of ordinates changes between neighbours,
//!   the change is located by bisection so trails end close to the true
//!   turning point.
//! * **Polar**: polar relations are sampled over `theta` in `[0, 2 pi]`,
//!   converted to Cartesian trails, and prefer a square window around the
//!   origin.
//! * **Data**: data columns are sorted by abscissa and resampled to the
//!   configured number of points by linear interpolation or decimation.
//!
//! ## Invariants
//!
//! * A computed sample list always has exactly `num_points` entries, except
//!   for vertical lines which get `num_points` entries per intercept.
//! * Data abscissas are strictly increasing after construction.
//!
//! ## Non-goals
//!
//! * Items do not know about each other; the common window is the solver's.

// External dependencies
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::f64::consts::PI;
use tracing::{debug, trace};

// Internal dependencies
use crate::classifiers::{ClassificationResult, Classifier, ItemView};
use crate::engine::validator::Validator;
use crate::math::iterative::real_roots_with;
use crate::primitives::bounds::{Bounds, DEFAULT_BOUND_VALUE};
use crate::primitives::errors::Result;
use crate::primitives::points::{
    GraphTrail, MultiPointXY, PointXY, segment_boundaries, trails_from,
};
use crate::primitives::symbolic::{Bindings, Expression, SymbolicPolynomial};
use crate::primitives::tolerances::Tolerances;

/// Default number of samples per graph.
pub const DEFAULT_NUM_POINTS: usize = 600;

/// Relative size under which a leading ordinate coefficient is dropped.
const ORDINATE_EPSILON: f64 = 1.0e-8;

/// Halvings needed to shrink any finite bracket to adjacent floats.
const MAX_BISECTIONS: usize = 64;

// ============================================================================
// Equation Properties
// ============================================================================

/// Structural facts about an equation, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EquationProperties {
    /// Every coefficient is a constant.
    pub polynomial: bool,
    /// Polynomial of total degree at most two.
    pub quadratic: bool,
    /// Written in `r` and `theta`.
    pub polar: bool,
    /// Linear in the dependent variable.
    pub function: bool,
    /// The ordinate coefficients do not depend on the abscissa.
    pub constant: bool,
    /// The dependent variable does not appear (a vertical line family).
    pub undefined: bool,
    /// Some ordinate coefficient depends on the dependent variable.
    pub no_solution: bool,
    /// More than two variables appear.
    pub too_many_variables: bool,
}

// ============================================================================
// Analyzed Equation
// ============================================================================

/// An equation with its samples, trails and classification.
#[derive(Debug)]
pub struct AnalyzedEquation {
    relation: Box<dyn SymbolicPolynomial>,
    variable_count: usize,
    /// `[independent, dependent]`.
    variables: [String; 2],
    properties: EquationProperties,
    /// Coefficients of powers of the dependent variable, lowest first.
    ordinate_coefficients: Vec<Box<dyn Expression>>,
    constant_solution: OnceCell<Vec<f64>>,

    tol: Tolerances,
    num_points: usize,

    preferred_bounds: Bounds,
    polar_samples: Vec<MultiPointXY>,
    points: Option<Vec<MultiPointXY>>,
    trails: Option<Vec<GraphTrail>>,
    function_over_interval: bool,
    classifier: Option<&'static str>,
    result: Option<ClassificationResult>,
}

impl AnalyzedEquation {
    /// Analyze a relation with default tolerances and sample count.
    pub fn new<R: SymbolicPolynomial + 'static>(relation: R) -> Self {
        Self::from_boxed(Box::new(relation))
    }

    /// Analyze an already boxed relation.
    pub fn from_boxed(relation: Box<dyn SymbolicPolynomial>) -> Self {
        let names = relation.variables();
        let mut properties = EquationProperties::default();

        let pair = |a: &str, b: &str| [a.to_string(), b.to_string()];
        let is_polar_name = |v: &str| v == "r" || v == "theta";
        let variables = match names.as_slice() {
            [] => pair("x", "y"),
            [v] if is_polar_name(v) => {
                properties.polar = true;
                pair("theta", "r")
            }
            [v] if v != "y" => pair(v, "y"),
            [_] => pair("x", "y"),
            [a, b] if is_polar_name(a) && is_polar_name(b) => {
                properties.polar = true;
                pair("theta", "r")
            }
            [a, b] => pair(a, b),
            _ => {
                properties.too_many_variables = true;
                properties.no_solution = true;
                pair("x", "y")
            }
        };

        let mut eq = Self {
            relation,
            variable_count: names.len(),
            variables,
            properties,
            ordinate_coefficients: Vec::new(),
            constant_solution: OnceCell::new(),
            tol: Tolerances::default(),
            num_points: DEFAULT_NUM_POINTS,
            preferred_bounds: Bounds::default(),
            polar_samples: Vec::new(),
            points: None,
            trails: None,
            function_over_interval: false,
            classifier: None,
            result: None,
        };
        if !eq.properties.too_many_variables {
            eq.analyze_structure();
        }
        debug!(
            equation = eq.relation.text(),
            properties = ?eq.properties,
            "equation analyzed"
        );
        eq
    }

    fn analyze_structure(&mut self) {
        let p = &mut self.properties;
        if !p.polar {
            p.polynomial = self.relation.has_constant_coefficients();
            p.quadratic = p.polynomial && self.relation.degree() <= 2;
        }

        let [independent, dependent] = &self.variables;
        self.ordinate_coefficients = self.relation.coefficients_in(dependent);

        let solvable = self
            .ordinate_coefficients
            .iter()
            .all(|c| c.variables().iter().all(|v| v == independent));
        if !solvable {
            p.no_solution = true;
            return;
        }

        match self.ordinate_coefficients.len().saturating_sub(1) {
            0 => p.undefined = true,
            d => {
                p.function = d == 1;
                p.constant = self
                    .ordinate_coefficients
                    .iter()
                    .all(|c| c.variables().is_empty());
            }
        }
    }

    /// Use these tolerances for sampling and classification.
    pub fn with_tolerances(mut self, tol: Tolerances) -> Self {
        self.tol = tol;
        self
    }

    /// Use this many samples per graph.
    pub fn with_num_points(mut self, num_points: usize) -> Self {
        self.num_points = num_points;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The literal equation text.
    pub fn text(&self) -> &str {
        self.relation.text()
    }

    /// The relation being analyzed.
    pub fn relation(&self) -> &dyn SymbolicPolynomial {
        self.relation.as_ref()
    }

    /// `[independent, dependent]` variable names.
    pub fn variables(&self) -> &[String; 2] {
        &self.variables
    }

    /// Independent variable (`x`, or `theta` for polar).
    pub fn independent_variable(&self) -> &str {
        &self.variables[0]
    }

    /// Dependent variable (`y`, or `r` for polar).
    pub fn dependent_variable(&self) -> &str {
        &self.variables[1]
    }

    /// Structural properties.
    pub fn properties(&self) -> EquationProperties {
        self.properties
    }

    /// Number of distinct variables in the relation.
    pub fn variable_count(&self) -> usize {
        self.variable_count
    }

    /// True if more than two variables appear.
    pub fn has_too_many_variables(&self) -> bool {
        self.properties.too_many_variables
    }

    /// True for polar relations.
    pub fn is_polar(&self) -> bool {
        self.properties.polar
    }

    /// True if every coefficient is constant.
    pub fn is_polynomial(&self) -> bool {
        self.properties.polynomial
    }

    /// True for polynomials of total degree at most two.
    pub fn is_quadratic(&self) -> bool {
        self.properties.quadratic
    }

    /// True if the relation is linear in the dependent variable.
    pub fn is_function(&self) -> bool {
        self.properties.function
    }

    /// True if no sample in the last window had more than one distinct ordinate.
    pub fn is_function_over_interval(&self) -> bool {
        self.function_over_interval
    }

    /// True if the relation can not be solved for the dependent variable.
    pub fn cannot_be_solved(&self) -> bool {
        self.properties.no_solution || self.properties.undefined
    }

    // ========================================================================
    // Solving
    // ========================================================================

    /// Every real ordinate at abscissa `x`, ascending.
    pub fn find_real_solutions(&self, x: f64) -> MultiPointXY {
        if self.cannot_be_solved() || self.properties.too_many_variables {
            return MultiPointXY::new(x, Vec::new());
        }
        if self.properties.constant {
            let ys = self.constant_solution.get_or_init(|| self.solve_at(x));
            return MultiPointXY::new(x, ys.clone());
        }
        MultiPointXY::new(x, self.solve_at(x))
    }

    fn solve_at(&self, x: f64) -> Vec<f64> {
        let mut bindings = Bindings::new();
        bindings.insert(self.variables[0].clone(), x);
        let descending: Vec<f64> = self
            .ordinate_coefficients
            .iter()
            .rev()
            .map(|c| c.evaluate(&bindings))
            .collect();
        solve_descending(&descending, &self.tol)
    }

    /// Ordinates where the curve meets the line `x = 0`.
    pub fn y_intercepts(&self) -> Vec<f64> {
        if self.cannot_be_solved() || self.properties.polar {
            return Vec::new();
        }
        self.find_real_solutions(0.0).ys
    }

    /// Abscissas where the curve meets the line `y = 0`.
    pub fn x_intercepts(&self) -> Vec<f64> {
        if self.properties.too_many_variables || self.properties.polar {
            return Vec::new();
        }
        let coefficients = self.relation.coefficients_in(&self.variables[0]);
        if coefficients.len() < 2 {
            return Vec::new();
        }
        let mut bindings = Bindings::new();
        bindings.insert(self.variables[1].clone(), 0.0);
        let descending: Vec<f64> = coefficients
            .iter()
            .rev()
            .map(|c| c.evaluate(&bindings))
            .collect();
        solve_descending(&descending, &self.tol)
    }

    // ========================================================================
    // Sampling
    // ========================================================================

    /// Sample the relation over `[low, high]`, refining jumps by bisection.
    pub fn solve_for_points(&self, low: f64, high: f64) -> Vec<MultiPointXY> {
        let n = self.num_points.max(2);
        let delta = (high - low) / (n - 1) as f64;
        let mut r: Vec<MultiPointXY> = (0..n)
            .map(|i| self.find_real_solutions(low + i as f64 * delta))
            .collect();

        let max_jump = self.preferred_bounds.height().abs();
        let boundaries = segment_boundaries(&r, max_jump);
        for &sb in &boundaries[1..boundaries.len() - 1] {
            let refined = self.find_boundary(&r[sb - 1], &r[sb]);
            if refined.ys.len() == r[sb - 1].ys.len() {
                r[sb - 1] = refined.clone();
            }
            if refined.ys.len() == r[sb].ys.len() {
                r[sb] = refined;
            }
        }
        r
    }

    /// Bisect toward the abscissa where the number of ordinates changes.
    ///
    /// Stops after `MAX_BISECTIONS` halvings or once the midpoint no longer
    /// separates the endpoints.
    fn find_boundary(&self, left: &MultiPointXY, right: &MultiPointXY) -> MultiPointXY {
        let (mut p0, mut p1) = (left.clone(), right.clone());
        for _ in 0..MAX_BISECTIONS {
            let (n0, n1) = (p0.ys.len(), p1.ys.len());
            if p1.x - p0.x < self.tol.bisection_width {
                break;
            }
            if n0 == n1 {
                return p0;
            }

            // A double ordinate is already the turning point.
            if n1 > n0 && has_repeats(&p1.ys) {
                return p1;
            }
            if n0 > n1 && has_repeats(&p0.ys) {
                return p0;
            }

            let x = 0.5 * (p0.x + p1.x);
            if x <= p0.x || x >= p1.x {
                break;
            }
            let mid = self.find_real_solutions(x);
            let wider = n0.max(n1);
            let mid_matches_wider = mid.ys.len() == wider;
            if (n1 > n0) == mid_matches_wider {
                p1 = mid;
            } else {
                p0 = mid;
            }
        }
        if p0.ys.len() > p1.ys.len() { p0 } else { p1 }
    }

    /// Sample the relation in the given window and build its trails.
    pub fn compute_points(&mut self, b: &Bounds) {
        self.preferred_bounds = *b;
        let max_jump = (b.top - b.bottom).abs();

        if self.properties.polar {
            self.compute_polar_points(max_jump);
        } else if self.properties.undefined {
            let (points, trails) = self.vertical_lines(b);
            self.points = Some(points);
            self.trails = Some(trails);
            self.preferred_bounds = *b;
        } else {
            let points = self.solve_for_points(b.left, b.right);
            self.trails = Some(trails_from(&points, max_jump));
            self.points = Some(points);
            self.preferred_bounds = *b;
        }
        self.function_over_interval = self.function_test();
        trace!(
            equation = self.text(),
            trails = self.trails.as_ref().map_or(0, Vec::len),
            function = self.function_over_interval,
            "points computed"
        );
    }

    fn compute_polar_points(&mut self, max_jump: f64) {
        let samples = self.solve_for_points(0.0, 2.0 * PI);
        let polar_trails = trails_from(&samples, max_jump);

        let mut extent = f64::NEG_INFINITY;
        let mut points = Vec::new();
        let trails: Vec<GraphTrail> = polar_trails
            .iter()
            .map(|t| GraphTrail {
                points: t
                    .points
                    .iter()
                    .map(|p| {
                        let q = PointXY::new(p.y * p.x.cos(), p.y * p.x.sin());
                        extent = extent.max(q.x.abs()).max(q.y.abs());
                        points.push(MultiPointXY::single(q.x, q.y));
                        q
                    })
                    .collect(),
            })
            .collect();

        let half = if extent.is_finite() && extent > 0.0 {
            extent.min(DEFAULT_BOUND_VALUE)
        } else {
            DEFAULT_BOUND_VALUE
        };
        self.preferred_bounds = Bounds::new(-half, half, half, -half);
        self.polar_samples = samples;
        self.points = Some(points);
        self.trails = Some(trails);
    }

    /// Lines `x = c` for each intercept `c` inside the window.
    fn vertical_lines(&self, b: &Bounds) -> (Vec<MultiPointXY>, Vec<GraphTrail>) {
        let n = self.num_points.max(2);
        let delta = (b.top - b.bottom) / (n - 1) as f64;
        let mut points = Vec::new();
        let mut trails = Vec::new();

        for x in self
            .x_intercepts()
            .into_iter()
            .filter(|x| *x >= b.left && *x <= b.right)
        {
            let line: Vec<PointXY> = (0..n)
                .map(|i| PointXY::new(x, b.bottom + i as f64 * delta))
                .collect();
            points.extend(line.iter().map(|p| MultiPointXY::single(p.x, p.y)));
            trails.push(GraphTrail { points: line });
        }
        (points, trails)
    }

    /// True if some sample has an ordinate and none has two distinct ones.
    fn function_test(&self) -> bool {
        let Some(points) = &self.points else {
            return false;
        };
        if self.properties.polar || self.properties.undefined {
            return false;
        }
        let spread = self.tol.function_spread;
        points.iter().any(|p| !p.ys.is_empty())
            && points.iter().all(|p| {
                p.ys.windows(2).all(|w| (w[1] - w[0]).abs() <= spread)
            })
    }

    // ========================================================================
    // Classification
    // ========================================================================

    /// Choose a classifier for the current samples and cache its result.
    pub fn update_features(&mut self) {
        let x_intercepts = self.x_intercepts();
        let y_intercepts = self.y_intercepts();
        let empty_points: Vec<MultiPointXY> = Vec::new();
        let empty_trails: Vec<GraphTrail> = Vec::new();

        let (name, result) = {
            let points = if self.properties.polar {
                &self.polar_samples
            } else {
                self.points.as_ref().unwrap_or(&empty_points)
            };
            let view = ItemView {
                name: self.relation.text(),
                text: self.relation.text(),
                equation_print: self.relation.text(),
                relation: Some(self.relation.as_ref()),
                variables: &self.variables,
                degree: self.relation.degree(),
                polynomial: self.properties.polynomial,
                solvable_function: self.properties.function,
                polar: self.properties.polar,
                points,
                trails: self.trails.as_ref().unwrap_or(&empty_trails),
                x_intercepts: &x_intercepts,
                y_intercepts: &y_intercepts,
                bounds: self.preferred_bounds,
            };
            let classifier = Classifier::for_equation(&view, self.properties.quadratic, &self.tol);
            (classifier.name(), classifier.classify(&view, &self.tol))
        };

        debug!(
            equation = self.text(),
            classifier = name,
            identity = ?result.identity,
            "equation classified"
        );
        self.classifier = Some(name);
        self.result = Some(result);
    }
}

/// Real roots of descending coefficients, leading negligible terms dropped.
fn solve_descending(c: &[f64], tol: &Tolerances) -> Vec<f64> {
    if c.iter().any(|v| v.is_nan()) {
        return Vec::new();
    }
    let sum_abs: f64 = c.iter().map(|v| v.abs()).sum();
    let eps = sum_abs * ORDINATE_EPSILON + f64::MIN_POSITIVE;
    let Some(lead) = c.iter().position(|v| v.abs() >= eps) else {
        return Vec::new();
    };
    let c = &c[lead..];

    match c.len() - 1 {
        0 => Vec::new(),
        1 => vec![-c[1] / c[0]],
        2 => {
            let t0 = -0.5 * c[1] / c[0];
            let t1 = c[2] / c[0];
            let d2 = t0 * t0 - t1;
            let sum_sq: f64 = c.iter().map(|v| v * v).sum();
            let eps2 = sum_sq * ORDINATE_EPSILON * ORDINATE_EPSILON + f64::MIN_POSITIVE;
            if d2 < -eps2 {
                Vec::new()
            } else if d2 < eps2 {
                vec![t0, t0]
            } else {
                let disc = d2.sqrt();
                vec![t0 - disc, t0 + disc]
            }
        }
        _ => real_roots_with(c, tol),
    }
}

fn has_repeats(ys: &[f64]) -> bool {
    ys.windows(2).any(|w| w[0] == w[1])
}

// ============================================================================
// Analyzed Data
// ============================================================================

/// A named data column paired with its abscissas.
#[derive(Debug)]
pub struct AnalyzedData {
    x_name: String,
    y_name: String,
    x: Vec<f64>,
    y: Vec<f64>,
    x_min: f64,
    x_max: f64,
    y_min: f64,
    y_max: f64,

    tol: Tolerances,
    num_points: usize,

    preferred_bounds: Bounds,
    window: (usize, usize),
    points: Option<Vec<MultiPointXY>>,
    trails: Option<Vec<GraphTrail>>,
    result: Option<ClassificationResult>,
}

impl AnalyzedData {
    /// Sort the pairs by abscissa; a repeated abscissa keeps its last ordinate.
    pub fn new(
        x_name: impl Into<String>,
        y_name: impl Into<String>,
        x: &[f64],
        y: &[f64],
    ) -> Result<Self> {
        Validator::validate_data(x, y)?;

        let mut pairs: Vec<(usize, f64, f64)> = x
            .iter()
            .zip(y)
            .enumerate()
            .map(|(i, (&x, &y))| (i, x, y))
            .collect();
        pairs.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        let mut sorted: Vec<(f64, f64)> = Vec::with_capacity(pairs.len());
        for (_, x, y) in pairs {
            match sorted.last_mut() {
                Some(last) if last.0 == x => last.1 = y,
                _ => sorted.push((x, y)),
            }
        }

        let (xs, ys): (Vec<f64>, Vec<f64>) = sorted.into_iter().unzip();
        let fold = |v: &[f64]| {
            v.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &a| {
                (lo.min(a), hi.max(a))
            })
        };
        let (x_min, x_max) = fold(&xs);
        let (y_min, y_max) = fold(&ys);
        let last = xs.len() - 1;

        Ok(Self {
            x_name: x_name.into(),
            y_name: y_name.into(),
            x: xs,
            y: ys,
            x_min,
            x_max,
            y_min,
            y_max,
            tol: Tolerances::default(),
            num_points: DEFAULT_NUM_POINTS,
            preferred_bounds: Bounds::new(x_min, x_max, y_max, y_min),
            window: (0, last),
            points: None,
            trails: None,
            result: None,
        })
    }

    /// Use these tolerances for fitting.
    pub fn with_tolerances(mut self, tol: Tolerances) -> Self {
        self.tol = tol;
        self
    }

    /// Resample to this many points.
    pub fn with_num_points(mut self, num_points: usize) -> Self {
        self.num_points = num_points;
        self
    }

    /// Name of the ordinate column, which names the item.
    pub fn name(&self) -> &str {
        &self.y_name
    }

    /// Name of the abscissa column.
    pub fn x_name(&self) -> &str {
        &self.x_name
    }

    /// Sorted abscissas.
    pub fn x_data(&self) -> &[f64] {
        &self.x
    }

    /// Ordinates matching [`Self::x_data`].
    pub fn y_data(&self) -> &[f64] {
        &self.y
    }

    /// `(min, max)` of the abscissas.
    pub fn x_extent(&self) -> (f64, f64) {
        (self.x_min, self.x_max)
    }

    /// `(min, max)` of the ordinates.
    pub fn y_extent(&self) -> (f64, f64) {
        (self.y_min, self.y_max)
    }

    /// The stored pair at `index`.
    pub fn real_data_point(&self, index: usize) -> Option<PointXY> {
        Some(PointXY::new(*self.x.get(index)?, *self.y.get(index)?))
    }

    /// Indices of the stored pairs covering the last window, inclusive.
    pub fn window_indices(&self) -> (usize, usize) {
        self.window
    }

    /// Resample the data inside the window and build trails.
    pub fn compute_points(&mut self, b: &Bounds) {
        let last = self.x.len() - 1;
        // Largest index at or left of `left`, smallest at or right of `right`.
        let left = self.x.partition_point(|&x| x <= b.left).saturating_sub(1);
        let right = self.x.partition_point(|&x| x < b.right).min(last);
        let (left, right) = (left.min(right), right.max(left));
        self.window = (left, right);

        let n = self.num_points.max(2);
        let total = right - left + 1;
        let points = if total == n {
            (left..=right)
                .map(|i| MultiPointXY::single(self.x[i], self.y[i]))
                .collect()
        } else {
            self.resample(left, right, n)
        };

        self.trails = Some(trails_from(&points, (b.top - b.bottom).abs()));
        self.points = Some(points);
        self.preferred_bounds = *b;
    }

    /// `n` samples at even index-space steps, linear between stored pairs.
    fn resample(&self, left: usize, right: usize, n: usize) -> Vec<MultiPointXY> {
        if left == right {
            return vec![MultiPointXY::single(self.x[left], self.y[left]); n];
        }
        let step = (right - left) as f64 / (n - 1) as f64;
        let decimate = right - left + 1 > n;
        (0..n)
            .map(|i| {
                let pos = left as f64 + i as f64 * step;
                if decimate {
                    let k = (pos.round() as usize).min(right);
                    return MultiPointXY::single(self.x[k], self.y[k]);
                }
                let k = (pos.floor() as usize).min(right - 1);
                let t = pos - k as f64;
                MultiPointXY::single(
                    self.x[k] + t * (self.x[k + 1] - self.x[k]),
                    self.y[k] + t * (self.y[k + 1] - self.y[k]),
                )
            })
            .collect()
    }

    /// Index of the sample nearest `x`, or `None` outside the sampled range.
    pub fn point_index_near(&self, x: f64) -> Option<usize> {
        let points = self.points.as_ref()?;
        let (first, last) = (points.first()?.x, points.last()?.x);
        if x < first || x > last {
            return None;
        }
        let i = points.partition_point(|p| p.x < x);
        if i == 0 {
            return Some(0);
        }
        if i >= points.len() {
            return Some(points.len() - 1);
        }
        let nearer_left = (x - points[i - 1].x).abs() <= (points[i].x - x).abs();
        Some(if nearer_left { i - 1 } else { i })
    }

    /// Fit the resampled data and cache the result.
    pub fn update_features(&mut self) {
        let variables = [self.x_name.clone(), self.y_name.clone()];
        let points = self.points.clone().unwrap_or_default();
        let trails = self.trails.clone().unwrap_or_default();
        let view = ItemView {
            name: &self.y_name,
            text: "",
            equation_print: &self.y_name,
            relation: None,
            variables: &variables,
            degree: 0,
            polynomial: false,
            solvable_function: true,
            polar: false,
            points: &points,
            trails: &trails,
            x_intercepts: &[],
            y_intercepts: &[],
            bounds: self.preferred_bounds,
        };
        let classifier = Classifier::for_data(&points, &self.tol);
        let result = classifier.classify_data(&view, &self.tol);
        debug!(data = %self.y_name, identity = ?result.identity, "data classified");
        self.result = Some(result);
    }
}

// ============================================================================
// Analyzed Item
// ============================================================================

/// Either kind of item the solver holds.
#[derive(Debug)]
pub enum AnalyzedItem {
    /// A relation between two variables.
    Equation(Box<AnalyzedEquation>),
    /// A named data column.
    Data(Box<AnalyzedData>),
}

impl From<AnalyzedEquation> for AnalyzedItem {
    fn from(e: AnalyzedEquation) -> Self {
        Self::Equation(Box::new(e))
    }
}

impl From<AnalyzedData> for AnalyzedItem {
    fn from(d: AnalyzedData) -> Self {
        Self::Data(Box::new(d))
    }
}

impl AnalyzedItem {
    /// Equation text or data column name.
    pub fn name(&self) -> &str {
        match self {
            Self::Equation(e) => e.text(),
            Self::Data(d) => d.name(),
        }
    }

    /// True if both items come from the same input.
    pub fn same_source(&self, other: &AnalyzedItem) -> bool {
        match (self, other) {
            (Self::Equation(a), Self::Equation(b)) => a.text() == b.text(),
            (Self::Data(a), Self::Data(b)) => {
                a.x_name == b.x_name && a.y_name == b.y_name && a.x == b.x && a.y == b.y
            }
            _ => false,
        }
    }

    /// The equation, if this is one.
    pub fn as_equation(&self) -> Option<&AnalyzedEquation> {
        match self {
            Self::Equation(e) => Some(e),
            Self::Data(_) => None,
        }
    }

    /// The data column, if this is one.
    pub fn as_data(&self) -> Option<&AnalyzedData> {
        match self {
            Self::Data(d) => Some(d),
            Self::Equation(_) => None,
        }
    }

    /// True for polar equations.
    pub fn is_polar(&self) -> bool {
        matches!(self, Self::Equation(e) if e.is_polar())
    }

    /// The window the item last sampled in, or its natural window.
    pub fn preferred_bounds(&self) -> Bounds {
        match self {
            Self::Equation(e) => e.preferred_bounds,
            Self::Data(d) => d.preferred_bounds,
        }
    }

    /// Sample the item in the given window.
    pub fn compute_points(&mut self, b: &Bounds) {
        match self {
            Self::Equation(e) => e.compute_points(b),
            Self::Data(d) => d.compute_points(b),
        }
    }

    /// Reclassify from the current samples.
    pub fn update_features(&mut self) {
        match self {
            Self::Equation(e) => e.update_features(),
            Self::Data(d) => d.update_features(),
        }
    }

    /// Samples from the last [`Self::compute_points`].
    pub fn points(&self) -> Option<&[MultiPointXY]> {
        match self {
            Self::Equation(e) => e.points.as_deref(),
            Self::Data(d) => d.points.as_deref(),
        }
    }

    /// Trails from the last [`Self::compute_points`].
    pub fn trails(&self) -> Option<&[GraphTrail]> {
        match self {
            Self::Equation(e) => e.trails.as_deref(),
            Self::Data(d) => d.trails.as_deref(),
        }
    }

    /// Cached classification, if computed.
    pub fn result(&self) -> Option<&ClassificationResult> {
        match self {
            Self::Equation(e) => e.result.as_ref(),
            Self::Data(d) => d.result.as_ref(),
        }
    }

    /// Sample at relative position `position` in `[0, 1]`.
    pub fn point(&self, position: f64) -> Option<&MultiPointXY> {
        let points = self.points()?;
        if points.is_empty() || !(0.0..=1.0).contains(&position) {
            return None;
        }
        let index = (position * (points.len() - 1) as f64).floor() as usize;
        points.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::symbolic::PolynomialRelation;

    fn parabola() -> PolynomialRelation {
        // y - x^2 = 0
        PolynomialRelation::new("y = x^2")
            .term(1.0, &[("y", 1)])
            .term(-1.0, &[("x", 2)])
    }

    #[test]
    fn test_properties_of_parabola() {
        let eq = AnalyzedEquation::new(parabola());
        let p = eq.properties();
        assert!(p.polynomial && p.quadratic && p.function);
        assert!(!p.polar && !p.constant && !p.undefined);
    }

    #[test]
    fn test_solve_descending() {
        let tol = Tolerances::default();
        assert_eq!(solve_descending(&[1.0, 0.0, -4.0], &tol), vec![-2.0, 2.0]);
        assert_eq!(solve_descending(&[1.0, -2.0, 1.0], &tol), vec![1.0, 1.0]);
        assert!(solve_descending(&[1.0, 0.0, 4.0], &tol).is_empty());
        assert_eq!(solve_descending(&[0.0, 2.0, -4.0], &tol), vec![2.0]);
        assert!(solve_descending(&[f64::NAN, 1.0], &tol).is_empty());
    }

    #[test]
    fn test_intercepts_of_parabola() {
        let eq = AnalyzedEquation::new(parabola());
        assert_eq!(eq.y_intercepts(), vec![0.0]);
        let xs = eq.x_intercepts();
        assert_eq!(xs.len(), 2);
        assert!(xs.iter().all(|x| x.abs() < 1e-12));
    }

    #[test]
    fn test_circle_samples_split_at_edges() {
        // x^2 + y^2 - 4 = 0
        let circle = PolynomialRelation::conic([1.0, 0.0, 1.0, 0.0, 0.0, -4.0]);
        let mut eq = AnalyzedEquation::new(circle).with_num_points(101);
        eq.compute_points(&Bounds::default());
        let points = eq.points.as_ref().unwrap();
        assert_eq!(points.len(), 101);
        assert!(!eq.is_function_over_interval());
        // Refined edge samples land near x = +-2.
        let first_with_two = points.iter().find(|p| p.ys.len() == 2).unwrap();
        assert!((first_with_two.x + 2.0).abs() < 0.2);
    }

    #[test]
    fn test_boundary_search_terminates_at_large_abscissa() {
        // (x - 1e9) y^2 + y - 1 = 0 changes its ordinate count near x = 1e9,
        // where neighbouring floats are farther apart than the bisection width.
        let relation = PolynomialRelation::new("(x - 1e9)*y^2 + y - 1 = 0")
            .term(1.0, &[("x", 1), ("y", 2)])
            .term(-1.0e9, &[("y", 2)])
            .term(1.0, &[("y", 1)])
            .term(-1.0, &[]);
        let mut eq = AnalyzedEquation::new(relation).with_num_points(11);
        eq.compute_points(&Bounds::new(1.0e9 - 0.5, 1.0e9 + 0.5, 10.0, -10.0));

        let points = eq.points.as_ref().unwrap();
        assert_eq!(points.len(), 11);
        assert!(points.iter().any(|p| p.ys.len() == 2));
    }

    #[test]
    fn test_boundary_search_between_adjacent_floats() {
        let relation = PolynomialRelation::new("(x - 1e9)*y^2 + y - 1 = 0")
            .term(1.0, &[("x", 1), ("y", 2)])
            .term(-1.0e9, &[("y", 2)])
            .term(1.0, &[("y", 1)])
            .term(-1.0, &[]);
        let eq = AnalyzedEquation::new(relation);

        let x0: f64 = 1.0e9 - 0.3;
        let x1 = f64::from_bits(x0.to_bits() + 1);
        let left = MultiPointXY { x: x0, ys: vec![] };
        let right = MultiPointXY { x: x1, ys: vec![1.0, 2.0] };
        let found = eq.find_boundary(&left, &right);
        assert!(found.x == x0 || found.x == x1);
    }

    #[test]
    fn test_data_sorting_and_dedup() {
        let d = AnalyzedData::new("t", "v", &[3.0, 1.0, 2.0, 1.0], &[30.0, 10.0, 20.0, 11.0])
            .unwrap();
        assert_eq!(d.x_data(), &[1.0, 2.0, 3.0]);
        assert_eq!(d.y_data(), &[11.0, 20.0, 30.0]);
        assert_eq!(d.y_extent(), (11.0, 30.0));
    }

    #[test]
    fn test_data_resampling() {
        let x: Vec<f64> = (0..10).map(f64::from).collect();
        let mut d = AnalyzedData::new("x", "y", &x, &x)
            .unwrap()
            .with_num_points(19);
        d.compute_points(&Bounds::new(0.0, 9.0, 9.0, 0.0));
        let points = d.points.as_ref().unwrap();
        assert_eq!(points.len(), 19);
        assert_eq!(points[1].x, 0.5);
        assert_eq!(points[18].x, 9.0);
        assert_eq!(d.point_index_near(4.4), Some(9));
        assert_eq!(d.point_index_near(12.0), None);
    }
}
