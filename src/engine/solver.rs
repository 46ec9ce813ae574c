//! The solver: an ordered collection of analyzed items sharing one window.
//!
//! ## Purpose
//!
//! The solver owns every analyzed item, samples and classifies them on
//! `solve`, and grows its window until it covers the preferred window of
//! every item it draws.
//!
//! ## Design notes
//!
//! * **Sole owner**: items live inside [`Solution`]s in insertion order and
//!   are only reachable by reference through the solver.
//! * **Flags**: each solution carries show and sonify flags. A hidden graph
//!   is never sonified, and at most one polar graph is sonified, only when
//!   no Cartesian graph is shown.
//! * **Counts on demand**: per-coordinate-system flag counts are computed
//!   from the solutions rather than tracked incrementally.
//!
//! ## Key concepts
//!
//! * **Bounds maximization**: after the first item sets the window, every
//!   later item's preferred window is merged in; a change caused by a later
//!   item reruns the pass, up to `max_iterations` passes.
//!
//! ## Non-goals
//!
//! * The solver is not thread-safe and does not notify listeners.

// External dependencies
use tracing::{debug, warn};

// Internal dependencies
use crate::classifiers::ClassificationResult;
use crate::engine::analyzed::{AnalyzedData, AnalyzedEquation, AnalyzedItem, DEFAULT_NUM_POINTS};
use crate::engine::validator::Validator;
use crate::primitives::bounds::Bounds;
use crate::primitives::errors::{Result, ShapeError};
use crate::primitives::points::{GraphTrail, MultiPointXY};
use crate::primitives::symbolic::SymbolicPolynomial;
use crate::primitives::tolerances::Tolerances;

/// Default cap on bounds-maximization passes.
pub const DEFAULT_MAX_ITERATIONS: usize = 10;

// ============================================================================
// Solution
// ============================================================================

/// One analyzed item with its display flags.
#[derive(Debug)]
pub struct Solution {
    item: AnalyzedItem,
    show: bool,
    sonify: bool,
}

impl Solution {
    /// Wrap an item; shown and sonified by default.
    pub fn new(item: AnalyzedItem) -> Self {
        Self {
            item,
            show: true,
            sonify: true,
        }
    }

    /// The analyzed item.
    pub fn item(&self) -> &AnalyzedItem {
        &self.item
    }

    /// Cached classification, if the item was solved.
    pub fn result(&self) -> Option<&ClassificationResult> {
        self.item.result()
    }

    /// True if the graph is shown.
    pub fn is_shown(&self) -> bool {
        self.show
    }

    /// True if the graph is sonified.
    pub fn is_sonified(&self) -> bool {
        self.sonify
    }

    /// Show or hide the graph. Hiding also stops sonification.
    pub fn set_show(&mut self, show: bool) {
        self.show = show;
        if !show {
            self.sonify = false;
        }
    }

    /// Turn sonification on or off; a hidden graph can not be sonified.
    pub fn set_sonify(&mut self, sonify: bool) -> Result<()> {
        if sonify && !self.show {
            return Err(ShapeError::SonifyHidden);
        }
        self.sonify = sonify;
        Ok(())
    }

    /// True for polar equations.
    pub fn is_polar(&self) -> bool {
        self.item.is_polar()
    }

    /// True for equations the solver can not analyze.
    pub fn is_bad_equation(&self) -> bool {
        matches!(&self.item, AnalyzedItem::Equation(e) if e.has_too_many_variables())
    }

    /// True once a classification has been produced.
    pub fn is_describable(&self) -> bool {
        self.item.result().is_some()
    }

    /// True once trails have been computed.
    pub fn is_graphable(&self) -> bool {
        self.item.trails().is_some()
    }

    /// True once samples have been computed.
    pub fn is_sonifiable(&self) -> bool {
        self.item.points().is_some()
    }

    /// Samples of the last solve.
    pub fn points(&self) -> &[MultiPointXY] {
        self.item.points().unwrap_or_default()
    }

    /// Trails of the last solve.
    pub fn trails(&self) -> &[GraphTrail] {
        self.item.trails().unwrap_or_default()
    }

    /// Sample nearest abscissa `x`, or `None` outside the item's window.
    pub fn point_near(&self, x: f64) -> Option<&MultiPointXY> {
        if let AnalyzedItem::Data(d) = &self.item {
            let index = d.point_index_near(x)?;
            return self.item.points()?.get(index);
        }
        let b = self.item.preferred_bounds();
        if x < b.left || x > b.right || b.right <= b.left {
            return None;
        }
        self.item.point((x - b.left) / (b.right - b.left))
    }
}

// ============================================================================
// Solver
// ============================================================================

/// Ordered collection of analyzed items sharing one viewing window.
#[derive(Debug)]
pub struct Solver {
    solutions: Vec<Solution>,
    bounds: Bounds,
    preferred_bounds: Bounds,
    tolerances: Tolerances,
    max_iterations: usize,
    num_points: usize,
}

impl Default for Solver {
    fn default() -> Self {
        Self::new()
    }
}

impl Solver {
    /// An empty solver with the default window and settings.
    pub fn new() -> Self {
        Self::with_settings(
            Bounds::default(),
            Tolerances::default(),
            DEFAULT_MAX_ITERATIONS,
            DEFAULT_NUM_POINTS,
        )
    }

    /// An empty solver with explicit settings; see `SolverBuilder`.
    pub(crate) fn with_settings(
        bounds: Bounds,
        tolerances: Tolerances,
        max_iterations: usize,
        num_points: usize,
    ) -> Self {
        Self {
            solutions: Vec::new(),
            bounds,
            preferred_bounds: bounds,
            tolerances,
            max_iterations,
            num_points,
        }
    }

    /// Tolerances handed to every item.
    pub fn tolerances(&self) -> &Tolerances {
        &self.tolerances
    }

    /// Samples per graph.
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Cap on bounds-maximization passes.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    // ========================================================================
    // Adding and Removing
    // ========================================================================

    /// Analyze and add a relation; shown and sonified.
    pub fn add_equation<R: SymbolicPolynomial + 'static>(&mut self, relation: R) -> Result<&Solution> {
        let eq = AnalyzedEquation::new(relation)
            .with_tolerances(self.tolerances)
            .with_num_points(self.num_points);
        self.add(eq.into())
    }

    /// Add a named data column; shown and sonified.
    pub fn add_data(
        &mut self,
        x_name: &str,
        y_name: &str,
        x: &[f64],
        y: &[f64],
    ) -> Result<&Solution> {
        let data = AnalyzedData::new(x_name, y_name, x, y)?
            .with_tolerances(self.tolerances)
            .with_num_points(self.num_points);
        self.add(data.into())
    }

    /// Add an item; shown and sonified.
    pub fn add(&mut self, item: AnalyzedItem) -> Result<&Solution> {
        self.add_with_flags(item, true, true)
    }

    /// Add an item with explicit flags.
    ///
    /// Equations with more than two variables, and constant equations that
    /// are zero or not finite, are rejected and leave the solver unchanged.
    /// A polar graph is not sonified if a Cartesian graph is shown or
    /// another polar graph is already sonified.
    pub fn add_with_flags(
        &mut self,
        item: AnalyzedItem,
        show: bool,
        sonify: bool,
    ) -> Result<&Solution> {
        if let AnalyzedItem::Equation(e) = &item {
            Validator::validate_relation(e.relation())?;
            if e.has_too_many_variables() {
                warn!(equation = e.text(), "equation rejected");
                return Err(ShapeError::TooManyVariables {
                    count: e.variable_count(),
                });
            }
        }

        let mut solution = Solution::new(item);
        solution.set_show(show);
        solution.set_sonify(sonify)?;
        debug!(name = solution.item.name(), show, sonify, "item added");
        self.solutions.push(solution);
        self.apply_sonify_rule();

        let index = self.solutions.len() - 1;
        Ok(&self.solutions[index])
    }

    fn apply_sonify_rule(&mut self) {
        for index in (0..self.solutions.len()).rev() {
            let s = &self.solutions[index];
            if s.is_polar()
                && s.sonify
                && (self.show_cartesian_count() > 0 || self.sonify_polar_count() > 1)
            {
                self.solutions[index].sonify = false;
            }
        }
    }

    /// Drop every item and reset the flag counts.
    pub fn remove_all(&mut self) {
        self.solutions.clear();
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Number of items.
    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    /// True if the solver holds no items.
    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Solution> {
        self.solutions.iter()
    }

    /// The item at `index`.
    pub fn get(&self, index: usize) -> Option<&Solution> {
        self.solutions.get(index)
    }

    /// Mutable access to the item at `index`, for changing its flags.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut Solution> {
        let len = self.solutions.len();
        self.solutions
            .get_mut(index)
            .ok_or(ShapeError::IndexOutOfRange { index, len })
    }

    /// Every item whose name is `name`.
    pub fn get_by_name(&self, name: &str) -> Vec<&Solution> {
        self.solutions
            .iter()
            .filter(|s| s.item.name() == name)
            .collect()
    }

    /// The first item built from the same input as `item`.
    pub fn find(&self, item: &AnalyzedItem) -> Option<&Solution> {
        self.solutions.iter().find(|s| s.item.same_source(item))
    }

    /// True if an item built from the same input is present.
    pub fn contains(&self, item: &AnalyzedItem) -> bool {
        self.find(item).is_some()
    }

    // ========================================================================
    // Flag Counts
    // ========================================================================

    fn count(&self, polar: bool, flag: impl Fn(&Solution) -> bool) -> usize {
        self.solutions
            .iter()
            .filter(|s| s.is_polar() == polar && flag(s))
            .count()
    }

    /// Shown polar graphs.
    pub fn show_polar_count(&self) -> usize {
        self.count(true, Solution::is_shown)
    }

    /// Shown Cartesian graphs.
    pub fn show_cartesian_count(&self) -> usize {
        self.count(false, Solution::is_shown)
    }

    /// Sonified polar graphs.
    pub fn sonify_polar_count(&self) -> usize {
        self.count(true, Solution::is_sonified)
    }

    /// Sonified Cartesian graphs.
    pub fn sonify_cartesian_count(&self) -> usize {
        self.count(false, Solution::is_sonified)
    }

    // ========================================================================
    // Solving
    // ========================================================================

    /// Sample and classify every shown or sonified item in the current window.
    ///
    /// The first item's preferred window replaces the current one; every
    /// later item's preferred window is merged in. If a later item grows the
    /// window, all items are sampled again, up to `max_iterations` passes.
    pub fn solve(&mut self) -> Result<()> {
        Validator::validate_bounds(&self.bounds)?;
        if self.solutions.is_empty() {
            return Ok(());
        }

        let bounds = &mut self.bounds;
        let mut iteration = 0;
        loop {
            let mut recompute = false;
            for (index, s) in self.solutions.iter_mut().enumerate() {
                if !(s.show || s.sonify) {
                    continue;
                }
                if iteration == 0 || *bounds != s.item.preferred_bounds() {
                    s.item.compute_points(bounds);
                    s.item.update_features();
                }

                let preferred = s.item.preferred_bounds();
                if iteration == 0 && index == 0 && *bounds != preferred {
                    *bounds = preferred;
                }
                if bounds.maximize(&preferred) && index > 0 {
                    recompute = true;
                }
            }

            iteration += 1;
            if !recompute || iteration >= self.max_iterations {
                break;
            }
        }
        debug!(
            iterations = iteration,
            bounds = ?self.bounds,
            "solve finished"
        );
        Ok(())
    }

    /// Adopt the given window without sampling or reclassifying.
    pub fn solve_at(&mut self, left: f64, right: f64, top: f64, bottom: f64) -> Result<()> {
        let b = Bounds::new(left, right, top, bottom);
        Validator::validate_bounds(&b)?;
        self.bounds = b;
        Ok(())
    }

    // ========================================================================
    // Readiness
    // ========================================================================

    /// True if any item is a data column.
    pub fn any_analyzed_data(&self) -> bool {
        self.solutions
            .iter()
            .any(|s| matches!(s.item, AnalyzedItem::Data(_)))
    }

    /// True if the solver is empty or holds an equation it can not analyze.
    pub fn any_bad_equations(&self) -> bool {
        self.solutions.is_empty() || self.solutions.iter().any(Solution::is_bad_equation)
    }

    /// True if any item has a classification.
    pub fn any_describable(&self) -> bool {
        self.solutions.iter().any(Solution::is_describable)
    }

    /// True if any item has trails.
    pub fn any_graphable(&self) -> bool {
        self.solutions.iter().any(Solution::is_graphable)
    }

    /// True if any item has samples.
    pub fn any_sonifiable(&self) -> bool {
        self.solutions.iter().any(Solution::is_sonifiable)
    }

    // ========================================================================
    // Bounds
    // ========================================================================

    /// The shared viewing window.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Replace the shared viewing window.
    pub fn set_bounds(&mut self, left: f64, right: f64, top: f64, bottom: f64) {
        self.bounds.set(left, right, top, bottom);
    }

    /// The window the caller would like to return to.
    pub fn preferred_bounds(&self) -> Bounds {
        self.preferred_bounds
    }

    /// Replace the preferred window.
    pub fn set_preferred_bounds(&mut self, left: f64, right: f64, top: f64, bottom: f64) {
        self.preferred_bounds.set(left, right, top, bottom);
    }

    /// Left edge of the shared window.
    pub fn left(&self) -> f64 {
        self.bounds.left
    }

    /// Right edge of the shared window.
    pub fn right(&self) -> f64 {
        self.bounds.right
    }

    /// Top edge of the shared window.
    pub fn top(&self) -> f64 {
        self.bounds.top
    }

    /// Bottom edge of the shared window.
    pub fn bottom(&self) -> f64 {
        self.bounds.bottom
    }
}
