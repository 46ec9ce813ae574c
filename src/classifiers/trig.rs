//! Feature paths for trigonometric functions.
//!
//! ## Purpose
//!
//! Recognizes sine, cosine and tangent functions by the literal function
//! names in the equation text, then measures amplitude, period, phase and
//! offset from the sampled graph.
//!
//! ## Design notes
//!
//! * **Textual**: detection is a plain substring test, so `sinh` counts as
//!   `sin`. Two or more different names make a mixed expression, which
//!   only gets the generic graph features.
//! * **Measured**: parameters come from the samples (peak spacing, extreme
//!   values, branch breaks), so they carry the sampling resolution.

// External dependencies
use tracing::debug;

// Internal dependencies
use crate::classifiers::{ClassificationResult, ItemView, ShapeIdentity, TrigShape, xy_graph};
use crate::primitives::features::{Features, Interval, trim_double};
use crate::primitives::points::{GraphTrail, PointXY};

const DIGITS: usize = 3;

/// Trig function family chosen from the equation text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrigClassifier {
    shape: TrigShape,
}

impl TrigClassifier {
    /// Detect `sin`, `cos` and `tan` in `text`; `None` if none appears.
    pub fn detect(text: &str) -> Option<Self> {
        let found: Vec<TrigShape> = [
            ("sin", TrigShape::Sine),
            ("cos", TrigShape::Cosine),
            ("tan", TrigShape::Tangent),
        ]
        .into_iter()
        .filter(|(name, _)| text.contains(name))
        .map(|(_, shape)| shape)
        .collect();

        let shape = match found.as_slice() {
            [] => return None,
            [one] => *one,
            _ => TrigShape::Mixed,
        };
        Some(Self { shape })
    }

    /// The detected family.
    pub fn shape(&self) -> TrigShape {
        self.shape
    }

    /// Classify and measure the sampled function.
    pub fn classify(&self, view: &ItemView<'_>) -> ClassificationResult {
        let features = match self.shape {
            TrigShape::Sine => sinusoid(view, "sine function", 0.25),
            TrigShape::Cosine => sinusoid(view, "cosine function", 0.0),
            TrigShape::Tangent => tangent(view),
            TrigShape::Mixed => xy_graph(view, None),
        };
        ClassificationResult::new(ShapeIdentity::Trig(self.shape), features)
    }
}

// ============================================================================
// Sinusoids
// ============================================================================

fn finite_points(view: &ItemView<'_>) -> Vec<PointXY> {
    view.trails
        .iter()
        .flat_map(|t| t.points.iter().copied())
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect()
}

/// Abscissas of interior local maxima.
fn peaks(points: &[PointXY]) -> Vec<f64> {
    points
        .windows(3)
        .filter(|w| w[0].y < w[1].y && w[1].y >= w[2].y)
        .map(|w| w[1].x)
        .collect()
}

fn mean_spacing(xs: &[f64]) -> Option<f64> {
    if xs.len() < 2 {
        return None;
    }
    Some((xs[xs.len() - 1] - xs[0]) / (xs.len() - 1) as f64)
}

/// `y = A f(B (x - phase)) + offset` where the first peak of `f` lies at
/// `peak_fraction` of a period.
fn sinusoid(view: &ItemView<'_>, name: &str, peak_fraction: f64) -> Features {
    let mut f = xy_graph(view, Some(name));
    f.declare(&["frequency", "amplitude", "phase", "offset", "period"]);

    let points = finite_points(view);
    let (lo, hi) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    if !lo.is_finite() || !hi.is_finite() {
        return f;
    }
    let amplitude = 0.5 * (hi - lo);
    let offset = 0.5 * (hi + lo);
    f.put("amplitude", trim_double(amplitude, DIGITS));
    f.put("offset", trim_double(offset, DIGITS));
    f.put("domain", Interval::all(&view.variables[0]));
    f.put("range", Interval::new(&view.variables[1], lo, hi));

    let crests = peaks(&points);
    if let Some(period) = mean_spacing(&crests) {
        let raw = crests[0] - peak_fraction * period;
        let phase = raw - period * (raw / period).round();
        debug!(period, phase, "sinusoid measured");
        f.put("period", trim_double(period, DIGITS));
        f.put("frequency", trim_double(1.0 / period, DIGITS));
        f.put("phase", trim_double(phase, DIGITS));
    }
    f
}

// ============================================================================
// Tangent
// ============================================================================

fn tangent(view: &ItemView<'_>) -> Features {
    let mut f = xy_graph(view, Some("tangent function"));
    f.declare(&["offset", "orientation", "period", "asymptotes"]);
    f.put(
        "domain",
        format!(
            "{} for all real numbers except at the vertical asymptotes",
            view.variables[0]
        ),
    );
    f.put("range", Interval::all(&view.variables[1]));

    let branches: Vec<&GraphTrail> = view.trails.iter().filter(|t| t.len() > 2).collect();
    let asymptotes: Vec<f64> = view
        .trails
        .windows(2)
        .filter_map(|w| Some(0.5 * (w[0].points.last()?.x + w[1].points.first()?.x)))
        .collect();
    for x in &asymptotes {
        f.put("asymptotes", trim_double(*x, DIGITS));
    }
    if let Some(period) = mean_spacing(&asymptotes) {
        f.put("period", trim_double(period, DIGITS));
    }

    // The middle of a full branch is its center of symmetry.
    let full = asymptotes
        .windows(2)
        .map(|w| 0.5 * (w[0] + w[1]))
        .find_map(|mid| {
            branches.iter().find_map(|t| {
                let (a, b) = (t.points.first()?, t.points.last()?);
                (a.x <= mid && mid <= b.x).then_some((mid, *t))
            })
        });
    if let Some((mid, branch)) = full {
        let near = branch
            .points
            .iter()
            .min_by(|p, q| (p.x - mid).abs().total_cmp(&(q.x - mid).abs()));
        if let Some(p) = near {
            f.put("offset", trim_double(p.y, DIGITS));
        }
    }

    if let Some(t) = branches.first() {
        let rising = t.points[t.len() - 1].y > t.points[0].y;
        f.put("orientation", if rising { "ascending" } else { "descending" });
    }
    f
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_single_and_mixed() {
        assert_eq!(
            TrigClassifier::detect("y = 2*sin(x)").map(|t| t.shape()),
            Some(TrigShape::Sine)
        );
        assert_eq!(
            TrigClassifier::detect("y = sin(x) + cos(x)").map(|t| t.shape()),
            Some(TrigShape::Mixed)
        );
        assert_eq!(TrigClassifier::detect("y = x^2"), None);
    }

    #[test]
    fn test_detect_matches_inside_longer_names() {
        assert_eq!(
            TrigClassifier::detect("y = sinh(x)").map(|t| t.shape()),
            Some(TrigShape::Sine)
        );
    }

    #[test]
    fn test_mean_spacing() {
        assert_eq!(mean_spacing(&[1.0]), None);
        assert_eq!(mean_spacing(&[1.0, 3.0, 5.0]), Some(2.0));
    }
}
