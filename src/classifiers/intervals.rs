//! Monotone intervals of functions.
//!
//! ## Purpose
//!
//! Function-valued shapes are described as a sequence of end points
//! (extrema, inflection points, asymptotes, boundaries) separated by
//! intervals on which the function increases, decreases or stays constant.
//!
//! ## Design notes
//!
//! * **Dead band**: slopes within `1e-3` of zero count as constant.
//! * **Sampled trails**: end points of sampled data are found at direction
//!   changes, then clustered when closer than `MIN_INTERVAL_LENGTH` and
//!   joined by a constant stretch.

// Internal dependencies
use crate::math::polynomial::RealZero;
use crate::primitives::features::{FeatureNode, trim_double};
use crate::primitives::points::{GraphTrail, PointXY};

const DEAD_BAND: f64 = 1.0e-3;

/// End points closer than this are merged when analyzing samples.
pub fn min_interval_length() -> f64 {
    DEAD_BAND.powf(0.25)
}

// ============================================================================
// End Points
// ============================================================================

/// What kind of point bounds an interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointType {
    /// Not classified.
    Undefined,
    /// Local minimum.
    LocalMin,
    /// Local maximum.
    LocalMax,
    /// Inflection point.
    Inflection,
    /// Vertical asymptote.
    VerticalAsymptote,
    /// Horizontal asymptote (an end point at infinite x).
    HorizontalAsymptote,
    /// End of the domain considered.
    Boundary,
}

impl EndpointType {
    /// Text used in feature bags, `None` when undefined.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Undefined => None,
            Self::LocalMin => Some("local minimum"),
            Self::LocalMax => Some("local maximum"),
            Self::Inflection => Some("inflection point"),
            Self::VerticalAsymptote => Some("vertical asymptote"),
            Self::HorizontalAsymptote => Some("horizontal asymptote"),
            Self::Boundary => Some("boundary point"),
        }
    }
}

/// One end point with the limits of `y` from either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalEndpoint {
    /// Abscissa.
    pub x: f64,
    /// Limit of `y` from the left.
    pub left_y: f64,
    /// Limit of `y` from the right.
    pub right_y: f64,
    /// Classification.
    pub kind: EndpointType,
}

impl IntervalEndpoint {
    /// An end point at a plain curve point.
    ///
    /// Finite ordinates become horizontal asymptotes at infinite `x` and
    /// boundary points otherwise.
    pub fn at(p: PointXY) -> Self {
        let kind = if p.y.is_infinite() {
            EndpointType::Undefined
        } else if p.x.is_infinite() {
            EndpointType::HorizontalAsymptote
        } else {
            EndpointType::Boundary
        };
        Self {
            x: p.x,
            left_y: p.y,
            right_y: p.y,
            kind,
        }
    }

    /// An end point at a plain curve point with an explicit type.
    pub fn typed(p: PointXY, kind: EndpointType) -> Self {
        Self {
            kind,
            ..Self::at(p)
        }
    }

    /// An end point at a located zero, limits filled in later.
    pub fn at_zero(z: &RealZero<f64>, kind: EndpointType) -> Self {
        Self {
            x: z.x,
            left_y: f64::NAN,
            right_y: f64::NAN,
            kind,
        }
    }

    /// Feature node with `X`, `Y` (or `leftY`/`rightY`) and `Type`.
    pub fn node(&self) -> FeatureNode {
        let mut r = FeatureNode::new();
        r.put("X", trim_double(self.x, 3));
        if self.left_y != self.right_y && !(self.left_y.is_nan() && self.right_y.is_nan()) {
            r.put("discontinuity", "true");
            r.put("leftY", trim_double(self.left_y, 3));
            r.put("rightY", trim_double(self.right_y, 3));
        } else {
            r.put("Y", trim_double(self.left_y, 3));
        }
        if let Some(label) = self.kind.label() {
            r.put("Type", label);
        }
        r
    }
}

// ============================================================================
// Interval Directions
// ============================================================================

/// How a function moves between two end points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Falling.
    Decreases,
    /// Flat within the dead band.
    RemainsConstant,
    /// Rising.
    Increases,
    /// No slope and no ordering of the ordinates.
    Undefined,
}

impl Direction {
    /// Direction of travel from `l` to `r`.
    pub fn between(l: &IntervalEndpoint, r: &IntervalEndpoint) -> Self {
        let dydx = (r.left_y - l.right_y) / (r.x - l.x);
        if dydx.is_nan() {
            return if r.left_y > l.right_y {
                Self::Increases
            } else if r.left_y < l.right_y {
                Self::Decreases
            } else {
                Self::Undefined
            };
        }
        if dydx > DEAD_BAND {
            Self::Increases
        } else if dydx < -DEAD_BAND {
            Self::Decreases
        } else {
            Self::RemainsConstant
        }
    }

    fn label(self) -> Option<&'static str> {
        match self {
            Self::Increases => Some("increases"),
            Self::Decreases => Some("decreases"),
            Self::RemainsConstant => Some("remains constant"),
            Self::Undefined => None,
        }
    }
}

/// Node describing the interval between two end points.
pub fn interval_node(l: &IntervalEndpoint, r: &IntervalEndpoint) -> FeatureNode {
    let mut node = FeatureNode::new();
    node.put("left", l.node());
    node.put("right", r.node());
    node.add_key("direction");
    if let Some(label) = Direction::between(l, r).label() {
        node.put("direction", label);
    }
    node
}

/// Node listing the end points and the intervals between them.
pub fn analysis_node(endpoints: &[IntervalEndpoint]) -> FeatureNode {
    let mut node = FeatureNode::new();
    node.add_key("EndPoint");
    node.add_key("intervalDescription");
    for e in endpoints {
        node.put("EndPoint", e.node());
    }
    for pair in endpoints.windows(2) {
        node.put("intervalDescription", interval_node(&pair[0], &pair[1]));
    }
    node
}

// ============================================================================
// Sampled Trails
// ============================================================================

/// End points of one sampled trail.
pub fn trail_endpoints(trail: &GraphTrail) -> Vec<IntervalEndpoint> {
    let p = &trail.points;
    let (Some(&first), Some(&last)) = (p.first(), p.last()) else {
        return Vec::new();
    };
    let mut e = vec![
        IntervalEndpoint::typed(first, EndpointType::Boundary),
        IntervalEndpoint::typed(last, EndpointType::Boundary),
    ];
    if p.len() <= 2 {
        return e;
    }

    let mut e0;
    let mut e1 = IntervalEndpoint::at(p[1]);
    let mut sense = Direction::between(&IntervalEndpoint::at(p[0]), &e1);
    for &q in &p[2..] {
        e0 = e1;
        e1 = IntervalEndpoint::at(q);
        let next = Direction::between(&e0, &e1);
        if next != sense {
            e.push(e0);
            sense = next;
        }
    }
    e.sort_by(|a, b| a.x.total_cmp(&b.x));

    let merged = merge_close(&e);
    if merged.len() <= 2 {
        return merged;
    }

    let mut typed = merged.clone();
    for i in 1..merged.len() - 1 {
        let before = Direction::between(&merged[i - 1], &merged[i]);
        let after = Direction::between(&merged[i], &merged[i + 1]);
        let kind = match (before, after) {
            (Direction::RemainsConstant, _) | (_, Direction::RemainsConstant) => {
                EndpointType::Undefined
            }
            (Direction::Increases, Direction::Decreases) => EndpointType::LocalMax,
            (Direction::Decreases, Direction::Increases) => EndpointType::LocalMin,
            (Direction::Increases, Direction::Increases)
            | (Direction::Decreases, Direction::Decreases) => EndpointType::Inflection,
            _ => merged[i].kind,
        };
        typed[i] = IntervalEndpoint::typed(PointXY::new(merged[i].x, merged[i].left_y), kind);
    }
    typed
}

/// Average runs of end points closer than `min_interval_length` that are
/// joined by a flat stretch.
fn merge_close(eps: &[IntervalEndpoint]) -> Vec<IntervalEndpoint> {
    let limit = min_interval_length();
    let mut out = Vec::new();
    let mut i = 0;
    while i < eps.len() {
        let mut x = eps[i].x;
        let mut y = eps[i].left_y;
        let mut count = 1.0;
        let mut j = i + 1;
        while j < eps.len() {
            let (a, b) = (&eps[j - 1], &eps[j]);
            if b.x - a.x > limit || Direction::between(a, b) != Direction::RemainsConstant {
                break;
            }
            x += b.x;
            y += b.left_y;
            count += 1.0;
            j += 1;
        }
        out.push(IntervalEndpoint::at(PointXY::new(x / count, y / count)));
        i = j;
    }
    out
}
