//! Feature bags produced by classification.
//!
//! ## Purpose
//!
//! A classifier reports what it found as an ordered bag of named features.
//! Keys may hold several values, and a value is either text or a nested bag.
//! Downstream consumers (description generators, renderers) read the bag
//! directly or through its XML serialization.
//!
//! ## Design notes
//!
//! * **Insertion order**: Keys and values keep the order they were added in,
//!   which is also the order of the XML output.
//! * **Declared keys**: Every bag starts with the general graph keys declared
//!   and empty; empty values are skipped when serializing.
//! * **Numbers**: Numeric values are rendered with at most six fraction
//!   digits and no exponent.
//!
//! ## Non-goals
//!
//! * Rendering features as prose.

// External dependencies
use serde::{Deserialize, Serialize};
use std::fmt;

// Internal dependencies
use crate::primitives::points::PointXY;

/// Fraction digits used when a number becomes a feature value.
pub const FEATURE_DIGITS: usize = 6;

/// Keys declared on every feature bag.
pub const GRAPH_FEATURES: [&str; 21] = [
    "graphName",
    "graphBoundaries",
    "equationType",
    "equationPrint",
    "originalEquationPrint",
    "graphDescriptionDomain",
    "graphDescriptionRange",
    "domain",
    "range",
    "abscissaSymbol",
    "ordinateSymbol",
    "abscissaLabel",
    "ordinateLabel",
    "coordinateSystem",
    "graphClosure",
    "xIntercepts",
    "yIntercepts",
    "maxima",
    "minima",
    "ascendingRegions",
    "descendingRegions",
];

// ============================================================================
// Values and Nodes
// ============================================================================

/// A single feature value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FeatureValue {
    /// Plain text.
    Text(String),
    /// A nested bag.
    Node(FeatureNode),
}

impl FeatureValue {
    /// Text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            FeatureValue::Node(_) => None,
        }
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Text(v)
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Text(trim_double(v, FEATURE_DIGITS))
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

impl From<usize> for FeatureValue {
    fn from(v: usize) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

impl From<PointXY> for FeatureValue {
    fn from(v: PointXY) -> Self {
        FeatureValue::Text(v.to_pair_string(FEATURE_DIGITS))
    }
}

impl From<FeatureNode> for FeatureValue {
    fn from(v: FeatureNode) -> Self {
        FeatureValue::Node(v)
    }
}

/// Ordered multi-valued map from feature names to values.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeatureNode {
    entries: Vec<(String, Vec<FeatureValue>)>,
}

impl FeatureNode {
    /// Create an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, key: &str) -> &mut Vec<FeatureValue> {
        let idx = match self.entries.iter().position(|(k, _)| k == key) {
            Some(i) => i,
            None => {
                self.entries.push((key.to_string(), Vec::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    /// Declare `key` with no values, clearing any existing values.
    pub fn add_key(&mut self, key: &str) {
        self.slot(key).clear();
    }

    /// Append a value under `key`, declaring the key if needed.
    pub fn put(&mut self, key: &str, value: impl Into<FeatureValue>) {
        self.slot(key).push(value.into());
    }

    /// Replace all values under `key` with `value`.
    pub fn put_new(&mut self, key: &str, value: impl Into<FeatureValue>) {
        let slot = self.slot(key);
        slot.clear();
        slot.push(value.into());
    }

    /// True if `key` was declared.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// All values under `key`, empty if undeclared.
    pub fn values(&self, key: &str) -> &[FeatureValue] {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
            .unwrap_or(&[])
    }

    /// First text value under `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.values(key).iter().find_map(FeatureValue::as_text)
    }

    /// Every text value under `key`.
    pub fn texts(&self, key: &str) -> Vec<&str> {
        self.values(key)
            .iter()
            .filter_map(FeatureValue::as_text)
            .collect()
    }

    /// Nested bags under `key`.
    pub fn children(&self, key: &str) -> Vec<&FeatureNode> {
        self.values(key)
            .iter()
            .filter_map(|v| match v {
                FeatureValue::Node(n) => Some(n),
                FeatureValue::Text(_) => None,
            })
            .collect()
    }

    /// Declared keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Number of declared keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no key was declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize as a sequence of `<key>value</key>` elements.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        for (key, values) in &self.entries {
            let tag: String = key.chars().filter(|c| c.is_ascii_alphanumeric()).collect();
            for value in values {
                let body = match value {
                    FeatureValue::Node(n) => format!("{}\n", n.to_xml()),
                    FeatureValue::Text(s) => escape_xml(s),
                };
                if !body.trim().is_empty() {
                    out.push_str(&format!("\n<{tag}>{body}</{tag}>"));
                }
            }
        }
        out
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// ============================================================================
// Graph Features
// ============================================================================

/// The feature bag attached to one classified item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Features {
    graph_data: FeatureNode,
}

impl Default for Features {
    fn default() -> Self {
        Self::new()
    }
}

impl Features {
    /// Create a bag with the general graph keys declared.
    pub fn new() -> Self {
        let mut graph_data = FeatureNode::new();
        for key in GRAPH_FEATURES {
            graph_data.add_key(key);
        }
        Self { graph_data }
    }

    /// Append a value under `key`.
    pub fn put(&mut self, key: &str, value: impl Into<FeatureValue>) {
        self.graph_data.put(key, value);
    }

    /// Replace the values under `key`.
    pub fn put_new(&mut self, key: &str, value: impl Into<FeatureValue>) {
        self.graph_data.put_new(key, value);
    }

    /// Declare several keys at once.
    pub fn declare(&mut self, keys: &[&str]) {
        for key in keys {
            if !self.graph_data.contains_key(key) {
                self.graph_data.add_key(key);
            }
        }
    }

    /// First text value under `key`.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.graph_data.text(key)
    }

    /// Every text value under `key`.
    pub fn texts(&self, key: &str) -> Vec<&str> {
        self.graph_data.texts(key)
    }

    /// The underlying bag.
    pub fn node(&self) -> &FeatureNode {
        &self.graph_data
    }

    /// Serialize wrapped in a `GraphData` element.
    pub fn to_xml(&self) -> String {
        format!("\n<GraphData>{}\n</GraphData>", self.graph_data.to_xml())
    }
}

impl fmt::Display for Features {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_xml())
    }
}

// ============================================================================
// Formatting Helpers
// ============================================================================

/// One of the sixteen points of the compass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum CompassDirection {
    East,
    ENE,
    NE,
    NNE,
    North,
    NNW,
    NW,
    WNW,
    West,
    WSW,
    SW,
    SSW,
    South,
    SSE,
    SE,
    ESE,
}

impl CompassDirection {
    const ALL: [CompassDirection; 16] = [
        CompassDirection::East,
        CompassDirection::ENE,
        CompassDirection::NE,
        CompassDirection::NNE,
        CompassDirection::North,
        CompassDirection::NNW,
        CompassDirection::NW,
        CompassDirection::WNW,
        CompassDirection::West,
        CompassDirection::WSW,
        CompassDirection::SW,
        CompassDirection::SSW,
        CompassDirection::South,
        CompassDirection::SSE,
        CompassDirection::SE,
        CompassDirection::ESE,
    ];

    /// The compass point nearest to `theta` degrees (counter-clockwise from east).
    pub fn from_degrees(theta: f64) -> Self {
        let turns = (theta + 11.25) / 360.0;
        let phi = 360.0 * (turns - turns.floor());
        let n = ((phi / 22.5).floor() as usize).min(15);
        Self::ALL[n]
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Format `x` with at most `digits` fraction digits and no trailing zeros.
pub fn trim_double(x: f64, digits: usize) -> String {
    if x.is_nan() {
        return "NaN".to_string();
    }
    if x.is_infinite() {
        return if x > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let mut s = format!("{x:.digits$}");
    if s.contains('.') {
        s = s.trim_end_matches('0').trim_end_matches('.').to_string();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

/// Digits used for interval end points.
const INTERVAL_DIGITS: usize = 3;

/// A one-variable interval such as `{x such that -1 <= x <= 1}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Variable name.
    pub variable: String,
    /// Lower end point.
    pub low: f64,
    /// Upper end point.
    pub high: f64,
    /// True if the lower end point is excluded.
    pub open_low: bool,
    /// True if the upper end point is excluded.
    pub open_high: bool,
}

impl Interval {
    /// A closed interval; infinite ends are open.
    pub fn new(variable: &str, low: f64, high: f64) -> Self {
        Self {
            variable: variable.to_string(),
            low,
            high,
            open_low: low.is_infinite(),
            open_high: high.is_infinite(),
        }
    }

    /// The whole real line.
    pub fn all(variable: &str) -> Self {
        Self::new(variable, f64::NEG_INFINITY, f64::INFINITY)
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = |open: bool| if open { " < " } else { " <= " };
        write!(
            f,
            "{{{v} such that {lo}{s0}{v}{s1}{hi}}}",
            v = self.variable,
            lo = trim_double(self.low, INTERVAL_DIGITS),
            s0 = sign(self.open_low),
            s1 = sign(self.open_high),
            hi = trim_double(self.high, INTERVAL_DIGITS),
        )
    }
}

impl From<Interval> for FeatureValue {
    fn from(v: Interval) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

/// A node describing an angle in degrees and radians.
pub fn angle_node(radians: f64) -> FeatureNode {
    let mut node = FeatureNode::new();
    node.put("degreeValue", trim_double(radians.to_degrees(), 3));
    node.put("radianValue", trim_double(radians, 3));
    node
}
