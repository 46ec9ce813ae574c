#![cfg(feature = "dev")]

use shapes_rs::internals::primitives::bounds::Bounds;
use shapes_rs::internals::primitives::features::{
    CompassDirection, FeatureNode, Features, Interval, angle_node, trim_double,
};
use shapes_rs::internals::primitives::points::{MultiPointXY, segment_boundaries, trails_from};

#[test]
fn test_features_xml() {
    let mut f = Features::new();
    f.put_new("graphName", "circle");
    f.put("radius", 2.0);
    f.put("equationPrint", "x < 1 & y > 2");

    let xml = f.to_xml();
    assert!(xml.starts_with("\n<GraphData>"));
    assert!(xml.ends_with("\n</GraphData>"));
    assert!(xml.contains("<graphName>circle</graphName>"));
    assert!(xml.contains("<radius>2</radius>"));
    assert!(xml.contains("<equationPrint>x &lt; 1 &amp; y &gt; 2</equationPrint>"));
    // declared but empty keys are not written
    assert!(!xml.contains("<domain>"));
}

#[test]
fn test_feature_node_ordering_and_nesting() {
    let mut node = FeatureNode::new();
    node.put("b", "1");
    node.put("a", "2");
    node.put("b", "3");
    assert_eq!(node.keys().collect::<Vec<_>>(), vec!["b", "a"]);
    assert_eq!(node.texts("b"), vec!["1", "3"]);

    node.put_new("b", "4");
    assert_eq!(node.texts("b"), vec!["4"]);

    node.put("angle", angle_node(std::f64::consts::FRAC_PI_2));
    let children = node.children("angle");
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].text("degreeValue"), Some("90"));
    assert_eq!(children[0].text("radianValue"), Some("1.571"));
    assert!(node.to_xml().contains("<angle>\n<degreeValue>90</degreeValue>"));
}

#[test]
fn test_trim_double() {
    assert_eq!(trim_double(2.0, 6), "2");
    assert_eq!(trim_double(0.126, 2), "0.13");
    assert_eq!(trim_double(-0.0001, 3), "0");
    assert_eq!(trim_double(f64::INFINITY, 3), "Infinity");
    assert_eq!(trim_double(f64::NAN, 3), "NaN");
}

#[test]
fn test_interval_display() {
    assert_eq!(
        Interval::new("x", -1.0, 2.5).to_string(),
        "{x such that -1 <= x <= 2.5}"
    );
    assert_eq!(
        Interval::all("y").to_string(),
        "{y such that -Infinity < y < Infinity}"
    );
}

#[test]
fn test_compass_direction() {
    assert_eq!(CompassDirection::from_degrees(0.0), CompassDirection::East);
    assert_eq!(CompassDirection::from_degrees(90.0), CompassDirection::North);
    assert_eq!(CompassDirection::from_degrees(-45.0), CompassDirection::SE);
    assert_eq!(CompassDirection::from_degrees(359.0), CompassDirection::East);
    assert_eq!(CompassDirection::from_degrees(200.0).to_string(), "WSW");
}

#[test]
fn test_bounds_maximize() {
    let mut b = Bounds::new(-1.0, 1.0, 1.0, -1.0);
    assert!(!b.maximize(&Bounds::new(-0.5, 0.5, 0.5, -0.5)));
    assert!(b.maximize(&Bounds::new(-3.0, 0.0, 4.0, 0.0)));
    assert_eq!(b, Bounds::new(-3.0, 1.0, 4.0, -1.0));
    assert_eq!(b.width(), 4.0);
    assert_eq!(b.height(), 5.0);
    assert!(b.is_valid());
    assert!(!Bounds::new(1.0, -1.0, 1.0, -1.0).is_valid());
}

#[test]
fn test_trails_split_on_jumps_and_branch_changes() {
    let points = vec![
        MultiPointXY::single(0.0, 0.0),
        MultiPointXY::single(1.0, 0.5),
        MultiPointXY::single(2.0, 9.0),
        MultiPointXY::single(3.0, 9.5),
        MultiPointXY::new(4.0, vec![-1.0, 1.0]),
        MultiPointXY::new(5.0, vec![-1.5, 1.5]),
        MultiPointXY::new(6.0, vec![]),
    ];
    assert_eq!(segment_boundaries(&points, 2.0), vec![0, 2, 4, 6, 7]);

    let trails = trails_from(&points, 2.0);
    // one branch each for the first two segments, two for the third
    assert_eq!(trails.len(), 4);
    assert_eq!(trails[0].len(), 2);
    assert_eq!(trails[2].points[1].y, -1.5);
    assert_eq!(trails[3].points[1].y, 1.5);
}
