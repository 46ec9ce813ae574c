#![cfg(feature = "dev")]

use approx::assert_relative_eq;

use shapes_rs::internals::api::SolverBuilder;
use shapes_rs::internals::classifiers::quadratic::QuadraticType;
use shapes_rs::internals::classifiers::ShapeIdentity;
use shapes_rs::internals::engine::analyzed::{AnalyzedEquation, AnalyzedItem};
use shapes_rs::internals::engine::solver::Solver;
use shapes_rs::internals::primitives::bounds::Bounds;
use shapes_rs::internals::primitives::errors::ShapeError;
use shapes_rs::internals::primitives::symbolic::PolynomialRelation;

fn circle(radius: f64) -> PolynomialRelation {
    PolynomialRelation::conic([1.0, 0.0, 1.0, 0.0, 0.0, -radius * radius])
}

fn sloping_line() -> PolynomialRelation {
    // y = 2x + 1
    PolynomialRelation::new("y = 2*x + 1")
        .term(1.0, &[("y", 1)])
        .term(-2.0, &[("x", 1)])
        .term(-1.0, &[])
}

fn cubic() -> PolynomialRelation {
    // y = x^3 - x
    PolynomialRelation::new("y = x^3 - x")
        .term(1.0, &[("y", 1)])
        .term(-1.0, &[("x", 3)])
        .term(1.0, &[("x", 1)])
}

fn polar_circle() -> PolynomialRelation {
    PolynomialRelation::new("r = 2")
        .term(1.0, &[("r", 1)])
        .term(-2.0, &[])
}

#[test]
fn test_solve_circle() {
    let mut solver = Solver::new();
    solver.add_equation(circle(2.0)).unwrap();
    solver.solve().unwrap();

    assert_eq!(solver.bounds(), Bounds::default());
    assert!(solver.any_describable());
    assert!(solver.any_graphable());
    assert!(solver.any_sonifiable());
    assert!(!solver.any_bad_equations());

    let s = solver.get(0).unwrap();
    assert_eq!(s.points().len(), 600);
    let result = s.result().unwrap();
    assert_eq!(result.identity, ShapeIdentity::Quadratic(QuadraticType::Ellipse));
    assert_eq!(result.features.text("graphName"), Some("circle"));

    let eq = s.item().as_equation().unwrap();
    assert!(eq.is_quadratic());
    assert!(!eq.is_function_over_interval());
}

#[test]
fn test_solve_line_and_cubic() {
    let mut solver = Solver::new();
    solver.add_equation(sloping_line()).unwrap();
    solver.add_equation(cubic()).unwrap();
    solver.solve().unwrap();

    let line = solver.get(0).unwrap();
    assert_eq!(
        line.result().unwrap().identity,
        ShapeIdentity::Quadratic(QuadraticType::SlopingLine)
    );
    assert!(line.item().as_equation().unwrap().is_function_over_interval());

    let cubic = solver.get(1).unwrap();
    assert!(matches!(
        cubic.result().unwrap().identity,
        ShapeIdentity::Polynomial(_)
    ));
    let eq = cubic.item().as_equation().unwrap();
    assert!(!eq.is_quadratic());
    assert!(eq.is_function());

    let mut roots = eq.x_intercepts();
    roots.sort_by(f64::total_cmp);
    assert_eq!(roots.len(), 3);
    assert_relative_eq!(roots[0], -1.0, epsilon = 1e-9);
    assert_relative_eq!(roots[1], 0.0, epsilon = 1e-9);
    assert_relative_eq!(roots[2], 1.0, epsilon = 1e-9);
}

#[test]
fn test_polar_item_adopts_its_window() {
    let mut solver = Solver::new();
    solver.add_equation(polar_circle()).unwrap();
    solver.solve().unwrap();

    assert_relative_eq!(solver.left(), -2.0, epsilon = 1e-9);
    assert_relative_eq!(solver.right(), 2.0, epsilon = 1e-9);
    assert_relative_eq!(solver.top(), 2.0, epsilon = 1e-9);
    assert_relative_eq!(solver.bottom(), -2.0, epsilon = 1e-9);

    let s = solver.get(0).unwrap();
    assert!(s.is_polar());
    assert!(s.is_sonified());
    assert!(matches!(
        s.result().unwrap().identity,
        ShapeIdentity::Polar(_)
    ));
    for p in s.points() {
        assert_relative_eq!(p.x.hypot(p.ys[0]), 2.0, epsilon = 1e-6);
    }
}

#[test]
fn test_data_item() {
    let x: Vec<f64> = (0..=100).map(|i| -2.0 + 0.04 * i as f64).collect();
    let y: Vec<f64> = x.iter().map(|x| 3.0 * x * x + 1.0).collect();

    let mut solver = Solver::new();
    solver.add_data("t", "height", &x, &y).unwrap();
    solver.solve().unwrap();

    assert!(solver.any_analyzed_data());
    assert!(solver.any_describable());
    assert!(!solver.any_bad_equations());

    let s = solver.get(0).unwrap();
    assert_eq!(s.item().name(), "height");
    assert_eq!(s.points().len(), 600);
    assert_eq!(s.item().as_data().unwrap().window_indices(), (0, 100));

    let near = s.point_near(0.0).unwrap();
    assert!(near.x.abs() < 0.01);
    assert_relative_eq!(near.ys[0], 1.0, epsilon = 1e-3);
    assert!(s.point_near(5.0).is_none());
}

#[test]
fn test_mismatched_data_rejected() {
    let mut solver = Solver::new();
    assert_eq!(
        solver.add_data("x", "y", &[1.0, 2.0], &[1.0]).err(),
        Some(ShapeError::MismatchedData { x_len: 2, y_len: 1 })
    );
    assert!(solver.is_empty());
}

#[test]
fn test_lookup_and_removal() {
    let mut solver = Solver::new();
    solver.add_equation(circle(1.0)).unwrap();
    solver.add_equation(circle(1.0)).unwrap();
    solver.add_equation(sloping_line()).unwrap();
    assert_eq!(solver.len(), 3);

    let name = solver.get(0).unwrap().item().name().to_string();
    assert_eq!(solver.get_by_name(&name).len(), 2);
    assert_eq!(solver.get_by_name("y = 2*x + 1").len(), 1);

    let probe: AnalyzedItem = AnalyzedEquation::new(sloping_line()).into();
    assert!(solver.contains(&probe));
    let other: AnalyzedItem = AnalyzedEquation::new(cubic()).into();
    assert!(!solver.contains(&other));

    assert_eq!(
        solver.get_mut(7).err(),
        Some(ShapeError::IndexOutOfRange { index: 7, len: 3 })
    );

    solver.remove_all();
    assert!(solver.is_empty());
    assert_eq!(solver.show_cartesian_count(), 0);
    assert!(solver.any_bad_equations());
}

#[test]
fn test_hidden_items_are_not_solved() {
    let mut solver = Solver::new();
    solver.add_equation(circle(3.0)).unwrap();
    solver.add_equation(sloping_line()).unwrap();
    solver.get_mut(1).unwrap().set_show(false);
    solver.solve().unwrap();

    assert!(solver.get(0).unwrap().is_describable());
    assert!(!solver.get(1).unwrap().is_describable());
    assert!(solver.get(1).unwrap().point_near(0.0).is_none());
    assert_eq!(solver.show_cartesian_count(), 1);
    assert_eq!(solver.sonify_cartesian_count(), 1);
}

#[test]
fn test_builder_settings_reach_solver() {
    let mut solver = SolverBuilder::new()
        .bounds(-5.0, 5.0, 5.0, -5.0)
        .num_points(101)
        .build()
        .unwrap();
    solver.add_equation(sloping_line()).unwrap();
    solver.solve().unwrap();

    assert_eq!(solver.bounds(), Bounds::new(-5.0, 5.0, 5.0, -5.0));
    let s = solver.get(0).unwrap();
    assert_eq!(s.points().len(), 101);

    let p = s.point_near(0.0).unwrap();
    assert_relative_eq!(p.x, 0.0, epsilon = 1e-9);
    assert_relative_eq!(p.ys[0], 1.0, epsilon = 1e-9);
}

#[test]
fn test_builder_rejects_bad_parameters() {
    assert!(matches!(
        SolverBuilder::new().num_points(1).build(),
        Err(ShapeError::InvalidParameter { .. })
    ));
    assert!(matches!(
        SolverBuilder::new().max_iterations(0).build(),
        Err(ShapeError::InvalidParameter { .. })
    ));
    assert!(matches!(
        SolverBuilder::new()
            .bounds(-1.0, 1.0, 1.0, -1.0)
            .bounds(-2.0, 2.0, 2.0, -2.0)
            .build(),
        Err(ShapeError::DuplicateParameter { parameter: "bounds" })
    ));
}

#[test]
fn test_result_serializes_to_json() {
    let mut solver = Solver::new();
    solver.add_equation(circle(1.0)).unwrap();
    solver.solve().unwrap();

    let result = solver.get(0).unwrap().result().unwrap();
    let json = serde_json::to_value(result).unwrap();
    assert_eq!(json["identity"]["Quadratic"], "Ellipse");
    assert_eq!(json["failure"], "NoReason");
}

#[test]
fn test_constant_equations() {
    let mut solver = Solver::new();
    assert_eq!(
        solver.add_equation(PolynomialRelation::new("0 = 0")).err(),
        Some(ShapeError::BadEquation("0 = 0".to_string()))
    );
    assert!(solver.is_empty());

    let constant = PolynomialRelation::new("2 = 0").term(2.0, &[]);
    assert!(solver.add_equation(constant).is_ok());
    assert_eq!(solver.len(), 1);
}
