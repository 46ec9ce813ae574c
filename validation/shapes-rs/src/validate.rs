use serde::{Deserialize, Serialize};
use shapes_rs::prelude::*;
use std::error::Error;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize)]
struct ValidationData {
    name: String,
    notes: String,
    input: InputData,
    expected: QuadraticType,
    #[serde(skip_deserializing)]
    result: ResultData,
}

#[derive(Debug, Deserialize, Serialize)]
struct InputData {
    coefficients: [f64; 6],
}

#[derive(Debug, Deserialize, Serialize, Default)]
struct ResultData {
    identity: ShapeIdentity,
    failure: FailureReason,
    rotation: f64,
    translation: (f64, f64),
    features: String,
    matches: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    total: usize,
    passed: usize,
    failed: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input_dir = Path::new("cases");
    let output_dir = Path::new("../output/shapes_rs");

    if !input_dir.exists() {
        eprintln!(
            "Input directory {:?} does not exist. Run from validation/shapes-rs.",
            input_dir
        );
        return Ok(());
    }

    fs::create_dir_all(output_dir)?;

    let mut paths: Vec<_> = fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
        .collect();
    paths.sort();

    let mut report = Report {
        total: 0,
        passed: 0,
        failed: Vec::new(),
    };
    for path in &paths {
        println!("Processing {:?}", path.file_name().unwrap_or_default());
        let data = process_file(path, output_dir)?;
        report.total += 1;
        if data.result.matches {
            report.passed += 1;
        } else {
            report.failed.push(data.name);
        }
    }

    println!("{}/{} cases matched", report.passed, report.total);
    fs::write(
        output_dir.join("report.json"),
        serde_json::to_string_pretty(&report)?,
    )?;

    Ok(())
}

fn process_file(input_path: &Path, output_dir: &Path) -> Result<ValidationData, Box<dyn Error>> {
    let file = fs::File::open(input_path)?;
    let mut data: ValidationData = serde_json::from_reader(file)?;

    let mut solver = SolverBuilder::new().num_points(200).build()?;
    solver.add_equation(PolynomialRelation::conic(data.input.coefficients))?;
    solver.solve()?;

    let result = solver
        .get(0)
        .and_then(|s| s.result())
        .ok_or_else(|| format!("{}: no classification", data.name))?;

    data.result = ResultData {
        identity: result.identity,
        failure: result.failure,
        rotation: result.rotation,
        translation: result.translation,
        features: result.features.to_xml(),
        matches: result.identity == ShapeIdentity::Quadratic(data.expected),
    };

    let output_path = output_dir.join(input_path.file_name().unwrap_or_default());
    let output_json = serde_json::to_string_pretty(&data)?;
    fs::write(output_path, output_json)?;

    Ok(data)
}
