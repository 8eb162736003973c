/// Evaluate MPJPE between two landmark files
/// Run with: cargo run --example evaluate_landmarks -- prediction.json ground_truth.json
///
/// Each file is either an object keyed by landmark id ({"11": [x, y, z], ...})
/// or an array indexed by landmark id with null for absent landmarks.

use fitness_vision_lib::{evaluate, JointTable, LandmarkInput, LandmarkSet};
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn load(path: &Path) -> Result<LandmarkSet, Box<dyn std::error::Error>> {
    let contents = std::fs::read_to_string(path)?;
    let input: LandmarkInput = serde_json::from_str(&contents)?;
    Ok(input.into_set())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <prediction.json> <ground_truth.json> [landmark ids...]", args[0]);
        std::process::exit(2);
    }

    let prediction = load(Path::new(&args[1]))?;
    let ground_truth = load(Path::new(&args[2]))?;

    let joints = if args.len() > 3 {
        let ids = args[3..]
            .iter()
            .map(|id| id.parse::<usize>())
            .collect::<Result<Vec<_>, _>>()?;
        JointTable::from_ids(ids)
    } else {
        JointTable::squat()
    };

    let result = evaluate(&prediction, &ground_truth, &joints);

    println!("=== MPJPE Evaluation ===\n");
    println!("Prediction landmarks:   {}", prediction.len());
    println!("Ground truth landmarks: {}", ground_truth.len());
    println!();

    match result.mean() {
        Some(mean) => {
            println!("MPJPE: {:.2} px ({:?})", mean, result.accuracy_band());
            for joint_error in result.iter() {
                println!(
                    "  {:<12} {:>8.2} px  {}",
                    joint_error.joint,
                    joint_error.error,
                    joint_error.assessment().to_string()
                );
            }
        }
        None => println!("No joints present in both sets"),
    }

    println!();
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
