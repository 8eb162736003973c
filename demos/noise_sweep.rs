/// Sweep synthetic ground-truth noise levels against the reference skeleton
/// Run with: cargo run --example noise_sweep

use fitness_vision_lib::{evaluate_squat, reference_skeleton, GroundTruthGenerator, MpjpeTracker};
use tracing_subscriber::EnvFilter;

const FRAME_WIDTH: u32 = 640;
const FRAME_HEIGHT: u32 = 480;
const TRIALS: usize = 50;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let prediction = reference_skeleton(FRAME_WIDTH, FRAME_HEIGHT);

    println!("=== MPJPE vs Noise Level ({}x{}, {} trials) ===\n", FRAME_WIDTH, FRAME_HEIGHT, TRIALS);
    println!("{:>6}  {:>9}  {:>9}  {:>9}  Band", "noise", "average", "min", "max");

    for (step, noise_level) in [0.0, 0.05, 0.1, 0.2, 0.3, 0.5, 0.75, 1.0].into_iter().enumerate() {
        let mut generator = GroundTruthGenerator::seeded(noise_level, step as u64);
        let mut tracker = MpjpeTracker::new(TRIALS);

        for _ in 0..TRIALS {
            let ground_truth = generator.from_pixels(&prediction, FRAME_WIDTH, FRAME_HEIGHT);
            tracker.record(&evaluate_squat(&prediction, &ground_truth));
        }

        if let Some(stats) = tracker.statistics() {
            let band = tracker.report().accuracy_band.map(|b| b.to_string()).unwrap_or("-");
            println!(
                "{:>6.2}  {:>9.2}  {:>9.2}  {:>9.2}  {}",
                noise_level, stats.average, stats.min, stats.max, band
            );
        }
    }
}
