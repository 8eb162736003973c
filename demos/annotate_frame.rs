/// Run the frame pipeline on a blank frame with a fixed pose and save the result
/// Run with: cargo run --example annotate_frame -- [output.png] [font.ttf]

use fitness_vision_lib::{
    BodyLandmark, BodyPose, Config, FrameProcessor, Keypoint3D, MediaPipeBridge, MediaPipeResult, PoseConfig,
    PoseResult,
};
use image::{Rgb, RgbImage};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Stands in for a detector: always reports the same standing pose
struct StandingPose;

impl MediaPipeBridge for StandingPose {
    fn new(_config: &PoseConfig) -> PoseResult<Self> {
        Ok(Self)
    }

    fn process_frame(&self, _frame_data: &[u8], _width: u32, _height: u32) -> PoseResult<MediaPipeResult> {
        let mut keypoints = vec![Keypoint3D::new(0.0, 0.0, 0.0, 0.0); BodyLandmark::COUNT];
        let placed = [
            (BodyLandmark::LeftShoulder, 0.60, 0.20),
            (BodyLandmark::LeftElbow, 0.62, 0.35),
            (BodyLandmark::LeftWrist, 0.63, 0.50),
            (BodyLandmark::LeftHip, 0.58, 0.45),
            (BodyLandmark::LeftKnee, 0.60, 0.65),
            (BodyLandmark::LeftAnkle, 0.59, 0.85),
            (BodyLandmark::LeftFootIndex, 0.64, 0.87),
        ];
        for (landmark, x, y) in placed {
            keypoints[landmark.id()] = Keypoint3D::new(x, y, 0.0, 0.9);
        }

        Ok(MediaPipeResult {
            body_pose: Some(BodyPose::new(keypoints)),
            processing_time_ms: 0,
        })
    }

    fn is_initialized(&self) -> bool {
        true
    }

    fn get_model_info(&self) -> String {
        "Fixed standing pose".to_string()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let output = PathBuf::from(args.next().unwrap_or_else(|| "mpjpe_annotated.png".to_string()));
    let font = args.next().map(PathBuf::from);

    let config = Config {
        evaluate_mpjpe: true,
        visualize_comparison: true,
        display_mpjpe: true,
        flip_frame: false,
        overlay_font_path: font,
        ..Config::default()
    };

    let mut processor = FrameProcessor::<StandingPose>::from_config(config)?;
    let mut frame = RgbImage::from_pixel(640, 480, Rgb([90, 90, 90]));

    let outcome = processor.process(&mut frame);
    match outcome.evaluation {
        Some(ref result) => println!("MPJPE: {:.2} px over {} joints", result.mean_error, result.joint_count()),
        None => println!("No evaluation produced"),
    }

    frame.save(&output)?;
    println!("Saved annotated frame to {}", output.display());

    Ok(())
}
