// Per-frame pipeline: pose detection, MPJPE evaluation, tracking and overlay drawing

use image::RgbImage;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::config::{Config, ConfigError};
use super::ground_truth::GroundTruthGenerator;
use super::landmark_extractor::extract_landmarks;
use super::mpjpe::MpjpeEvaluator;
use super::mpjpe_overlay::{MpjpeOverlay, OverlayError, OverlayStyle};
use super::mpjpe_tracker::{MpjpeTracker, ReportError};
use crate::models::evaluation::MpjpeResult;
use crate::models::landmarks::{JointTable, LandmarkSet};
use crate::models::pose::PoseError;
use crate::platform::pose::{DefaultMediaPipe, MediaPipeBridge};

#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pose(#[from] PoseError),

    #[error(transparent)]
    Overlay(#[from] OverlayError),
}

/// What happened to one frame
#[derive(Debug, Clone, Default)]
pub struct FrameOutcome {
    pub pose_detected: bool,
    /// Present when evaluation is enabled and a pose was detected
    pub evaluation: Option<MpjpeResult>,
    pub processing_time_ms: u64,
}

pub struct FrameProcessor<B: MediaPipeBridge = DefaultMediaPipe> {
    bridge: B,
    config: Config,
    evaluator: MpjpeEvaluator,
    generator: GroundTruthGenerator,
    overlay: MpjpeOverlay,
    tracker: MpjpeTracker,
}

impl<B: MediaPipeBridge> FrameProcessor<B> {
    /// Build the processor and initialize the bridge from `config.pose`
    pub fn from_config(config: Config) -> Result<Self, ProcessorError> {
        config.validate()?;
        let bridge = B::new(&config.pose)?;
        Self::new(bridge, config)
    }

    pub fn new(bridge: B, config: Config) -> Result<Self, ProcessorError> {
        config.validate()?;

        let overlay = match config.overlay_font_path {
            Some(ref path) => MpjpeOverlay::with_font_file(OverlayStyle::default(), path)?,
            None => MpjpeOverlay::default(),
        };

        info!(
            model = %bridge.get_model_info(),
            evaluate_mpjpe = config.evaluate_mpjpe,
            noise_level = config.noise_level,
            "Frame processor ready"
        );

        Ok(Self {
            bridge,
            evaluator: MpjpeEvaluator::default(),
            generator: GroundTruthGenerator::new(config.noise_level),
            tracker: MpjpeTracker::new(config.history_window),
            overlay,
            config,
        })
    }

    pub fn with_joints(mut self, joints: JointTable) -> Self {
        self.evaluator = MpjpeEvaluator::new(joints);
        self
    }

    pub fn with_generator(mut self, generator: GroundTruthGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn with_overlay(mut self, overlay: MpjpeOverlay) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn tracker(&self) -> &MpjpeTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut MpjpeTracker {
        &mut self.tracker
    }

    /// Write the session report into the configured report directory
    pub fn save_report(&self) -> Result<PathBuf, ReportError> {
        self.tracker.save_report(&self.config.report_dir)
    }

    /// Process a frame against synthetic ground truth
    pub fn process(&mut self, frame: &mut RgbImage) -> FrameOutcome {
        self.run(frame, None)
    }

    /// Process a frame against supplied pixel-space ground truth
    pub fn process_with_ground_truth(&mut self, frame: &mut RgbImage, ground_truth: &LandmarkSet) -> FrameOutcome {
        self.run(frame, Some(ground_truth))
    }

    fn run(&mut self, frame: &mut RgbImage, supplied: Option<&LandmarkSet>) -> FrameOutcome {
        if self.config.flip_frame {
            image::imageops::flip_horizontal_in_place(frame);
        }

        let (width, height) = frame.dimensions();
        let detection = match self.bridge.process_frame(frame.as_raw(), width, height) {
            Ok(detection) => detection,
            Err(e) => {
                warn!("Pose inference failed, frame left unannotated: {}", e);
                return FrameOutcome::default();
            }
        };

        let Some(pose) = detection.body_pose else {
            return FrameOutcome {
                processing_time_ms: detection.processing_time_ms,
                ..FrameOutcome::default()
            };
        };

        if !self.config.evaluate_mpjpe {
            return FrameOutcome {
                pose_detected: true,
                evaluation: None,
                processing_time_ms: detection.processing_time_ms,
            };
        }

        let joints = self.evaluator.joints();
        let prediction = extract_landmarks(&pose, width, height, joints);

        let generated;
        let ground_truth = match supplied {
            Some(ground_truth) => ground_truth,
            None => {
                generated = self.generator.from_pose(&pose, width, height, joints);
                &generated
            }
        };

        let result = self.evaluator.evaluate(&prediction, ground_truth);
        self.tracker.record(&result);
        debug!(mpjpe = result.mean_error, joints = result.joint_count(), "Evaluated frame");

        if self.config.visualize_comparison {
            self.overlay.draw_comparison(frame, &prediction, ground_truth, joints);
        }
        if self.config.display_mpjpe {
            self.overlay.draw_results(frame, &result);
        }

        FrameOutcome {
            pose_detected: true,
            evaluation: Some(result),
            processing_time_ms: detection.processing_time_ms,
        }
    }
}
