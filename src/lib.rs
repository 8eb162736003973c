pub mod core;
pub mod models;
pub mod platform;

pub use crate::core::config::{Config, ConfigError, ConfigResult};
pub use crate::core::frame_processor::{FrameOutcome, FrameProcessor, ProcessorError};
pub use crate::core::ground_truth::{reference_skeleton, GroundTruthGenerator};
pub use crate::core::landmark_extractor::{extract_landmarks, extract_visible_landmarks};
pub use crate::core::mpjpe::{evaluate, evaluate_squat, MpjpeEvaluator};
pub use crate::core::mpjpe_overlay::{MpjpeOverlay, OverlayError, OverlayStyle};
pub use crate::core::mpjpe_tracker::{MpjpeStatistics, MpjpeTracker, ReportError, SessionReport};
pub use crate::models::evaluation::{AccuracyBand, Assessment, ErrorLevel, JointError, MpjpeResult};
pub use crate::models::landmarks::{
    Joint, JointTable, LandmarkId, LandmarkInput, LandmarkParseError, LandmarkPosition, LandmarkSet,
};
pub use crate::models::pose::{BodyLandmark, BodyPose, Keypoint3D, PoseConfig, PoseError, PoseResult};
pub use crate::platform::pose::{DefaultMediaPipe, MediaPipeBridge, MediaPipeResult};
