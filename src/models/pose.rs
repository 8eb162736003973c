// Data models for MediaPipe body pose estimation

use serde::{Deserialize, Serialize};

use super::landmarks::LandmarkId;

// ==============================================================================
// Body Pose (33 keypoints)
// ==============================================================================

/// Body pose tracking result using MediaPipe Pose (33 keypoints)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodyPose {
    pub keypoints: Vec<Keypoint3D>,               // 33 body landmarks, normalized image coordinates
    pub world_landmarks: Option<Vec<Keypoint3D>>, // Metric 3D coordinates
}

impl BodyPose {
    pub fn new(keypoints: Vec<Keypoint3D>) -> Self {
        Self {
            keypoints,
            world_landmarks: None,
        }
    }

    /// Keypoint for a landmark index, `None` when the model output is shorter
    pub fn keypoint(&self, id: LandmarkId) -> Option<&Keypoint3D> {
        self.keypoints.get(id)
    }

    /// True when all 33 MediaPipe landmarks are present
    pub fn is_complete(&self) -> bool {
        self.keypoints.len() >= BodyLandmark::COUNT
    }
}

/// MediaPipe Pose Landmark indices (33 total)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    pub const COUNT: usize = 33;

    /// Landmark index in the MediaPipe output
    pub fn id(self) -> LandmarkId {
        self as u8 as LandmarkId
    }

    pub fn from_id(id: LandmarkId) -> Option<Self> {
        use BodyLandmark::*;
        const ALL: [BodyLandmark; BodyLandmark::COUNT] = [
            Nose, LeftEyeInner, LeftEye, LeftEyeOuter, RightEyeInner, RightEye, RightEyeOuter,
            LeftEar, RightEar, MouthLeft, MouthRight, LeftShoulder, RightShoulder, LeftElbow,
            RightElbow, LeftWrist, RightWrist, LeftPinky, RightPinky, LeftIndex, RightIndex,
            LeftThumb, RightThumb, LeftHip, RightHip, LeftKnee, RightKnee, LeftAnkle, RightAnkle,
            LeftHeel, RightHeel, LeftFootIndex, RightFootIndex,
        ];
        ALL.get(id).copied()
    }
}

// ==============================================================================
// Shared: 3D Keypoint
// ==============================================================================

/// A 3D keypoint with confidence score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint3D {
    pub x: f32, // Normalized [0, 1] for image coordinates
    pub y: f32, // Normalized [0, 1] for image coordinates
    pub z: f32, // Depth (relative to the hip midpoint, same scale as x)
    pub confidence: f32, // Visibility confidence [0, 1]
}

impl Keypoint3D {
    pub fn new(x: f32, y: f32, z: f32, confidence: f32) -> Self {
        Self {
            x,
            y,
            z,
            confidence,
        }
    }

    pub fn is_visible(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }
}

// ==============================================================================
// Configuration
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseConfig {
    pub target_fps: u32,                   // Frames per second to process (default: 15)
    pub min_detection_confidence: f32,     // Minimum confidence for detection (default: 0.5)
    pub min_tracking_confidence: f32,      // Minimum confidence for tracking (default: 0.5)
    pub model_complexity: ModelComplexity, // Model complexity (0=lite, 1=full, 2=heavy)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelComplexity {
    Lite = 0,  // Fastest, less accurate
    Full = 1,  // Balanced
    Heavy = 2, // Slowest, most accurate
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            target_fps: 15,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            model_complexity: ModelComplexity::Full,
        }
    }
}

impl PoseConfig {
    pub fn validate(&self) -> PoseResult<()> {
        if self.target_fps == 0 || self.target_fps > 60 {
            return Err(PoseError::InvalidConfig(format!(
                "target FPS {} must be between 1 and 60",
                self.target_fps
            )));
        }

        for (name, value) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(PoseError::InvalidConfig(format!(
                    "{} {} must be between 0.0 and 1.0",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

// ==============================================================================
// Error Types
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PoseError {
    #[error("Pose detection not initialized")]
    NotInitialized,

    #[error("Model loading failed: {0}")]
    ModelLoadFailed(String),

    #[error("Inference failed: {0}")]
    InferenceFailed(String),

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Not supported on this platform")]
    NotSupported,
}

pub type PoseResult<T> = Result<T, PoseError>;
