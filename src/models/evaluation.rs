// MPJPE evaluation results and error classification

use serde::{Deserialize, Serialize};

use super::landmarks::LandmarkId;

/// Error of a single joint, in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointError {
    pub joint: String,
    pub landmark_id: LandmarkId,
    pub error: f64,
}

impl JointError {
    pub fn level(&self) -> ErrorLevel {
        ErrorLevel::from_error(self.error)
    }

    pub fn assessment(&self) -> Assessment {
        Assessment::from_error(self.error)
    }
}

/// Result of one MPJPE evaluation.
///
/// An evaluation with no overlapping joints is empty: `mean_error` is 0.0 and
/// `per_joint` has no entries. Use [`MpjpeResult::mean`] to tell the two apart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MpjpeResult {
    pub mean_error: f64,
    pub per_joint: Vec<JointError>,
}

impl MpjpeResult {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.per_joint.is_empty()
    }

    /// Mean error, `None` when no joint overlapped
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.mean_error)
        }
    }

    pub fn joint_count(&self) -> usize {
        self.per_joint.len()
    }

    /// Error of a joint by name
    pub fn get(&self, joint: &str) -> Option<f64> {
        self.per_joint
            .iter()
            .find(|e| e.joint == joint)
            .map(|e| e.error)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, JointError> {
        self.per_joint.iter()
    }

    pub fn accuracy_band(&self) -> Option<AccuracyBand> {
        self.mean().map(AccuracyBand::from_error)
    }
}

// ==============================================================================
// Classification
// ==============================================================================

/// Per-joint error level used for overlay coloring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorLevel {
    Low,    // < 5 px
    Medium, // < 10 px
    High,
}

impl ErrorLevel {
    pub fn from_error(error: f64) -> Self {
        if error < 5.0 {
            ErrorLevel::Low
        } else if error < 10.0 {
            ErrorLevel::Medium
        } else {
            ErrorLevel::High
        }
    }

    /// RGB color: green, yellow, red
    pub fn color(&self) -> [u8; 3] {
        match self {
            ErrorLevel::Low => [0, 255, 0],
            ErrorLevel::Medium => [255, 255, 0],
            ErrorLevel::High => [255, 0, 0],
        }
    }
}

/// Per-joint verdict shown in reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assessment {
    Good,
    NeedsImprovement,
}

impl Assessment {
    pub fn from_error(error: f64) -> Self {
        if error < 10.0 {
            Assessment::Good
        } else {
            Assessment::NeedsImprovement
        }
    }

    pub fn to_string(&self) -> &'static str {
        match self {
            Assessment::Good => "Good",
            Assessment::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Interpretation of an overall MPJPE value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccuracyBand {
    Excellent,        // < 20 px
    Good,             // 20-50 px
    NeedsImprovement, // > 50 px
}

impl AccuracyBand {
    pub fn from_error(mpjpe: f64) -> Self {
        if mpjpe < 20.0 {
            AccuracyBand::Excellent
        } else if mpjpe <= 50.0 {
            AccuracyBand::Good
        } else {
            AccuracyBand::NeedsImprovement
        }
    }

    pub fn to_string(&self) -> &'static str {
        match self {
            AccuracyBand::Excellent => "excellent",
            AccuracyBand::Good => "good",
            AccuracyBand::NeedsImprovement => "needs_improvement",
        }
    }
}
