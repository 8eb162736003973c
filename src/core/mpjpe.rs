// Mean Per Joint Position Error between predicted and ground-truth landmarks

use crate::models::evaluation::{JointError, MpjpeResult};
use crate::models::landmarks::{JointTable, LandmarkSet};

/// Evaluates predictions against ground truth over a fixed joint table
#[derive(Debug, Clone, Default)]
pub struct MpjpeEvaluator {
    joints: JointTable,
}

impl MpjpeEvaluator {
    pub fn new(joints: JointTable) -> Self {
        Self { joints }
    }

    pub fn joints(&self) -> &JointTable {
        &self.joints
    }

    pub fn evaluate(&self, prediction: &LandmarkSet, ground_truth: &LandmarkSet) -> MpjpeResult {
        evaluate(prediction, ground_truth, &self.joints)
    }
}

/// Compute MPJPE over the joints of `joints` present in both sets.
///
/// Joints missing from either set, or with non-finite coordinates, are skipped.
/// Never fails: when nothing overlaps the result is empty with a mean of 0.0.
pub fn evaluate(prediction: &LandmarkSet, ground_truth: &LandmarkSet, joints: &JointTable) -> MpjpeResult {
    let mut per_joint = Vec::with_capacity(joints.len());
    let mut total = 0.0;

    for joint in joints {
        let (Some(pred), Some(gt)) = (
            prediction.get(joint.landmark_id),
            ground_truth.get(joint.landmark_id),
        ) else {
            continue;
        };

        let error = pred.distance(gt);
        if !error.is_finite() {
            continue;
        }

        total += error;
        per_joint.push(JointError {
            joint: joint.name.clone(),
            landmark_id: joint.landmark_id,
            error,
        });
    }

    if per_joint.is_empty() {
        return MpjpeResult::empty();
    }

    MpjpeResult {
        mean_error: total / per_joint.len() as f64,
        per_joint,
    }
}

/// [`evaluate`] with the default squat joint table
pub fn evaluate_squat(prediction: &LandmarkSet, ground_truth: &LandmarkSet) -> MpjpeResult {
    evaluate(prediction, ground_truth, &JointTable::squat())
}
