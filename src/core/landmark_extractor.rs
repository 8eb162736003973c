// Conversion of normalized MediaPipe keypoints into pixel-space landmark sets

use crate::models::landmarks::{JointTable, LandmarkPosition, LandmarkSet};
use crate::models::pose::{BodyPose, Keypoint3D};

/// Normalized [0, 1] coordinate to an integer pixel, truncating toward zero
pub fn to_pixel(normalized: f64, extent: u32) -> f64 {
    (normalized * extent as f64).trunc()
}

fn keypoint_to_position(kp: &Keypoint3D, frame_width: u32, frame_height: u32) -> LandmarkPosition {
    LandmarkPosition::new(
        to_pixel(kp.x as f64, frame_width),
        to_pixel(kp.y as f64, frame_height),
        kp.z as f64,
    )
}

/// Pixel-space landmark set for the joints of `joints`.
///
/// x/y are scaled by the frame size and truncated, z is kept as the model's
/// normalized depth. Joints the model did not report are left out.
pub fn extract_landmarks(
    pose: &BodyPose,
    frame_width: u32,
    frame_height: u32,
    joints: &JointTable,
) -> LandmarkSet {
    joints
        .iter()
        .filter_map(|joint| {
            pose.keypoint(joint.landmark_id)
                .map(|kp| (joint.landmark_id, keypoint_to_position(kp, frame_width, frame_height)))
        })
        .collect()
}

/// [`extract_landmarks`] keeping only keypoints with confidence >= `min_confidence`
pub fn extract_visible_landmarks(
    pose: &BodyPose,
    frame_width: u32,
    frame_height: u32,
    joints: &JointTable,
    min_confidence: f32,
) -> LandmarkSet {
    joints
        .iter()
        .filter_map(|joint| {
            pose.keypoint(joint.landmark_id)
                .filter(|kp| kp.is_visible(min_confidence))
                .map(|kp| (joint.landmark_id, keypoint_to_position(kp, frame_width, frame_height)))
        })
        .collect()
}
