// Synthetic ground truth for exercising the MPJPE evaluation without labelled data.
// Generated sets are bounded uniform perturbations of a prediction, nothing more.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::landmark_extractor::to_pixel;
use crate::models::landmarks::{JointTable, LandmarkPosition, LandmarkSet};
use crate::models::pose::{BodyLandmark, BodyPose};

/// Jitter span in normalized units at noise level 1.0
const NORMALIZED_SPAN: f64 = 0.1;
/// Jitter span as a fraction of the frame extent at noise level 1.0
const PIXEL_SPAN: f64 = 0.2;
/// Depth jitter span at noise level 1.0
const DEPTH_SPAN: f64 = 0.1;

pub struct GroundTruthGenerator<R: Rng = StdRng> {
    rng: R,
    noise_level: f64,
}

impl GroundTruthGenerator<StdRng> {
    pub fn new(noise_level: f64) -> Self {
        Self::with_rng(StdRng::from_entropy(), noise_level)
    }

    /// Reproducible generator
    pub fn seeded(noise_level: f64, seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), noise_level)
    }
}

impl<R: Rng> GroundTruthGenerator<R> {
    /// Negative or non-finite noise levels are treated as 0
    pub fn with_rng(rng: R, noise_level: f64) -> Self {
        Self {
            rng,
            noise_level: sanitize(noise_level),
        }
    }

    pub fn noise_level(&self) -> f64 {
        self.noise_level
    }

    pub fn set_noise_level(&mut self, noise_level: f64) {
        self.noise_level = sanitize(noise_level);
    }

    /// Uniform offset in [-span/2, span/2) scaled by the noise level
    fn jitter(&mut self, span: f64) -> f64 {
        self.noise_level * (self.rng.gen::<f64>() - 0.5) * span
    }

    /// Ground truth from a detected pose: normalized coordinates are jittered,
    /// then x/y are quantized to pixels like [`super::landmark_extractor::extract_landmarks`].
    /// At noise level 0 the result equals the extracted prediction.
    pub fn from_pose(
        &mut self,
        pose: &BodyPose,
        frame_width: u32,
        frame_height: u32,
        joints: &JointTable,
    ) -> LandmarkSet {
        let mut ground_truth = LandmarkSet::new();

        for joint in joints {
            let Some(kp) = pose.keypoint(joint.landmark_id) else {
                continue;
            };

            let x = kp.x as f64 + self.jitter(NORMALIZED_SPAN);
            let y = kp.y as f64 + self.jitter(NORMALIZED_SPAN);
            let z = kp.z as f64 + self.jitter(DEPTH_SPAN);

            ground_truth.insert(
                joint.landmark_id,
                LandmarkPosition::new(to_pixel(x, frame_width), to_pixel(y, frame_height), z),
            );
        }

        ground_truth
    }

    /// Ground truth from a pixel-space set, jittered proportionally to the frame size.
    /// Coordinates are not re-quantized.
    pub fn from_pixels(&mut self, prediction: &LandmarkSet, frame_width: u32, frame_height: u32) -> LandmarkSet {
        let x_span = frame_width as f64 * PIXEL_SPAN;
        let y_span = frame_height as f64 * PIXEL_SPAN;

        // Sorted ids keep seeded output independent of map iteration order
        let mut ids: Vec<_> = prediction.iter().map(|(id, _)| id).collect();
        ids.sort_unstable();

        let mut ground_truth = LandmarkSet::new();
        for id in ids {
            let Some(pos) = prediction.get(id) else {
                continue;
            };
            let dx = self.jitter(x_span);
            let dy = self.jitter(y_span);
            let dz = self.jitter(DEPTH_SPAN);
            ground_truth.insert(id, pos.translated(dx, dy, dz));
        }

        ground_truth
    }
}

fn sanitize(noise_level: f64) -> f64 {
    if noise_level.is_finite() {
        noise_level.max(0.0)
    } else {
        0.0
    }
}

/// Standing stick figure for a frame size, used as a "perfect prediction"
pub fn reference_skeleton(frame_width: u32, frame_height: u32) -> LandmarkSet {
    let w = frame_width as f64;
    let h = frame_height as f64;
    let shoulder_x = (w * 0.5).trunc();
    let shoulder_y = (h * 0.2).trunc();

    let below_shoulder = |fraction: f64| (shoulder_y + h * fraction).trunc();

    [
        (BodyLandmark::LeftShoulder, shoulder_x, shoulder_y),
        (BodyLandmark::LeftElbow, shoulder_x, below_shoulder(0.15)),
        (BodyLandmark::LeftWrist, shoulder_x, below_shoulder(0.3)),
        (BodyLandmark::LeftHip, shoulder_x, below_shoulder(0.25)),
        (BodyLandmark::LeftKnee, shoulder_x, below_shoulder(0.45)),
        (BodyLandmark::LeftAnkle, shoulder_x, below_shoulder(0.65)),
        (BodyLandmark::LeftFootIndex, (shoulder_x + w * 0.05).trunc(), below_shoulder(0.65)),
    ]
    .into_iter()
    .map(|(landmark, x, y)| (landmark.id(), LandmarkPosition::new(x, y, 0.0)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::landmark_extractor::extract_landmarks;
    use crate::models::pose::Keypoint3D;

    fn sample_pose() -> BodyPose {
        let keypoints = (0..33)
            .map(|i| {
                let t = i as f32 / 33.0;
                Keypoint3D::new(0.2 + 0.5 * t, 0.1 + 0.8 * t, -0.3 + 0.2 * t, 0.9)
            })
            .collect();
        BodyPose::new(keypoints)
    }

    #[test]
    fn test_zero_noise_reproduces_prediction() {
        let pose = sample_pose();
        let joints = JointTable::squat();
        let prediction = extract_landmarks(&pose, 640, 480, &joints);

        let mut generator = GroundTruthGenerator::seeded(0.0, 7);
        let ground_truth = generator.from_pose(&pose, 640, 480, &joints);
        assert_eq!(ground_truth, prediction);

        let pixel_truth = generator.from_pixels(&prediction, 640, 480);
        assert_eq!(pixel_truth, prediction);
    }

    #[test]
    fn test_pose_noise_is_bounded() {
        let pose = sample_pose();
        let joints = JointTable::squat();
        let prediction = extract_landmarks(&pose, 640, 480, &joints);

        let noise = 0.6;
        let mut generator = GroundTruthGenerator::seeded(noise, 42);
        for _ in 0..50 {
            let ground_truth = generator.from_pose(&pose, 640, 480, &joints);
            assert_eq!(ground_truth.len(), prediction.len());
            for (id, gt) in ground_truth.iter() {
                let pred = prediction.get(id).unwrap();
                // half span in pixels plus one pixel of quantization
                assert!((gt.x - pred.x).abs() <= noise * 0.05 * 640.0 + 1.0);
                assert!((gt.y - pred.y).abs() <= noise * 0.05 * 480.0 + 1.0);
                assert!((gt.z.unwrap() - pred.z.unwrap()).abs() <= noise * DEPTH_SPAN / 2.0 + 1e-9);
            }
        }
    }

    #[test]
    fn test_depth_jitter_matches_between_generators() {
        let pose = sample_pose();
        let joints = JointTable::squat();
        let prediction = extract_landmarks(&pose, 640, 480, &joints);

        // same seed and draw order (x, y, z per joint, ascending ids) gives the same depth offsets
        let from_pose = GroundTruthGenerator::seeded(0.8, 11).from_pose(&pose, 640, 480, &joints);
        let from_pixels = GroundTruthGenerator::seeded(0.8, 11).from_pixels(&prediction, 640, 480);

        for (id, gt) in from_pose.iter() {
            let other = from_pixels.get(id).unwrap();
            assert!((gt.z.unwrap() - other.z.unwrap()).abs() < 1e-12);
        }
    }

    #[test]
    fn test_pixel_noise_is_bounded() {
        let prediction = reference_skeleton(640, 480);
        let noise = 1.0;
        let mut generator = GroundTruthGenerator::seeded(noise, 3);

        let ground_truth = generator.from_pixels(&prediction, 640, 480);
        for (id, gt) in ground_truth.iter() {
            let pred = prediction.get(id).unwrap();
            assert!((gt.x - pred.x).abs() <= noise * 0.1 * 640.0);
            assert!((gt.y - pred.y).abs() <= noise * 0.1 * 480.0);
            assert!((gt.z.unwrap() - pred.z.unwrap()).abs() <= noise * 0.05);
        }
    }

    #[test]
    fn test_seeded_generators_agree() {
        let prediction = reference_skeleton(640, 480);
        let a = GroundTruthGenerator::seeded(0.5, 99).from_pixels(&prediction, 640, 480);
        let b = GroundTruthGenerator::seeded(0.5, 99).from_pixels(&prediction, 640, 480);
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_noise_levels_are_sanitized() {
        assert_eq!(GroundTruthGenerator::seeded(-1.0, 0).noise_level(), 0.0);
        assert_eq!(GroundTruthGenerator::seeded(f64::NAN, 0).noise_level(), 0.0);

        let mut generator = GroundTruthGenerator::seeded(0.2, 0);
        generator.set_noise_level(0.8);
        assert_eq!(generator.noise_level(), 0.8);
    }

    #[test]
    fn test_reference_skeleton_layout() {
        let skeleton = reference_skeleton(640, 480);
        assert_eq!(skeleton.len(), 7);
        assert_eq!(skeleton.get(11), Some(&LandmarkPosition::new(320.0, 96.0, 0.0)));
        assert_eq!(skeleton.get(13), Some(&LandmarkPosition::new(320.0, 168.0, 0.0)));
        assert_eq!(skeleton.get(27), Some(&LandmarkPosition::new(320.0, 408.0, 0.0)));
        assert_eq!(skeleton.get(31), Some(&LandmarkPosition::new(352.0, 408.0, 0.0)));
    }
}
