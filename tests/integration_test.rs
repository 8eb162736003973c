//! Integration tests for the evaluation pipeline

use fitness_vision_lib::{
    evaluate_squat, reference_skeleton, AccuracyBand, GroundTruthGenerator, LandmarkInput, LandmarkSet,
    MpjpeTracker,
};

#[test]
fn test_sparse_and_dense_inputs_evaluate_alike() {
    let sparse: LandmarkInput =
        serde_json::from_str(r#"{"11": [100.0, 50.0, 0.0], "13": [100.0, 80.0, 0.0]}"#).unwrap();

    let mut dense = vec!["null"; 14];
    dense[11] = "[103.0, 54.0, 0.0]";
    dense[13] = "[100.0, 80.0, 0.0]";
    let dense: LandmarkInput = serde_json::from_str(&format!("[{}]", dense.join(","))).unwrap();

    let prediction: LandmarkSet = sparse.into();
    let ground_truth: LandmarkSet = dense.into();
    assert_eq!(ground_truth.len(), 2);

    let result = evaluate_squat(&prediction, &ground_truth);
    assert_eq!(result.joint_count(), 2);
    assert_eq!(result.get("shoulder"), Some(5.0));
    assert_eq!(result.get("elbow"), Some(0.0));
    assert_eq!(result.mean(), Some(2.5));
}

#[test]
fn test_dense_input_beyond_table_is_kept() {
    let mut entries = vec!["null".to_string(); 40];
    entries[35] = "[1.0, 2.0]".to_string();
    let input: LandmarkInput = serde_json::from_str(&format!("[{}]", entries.join(","))).unwrap();

    let set = input.into_set();
    assert!(set.contains(35));
    assert_eq!(set.get(35).and_then(|p| p.z), None);
}

#[test]
fn test_noisy_session_against_reference_skeleton() {
    let prediction = reference_skeleton(640, 480);
    let mut generator = GroundTruthGenerator::seeded(0.3, 42);
    let mut tracker = MpjpeTracker::new(100);

    for _ in 0..20 {
        let ground_truth = generator.from_pixels(&prediction, 640, 480);
        assert!(tracker.record(&evaluate_squat(&prediction, &ground_truth)));
    }

    let stats = tracker.statistics().unwrap();
    assert_eq!(stats.frames, 20);
    assert!(stats.min <= stats.average && stats.average <= stats.max);
    // noise 0.3 moves x by at most 0.3 * 0.5 * 128 px and y by at most 0.3 * 0.5 * 96 px
    assert!(stats.max < 25.0);

    let report = tracker.report();
    assert_eq!(report.joints.len(), 7);
    assert!(report.accuracy_band.is_some());
}

#[test]
fn test_zero_noise_session_is_excellent() {
    let prediction = reference_skeleton(640, 480);
    let mut generator = GroundTruthGenerator::seeded(0.0, 7);
    let mut tracker = MpjpeTracker::default();

    tracker.record(&evaluate_squat(&prediction, &generator.from_pixels(&prediction, 640, 480)));
    assert_eq!(tracker.report().accuracy_band, Some(AccuracyBand::Excellent));
}
