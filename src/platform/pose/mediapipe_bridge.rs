// MediaPipe integration bridge
// Provides an abstraction over the MediaPipe Pose model for body landmark detection
// Implemented with PyO3 (Python MediaPipe) behind the `ml-pyo3` feature

use crate::models::pose::{BodyPose, PoseConfig, PoseResult};

/// MediaPipe inference result
#[derive(Debug, Clone, Default)]
pub struct MediaPipeResult {
    pub body_pose: Option<BodyPose>,
    pub processing_time_ms: u64,
}

/// MediaPipe bridge trait
/// Implement this for each inference backend
pub trait MediaPipeBridge {
    /// Initialize the MediaPipe models
    fn new(config: &PoseConfig) -> PoseResult<Self>
    where
        Self: Sized;

    /// Run inference on a packed RGB8 frame
    fn process_frame(&self, frame_data: &[u8], width: u32, height: u32) -> PoseResult<MediaPipeResult>;

    /// Check if models are loaded
    fn is_initialized(&self) -> bool;

    /// Get model info
    fn get_model_info(&self) -> String;
}

// ==============================================================================
// PyO3 Implementation (Python MediaPipe)
// ==============================================================================

#[cfg(feature = "ml-pyo3")]
pub mod pyo3_backend {
    use super::*;
    use crate::models::pose::{Keypoint3D, PoseError};
    use pyo3::prelude::*;
    use pyo3::types::{PyBytes, PyDict};
    use serde_json::Value;
    use tracing::info;

    pub struct PyO3MediaPipe {
        // Python inference module
        inference_module: PyObject,
        config: PoseConfig,
    }

    impl MediaPipeBridge for PyO3MediaPipe {
        fn new(config: &PoseConfig) -> PoseResult<Self> {
            config.validate()?;

            Python::with_gil(|py| {
                let sys = py.import("sys")
                    .map_err(|e| PoseError::ModelLoadFailed(format!("Failed to import sys: {}", e)))?;

                let path_list = sys.getattr("path")
                    .map_err(|e| PoseError::ModelLoadFailed(format!("Failed to get sys.path: {}", e)))?;

                // python/ next to Cargo.toml holds the inference module
                let python_dir = std::env::current_dir()
                    .unwrap_or_default()
                    .join("python");

                path_list.call_method1("insert", (0, python_dir.to_string_lossy().to_string()))
                    .map_err(|e| PoseError::ModelLoadFailed(format!("Failed to add python dir to path: {}", e)))?;

                let inference_module = py.import("mediapipe_inference")
                    .map_err(|e| PoseError::ModelLoadFailed(format!(
                        "Failed to import mediapipe_inference: {}. Make sure Python dependencies are installed (pip install mediapipe)",
                        e
                    )))?;

                info!(complexity = ?config.model_complexity, "PyO3 MediaPipe initialized");

                Ok(Self {
                    inference_module: inference_module.into(),
                    config: config.clone(),
                })
            })
        }

        fn process_frame(&self, frame_data: &[u8], width: u32, height: u32) -> PoseResult<MediaPipeResult> {
            let start_time = std::time::Instant::now();

            Python::with_gil(|py| {
                let module = self.inference_module.as_ref(py);

                let process_fn = module.getattr("process_image_bytes")
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to get process_image_bytes: {}", e)))?;

                let kwargs = PyDict::new(py);
                kwargs.set_item("image_bytes", PyBytes::new(py, frame_data))
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to set image_bytes: {}", e)))?;
                kwargs.set_item("width", width)
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to set width: {}", e)))?;
                kwargs.set_item("height", height)
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to set height: {}", e)))?;
                kwargs.set_item("model_complexity", self.config.model_complexity as u8)
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to set model_complexity: {}", e)))?;
                kwargs.set_item("min_detection_confidence", self.config.min_detection_confidence)
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to set min_detection_confidence: {}", e)))?;
                kwargs.set_item("min_tracking_confidence", self.config.min_tracking_confidence)
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to set min_tracking_confidence: {}", e)))?;

                let result_json = process_fn.call((), Some(kwargs))
                    .map_err(|e| PoseError::InferenceFailed(format!("MediaPipe inference failed: {}", e)))?;

                let json_str: String = result_json.extract()
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to extract JSON: {}", e)))?;

                let result: Value = serde_json::from_str(&json_str)
                    .map_err(|e| PoseError::InferenceFailed(format!("Failed to parse JSON: {}", e)))?;

                let body_pose = match result.get("body_pose") {
                    Some(pose_data) if !pose_data.is_null() => Some(Self::parse_body_pose(pose_data)?),
                    _ => None,
                };

                Ok(MediaPipeResult {
                    body_pose,
                    processing_time_ms: start_time.elapsed().as_millis() as u64,
                })
            })
        }

        fn is_initialized(&self) -> bool {
            true
        }

        fn get_model_info(&self) -> String {
            format!(
                "PyO3 MediaPipe Bridge (Python backend) - complexity: {:?}",
                self.config.model_complexity
            )
        }
    }

    impl PyO3MediaPipe {
        fn parse_body_pose(data: &Value) -> PoseResult<BodyPose> {
            let keypoints = data.get("keypoints")
                .and_then(|k| k.as_array())
                .ok_or_else(|| PoseError::InferenceFailed("Missing body keypoints".to_string()))?;

            let field = |kp: &Value, name: &str| kp.get(name).and_then(|v| v.as_f64()).unwrap_or(0.0) as f32;

            let keypoints: Vec<Keypoint3D> = keypoints.iter()
                .map(|kp| Keypoint3D {
                    x: field(kp, "x"),
                    y: field(kp, "y"),
                    z: field(kp, "z"),
                    confidence: field(kp, "visibility"),
                })
                .collect();

            Ok(BodyPose::new(keypoints))
        }
    }
}

// ==============================================================================
// Dummy Implementation (for compilation without features)
// ==============================================================================

pub struct DummyMediaPipe {
    config: PoseConfig,
}

impl MediaPipeBridge for DummyMediaPipe {
    fn new(config: &PoseConfig) -> PoseResult<Self> {
        config.validate()?;
        tracing::warn!("Using dummy MediaPipe implementation (no inference); enable the 'ml-pyo3' feature for pose detection");
        Ok(Self {
            config: config.clone(),
        })
    }

    fn process_frame(&self, _frame_data: &[u8], _width: u32, _height: u32) -> PoseResult<MediaPipeResult> {
        Ok(MediaPipeResult::default())
    }

    fn is_initialized(&self) -> bool {
        false
    }

    fn get_model_info(&self) -> String {
        format!(
            "Dummy MediaPipe (no ML inference, complexity {:?}) - enable 'ml-pyo3' feature",
            self.config.model_complexity
        )
    }
}

// ==============================================================================
// Default Backend Selection
// ==============================================================================

#[cfg(feature = "ml-pyo3")]
pub type DefaultMediaPipe = pyo3_backend::PyO3MediaPipe;

#[cfg(not(feature = "ml-pyo3"))]
pub type DefaultMediaPipe = DummyMediaPipe;
