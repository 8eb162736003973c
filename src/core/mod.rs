pub mod config;

// MPJPE evaluation
pub mod mpjpe;
pub mod landmark_extractor;
pub mod ground_truth;

// Session tracking and visualization
pub mod mpjpe_tracker;
pub mod mpjpe_overlay;

pub mod frame_processor;
