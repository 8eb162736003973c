// Data models for pose estimation, landmark sets and MPJPE results

pub mod pose;
pub mod landmarks;
pub mod evaluation;
