// Inference backends
pub mod pose;
