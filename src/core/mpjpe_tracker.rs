// Running per-session MPJPE history for charts, statistics and reports

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

use crate::models::evaluation::{AccuracyBand, Assessment, MpjpeResult};

/// Frames kept for live charts by default
pub const DEFAULT_HISTORY_WINDOW: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MpjpeStatistics {
    pub frames: usize,
    pub average: f64,
    pub min: f64,
    pub max: f64,
    pub latest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointAverage {
    pub joint: String,
    pub average_error: f64,
    pub samples: usize,
    pub assessment: Assessment,
}

#[derive(Debug, Clone)]
struct JointAccumulator {
    joint: String,
    total: f64,
    samples: usize,
}

/// Serializable snapshot of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub statistics: Option<MpjpeStatistics>,
    pub accuracy_band: Option<AccuracyBand>,
    pub joints: Vec<JointAverage>,
    pub values: Vec<f64>,
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// MPJPE values of the frames processed in one session.
///
/// Only evaluations with at least one overlapping joint are recorded.
pub struct MpjpeTracker {
    session_id: String,
    started_at: DateTime<Utc>,
    values: Vec<f64>,
    joints: Vec<JointAccumulator>,
    history_window: usize,
}

impl MpjpeTracker {
    pub fn new(history_window: usize) -> Self {
        let session_id = Uuid::new_v4().to_string();
        info!(session_id = %session_id, "Started MPJPE session");

        Self {
            session_id,
            started_at: Utc::now(),
            values: Vec::new(),
            joints: Vec::new(),
            history_window: history_window.max(1),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Record one evaluation; returns false when it was empty and skipped
    pub fn record(&mut self, result: &MpjpeResult) -> bool {
        let Some(mean) = result.mean() else {
            return false;
        };

        self.values.push(mean);

        for joint_error in result.iter() {
            match self.joints.iter_mut().find(|acc| acc.joint == joint_error.joint) {
                Some(acc) => {
                    acc.total += joint_error.error;
                    acc.samples += 1;
                }
                None => self.joints.push(JointAccumulator {
                    joint: joint_error.joint.clone(),
                    total: joint_error.error,
                    samples: 1,
                }),
            }
        }

        true
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Most recent values, at most `history_window` of them
    pub fn recent(&self) -> &[f64] {
        let start = self.values.len().saturating_sub(self.history_window);
        &self.values[start..]
    }

    pub fn statistics(&self) -> Option<MpjpeStatistics> {
        let latest = *self.values.last()?;
        let (min, max, total) = self.values.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY, 0.0),
            |(min, max, total), &v| (min.min(v), max.max(v), total + v),
        );

        Some(MpjpeStatistics {
            frames: self.values.len(),
            average: total / self.values.len() as f64,
            min,
            max,
            latest,
        })
    }

    /// Average error per joint, in first-seen order
    pub fn joint_averages(&self) -> Vec<JointAverage> {
        self.joints
            .iter()
            .map(|acc| {
                let average_error = acc.total / acc.samples as f64;
                JointAverage {
                    joint: acc.joint.clone(),
                    average_error,
                    samples: acc.samples,
                    assessment: Assessment::from_error(average_error),
                }
            })
            .collect()
    }

    /// Clear history and start a new session id
    pub fn reset(&mut self) {
        *self = Self::new(self.history_window);
    }

    pub fn report(&self) -> SessionReport {
        let statistics = self.statistics();
        SessionReport {
            session_id: self.session_id.clone(),
            started_at: self.started_at,
            generated_at: Utc::now(),
            accuracy_band: statistics.map(|s| AccuracyBand::from_error(s.average)),
            statistics,
            joints: self.joint_averages(),
            values: self.values.clone(),
        }
    }

    /// Write the report as pretty JSON to `<dir>/mpjpe_<session_id>.json`
    pub fn save_report(&self, dir: &Path) -> Result<PathBuf, ReportError> {
        std::fs::create_dir_all(dir)?;

        let path = dir.join(format!("mpjpe_{}.json", self.session_id));
        let contents = serde_json::to_string_pretty(&self.report())?;
        std::fs::write(&path, contents)?;

        info!(path = %path.display(), frames = self.values.len(), "Saved MPJPE report");
        Ok(path)
    }
}

impl Default for MpjpeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::JointError;

    fn result(errors: &[(&str, f64)]) -> MpjpeResult {
        let per_joint: Vec<JointError> = errors
            .iter()
            .map(|(name, error)| JointError {
                joint: name.to_string(),
                landmark_id: 0,
                error: *error,
            })
            .collect();
        let mean_error = per_joint.iter().map(|e| e.error).sum::<f64>() / per_joint.len().max(1) as f64;
        MpjpeResult { mean_error, per_joint }
    }

    #[test]
    fn test_empty_results_are_not_recorded() {
        let mut tracker = MpjpeTracker::default();
        assert!(!tracker.record(&MpjpeResult::empty()));
        assert!(tracker.is_empty());
        assert!(tracker.statistics().is_none());
    }

    #[test]
    fn test_statistics() {
        let mut tracker = MpjpeTracker::default();
        tracker.record(&result(&[("knee", 4.0)]));
        tracker.record(&result(&[("knee", 10.0)]));
        tracker.record(&result(&[("knee", 7.0)]));

        let stats = tracker.statistics().unwrap();
        assert_eq!(stats.frames, 3);
        assert_eq!(stats.average, 7.0);
        assert_eq!(stats.min, 4.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.latest, 7.0);
    }

    #[test]
    fn test_recent_window() {
        let mut tracker = MpjpeTracker::new(3);
        for i in 0..5 {
            tracker.record(&result(&[("hip", i as f64)]));
        }
        assert_eq!(tracker.values().len(), 5);
        assert_eq!(tracker.recent(), &[2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_joint_averages_keep_first_seen_order() {
        let mut tracker = MpjpeTracker::default();
        tracker.record(&result(&[("shoulder", 2.0), ("knee", 12.0)]));
        tracker.record(&result(&[("knee", 14.0), ("ankle", 1.0)]));

        let averages = tracker.joint_averages();
        let names: Vec<&str> = averages.iter().map(|a| a.joint.as_str()).collect();
        assert_eq!(names, vec!["shoulder", "knee", "ankle"]);
        assert_eq!(averages[1].average_error, 13.0);
        assert_eq!(averages[1].samples, 2);
        assert_eq!(averages[1].assessment, Assessment::NeedsImprovement);
        assert_eq!(averages[0].assessment, Assessment::Good);
    }

    #[test]
    fn test_reset_starts_new_session() {
        let mut tracker = MpjpeTracker::default();
        tracker.record(&result(&[("hip", 1.0)]));
        let first_id = tracker.session_id().to_string();

        tracker.reset();
        assert!(tracker.is_empty());
        assert!(tracker.joint_averages().is_empty());
        assert_ne!(tracker.session_id(), first_id);
    }

    #[test]
    fn test_save_report() {
        let dir = std::env::temp_dir().join("fitness_vision_report_test");
        let _ = std::fs::remove_dir_all(&dir);

        let mut tracker = MpjpeTracker::default();
        tracker.record(&result(&[("wrist", 30.0)]));
        let path = tracker.save_report(&dir).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let report: SessionReport = serde_json::from_str(&contents).unwrap();
        assert_eq!(report.session_id, tracker.session_id());
        assert_eq!(report.values, vec![30.0]);
        assert_eq!(report.accuracy_band, Some(AccuracyBand::Good));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
