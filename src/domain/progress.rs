// Training progress - position of a session inside a training arc
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProgressError {
    #[error("a training arc needs at least one session")]
    NoSessions,
}

/// How far into a training arc of `total` sessions a session sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    level: u32,
    total: u32,
}

impl Progress {
    pub fn new(level: u32, total: u32) -> Result<Self, ProgressError> {
        if total == 0 {
            return Err(ProgressError::NoSessions);
        }
        Ok(Self { level, total })
    }

    /// 0 at the start of the arc, 1 at its end. Levels past the end saturate.
    pub fn bias(&self) -> f64 {
        (f64::from(self.level) / f64::from(self.total)).clamp(0.0, 1.0)
    }

    /// Score ceiling for a session at this progress level.
    pub fn target_score(&self, total_max_score: f64) -> u32 {
        let target = (total_max_score.max(0.0) * f64::from(self.level) / f64::from(self.total)).floor();
        target.min(f64::from(u32::MAX)) as u32
    }
}
