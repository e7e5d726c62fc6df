// Task record domain model
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Lower bound for a task completion time, in seconds.
pub const MIN_COMPLETION_SECS: f64 = 10.0;

/// Upper bound of the synthetic completion-time range, in seconds.
pub const MAX_COMPLETION_SECS: f64 = 300.0;

/// The smallest scored unit of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub task_id: String,
    pub task_code: String,
    pub task_title: String,
    pub step_id: String,
    pub step_title: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub max_score: f64,
    pub obtained_score: f64,
    pub start_time: Option<DateTime<Utc>>,
    pub completion_time: f64,
}

impl TaskRecord {
    pub fn new(task_id: String, task_title: String, max_score: f64) -> Self {
        Self {
            task_id,
            task_code: String::new(),
            task_title,
            step_id: String::new(),
            step_title: String::new(),
            task_type: String::new(),
            max_score: max_score.max(0.0),
            obtained_score: 0.0,
            start_time: None,
            completion_time: MIN_COMPLETION_SECS,
        }
    }

    /// Records an attempt, keeping score and time inside their bounds.
    ///
    /// Returns `true` when either value had to be clamped.
    pub fn record_attempt(
        &mut self,
        obtained_score: f64,
        completion_time: f64,
        start_time: Option<DateTime<Utc>>,
    ) -> bool {
        let score = clamp_finite(obtained_score, 0.0, self.max_score);
        let time = clamp_finite(completion_time, MIN_COMPLETION_SECS, f64::MAX);
        let clamped = score != obtained_score || time != completion_time;

        self.obtained_score = score;
        self.completion_time = time;
        self.start_time = start_time;
        clamped
    }

    pub fn is_completed(&self) -> bool {
        self.obtained_score > 0.0
    }
}

fn clamp_finite(value: f64, min: f64, max: f64) -> f64 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    }
}
