// Session builder - Turns task rows into an immutable Session
use super::mock_generator::{completion_time, distribute_scores};
use crate::domain::progress::Progress;
use crate::domain::session::{Session, SessionHeader};
use crate::domain::task::TaskRecord;
use chrono::{DateTime, Utc};
use rand::Rng;

#[derive(Debug, Clone)]
pub struct SessionBuilder {
    header: SessionHeader,
}

impl SessionBuilder {
    pub fn new(header: SessionHeader) -> Self {
        Self { header }
    }

    /// Builds a session from recorded rows, using their scores and times as-is.
    pub fn from_records(self, tasks: Vec<TaskRecord>) -> Session {
        Session::new(self.header, tasks)
    }

    /// Builds a synthetic session from a scenario template.
    ///
    /// The template's max scores set the ceiling; `progress` decides how much of
    /// it is reached and how fast each task is completed.
    pub fn synthesize<R: Rng + ?Sized>(
        self,
        template: &[TaskRecord],
        progress: Progress,
        captured_at: DateTime<Utc>,
        rng: &mut R,
    ) -> Session {
        let total_max_score: f64 = template.iter().map(|t| t.max_score).sum();
        let target_score = progress.target_score(total_max_score);
        let scores = distribute_scores(target_score, template, rng);

        let tasks = template
            .iter()
            .zip(scores)
            .map(|(task, score)| {
                let mut task = task.clone();
                let time = completion_time(progress, rng);
                task.record_attempt(f64::from(score), f64::from(time), Some(captured_at));
                task
            })
            .collect();

        Session::new(self.header, tasks)
    }
}
