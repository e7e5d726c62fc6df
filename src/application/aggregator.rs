// Task metrics aggregator - Folds sessions into per-task running totals
use crate::domain::metrics::{TaskMetric, TaskMetrics};
use crate::domain::session::Session;

/// Accumulates score, time and count per task id across `sessions`.
///
/// The first title seen for a task id is kept.
pub fn aggregate(sessions: &[Session]) -> TaskMetrics {
    let mut metrics = TaskMetrics::new();
    for session in sessions {
        for task in session.tasks() {
            metrics
                .entry(task.task_id.clone())
                .or_insert_with(|| TaskMetric::new(task.task_id.clone(), task.task_title.clone()))
                .add(finite_or_zero(task.obtained_score), finite_or_zero(task.completion_time));
        }
    }
    metrics
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
