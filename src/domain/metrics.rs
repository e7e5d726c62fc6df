// Aggregated task statistics and ranked task lists
use indexmap::IndexMap;
use serde::Serialize;

/// Score and time totals for one task across many sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskMetric {
    pub task_id: String,
    pub task_title: String,
    pub total_score: f64,
    pub total_time: f64,
    pub count: u32,
}

impl TaskMetric {
    pub fn new(task_id: String, task_title: String) -> Self {
        Self {
            task_id,
            task_title,
            total_score: 0.0,
            total_time: 0.0,
            count: 0,
        }
    }

    pub fn add(&mut self, score: f64, time: f64) {
        self.total_score += score;
        self.total_time += time;
        self.count += 1;
    }

    pub fn avg_score(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_score / f64::from(self.count)
    }

    pub fn avg_time(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        self.total_time / f64::from(self.count)
    }
}

/// Task metrics keyed by task id, iterated in order of first appearance.
pub type TaskMetrics = IndexMap<String, TaskMetric>;

/// A task metric with its derived averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedTask {
    #[serde(flatten)]
    pub metric: TaskMetric,
    pub avg_score: f64,
    pub avg_time: f64,
}

impl From<&TaskMetric> for RankedTask {
    fn from(metric: &TaskMetric) -> Self {
        Self {
            avg_score: metric.avg_score(),
            avg_time: metric.avg_time(),
            metric: metric.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedTaskList {
    pub top_best: Vec<RankedTask>,
    pub top_worst: Vec<RankedTask>,
}
