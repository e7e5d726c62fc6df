// Ranking engine - Best and worst performing tasks with deterministic tie-breaks
use crate::domain::metrics::{RankedTask, RankedTaskList, TaskMetrics};
use std::cmp::Ordering;

pub const DEFAULT_TOP_COUNT: usize = 5;

/// Ranks tasks by average score.
///
/// Best: highest score first, faster task wins a tie.
/// Worst: lowest score first, slower task loses a tie.
/// Equal score and time keep first-appearance order.
pub fn rank(metrics: &TaskMetrics, top_count: usize) -> RankedTaskList {
    let ranked: Vec<RankedTask> = metrics.values().map(RankedTask::from).collect();

    RankedTaskList {
        top_best: top_by(&ranked, top_count, best_first),
        top_worst: top_by(&ranked, top_count, worst_first),
    }
}

fn top_by(
    tasks: &[RankedTask],
    limit: usize,
    order: fn(&RankedTask, &RankedTask) -> Ordering,
) -> Vec<RankedTask> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(order);
    sorted.truncate(limit);
    sorted
}

fn best_first(a: &RankedTask, b: &RankedTask) -> Ordering {
    b.avg_score
        .total_cmp(&a.avg_score)
        .then_with(|| a.avg_time.total_cmp(&b.avg_time))
}

fn worst_first(a: &RankedTask, b: &RankedTask) -> Ordering {
    a.avg_score
        .total_cmp(&b.avg_score)
        .then_with(|| b.avg_time.total_cmp(&a.avg_time))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::metrics::TaskMetric;

    fn metric(id: &str, avg_score: f64, avg_time: f64) -> TaskMetric {
        let mut metric = TaskMetric::new(id.to_string(), format!("Task {}", id));
        metric.add(avg_score, avg_time);
        metric
    }

    fn keyed(list: Vec<TaskMetric>) -> TaskMetrics {
        list.into_iter().map(|m| (m.task_id.clone(), m)).collect()
    }

    fn ids(tasks: &[RankedTask]) -> Vec<&str> {
        tasks.iter().map(|t| t.metric.task_id.as_str()).collect()
    }

    #[test]
    fn test_equal_scores_break_on_time() {
        let metrics = keyed(vec![metric("T1", 90.0, 5.0), metric("T2", 90.0, 2.0)]);
        let ranked = rank(&metrics, 1);

        assert_eq!(ids(&ranked.top_best), vec!["T2"]);
        assert_eq!(ids(&ranked.top_worst), vec!["T1"]);
    }

    #[test]
    fn test_orders_by_average_score() {
        let metrics = keyed(vec![
            metric("T1", 3.0, 10.0),
            metric("T2", 9.0, 10.0),
            metric("T3", 6.0, 10.0),
        ]);
        let ranked = rank(&metrics, DEFAULT_TOP_COUNT);

        assert_eq!(ids(&ranked.top_best), vec!["T2", "T3", "T1"]);
        assert_eq!(ids(&ranked.top_worst), vec!["T1", "T3", "T2"]);
    }

    #[test]
    fn test_full_ties_keep_first_appearance() {
        let metrics = keyed(vec![metric("A", 5.0, 5.0), metric("B", 5.0, 5.0)]);
        let ranked = rank(&metrics, 5);

        assert_eq!(ids(&ranked.top_best), vec!["A", "B"]);
        assert_eq!(ids(&ranked.top_worst), vec!["A", "B"]);
    }

    #[test]
    fn test_top_count_limits_and_never_pads() {
        let metrics = keyed((0..8).map(|i| metric(&format!("T{}", i), f64::from(i), 1.0)).collect());

        assert_eq!(rank(&metrics, 5).top_best.len(), 5);
        assert_eq!(rank(&metrics, 20).top_worst.len(), 8);
        assert!(rank(&metrics, 0).top_best.is_empty());
    }

    #[test]
    fn test_empty_metrics() {
        assert_eq!(rank(&TaskMetrics::new(), DEFAULT_TOP_COUNT), RankedTaskList::default());
    }

    #[test]
    fn test_averages_use_count() {
        let mut t1 = TaskMetric::new("T1".to_string(), "Airway".to_string());
        t1.add(5.0, 20.0);
        t1.add(7.0, 10.0);
        let metrics = keyed(vec![t1]);
        let ranked = rank(&metrics, 1);

        assert_eq!(ranked.top_best[0].avg_score, 6.0);
        assert_eq!(ranked.top_best[0].avg_time, 15.0);
    }

    #[test]
    fn test_rank_leaves_input_untouched() {
        let metrics = keyed(vec![metric("T1", 1.0, 1.0), metric("T2", 2.0, 1.0)]);
        let before = metrics.clone();
        let first = rank(&metrics, 5);
        let second = rank(&metrics, 5);

        assert_eq!(metrics, before);
        assert_eq!(first, second);
    }
}
