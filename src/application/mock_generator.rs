// Mock generator - Progress-biased scores and completion times for synthetic sessions
use crate::domain::progress::Progress;
use crate::domain::task::{MAX_COMPLETION_SECS, MIN_COMPLETION_SECS, TaskRecord};
use rand::Rng;

/// Splits `total_score` across `tasks` in task order.
///
/// Every task but the last draws uniformly from `0..=min(max, remaining)`; the
/// last takes whatever remains, clamped to its own max. The result never
/// exceeds `total_score` and never exceeds a task's max.
pub fn distribute_scores<R: Rng + ?Sized>(total_score: u32, tasks: &[TaskRecord], rng: &mut R) -> Vec<u32> {
    let mut remaining = total_score;
    let last = tasks.len().saturating_sub(1);

    tasks
        .iter()
        .enumerate()
        .map(|(i, task)| {
            let max = whole_points(task.max_score);
            let score = if i == last {
                remaining
            } else {
                rng.gen_range(0..=max.min(remaining))
            };
            remaining -= score;
            score.min(max)
        })
        .collect()
}

/// Draws a completion time in seconds, pulled toward the fast end as progress grows.
pub fn completion_time<R: Rng + ?Sized>(progress: Progress, rng: &mut R) -> u32 {
    let bias = progress.bias();
    let raw = rng.gen_range(MIN_COMPLETION_SECS..MAX_COMPLETION_SECS);
    let biased = (1.0 - bias) * raw + bias * MIN_COMPLETION_SECS;
    biased.floor().max(MIN_COMPLETION_SECS) as u32
}

/// Random `rgb(r, g, b)` colour for a scenario.
pub fn random_color<R: Rng + ?Sized>(rng: &mut R) -> String {
    let (r, g, b): (u8, u8, u8) = rng.r#gen();
    format!("rgb({}, {}, {})", r, g, b)
}

fn whole_points(score: f64) -> u32 {
    if score.is_finite() && score > 0.0 {
        score.floor().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
