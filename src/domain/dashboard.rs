// Dashboard view models handed to rendering sinks
use super::metrics::{RankedTask, RankedTaskList};
use chrono::NaiveDate;
use serde::Serialize;

pub const DEFAULT_EVENT_COLOR: &str = "#9CA3AF";

/// One point per session, in session order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPoint {
    pub label: String,
    pub value: f64,
    pub color: String,
    pub scenario_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSeries {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub points: Vec<SessionPoint>,
}

impl SessionSeries {
    pub fn new(id: &str, title: &str, unit: Option<&str>, points: Vec<SessionPoint>) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            unit: unit.map(str::to_string),
            points,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub percent: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySummary {
    pub scenario_name: String,
    pub date: NaiveDate,
    pub avg_time_per_task: f64,
    pub total_score: f64,
    pub completed_tasks: usize,
    pub total_tasks: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedSessions {
    pub total_sessions: usize,
    pub remaining_days: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: String,
    pub calendar_id: String,
    pub title: String,
    pub category: String,
    pub start: NaiveDate,
    pub bg_color: String,
}

impl CalendarEvent {
    pub fn task_count_label(count: usize) -> String {
        format!("{} Task{}", count, if count == 1 { "" } else { "s" })
    }
}

/// Everything the student view draws for one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDashboard {
    pub title: String,
    pub subject_id: String,
    pub subject_name: String,
    pub template: String,
    pub performance: SessionSeries,
    pub time_improvement: SessionSeries,
    pub progress: ProgressSummary,
    pub latest_activities: Vec<ActivitySummary>,
    pub focus_tasks: Vec<RankedTask>,
    pub recommended: Option<RecommendedSessions>,
    pub calendar: Vec<CalendarEvent>,
    pub top_tasks: RankedTaskList,
}

/// Cohort-wide summary for the lecturer view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LecturerOverview {
    pub title: String,
    pub subject_id: String,
    pub subject_name: String,
    pub student_count: usize,
    pub session_count: usize,
    pub average_score_percent: f64,
    pub top_tasks: RankedTaskList,
}
