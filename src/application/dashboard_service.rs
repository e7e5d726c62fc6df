// Dashboard service - Use case for building student and lecturer dashboards
use super::aggregator::aggregate;
use super::ranking::{DEFAULT_TOP_COUNT, rank};
use super::session_source::{SessionDataSource, SessionRequest, SourceError};
use crate::domain::dashboard::{
    ActivitySummary, CalendarEvent, DEFAULT_EVENT_COLOR, LecturerOverview, ProgressSummary, RecommendedSessions,
    SessionPoint, SessionSeries, StudentDashboard,
};
use crate::domain::metrics::RankedTaskList;
use crate::domain::scenario::{SubjectContext, TaskList};
use crate::domain::session::{ALL_TEMPLATES, Session, SessionBuffer, SessionSnapshot};
use chrono::{DateTime, NaiveTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;

const LATEST_ACTIVITY_COUNT: usize = 3;
const SECS_PER_DAY: f64 = 86_400.0;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSettings {
    pub top_count: usize,
    pub max_sessions: u32,
    pub template: String,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            top_count: DEFAULT_TOP_COUNT,
            max_sessions: 10,
            template: ALL_TEMPLATES.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    source: Arc<dyn SessionDataSource>,
    settings: DashboardSettings,
}

impl DashboardService {
    pub fn new(source: Arc<dyn SessionDataSource>, settings: DashboardSettings) -> Self {
        Self { source, settings }
    }

    /// Loads sessions from the configured source into the caller's buffer.
    ///
    /// Nothing is appended when the load fails.
    pub async fn load_into(
        &self,
        subject: &SubjectContext,
        request: &SessionRequest,
        buffer: &mut SessionBuffer,
    ) -> Result<usize, SourceError> {
        tracing::debug!("Loading sessions for {} from {} source", subject.subject_id, self.source.name());
        let sessions = self.source.load_sessions(subject, request).await.map_err(|e| {
            tracing::error!("Loading sessions for {} failed: {}", subject.subject_id, e);
            e
        })?;
        let loaded = sessions.len();
        buffer.extend(sessions);
        Ok(loaded)
    }

    /// Best and worst tasks over a snapshot.
    pub fn top_tasks(&self, sessions: &[Session]) -> RankedTaskList {
        rank(&aggregate(sessions), self.settings.top_count)
    }

    pub fn student_dashboard(
        &self,
        subject: &SubjectContext,
        snapshot: &SessionSnapshot,
        task_list: &TaskList,
        now: DateTime<Utc>,
    ) -> StudentDashboard {
        let filtered = snapshot.filter_by_template(&self.settings.template);
        let top_tasks = self.top_tasks(&filtered);

        StudentDashboard {
            title: format!("{} Training Dashboard", subject.subject_name),
            subject_id: subject.subject_id.clone(),
            subject_name: subject.subject_name.clone(),
            template: self.settings.template.clone(),
            performance: performance_series(snapshot),
            time_improvement: time_improvement_series(&filtered),
            progress: progress_summary(snapshot, task_list),
            latest_activities: latest_activities(snapshot),
            focus_tasks: top_tasks.top_worst.clone(),
            recommended: recommended_sessions(snapshot, self.settings.max_sessions, now),
            calendar: calendar_events(snapshot),
            top_tasks,
        }
    }

    pub fn lecturer_overview(&self, subject: &SubjectContext, snapshot: &SessionSnapshot) -> LecturerOverview {
        let students: HashSet<&str> = snapshot.iter().map(Session::student_id).collect();

        LecturerOverview {
            title: format!("{} Cohort Overview", subject.subject_name),
            subject_id: subject.subject_id.clone(),
            subject_name: subject.subject_name.clone(),
            student_count: students.len(),
            session_count: snapshot.len(),
            average_score_percent: average_score_percent(snapshot),
            top_tasks: self.top_tasks(&snapshot.filter_by_template(&self.settings.template)),
        }
    }
}

fn session_label(index: usize) -> String {
    format!("Session {}", index + 1)
}

fn session_points(sessions: &[Session], value: impl Fn(&Session) -> f64) -> Vec<SessionPoint> {
    sessions
        .iter()
        .enumerate()
        .map(|(i, session)| SessionPoint {
            label: session_label(i),
            value: value(session),
            color: session.color().to_string(),
            scenario_name: session.scenario_name().to_string(),
        })
        .collect()
}

/// Obtained score per session, in session order.
pub fn performance_series(sessions: &[Session]) -> SessionSeries {
    SessionSeries::new("performance", "Score", None, session_points(sessions, Session::total_obtain_score))
}

/// Total completion time per session, in session order.
pub fn time_improvement_series(sessions: &[Session]) -> SessionSeries {
    SessionSeries::new(
        "time-improvement",
        "Time Used (Seconds)",
        Some("s"),
        session_points(sessions, Session::total_completion_time),
    )
}

/// Share of the task list that has been scored above zero at least once.
pub fn progress_summary(sessions: &[Session], task_list: &TaskList) -> ProgressSummary {
    let listed: HashSet<&str> = task_list.all_tasks.iter().map(|t| t.task_id.as_str()).collect();
    let completed: HashSet<&str> = sessions
        .iter()
        .flat_map(Session::tasks)
        .filter(|t| t.is_completed())
        .map(|t| t.task_id.as_str())
        .filter(|id| listed.contains(id))
        .collect();

    let percent = if listed.is_empty() {
        0
    } else {
        (completed.len() as f64 / listed.len() as f64 * 100.0).round() as u32
    };

    ProgressSummary {
        completed_tasks: completed.len(),
        total_tasks: listed.len(),
        percent,
    }
}

/// The most recent sessions by date, newest first. Sessions without tasks are skipped.
pub fn latest_activities(sessions: &[Session]) -> Vec<ActivitySummary> {
    let mut by_date: Vec<&Session> = sessions.iter().collect();
    by_date.sort_by(|a, b| b.date().cmp(&a.date()));

    by_date
        .into_iter()
        .take(LATEST_ACTIVITY_COUNT)
        .filter(|s| !s.tasks().is_empty())
        .map(|s| ActivitySummary {
            scenario_name: s.scenario_name().to_string(),
            date: s.date(),
            avg_time_per_task: s.total_completion_time() / s.tasks().len() as f64,
            total_score: s.total_obtain_score(),
            completed_tasks: s.completed_task_count(),
            total_tasks: s.tasks().len(),
        })
        .collect()
}

/// Days left in the recommended training window, counted from the last session.
pub fn recommended_sessions(sessions: &[Session], max_sessions: u32, now: DateTime<Utc>) -> Option<RecommendedSessions> {
    let last = sessions.last()?;
    let last_midnight = last.date().and_time(NaiveTime::MIN).and_utc();
    let elapsed_days = ((now - last_midnight).num_seconds() as f64 / SECS_PER_DAY).ceil() as i64;

    Some(RecommendedSessions {
        total_sessions: sessions.len(),
        remaining_days: (i64::from(max_sessions) - elapsed_days).max(0),
    })
}

pub fn calendar_events(sessions: &[Session]) -> Vec<CalendarEvent> {
    sessions
        .iter()
        .map(|s| CalendarEvent {
            id: s.scenario_id().to_string(),
            calendar_id: "1".to_string(),
            title: CalendarEvent::task_count_label(s.tasks().len()),
            category: "time".to_string(),
            start: s.date(),
            bg_color: if s.color().is_empty() {
                DEFAULT_EVENT_COLOR.to_string()
            } else {
                s.color().to_string()
            },
        })
        .collect()
}

/// Mean of per-session obtained/max percentages. Sessions without a max score are left out.
pub fn average_score_percent(sessions: &[Session]) -> f64 {
    let percents: Vec<f64> = sessions
        .iter()
        .filter(|s| s.total_max_score() > 0.0)
        .map(|s| s.total_obtain_score() / s.total_max_score() * 100.0)
        .collect();
    if percents.is_empty() {
        return 0.0;
    }
    percents.iter().sum::<f64>() / percents.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::session_source::StudentScope;
    use crate::domain::scenario::Scenario;
    use crate::domain::session::SessionHeader;
    use crate::domain::task::TaskRecord;
    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone};

    struct FixedSource(Result<Vec<Session>, ()>);

    #[async_trait]
    impl SessionDataSource for FixedSource {
        fn name(&self) -> &'static str {
            "fixed"
        }

        async fn load_sessions(&self, subject: &SubjectContext, _: &SessionRequest) -> Result<Vec<Session>, SourceError> {
            self.0
                .clone()
                .map_err(|_| SourceError::NoScenarios(subject.subject_id.clone()))
        }
    }

    fn subject() -> SubjectContext {
        SubjectContext {
            subject_id: "SUBJECT3".to_string(),
            subject_name: "Midwifery".to_string(),
            subject_path: "data/subject3".to_string(),
            scenarios: Vec::new(),
        }
    }

    fn session(student: &str, path: &str, day: u32, tasks: &[(&str, f64, f64)]) -> Session {
        let scenario = Scenario::from_template_path(path.to_string(), "red".to_string());
        let date = NaiveDate::from_ymd_opt(2025, 3, day).unwrap();
        let tasks = tasks
            .iter()
            .map(|&(id, score, time)| {
                let mut task = TaskRecord::new(id.to_string(), format!("Task {}", id), 10.0);
                task.record_attempt(score, time, None);
                task
            })
            .collect();
        Session::new(SessionHeader::new(student, &subject(), scenario, date), tasks)
    }

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot::new(vec![
            session("S1", "s/1_a.csv", 20, &[("T1", 5.0, 20.0), ("T2", 0.0, 40.0)]),
            session("S1", "s/2_b.csv", 22, &[("T1", 7.0, 10.0), ("T3", 10.0, 30.0)]),
            session("S1", "s/1_a.csv", 21, &[("T1", 9.0, 12.0), ("T2", 2.0, 20.0)]),
            session("S1", "s/2_b.csv", 23, &[]),
        ])
    }

    fn task_list() -> TaskList {
        TaskList::new(
            ["T1", "T2", "T3", "T4"]
                .iter()
                .map(|id| TaskRecord::new(id.to_string(), id.to_string(), 10.0))
                .collect(),
        )
    }

    fn service(settings: DashboardSettings) -> DashboardService {
        DashboardService::new(Arc::new(FixedSource(Ok(Vec::new()))), settings)
    }

    #[tokio::test]
    async fn test_load_into_appends_to_buffer() {
        let sessions = snapshot().to_vec();
        let service = DashboardService::new(Arc::new(FixedSource(Ok(sessions))), DashboardSettings::default());
        let request = SessionRequest {
            scope: StudentScope::Student("S1".to_string()),
            sessions: 4,
            now: Utc::now(),
        };
        let mut buffer = SessionBuffer::new();

        assert_eq!(service.load_into(&subject(), &request, &mut buffer).await.unwrap(), 4);
        assert_eq!(service.load_into(&subject(), &request, &mut buffer).await.unwrap(), 4);
        assert_eq!(buffer.len(), 8);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_buffer_untouched() {
        let service = DashboardService::new(Arc::new(FixedSource(Err(()))), DashboardSettings::default());
        let request = SessionRequest {
            scope: StudentScope::Cohort(2),
            sessions: 4,
            now: Utc::now(),
        };
        let mut buffer = SessionBuffer::new();

        assert!(service.load_into(&subject(), &request, &mut buffer).await.is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_series_follow_session_order() {
        let snapshot = snapshot();
        let performance = performance_series(&snapshot);
        let time = time_improvement_series(&snapshot);

        assert_eq!(performance.points.len(), 4);
        assert_eq!(performance.points[1].label, "Session 2");
        assert_eq!(performance.points[1].value, 17.0);
        assert_eq!(time.points[0].value, 60.0);
        assert_eq!(time.points[3].value, 0.0);
        assert_eq!(time.unit.as_deref(), Some("s"));
    }

    #[test]
    fn test_progress_counts_scored_listed_tasks() {
        let progress = progress_summary(&snapshot(), &task_list());

        assert_eq!(progress.completed_tasks, 3);
        assert_eq!(progress.total_tasks, 4);
        assert_eq!(progress.percent, 75);
        assert_eq!(progress_summary(&snapshot(), &TaskList::default()).percent, 0);
    }

    #[test]
    fn test_latest_activities_newest_first() {
        let latest = latest_activities(&snapshot());

        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].date, NaiveDate::from_ymd_opt(2025, 3, 22).unwrap());
        assert_eq!(latest[0].avg_time_per_task, 20.0);
        assert_eq!(latest[0].completed_tasks, 2);
        assert_eq!(latest[1].date, NaiveDate::from_ymd_opt(2025, 3, 21).unwrap());
    }

    #[test]
    fn test_recommended_sessions_counts_partial_days() {
        let sessions = snapshot();
        let now = Utc.with_ymd_and_hms(2025, 3, 25, 6, 0, 0).unwrap();
        let recommended = recommended_sessions(&sessions, 10, now).unwrap();

        assert_eq!(recommended.total_sessions, 4);
        assert_eq!(recommended.remaining_days, 7);

        let much_later = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(recommended_sessions(&sessions, 10, much_later).unwrap().remaining_days, 0);
        assert!(recommended_sessions(&[], 10, now).is_none());
    }

    #[test]
    fn test_calendar_events() {
        let events = calendar_events(&snapshot());

        assert_eq!(events.len(), 4);
        assert_eq!(events[0].id, "SCENARIO_1");
        assert_eq!(events[0].title, "2 Tasks");
        assert_eq!(events[3].title, "0 Tasks");
        assert_eq!(events[0].bg_color, "red");
    }

    #[test]
    fn test_student_dashboard_applies_template_filter() {
        let settings = DashboardSettings {
            top_count: 2,
            template: "s/1_a.csv".to_string(),
            ..DashboardSettings::default()
        };
        let now = Utc.with_ymd_and_hms(2025, 3, 25, 6, 0, 0).unwrap();
        let dashboard = service(settings).student_dashboard(&subject(), &snapshot(), &task_list(), now);

        assert_eq!(dashboard.title, "Midwifery Training Dashboard");
        assert_eq!(dashboard.performance.points.len(), 4);
        assert_eq!(dashboard.time_improvement.points.len(), 2);
        assert_eq!(dashboard.top_tasks.top_best[0].metric.task_id, "T1");
        assert_eq!(dashboard.top_tasks.top_best[0].avg_score, 7.0);
        assert_eq!(dashboard.focus_tasks, dashboard.top_tasks.top_worst);
        assert_eq!(dashboard.focus_tasks[0].metric.task_id, "T2");
        assert_eq!(dashboard.calendar.len(), 4);
    }

    #[test]
    fn test_dashboard_is_repeatable_on_same_snapshot() {
        let service = service(DashboardSettings::default());
        let snapshot = snapshot();
        let now = Utc.with_ymd_and_hms(2025, 3, 25, 6, 0, 0).unwrap();

        let first = service.student_dashboard(&subject(), &snapshot, &task_list(), now);
        let second = service.student_dashboard(&subject(), &snapshot, &task_list(), now);
        assert_eq!(first, second);
    }

    #[test]
    fn test_lecturer_overview() {
        let sessions = SessionSnapshot::new(vec![
            session("S1", "s/1_a.csv", 20, &[("T1", 5.0, 20.0)]),
            session("S2", "s/1_a.csv", 20, &[("T1", 10.0, 10.0)]),
            session("S2", "s/1_a.csv", 21, &[]),
        ]);
        let overview = service(DashboardSettings::default()).lecturer_overview(&subject(), &sessions);

        assert_eq!(overview.student_count, 2);
        assert_eq!(overview.session_count, 3);
        assert_eq!(overview.average_score_percent, 75.0);
        assert_eq!(overview.top_tasks.top_best[0].metric.count, 2);
    }

    #[test]
    fn test_empty_snapshot_degrades_to_empty_views() {
        let empty = SessionSnapshot::default();
        let now = Utc::now();
        let dashboard = service(DashboardSettings::default()).student_dashboard(&subject(), &empty, &task_list(), now);

        assert!(dashboard.performance.points.is_empty());
        assert!(dashboard.latest_activities.is_empty());
        assert!(dashboard.recommended.is_none());
        assert_eq!(dashboard.top_tasks, RankedTaskList::default());
        assert_eq!(average_score_percent(&empty), 0.0);
    }
}
