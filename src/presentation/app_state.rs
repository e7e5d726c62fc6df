// Application state - Services wired together for one dashboard build
use super::render::DashboardView;
use crate::application::dashboard_service::DashboardService;
use crate::application::session_source::SessionRequest;
use crate::application::subject_service::SubjectService;
use crate::domain::session::SessionBuffer;
use crate::infrastructure::config::ViewKind;
use crate::infrastructure::csv_export::CsvExporter;
use anyhow::Context;

pub struct AppState {
    pub subject_service: SubjectService,
    pub dashboard_service: DashboardService,
    pub exporter: Option<CsvExporter>,
}

impl AppState {
    /// Loads the subject and its sessions, then builds the requested view.
    pub async fn build_view(
        &self,
        subject_path: &str,
        view: ViewKind,
        request: &SessionRequest,
    ) -> anyhow::Result<DashboardView> {
        let subject = self
            .subject_service
            .load_subject(subject_path)
            .await
            .with_context(|| format!("Failed to load subject {}", subject_path))?;

        let mut buffer = SessionBuffer::new();
        self.dashboard_service
            .load_into(&subject, request, &mut buffer)
            .await
            .context("Failed to load sessions")?;
        tracing::info!("Building {:?} view over {} sessions", view, buffer.len());
        let snapshot = buffer.snapshot();

        if let Some(exporter) = &self.exporter {
            exporter
                .export_sessions(&snapshot, request.now)
                .await
                .context("Failed to export sessions")?;
        }

        match view {
            ViewKind::Student => {
                let task_list = self
                    .subject_service
                    .load_task_list(&subject)
                    .await
                    .with_context(|| format!("Failed to load task list for {}", subject.subject_id))?;
                let dashboard = self
                    .dashboard_service
                    .student_dashboard(&subject, &snapshot, &task_list, request.now);
                Ok(DashboardView::Student(dashboard))
            }
            ViewKind::Lecturer => Ok(DashboardView::Lecturer(
                self.dashboard_service.lecturer_overview(&subject, &snapshot),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::dashboard_service::DashboardSettings;
    use crate::application::session_source::StudentScope;
    use crate::application::text_fetcher::TextFetcher;
    use crate::application::text_fetcher::testing::StaticFetcher;
    use crate::infrastructure::synthetic_source::SyntheticSource;
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn fetcher() -> Arc<dyn TextFetcher> {
        Arc::new(
            StaticFetcher::default()
                .with("data/subject1/file_list.json", r#"["1_airway.csv", "task_list.csv"]"#)
                .with(
                    "data/subject1/scenarios/1_airway.csv",
                    "taskId,taskTitle,maxScore\nT1,Open airway,5\nT2,Check breathing,5",
                )
                .with(
                    "data/subject1/task_list.csv",
                    "stepId,taskId,taskTitle,maxScore\nS1,T1,Open airway,5\nS1,T2,Check breathing,5",
                ),
        )
    }

    fn state(exporter: Option<CsvExporter>) -> AppState {
        let fetcher = fetcher();
        let source = SyntheticSource::new(fetcher.clone(), StdRng::seed_from_u64(5));
        let mut names = HashMap::new();
        names.insert("data/subject1".to_string(), "CPR".to_string());

        AppState {
            subject_service: SubjectService::new(fetcher, names, StdRng::seed_from_u64(5)),
            dashboard_service: DashboardService::new(Arc::new(source), DashboardSettings::default()),
            exporter,
        }
    }

    fn request(scope: StudentScope) -> SessionRequest {
        SessionRequest {
            scope,
            sessions: 5,
            now: Utc.with_ymd_and_hms(2025, 3, 25, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_student_view() {
        let view = state(None)
            .build_view("data/subject1", ViewKind::Student, &request(StudentScope::Student("S1".to_string())))
            .await
            .unwrap();

        let DashboardView::Student(dashboard) = view else {
            panic!("expected a student dashboard");
        };
        assert_eq!(dashboard.title, "CPR Training Dashboard");
        assert_eq!(dashboard.performance.points.len(), 5);
        assert_eq!(dashboard.progress.total_tasks, 2);
        assert_eq!(dashboard.recommended.unwrap().total_sessions, 5);
        assert_eq!(dashboard.top_tasks.top_best.len(), 2);
    }

    #[tokio::test]
    async fn test_lecturer_view_exports_sessions() {
        let dir = tempfile::tempdir().unwrap();
        let view = state(Some(CsvExporter::new(dir.path())))
            .build_view("data/subject1", ViewKind::Lecturer, &request(StudentScope::Cohort(2)))
            .await
            .unwrap();

        let DashboardView::Lecturer(overview) = view else {
            panic!("expected a lecturer overview");
        };
        assert_eq!(overview.student_count, 2);
        assert_eq!(overview.session_count, 10);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 10);
    }

    #[tokio::test]
    async fn test_missing_subject_fails_with_context() {
        let err = state(None)
            .build_view("data/subject9", ViewKind::Student, &request(StudentScope::Cohort(1)))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("data/subject9"));
    }
}
