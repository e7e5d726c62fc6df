// Synthetic source - Generated sessions for when no recorded data exists
use super::csv_reader::read_template_tasks;
use crate::application::session_builder::SessionBuilder;
use crate::application::session_source::{SessionDataSource, SessionRequest, SourceError, StudentScope};
use crate::application::text_fetcher::TextFetcher;
use crate::domain::progress::Progress;
use crate::domain::scenario::{Scenario, SubjectContext};
use crate::domain::session::{Session, SessionHeader};
use crate::domain::task::TaskRecord;
use async_trait::async_trait;
use chrono::Days;
use futures::future::try_join_all;
use rand::Rng;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub struct SyntheticSource {
    fetcher: Arc<dyn TextFetcher>,
    rng: Mutex<StdRng>,
}

/// One planned session: who, at which progress level, on which scenario.
struct PlannedSession {
    student_id: String,
    level: u32,
    scenario: Scenario,
}

impl SyntheticSource {
    pub fn new(fetcher: Arc<dyn TextFetcher>, rng: StdRng) -> Self {
        Self {
            fetcher,
            rng: Mutex::new(rng),
        }
    }

    fn students(scope: &StudentScope) -> Vec<String> {
        match scope {
            StudentScope::Student(id) => vec![id.clone()],
            StudentScope::Cohort(count) => (0..*count).map(StudentScope::cohort_student_id).collect(),
        }
    }

    fn plan(&self, scenarios: &[Scenario], students: &[String], sessions: u32) -> Vec<PlannedSession> {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        students
            .iter()
            .flat_map(|student_id| (1..=sessions).map(move |level| (student_id, level)))
            .map(|(student_id, level)| PlannedSession {
                student_id: student_id.clone(),
                level,
                scenario: scenarios[rng.gen_range(0..scenarios.len())].clone(),
            })
            .collect()
    }

    async fn fetch_templates(&self, plan: &[PlannedSession]) -> Result<HashMap<String, Vec<TaskRecord>>, SourceError> {
        let mut paths: Vec<&str> = plan.iter().map(|p| p.scenario.path.as_str()).collect();
        paths.sort_unstable();
        paths.dedup();

        let bodies = try_join_all(paths.iter().map(|path| self.fetcher.fetch_text(path))).await?;
        Ok(paths
            .into_iter()
            .zip(bodies)
            .map(|(path, body)| (path.to_string(), read_template_tasks(&body)))
            .collect())
    }
}

#[async_trait]
impl SessionDataSource for SyntheticSource {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn load_sessions(
        &self,
        subject: &SubjectContext,
        request: &SessionRequest,
    ) -> Result<Vec<Session>, SourceError> {
        if subject.scenarios.is_empty() {
            return Err(SourceError::NoScenarios(subject.subject_id.clone()));
        }

        let students = Self::students(&request.scope);
        let plan = self.plan(&subject.scenarios, &students, request.sessions);
        let templates = self.fetch_templates(&plan).await?;

        let today = request.today();
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut sessions = Vec::with_capacity(plan.len());
        for planned in plan {
            let progress = Progress::new(planned.level, request.sessions)?;
            let days_back = u64::from(request.sessions - planned.level);
            let date = today.checked_sub_days(Days::new(days_back)).unwrap_or(today);
            let template = templates
                .get(&planned.scenario.path)
                .map(Vec::as_slice)
                .unwrap_or_default();

            let header = SessionHeader::new(&planned.student_id, subject, planned.scenario, date);
            sessions.push(SessionBuilder::new(header).synthesize(template, progress, request.now, &mut *rng));
        }

        tracing::info!(
            "Generated {} synthetic sessions for {} students",
            sessions.len(),
            students.len()
        );
        Ok(sessions)
    }
}
