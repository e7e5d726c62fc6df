// Session domain model and the snapshot handed to the engine
use super::scenario::{Scenario, SubjectContext};
use super::task::TaskRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::ops::Deref;
use std::sync::Arc;

/// Identity of a session: who trained, on what, and when.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionHeader {
    pub student_id: String,
    pub subject_id: String,
    pub subject_name: String,
    pub scenario: Scenario,
    pub date: NaiveDate,
}

impl SessionHeader {
    pub fn new(student_id: &str, subject: &SubjectContext, scenario: Scenario, date: NaiveDate) -> Self {
        Self {
            student_id: student_id.to_string(),
            subject_id: subject.subject_id.clone(),
            subject_name: subject.subject_name.clone(),
            scenario,
            date,
        }
    }
}

/// One completed or simulated training attempt. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    student_id: String,
    subject_id: String,
    subject_name: String,
    scenario_id: String,
    scenario_name: String,
    scenario_path: String,
    color: String,
    date: NaiveDate,
    total_max_score: f64,
    total_obtain_score: f64,
    tasks: Vec<TaskRecord>,
}

impl Session {
    pub fn new(header: SessionHeader, tasks: Vec<TaskRecord>) -> Self {
        let total_max_score = tasks.iter().map(|t| t.max_score).sum();
        let total_obtain_score = tasks.iter().map(|t| t.obtained_score).sum();
        let SessionHeader {
            student_id,
            subject_id,
            subject_name,
            scenario,
            date,
        } = header;

        Self {
            student_id,
            subject_id,
            subject_name,
            scenario_id: scenario.id,
            scenario_name: scenario.name,
            scenario_path: scenario.path,
            color: scenario.color,
            date,
            total_max_score,
            total_obtain_score,
            tasks,
        }
    }

    pub fn student_id(&self) -> &str {
        &self.student_id
    }

    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    pub fn subject_name(&self) -> &str {
        &self.subject_name
    }

    pub fn scenario_id(&self) -> &str {
        &self.scenario_id
    }

    pub fn scenario_name(&self) -> &str {
        &self.scenario_name
    }

    pub fn scenario_path(&self) -> &str {
        &self.scenario_path
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn total_max_score(&self) -> f64 {
        self.total_max_score
    }

    pub fn total_obtain_score(&self) -> f64 {
        self.total_obtain_score
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    pub fn total_completion_time(&self) -> f64 {
        self.tasks.iter().map(|t| t.completion_time).sum()
    }

    pub fn completed_task_count(&self) -> usize {
        self.tasks.iter().filter(|t| t.is_completed()).count()
    }
}

/// A frozen, cheaply clonable view of a session collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot(Arc<[Session]>);

impl SessionSnapshot {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self(sessions.into())
    }

    /// Sessions whose scenario path matches `template`; `"all"` keeps everything.
    pub fn filter_by_template(&self, template: &str) -> SessionSnapshot {
        if template == ALL_TEMPLATES {
            return self.clone();
        }
        self.0
            .iter()
            .filter(|s| s.scenario_path == template)
            .cloned()
            .collect::<Vec<_>>()
            .into()
    }
}

pub const ALL_TEMPLATES: &str = "all";

impl Deref for SessionSnapshot {
    type Target = [Session];

    fn deref(&self) -> &[Session] {
        &self.0
    }
}

impl From<Vec<Session>> for SessionSnapshot {
    fn from(sessions: Vec<Session>) -> Self {
        Self::new(sessions)
    }
}

/// The orchestrator's mutable accumulation buffer. The engine only ever sees snapshots.
#[derive(Debug, Default)]
pub struct SessionBuffer {
    sessions: Vec<Session>,
}

impl SessionBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::new(self.sessions.clone())
    }
}

impl Extend<Session> for SessionBuffer {
    fn extend<I: IntoIterator<Item = Session>>(&mut self, iter: I) {
        self.sessions.extend(iter);
    }
}
