// Session data source trait - Where a dashboard's sessions come from
use super::text_fetcher::FetchError;
use crate::domain::progress::ProgressError;
use crate::domain::scenario::SubjectContext;
use crate::domain::session::Session;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Progress(#[from] ProgressError),
    #[error("subject {0} has no scenario templates")]
    NoScenarios(String),
    #[error("unrecognized session file name: {0}")]
    UnrecognizedFileName(String),
}

/// Whose sessions a load covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentScope {
    /// A single student's sessions.
    Student(String),
    /// A lecturer's cohort. Sources that can enumerate students load all of
    /// them; synthetic sources generate this many.
    Cohort(u32),
}

impl StudentScope {
    /// Identifier of the `index`-th (0-based) synthetic cohort member.
    pub fn cohort_student_id(index: u32) -> String {
        format!("STU{:03}", index + 1)
    }
}

/// What a dashboard load asks a source for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRequest {
    pub scope: StudentScope,
    pub sessions: u32,
    pub now: DateTime<Utc>,
}

impl SessionRequest {
    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}

#[async_trait]
pub trait SessionDataSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Load the sessions in scope for `subject`, oldest first per student.
    async fn load_sessions(
        &self,
        subject: &SubjectContext,
        request: &SessionRequest,
    ) -> Result<Vec<Session>, SourceError>;
}
