// CSV file source - Sessions recorded by the simulator and exported as CSV
use super::csv_export::ExportFileName;
use super::csv_reader::read_task_records;
use crate::application::session_builder::SessionBuilder;
use crate::application::session_source::{SessionDataSource, SessionRequest, SourceError, StudentScope};
use crate::application::text_fetcher::{TextFetcher, fetch_json};
use crate::domain::scenario::{Scenario, SubjectContext};
use crate::domain::session::{Session, SessionHeader};
use async_trait::async_trait;
use futures::future::try_join_all;
use std::sync::Arc;

pub struct CsvFileSource {
    fetcher: Arc<dyn TextFetcher>,
    directory: String,
    files: Option<Vec<String>>,
}

impl CsvFileSource {
    /// `files` overrides the directory's `file_list.json` when given.
    pub fn new(fetcher: Arc<dyn TextFetcher>, directory: &str, files: Option<Vec<String>>) -> Self {
        Self {
            fetcher,
            directory: directory.trim_end_matches('/').to_string(),
            files,
        }
    }

    async fn list_files(&self) -> Result<Vec<String>, SourceError> {
        match &self.files {
            Some(files) => Ok(files.clone()),
            None => Ok(fetch_json(self.fetcher.as_ref(), &format!("{}/file_list.json", self.directory)).await?),
        }
    }

    fn scenario_for(subject: &SubjectContext, scenario_id: &str) -> Scenario {
        match subject.scenario_by_export_id(scenario_id) {
            Some(listed) => Scenario {
                id: scenario_id.to_string(),
                name: listed.name.clone(),
                path: listed.path.clone(),
                color: listed.color.clone(),
            },
            None => Scenario::unlisted(scenario_id.to_string()),
        }
    }
}

#[async_trait]
impl SessionDataSource for CsvFileSource {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn load_sessions(
        &self,
        subject: &SubjectContext,
        request: &SessionRequest,
    ) -> Result<Vec<Session>, SourceError> {
        let mut entries = Vec::new();
        for file in self.list_files().await? {
            let name = ExportFileName::parse(&file).ok_or_else(|| SourceError::UnrecognizedFileName(file.clone()))?;
            if let StudentScope::Student(student_id) = &request.scope {
                if &name.student_id != student_id {
                    tracing::debug!("Skipping {} for another student", file);
                    continue;
                }
            }
            entries.push((file, name));
        }
        entries.sort_by(|(_, a), (_, b)| (&a.student_id, a.index).cmp(&(&b.student_id, b.index)));

        let bodies = try_join_all(entries.iter().map(|(file, _)| {
            let path = format!("{}/{}", self.directory, file);
            let fetcher = self.fetcher.clone();
            async move { fetcher.fetch_text(&path).await }
        }))
        .await?;

        let sessions: Vec<Session> = entries
            .into_iter()
            .zip(bodies)
            .map(|((_, name), body)| {
                let scenario = Self::scenario_for(subject, &name.scenario_id);
                let header = SessionHeader::new(&name.student_id, subject, scenario, name.stamp.date_naive());
                SessionBuilder::new(header).from_records(read_task_records(&body))
            })
            .collect();

        tracing::info!("Loaded {} recorded sessions from {}", sessions.len(), self.directory);
        Ok(sessions)
    }
}
