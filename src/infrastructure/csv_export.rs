// CSV export - Writes sessions back out in the recorder's file format
use crate::domain::session::Session;
use crate::domain::task::TaskRecord;
use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Utc};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const EXPORT_HEADERS: [&str; 9] = [
    "stepTitle",
    "type",
    "taskId",
    "taskCode",
    "taskTitle",
    "maxScore",
    "obtainedScore",
    "startTime",
    "completionTime",
];

const UTC7_SECS: i32 = 7 * 60 * 60;
const STAMP_SUFFIX: &str = "_UTC+7";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to create export directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write export file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders task records as CSV text, with titles quoted.
pub fn export_tasks_csv(tasks: &[TaskRecord]) -> String {
    let mut lines = Vec::with_capacity(tasks.len() + 1);
    lines.push(EXPORT_HEADERS.join(","));

    for task in tasks {
        let start_time = task
            .start_time
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
            .unwrap_or_default();
        let row = [
            format!("\"{}\"", task.step_title),
            task.task_type.clone(),
            task.task_id.clone(),
            task.task_code.clone(),
            format!("\"{}\"", task.task_title),
            task.max_score.to_string(),
            task.obtained_score.to_string(),
            start_time,
            task.completion_time.to_string(),
        ];
        lines.push(row.join(","));
    }

    lines.join("\n")
}

/// Wall-clock time shifted to the fixed UTC+7 offset used in file names.
pub fn utc7_stamp(now: DateTime<Utc>) -> DateTime<FixedOffset> {
    match FixedOffset::east_opt(UTC7_SECS) {
        Some(offset) => now.with_timezone(&offset),
        None => now.fixed_offset(),
    }
}

/// `{index}_studentId_{id}_subject_{subject}_scenario_{scenario}_{yyyymmdd}_{hhmmss}_UTC+7.csv`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFileName {
    pub index: u32,
    pub student_id: String,
    pub subject_id: String,
    pub scenario_id: String,
    pub stamp: DateTime<FixedOffset>,
}

impl ExportFileName {
    pub fn parse(file_name: &str) -> Option<Self> {
        let file = file_name.rsplit('/').next()?;
        let stem = file.strip_suffix(".csv")?.strip_suffix(STAMP_SUFFIX)?;

        let mut tail = stem.rsplitn(3, '_');
        let time = tail.next()?;
        let date = tail.next()?;
        let head = tail.next()?;

        let (index, rest) = head.split_once("_studentId_")?;
        let (student_id, rest) = rest.split_once("_subject_")?;
        let (subject_id, scenario_id) = rest.split_once("_scenario_")?;

        let naive = NaiveDateTime::parse_from_str(&format!("{}{}", date, time), "%Y%m%d%H%M%S").ok()?;
        let offset = FixedOffset::east_opt(UTC7_SECS)?;
        let stamp = naive.and_local_timezone(offset).single()?;

        Some(Self {
            index: index.parse().ok()?,
            student_id: student_id.to_string(),
            subject_id: subject_id.to_string(),
            scenario_id: scenario_id.to_string(),
            stamp,
        })
    }
}

impl fmt::Display for ExportFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_studentId_{}_subject_{}_scenario_{}_{}{}.csv",
            self.index,
            self.student_id,
            self.subject_id,
            self.scenario_id,
            self.stamp.format("%Y%m%d_%H%M%S"),
            STAMP_SUFFIX
        )
    }
}

/// Writes one CSV file per session into a directory.
#[derive(Debug, Clone)]
pub struct CsvExporter {
    directory: PathBuf,
}

impl CsvExporter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub async fn export_sessions(
        &self,
        sessions: &[Session],
        now: DateTime<Utc>,
    ) -> Result<Vec<PathBuf>, ExportError> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .map_err(|source| ExportError::CreateDir {
                path: self.directory.clone(),
                source,
            })?;

        let stamp = utc7_stamp(now);
        let mut written = Vec::with_capacity(sessions.len());
        for (i, session) in sessions.iter().enumerate() {
            let name = ExportFileName {
                index: i as u32 + 1,
                student_id: session.student_id().to_string(),
                subject_id: session.subject_id().to_string(),
                scenario_id: session.scenario_id().to_string(),
                stamp,
            };
            let path = self.directory.join(name.to_string());
            tokio::fs::write(&path, export_tasks_csv(session.tasks()))
                .await
                .map_err(|source| ExportError::Write {
                    path: path.clone(),
                    source,
                })?;
            tracing::debug!("Exported session {} to {}", i + 1, path.display());
            written.push(path);
        }

        tracing::info!("Exported {} sessions to {}", written.len(), self.directory.display());
        Ok(written)
    }
}
