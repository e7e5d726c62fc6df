// Subject service - Use case for loading a subject's scenarios and task list
use super::text_fetcher::{FetchError, TextFetcher, fetch_json};
use super::mock_generator::random_color;
use crate::domain::scenario::{Scenario, SubjectContext, TaskList};
use crate::infrastructure::csv_reader::read_task_list;
use rand::rngs::StdRng;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

const FILE_LIST: &str = "file_list.json";

pub struct SubjectService {
    fetcher: Arc<dyn TextFetcher>,
    subject_names: HashMap<String, String>,
    rng: Mutex<StdRng>,
}

impl SubjectService {
    pub fn new(fetcher: Arc<dyn TextFetcher>, subject_names: HashMap<String, String>, rng: StdRng) -> Self {
        Self {
            fetcher,
            subject_names,
            rng: Mutex::new(rng),
        }
    }

    /// Lists the subject's scenario templates and gives each a display colour.
    pub async fn load_subject(&self, subject_path: &str) -> Result<SubjectContext, FetchError> {
        let subject_path = subject_path.trim_end_matches('/');
        let files: Vec<String> = fetch_json(self.fetcher.as_ref(), &format!("{}/{}", subject_path, FILE_LIST)).await?;

        let scenarios = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            files
                .iter()
                .filter(|file| file.as_str() != "task_list.csv")
                .map(|file| {
                    let path = format!("{}/scenarios/{}", subject_path, file);
                    Scenario::from_template_path(path, random_color(&mut *rng))
                })
                .collect::<Vec<_>>()
        };

        let subject_id = SubjectContext::id_from_path(subject_path);
        let subject_name = self
            .subject_names
            .get(subject_path)
            .cloned()
            .unwrap_or_else(|| subject_id.clone());

        tracing::info!("Loaded subject {} with {} scenarios", subject_id, scenarios.len());
        Ok(SubjectContext {
            subject_id,
            subject_name,
            subject_path: subject_path.to_string(),
            scenarios,
        })
    }

    /// Fetches the subject's master task list.
    pub async fn load_task_list(&self, subject: &SubjectContext) -> Result<TaskList, FetchError> {
        let csv_text = self.fetcher.fetch_text(&subject.task_list_path()).await?;
        Ok(TaskList::new(read_task_list(&csv_text)))
    }
}
