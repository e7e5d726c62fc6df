// Scenario and subject domain models
use super::task::TaskRecord;
use indexmap::IndexMap;
use serde::Serialize;

pub const DEFAULT_SCENARIO_COLOR: &str = "rgba(128, 128, 128, 0.8)";

/// A simulation exercise template, shared by many sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub path: String,
    pub color: String,
}

impl Scenario {
    /// Derives id and name from a template path such as `.../1_cpr_basic.csv`.
    pub fn from_template_path(path: String, color: String) -> Self {
        let stem = Self::file_stem(&path);
        let prefix = stem.split('_').next().unwrap_or_default();
        Self {
            id: format!("SCENARIO_{}", prefix),
            name: stem.to_uppercase(),
            path,
            color,
        }
    }

    /// A scenario known only by its identifier, e.g. one recovered from an export file name.
    pub fn unlisted(id: String) -> Self {
        Self {
            name: id.clone(),
            id,
            path: String::new(),
            color: DEFAULT_SCENARIO_COLOR.to_string(),
        }
    }

    fn file_stem(path: &str) -> &str {
        let file = path.rsplit('/').next().unwrap_or(path);
        file.strip_suffix(".csv").unwrap_or(file)
    }
}

/// Everything a dashboard needs to know about the subject being viewed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectContext {
    pub subject_id: String,
    pub subject_name: String,
    pub subject_path: String,
    pub scenarios: Vec<Scenario>,
}

impl SubjectContext {
    pub fn task_list_path(&self) -> String {
        format!("{}/task_list.csv", self.subject_path)
    }

    /// Subject id derived from the last path segment, upper-cased.
    pub fn id_from_path(subject_path: &str) -> String {
        subject_path
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_uppercase()
    }

    /// Matches an exported scenario id (`SCENARIO_2`) to one of the subject's
    /// scenarios, by id first and otherwise by its 1-based position in the list.
    pub fn scenario_by_export_id(&self, scenario_id: &str) -> Option<&Scenario> {
        if let Some(listed) = self.scenarios.iter().find(|s| s.id == scenario_id) {
            return Some(listed);
        }
        let ordinal: usize = scenario_id.rsplit('_').next()?.parse().ok()?;
        self.scenarios.get(ordinal.checked_sub(1)?)
    }
}

/// The subject's master task list, grouped by step in first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskList {
    pub all_tasks: Vec<TaskRecord>,
    pub by_step: IndexMap<String, Vec<TaskRecord>>,
}

impl TaskList {
    pub fn new(all_tasks: Vec<TaskRecord>) -> Self {
        let mut by_step: IndexMap<String, Vec<TaskRecord>> = IndexMap::new();
        for task in &all_tasks {
            by_step.entry(task.step_id.clone()).or_default().push(task.clone());
        }
        Self { all_tasks, by_step }
    }
}
