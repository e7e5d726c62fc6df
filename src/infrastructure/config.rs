use crate::application::dashboard_service::DashboardSettings;
use crate::application::ranking::DEFAULT_TOP_COUNT;
use crate::domain::session::ALL_TEMPLATES;
use anyhow::Context;
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    #[serde(default)]
    pub source: SourceSettings,
    pub dashboard: ViewSettings,
    /// Subject path to display name.
    #[serde(default)]
    pub subjects: HashMap<String, String>,
    #[serde(default)]
    pub csv: CsvSettings,
    pub export: Option<ExportSettings>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Synthetic,
    Csv,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    #[serde(default)]
    pub kind: SourceKind,
    /// An `http(s)://` base URL or a local directory.
    #[serde(default = "default_base")]
    pub base: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            kind: SourceKind::default(),
            base: default_base(),
        }
    }
}

impl SourceSettings {
    pub fn is_remote(&self) -> bool {
        self.base.starts_with("http://") || self.base.starts_with("https://")
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewKind {
    #[default]
    Student,
    Lecturer,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewSettings {
    pub subject_path: String,
    #[serde(default = "default_student_id")]
    pub student_id: String,
    #[serde(default)]
    pub view: ViewKind,
    #[serde(default = "default_sessions")]
    pub sessions: u32,
    #[serde(default = "default_students")]
    pub students: u32,
    #[serde(default = "default_top_count")]
    pub top_count: usize,
    #[serde(default = "default_sessions")]
    pub max_sessions: u32,
    #[serde(default = "default_template")]
    pub template: String,
    pub seed: Option<u64>,
}

impl ViewSettings {
    pub fn dashboard_settings(&self) -> DashboardSettings {
        DashboardSettings {
            top_count: self.top_count,
            max_sessions: self.max_sessions,
            template: self.template.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CsvSettings {
    #[serde(default = "default_csv_directory")]
    pub directory: String,
    /// Explicit export file names; the directory's `file_list.json` is used otherwise.
    pub files: Option<Vec<String>>,
}

impl Default for CsvSettings {
    fn default() -> Self {
        Self {
            directory: default_csv_directory(),
            files: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportSettings {
    pub directory: String,
}

fn default_base() -> String {
    ".".to_string()
}

fn default_student_id() -> String {
    "STU001".to_string()
}

fn default_sessions() -> u32 {
    10
}

fn default_students() -> u32 {
    1
}

fn default_top_count() -> usize {
    DEFAULT_TOP_COUNT
}

fn default_template() -> String {
    ALL_TEMPLATES.to_string()
}

fn default_csv_directory() -> String {
    "csv".to_string()
}

/// Reads `config/dashboard.*`, overridden by `DASHBOARD__SECTION__KEY` variables.
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard"))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        );

    deserialize(builder)
}

fn deserialize(builder: ConfigBuilder<DefaultState>) -> anyhow::Result<DashboardConfig> {
    let settings = builder.build().context("Failed to read dashboard configuration")?;

    settings
        .try_deserialize()
        .context("Invalid dashboard configuration")
}
