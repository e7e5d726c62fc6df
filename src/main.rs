// Main entry point - Dependency injection and dashboard build
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use rand::SeedableRng;
use rand::rngs::StdRng;

use training_dashboard::application::dashboard_service::DashboardService;
use training_dashboard::application::session_source::{SessionDataSource, SessionRequest, StudentScope};
use training_dashboard::application::subject_service::SubjectService;
use training_dashboard::application::text_fetcher::TextFetcher;
use training_dashboard::infrastructure::config::{DashboardConfig, SourceKind, ViewKind, load_dashboard_config};
use training_dashboard::infrastructure::csv_export::CsvExporter;
use training_dashboard::infrastructure::csv_source::CsvFileSource;
use training_dashboard::infrastructure::file_fetcher::FileFetcher;
use training_dashboard::infrastructure::http_fetcher::HttpFetcher;
use training_dashboard::infrastructure::synthetic_source::SyntheticSource;
use training_dashboard::presentation::app_state::AppState;
use training_dashboard::presentation::render::render_json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create fetcher (infrastructure layer)
    let fetcher: Arc<dyn TextFetcher> = if config.source.is_remote() {
        Arc::new(HttpFetcher::new(&config.source.base))
    } else {
        Arc::new(FileFetcher::new(&config.source.base))
    };

    let mut rng = match config.dashboard.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Select the session source once
    let source = session_source(&config, fetcher.clone(), &mut rng)?;
    tracing::info!("Using {} session source from {}", source.name(), config.source.base);

    // Create services (application layer)
    let state = AppState {
        subject_service: SubjectService::new(fetcher, config.subjects.clone(), rng),
        dashboard_service: DashboardService::new(source, config.dashboard.dashboard_settings()),
        exporter: config.export.as_ref().map(|export| CsvExporter::new(&export.directory)),
    };

    let scope = match config.dashboard.view {
        ViewKind::Student => StudentScope::Student(config.dashboard.student_id.clone()),
        ViewKind::Lecturer => StudentScope::Cohort(config.dashboard.students),
    };
    let request = SessionRequest {
        scope,
        sessions: config.dashboard.sessions,
        now: Utc::now(),
    };

    let view = state
        .build_view(&config.dashboard.subject_path, config.dashboard.view, &request)
        .await?;

    render_json(std::io::stdout().lock(), &view).context("Failed to write dashboard")?;

    Ok(())
}

fn session_source(
    config: &DashboardConfig,
    fetcher: Arc<dyn TextFetcher>,
    rng: &mut StdRng,
) -> anyhow::Result<Arc<dyn SessionDataSource>> {
    Ok(match config.source.kind {
        SourceKind::Synthetic => {
            let source_rng = StdRng::from_rng(&mut *rng).context("Failed to seed session generator")?;
            Arc::new(SyntheticSource::new(fetcher, source_rng))
        }
        SourceKind::Csv => Arc::new(CsvFileSource::new(
            fetcher,
            &config.csv.directory,
            config.csv.files.clone(),
        )),
    })
}
