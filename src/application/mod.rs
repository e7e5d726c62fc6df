// Application layer - Engine stages, collaborator traits and use cases
pub mod aggregator;
pub mod dashboard_service;
pub mod mock_generator;
pub mod ranking;
pub mod session_builder;
pub mod session_source;
pub mod subject_service;
pub mod text_fetcher;
