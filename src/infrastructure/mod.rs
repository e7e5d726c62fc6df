// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod csv_export;
pub mod csv_reader;
pub mod csv_source;
pub mod file_fetcher;
pub mod http_fetcher;
pub mod synthetic_source;
