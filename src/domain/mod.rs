// Domain layer - Plain data shared by every dashboard surface
pub mod dashboard;
pub mod metrics;
pub mod progress;
pub mod scenario;
pub mod session;
pub mod task;
