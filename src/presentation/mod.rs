// Presentation layer - Hands finished views to the rendering sink
pub mod app_state;
pub mod render;
