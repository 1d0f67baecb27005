// Presentation layer - HTTP/JSON adapter over the core services
pub mod app_state;
pub mod handlers;
