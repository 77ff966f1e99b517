pub mod adapters;
pub mod config;
pub mod domain;
pub mod infra;
pub mod services;

use {
    axum::{Router, extract::DefaultBodyLimit},
    config::AppConfig,
    domain::store::AuditStore,
    std::sync::Arc,
    tower_http::{timeout::TimeoutLayer, trace::TraceLayer},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn AuditStore>,
}

impl AppState {
    pub fn new(store: impl AuditStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Full HTTP application: routes plus the request limits from `config`.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    adapters::http::router(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
