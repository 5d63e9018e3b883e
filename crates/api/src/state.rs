use std::sync::Arc;

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::image_host::ImageHost;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: chardb_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Remote image host, absent when not configured.
    pub image_host: Option<Arc<dyn ImageHost>>,
}

impl AppState {
    /// The configured image host, or 503 when uploads are disabled.
    pub fn image_host(&self) -> AppResult<&dyn ImageHost> {
        self.image_host
            .as_deref()
            .ok_or_else(|| AppError::ServiceUnavailable("Image host is not configured".into()))
    }
}
