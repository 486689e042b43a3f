use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

use carebook_core::api::{AppConfig, PortalService, SessionManager, SessionTimeouts};

use crate::http::HttpClient;
use crate::portal::HttpPortal;
use crate::session::HttpSessionBackend;

pub fn build_client(cfg: &AppConfig) -> Result<HttpClient> {
    HttpClient::new(&cfg.backend)
}

/// The returned session has not probed the backend yet.
pub fn build_session(cfg: &AppConfig, client: HttpClient) -> SessionManager {
    let timeouts = SessionTimeouts::from_config(&cfg.backend);
    SessionManager::new(Arc::new(HttpSessionBackend::new(client, timeouts)), timeouts)
}

pub fn build_portal(cfg: &AppConfig, client: HttpClient) -> Arc<dyn PortalService> {
    Arc::new(HttpPortal::new(
        client,
        Duration::from_millis(cfg.backend.request_timeout_ms),
    ))
}
