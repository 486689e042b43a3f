use std::sync::Arc;

use carebook_core::api::{AppConfig, AppContext, BackendConfig};
use carebook_plugins::services::PluginServicesFactory;
use mockito::{Mock, ServerGuard};

pub const USER_JSON: &str = r#"{"id":7,"fname":"Ada","lname":"Lovelace","email":"ada@example.com"}"#;

pub const DOCTORS_JSON: &str = r#"[
    {"id":2,"fname":"Sam","lname":"Lee","department":"Cardiology","timeranges":"09:00, 10:30","yoe":12},
    {"id":3,"fname":"Kim","lname":"Park","department":"Neurology","timeranges":null}
]"#;

pub fn context_for(base_url: String) -> AppContext {
    let cfg = AppConfig {
        backend: BackendConfig {
            base_url,
            ..BackendConfig::default()
        },
        ..AppConfig::default()
    };
    AppContext::new(cfg, Some(Arc::new(PluginServicesFactory)))
}

pub async fn healthy(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/api/health")
        .with_status(200)
        .with_body(r#"{"status":"OK"}"#)
        .create_async()
        .await
}

pub async fn anonymous(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/api/user")
        .with_status(401)
        .with_body(r#"{"error":"Not authenticated"}"#)
        .create_async()
        .await
}

pub async fn doctors(server: &mut ServerGuard) -> Mock {
    server
        .mock("GET", "/api/doctors")
        .with_status(200)
        .with_body(DOCTORS_JSON)
        .create_async()
        .await
}
