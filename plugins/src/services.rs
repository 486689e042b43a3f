//! ServicesFactory 实现：一个 HttpClient（共享 cookie jar）同时供会话与门户接口使用。
use async_trait::async_trait;
use carebook_core::api::{AppConfig, CliError, Services, ServicesFactory};

use crate::factory;

pub struct PluginServicesFactory;

impl Default for PluginServicesFactory {
    fn default() -> Self {
        Self
    }
}

#[async_trait]
impl ServicesFactory for PluginServicesFactory {
    async fn build_services(&self, cfg: &AppConfig) -> Result<Services, CliError> {
        let client = factory::build_client(cfg).map_err(CliError::Anyhow)?;
        tracing::debug!(
            target: "carebook.services",
            stage = "services.build",
            base_url = %client.base_url()
        );
        Ok(Services {
            session: factory::build_session(cfg, client.clone()),
            portal: factory::build_portal(cfg, client),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use carebook_core::api::{AppContext, BackendConfig};
    use mockito::Server;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_login_through_portal_is_seen_by_session() {
        let mut server = Server::new_async().await;
        let _health = server
            .mock("GET", "/api/health")
            .with_status(200)
            .create_async()
            .await;
        let _anon = server
            .mock("GET", "/api/user")
            .match_header("cookie", mockito::Matcher::Missing)
            .with_status(401)
            .create_async()
            .await;
        let _login = server
            .mock("POST", "/api/login")
            .with_status(200)
            .with_header("set-cookie", "session=s1; Path=/")
            .with_body(r#"{"user":{"id":1,"fname":"Ada","lname":"L","email":"a@x.io"}}"#)
            .create_async()
            .await;

        let cfg = AppConfig {
            backend: BackendConfig {
                base_url: server.url(),
                ..BackendConfig::default()
            },
            ..AppConfig::default()
        };
        let ctx = AppContext::new(cfg, Some(Arc::new(PluginServicesFactory)));
        let services = ctx.start_services().await.unwrap();
        let s = services.session.snapshot().await;
        assert!(s.backend_reachable);
        assert!(!s.is_authenticated());

        let creds = carebook_core::api::Credentials::new("a@x.io", "pw").unwrap();
        let user = services.portal.login(&creds).await.unwrap();
        services.session.login(user).await;
        assert_eq!(
            services.session.snapshot().await.identity.map(|u| u.id),
            Some(1)
        );
    }
}
