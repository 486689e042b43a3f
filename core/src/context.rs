use crate::config::AppConfig;
use crate::error::CliError;
use crate::portal::PortalService;
use crate::session::SessionManager;
use std::sync::Arc;

/// One client process worth of state: a session plus the domain API sharing
/// its credentials.
#[derive(Clone)]
pub struct Services {
    pub session: SessionManager,
    pub portal: Arc<dyn PortalService>,
}

#[async_trait::async_trait]
pub trait ServicesFactory: Send + Sync {
    /// Builds fresh services. The returned session has not been initialized.
    async fn build_services(&self, cfg: &AppConfig) -> Result<Services, CliError>;
}

#[derive(Clone)]
pub struct AppContext {
    cfg: AppConfig,
    services_factory: Option<Arc<dyn ServicesFactory>>,
}

impl AppContext {
    pub fn new(cfg: AppConfig, services_factory: Option<Arc<dyn ServicesFactory>>) -> Self {
        Self {
            cfg,
            services_factory,
        }
    }

    pub fn cfg(&self) -> &AppConfig {
        &self.cfg
    }

    pub fn with_config(&self, cfg: AppConfig) -> Self {
        Self {
            cfg,
            services_factory: self.services_factory.clone(),
        }
    }

    pub async fn build_services(&self) -> Result<Services, CliError> {
        let Some(factory) = self.services_factory.as_ref() else {
            return Err(CliError::Config(crate::error::ConfigError::Invalid(
                "services_factory missing (cannot build backend client)".into(),
            )));
        };
        factory.build_services(&self.cfg).await
    }

    /// Builds services and runs the startup probe.
    pub async fn start_services(&self) -> Result<Services, CliError> {
        let services = self.build_services().await?;
        services.session.initialize().await;
        Ok(services)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[tokio::test]
    async fn test_build_services_without_factory_is_config_error() {
        let ctx = AppContext::new(AppConfig::default(), None);
        match ctx.build_services().await {
            Err(CliError::Config(ConfigError::Invalid(msg))) => {
                assert!(msg.contains("services_factory"))
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected an error"),
        }
    }

    #[test]
    fn test_with_config_keeps_factory_slot() {
        let ctx = AppContext::new(AppConfig::default(), None);
        let mut cfg = AppConfig::default();
        cfg.backend.base_url = "http://127.0.0.1:9".to_string();
        let next = ctx.with_config(cfg);
        assert_eq!(next.cfg().backend.base_url, "http://127.0.0.1:9");
        assert!(next.services_factory.is_none());
    }
}
