use anyhow::Result;
use async_trait::async_trait;
use carebook_core::api::{SessionBackend, SessionTimeouts, User};
use reqwest::Method;

use crate::http::HttpClient;

pub const HEALTH_PATH: &str = "/api/health";
pub const USER_PATH: &str = "/api/user";
pub const LOGOUT_PATH: &str = "/api/logout";

pub struct HttpSessionBackend {
    client: HttpClient,
    timeouts: SessionTimeouts,
}

impl HttpSessionBackend {
    pub fn new(client: HttpClient, timeouts: SessionTimeouts) -> Self {
        Self { client, timeouts }
    }
}

#[async_trait]
impl SessionBackend for HttpSessionBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn probe(&self) -> Result<()> {
        tracing::debug!(
            target: "carebook.http",
            stage = "session.backend.probe.in",
            base_url = %self.client.base_url()
        );
        self.client
            .execute::<()>(Method::GET, HEALTH_PATH, None, self.timeouts.probe)
            .await
    }

    async fn fetch_identity(&self) -> Result<User> {
        let user: User = self.client.get(USER_PATH, self.timeouts.identity).await?;
        tracing::debug!(
            target: "carebook.http",
            stage = "session.backend.identity.out",
            user_id = user.id
        );
        Ok(user)
    }

    async fn notify_logout(&self) -> Result<()> {
        self.client
            .execute::<()>(Method::POST, LOGOUT_PATH, None, self.timeouts.logout)
            .await
    }
}
