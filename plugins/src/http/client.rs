use carebook_core::api::{BackendConfig, CredentialTransport};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::error::ApiError;

/// Thin reqwest wrapper shared by the session backend and the portal API.
///
/// Cloning shares the underlying connection pool and cookie jar, so a login
/// made through one clone authenticates the others.
#[derive(Clone)]
pub struct HttpClient {
    http: reqwest::Client,
    base_url: String,
    credentials: CredentialTransport,
}

impl HttpClient {
    pub fn new(cfg: &BackendConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .cookie_store(matches!(cfg.credentials, CredentialTransport::Cookies))
            .build()?;
        Ok(Self {
            http,
            base_url: cfg.base_url.trim().trim_end_matches('/').to_string(),
            credentials: cfg.credentials.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.credentials {
            CredentialTransport::Cookies => req,
            CredentialTransport::Bearer(token) => req.bearer_auth(token),
        }
    }

    async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        timeout: Duration,
    ) -> Result<(reqwest::StatusCode, String, String), ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        tracing::debug!(
            target: "carebook.http",
            stage = "http.request.in",
            method = %method,
            url = %url,
            timeout_ms = timeout.as_millis() as u64
        );

        let mut req = self.http.request(method, url.as_str()).timeout(timeout);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = self
            .auth(req)
            .send()
            .await
            .map_err(|err| ApiError::from_reqwest(err, url.clone()))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .map_err(|err| ApiError::from_reqwest(err, url.clone()))?;
        tracing::debug!(
            target: "carebook.http",
            stage = "http.request.out",
            url = %url,
            status = %status
        );
        Ok((status, url, body))
    }

    /// Sends the request and succeeds on any 2xx, ignoring the body.
    pub async fn execute<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        timeout: Duration,
    ) -> anyhow::Result<()>
    where
        B: Serialize + ?Sized,
    {
        let (status, url, text) = self.send(method, path, body, timeout).await?;
        if !status.is_success() {
            return Err(ApiError::status_error(status.as_u16(), url, &text).into());
        }
        Ok(())
    }

    /// Sends the request and decodes a 2xx JSON body into `T`.
    pub async fn fetch<B, T>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        timeout: Duration,
    ) -> anyhow::Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let (status, url, text) = self.send(method, path, body, timeout).await?;
        if !status.is_success() {
            return Err(ApiError::status_error(status.as_u16(), url, &text).into());
        }
        serde_json::from_str::<T>(&text)
            .map_err(|err| ApiError::decode_error(status.as_u16(), url, err, &text).into())
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, timeout: Duration) -> anyhow::Result<T> {
        self.fetch::<(), T>(Method::GET, path, None, timeout).await
    }
}
