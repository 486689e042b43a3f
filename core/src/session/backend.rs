use async_trait::async_trait;

use crate::model::User;

/// The three backend calls the session manager depends on.
///
/// Implementations carry the stored credentials themselves; the manager bounds
/// every call with its own timeout and drops the future when it expires.
#[async_trait]
pub trait SessionBackend: Send + Sync {
    fn name(&self) -> &str;

    /// `GET /api/health`; `Ok` only on a 2xx response.
    async fn probe(&self) -> anyhow::Result<()>;

    /// `GET /api/user`; `Ok` only on a 2xx response carrying a user.
    async fn fetch_identity(&self) -> anyhow::Result<User>;

    /// `POST /api/logout`.
    async fn notify_logout(&self) -> anyhow::Result<()>;
}
