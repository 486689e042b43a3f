//! 会话管理器

use super::backend::SessionBackend;
use super::transitions::SessionTransition;
use super::types::{Session, SessionEvent, SessionPhase, SessionTimeouts};
use crate::model::User;
use chrono::Utc;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::Instrument;

/// 会话管理器
///
/// 每个进程一个；克隆共享同一份会话。
#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<SessionManagerInner>,
}

struct SessionManagerInner {
    /// 当前会话
    session: RwLock<Session>,
    /// 后端
    backend: Arc<dyn SessionBackend>,
    timeouts: SessionTimeouts,
    /// initialize 只允许执行一次
    init_claimed: AtomicBool,
    /// 事件广播通道
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionManager {
    /// 创建处于 Starting 阶段的会话管理器
    pub fn new(backend: Arc<dyn SessionBackend>, timeouts: SessionTimeouts) -> Self {
        let (event_tx, _) = broadcast::channel(64);

        let inner = SessionManagerInner {
            session: RwLock::new(Session::starting()),
            backend,
            timeouts,
            init_claimed: AtomicBool::new(false),
            event_tx,
        };

        Self {
            inner: Arc::new(inner),
        }
    }

    /// 创建并完成启动探测
    pub async fn start(backend: Arc<dyn SessionBackend>, timeouts: SessionTimeouts) -> Self {
        let manager = Self::new(backend, timeouts);
        manager.initialize().await;
        manager
    }

    /// 订阅会话事件
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.event_tx.subscribe()
    }

    fn emit_event(&self, event: SessionEvent) {
        let _ = self.inner.event_tx.send(event);
    }

    /// 获取会话快照
    pub async fn snapshot(&self) -> Session {
        self.inner.session.read().await.clone()
    }

    /// 等待启动探测结束
    pub async fn wait_ready(&self) -> Session {
        let mut rx = self.subscribe();
        loop {
            let session = self.snapshot().await;
            if !session.initializing {
                return session;
            }
            if let Err(broadcast::error::RecvError::Closed) = rx.recv().await {
                return self.snapshot().await;
            }
        }
    }

    async fn update<F>(&self, f: F) -> Session
    where
        F: FnOnce(&mut Session),
    {
        let mut session = self.inner.session.write().await;
        f(&mut session);
        // identity 非空 => 后端可达
        debug_assert!(session.identity.is_none() || session.backend_reachable);
        session.clone()
    }

    /// 启动探测：健康检查，成功后再拉取当前用户。
    ///
    /// 探测在独立任务中运行：调用方的 future 被丢弃时只是停止等待，
    /// 会话仍会进入 Ready。只有第一次调用会发起探测；之后的调用等待其结束。
    #[tracing::instrument(name = "session.initialize", skip(self))]
    pub async fn initialize(&self) {
        if self.inner.init_claimed.swap(true, Ordering::SeqCst) {
            tracing::debug!(target: "carebook.session", "initialize already claimed, waiting for ready");
            self.wait_ready().await;
            return;
        }

        let this = self.clone();
        let task = tokio::spawn(
            async move { this.run_initialization().await }.instrument(tracing::Span::current()),
        );
        if let Err(err) = task.await {
            tracing::warn!(
                target: "carebook.session",
                stage = "session.initialize.aborted",
                error = %err
            );
            self.update(|s| {
                s.backend_reachable = false;
                s.identity = None;
            })
            .await;
            self.finish_initialization().await;
        }
    }

    async fn run_initialization(&self) {
        let reachable = self.probe().await;
        if reachable {
            self.update(|s| s.backend_reachable = true).await;
            let identity = self.fetch_identity().await;
            self.update(|s| s.identity = identity).await;
        } else {
            self.update(|s| {
                s.backend_reachable = false;
                s.identity = None;
            })
            .await;
        }

        self.finish_initialization().await;
    }

    async fn probe(&self) -> bool {
        let budget = self.inner.timeouts.probe;
        tracing::debug!(
            target: "carebook.session",
            stage = "session.probe.in",
            timeout_ms = budget.as_millis() as u64
        );
        match tokio::time::timeout(budget, self.inner.backend.probe()).await {
            Ok(Ok(())) => {
                tracing::debug!(target: "carebook.session", stage = "session.probe.out", reachable = true);
                true
            }
            Ok(Err(err)) => {
                tracing::info!(
                    target: "carebook.session",
                    stage = "session.probe.out",
                    reachable = false,
                    error = %err,
                    "backend not available"
                );
                false
            }
            Err(_) => {
                tracing::info!(
                    target: "carebook.session",
                    stage = "session.probe.out",
                    reachable = false,
                    "backend connection timeout"
                );
                false
            }
        }
    }

    async fn fetch_identity(&self) -> Option<User> {
        let budget = self.inner.timeouts.identity;
        match tokio::time::timeout(budget, self.inner.backend.fetch_identity()).await {
            Ok(Ok(user)) => {
                tracing::debug!(
                    target: "carebook.session",
                    stage = "session.identity.out",
                    user_id = user.id
                );
                Some(user)
            }
            Ok(Err(err)) => {
                tracing::debug!(
                    target: "carebook.session",
                    stage = "session.identity.out",
                    error = %err,
                    "user not authenticated"
                );
                None
            }
            Err(_) => {
                tracing::debug!(
                    target: "carebook.session",
                    stage = "session.identity.out",
                    "identity fetch timed out, treating as not authenticated"
                );
                None
            }
        }
    }

    async fn finish_initialization(&self) {
        let session = self
            .update(|s| {
                if let Err(err) = SessionTransition::validate(s.phase(), SessionPhase::Ready) {
                    tracing::warn!(
                        target: "carebook.session",
                        from = SessionTransition::phase_description(s.phase()),
                        error = %err
                    );
                }
                s.initializing = false;
            })
            .await;

        tracing::info!(
            target: "carebook.session",
            backend_reachable = session.backend_reachable,
            authenticated = session.is_authenticated(),
            "session ready"
        );
        self.emit_event(SessionEvent::Ready {
            backend_reachable: session.backend_reachable,
            authenticated: session.is_authenticated(),
            timestamp: Utc::now(),
        });
    }

    /// 记录登录结果
    ///
    /// `identity` 来自调用方自己完成的登录请求；登录成功即视为后端可达。
    pub async fn login(&self, identity: User) {
        let user_id = identity.id;
        self.update(|s| {
            s.identity = Some(identity);
            s.backend_reachable = true;
        })
        .await;
        tracing::info!(target: "carebook.session", user_id, "logged in");
        self.emit_event(SessionEvent::LoggedIn {
            user_id,
            timestamp: Utc::now(),
        });
    }

    /// 登出
    ///
    /// 后端可达时尽力通知后端；无论结果如何都清空当前用户，不改变可达性。
    pub async fn logout(&self) {
        let reachable = self.inner.session.read().await.backend_reachable;
        if reachable {
            best_effort(
                "session.logout.notify",
                self.inner.timeouts.logout,
                self.inner.backend.notify_logout(),
            )
            .await;
        }

        self.update(|s| s.identity = None).await;
        tracing::info!(target: "carebook.session", "logged out");
        self.emit_event(SessionEvent::LoggedOut {
            timestamp: Utc::now(),
        });
    }
}

/// 尽力而为：超时或失败只记录日志，结果不返回给调用方。
async fn best_effort<F>(stage: &'static str, budget: Duration, fut: F)
where
    F: Future<Output = anyhow::Result<()>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(Ok(())) => tracing::debug!(target: "carebook.session", stage, "done"),
        Ok(Err(err)) => tracing::debug!(target: "carebook.session", stage, error = %err, "ignored failure"),
        Err(_) => tracing::debug!(target: "carebook.session", stage, "ignored timeout"),
    }
}
