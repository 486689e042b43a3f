//! 会话类型定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::BackendConfig;
use crate::model::User;

/// 会话快照
///
/// 只读副本：修改只能通过 `SessionManager` 的 `login` / `logout`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// 当前登录用户
    pub identity: Option<User>,
    /// 后端是否可达
    pub backend_reachable: bool,
    /// 是否仍在启动探测中
    pub initializing: bool,
}

impl Session {
    pub(crate) fn starting() -> Self {
        Self {
            identity: None,
            backend_reachable: false,
            initializing: true,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.initializing {
            SessionPhase::Starting
        } else {
            SessionPhase::Ready
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// 会话阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// 启动探测中
    Starting,
    /// 就绪（终态）
    Ready,
}

/// 会话事件
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SessionEvent {
    /// 启动探测完成
    Ready {
        backend_reachable: bool,
        authenticated: bool,
        timestamp: DateTime<Utc>,
    },
    /// 登录
    LoggedIn {
        user_id: i64,
        timestamp: DateTime<Utc>,
    },
    /// 登出
    LoggedOut { timestamp: DateTime<Utc> },
}

/// 网络调用时间预算
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTimeouts {
    pub probe: Duration,
    pub identity: Duration,
    pub logout: Duration,
}

impl SessionTimeouts {
    pub fn from_config(cfg: &BackendConfig) -> Self {
        Self {
            probe: Duration::from_millis(cfg.probe_timeout_ms),
            identity: Duration::from_millis(cfg.identity_timeout_ms),
            logout: Duration::from_millis(cfg.logout_timeout_ms),
        }
    }
}

impl Default for SessionTimeouts {
    fn default() -> Self {
        Self::from_config(&BackendConfig::default())
    }
}
