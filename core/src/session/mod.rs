//! # 会话模块
//!
//! 维护"当前登录的是谁"和"后端是否可达"这两个信号。
//!
//! - 启动时做一次健康检查，成功后再拉取当前用户
//! - `login` / `logout` 是仅有的两个修改入口
//! - 调用方只拿到只读快照和事件

pub mod backend;
pub mod manager;
pub mod transitions;
pub mod types;

pub use backend::SessionBackend;
pub use manager::SessionManager;
pub use transitions::{SessionTransition, TransitionError};
pub use types::{Session, SessionEvent, SessionPhase, SessionTimeouts};
