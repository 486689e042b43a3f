//! 状态转换规则和验证

use super::types::SessionPhase;
use thiserror::Error;

/// 状态转换错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Invalid transition from {from:?} to {to:?}")]
    InvalidTransition { from: SessionPhase, to: SessionPhase },
    #[error("Cannot transition from terminal state {state:?}")]
    FromTerminalState { state: SessionPhase },
}

/// 状态转换
pub struct SessionTransition;

impl SessionTransition {
    /// 验证状态转换是否合法
    pub fn validate(from: SessionPhase, to: SessionPhase) -> Result<(), TransitionError> {
        if Self::is_terminal(from) {
            return Err(TransitionError::FromTerminalState { state: from });
        }

        match (from, to) {
            (SessionPhase::Starting, SessionPhase::Ready) => Ok(()),
            _ => Err(TransitionError::InvalidTransition { from, to }),
        }
    }

    /// 判断是否为终态
    pub fn is_terminal(phase: SessionPhase) -> bool {
        matches!(phase, SessionPhase::Ready)
    }

    /// 获取阶段的可读描述
    pub fn phase_description(phase: SessionPhase) -> &'static str {
        match phase {
            SessionPhase::Starting => "checking backend",
            SessionPhase::Ready => "ready",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starting_to_ready_is_the_only_transition() {
        assert!(SessionTransition::validate(SessionPhase::Starting, SessionPhase::Ready).is_ok());
        assert_eq!(
            SessionTransition::validate(SessionPhase::Starting, SessionPhase::Starting),
            Err(TransitionError::InvalidTransition {
                from: SessionPhase::Starting,
                to: SessionPhase::Starting
            })
        );
    }

    #[test]
    fn test_ready_is_terminal() {
        assert!(SessionTransition::is_terminal(SessionPhase::Ready));
        assert_eq!(
            SessionTransition::validate(SessionPhase::Ready, SessionPhase::Starting),
            Err(TransitionError::FromTerminalState {
                state: SessionPhase::Ready
            })
        );
    }

    #[test]
    fn test_phase_description() {
        assert_eq!(
            SessionTransition::phase_description(SessionPhase::Starting),
            "checking backend"
        );
        assert_eq!(SessionTransition::phase_description(SessionPhase::Ready), "ready");
    }
}
