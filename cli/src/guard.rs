//! Session gates shared by the commands, plus error mapping for backend calls.
use carebook_core::api::{CliError, Session, User};
use carebook_plugins::http::{find_api_error, ApiErrorKind};

pub const SERVER_UNAVAILABLE: &str =
    "Backend server is not running. Please start the backend server and try again.";

pub fn require_reachable(session: &Session) -> Result<(), CliError> {
    if session.backend_reachable {
        Ok(())
    } else {
        Err(CliError::Unavailable(SERVER_UNAVAILABLE.to_string()))
    }
}

pub fn require_identity(session: &Session) -> Result<&User, CliError> {
    require_reachable(session)?;
    session
        .identity
        .as_ref()
        .ok_or_else(|| CliError::NotAuthenticated("Please log in to continue".to_string()))
}

/// Maps a failed backend call to the error category the exit code reflects.
pub fn backend_error(err: anyhow::Error) -> CliError {
    let Some(api) = find_api_error(&err) else {
        return CliError::Anyhow(err);
    };
    let message = api.user_message();
    tracing::debug!(
        target: "carebook.cli",
        stage = "backend.error",
        kind = %api.kind(),
        status = api.status(),
        error = %err
    );
    match api.kind() {
        ApiErrorKind::Timeout | ApiErrorKind::Connect => CliError::Unavailable(message),
        ApiErrorKind::Status if api.is_unauthorized() => CliError::NotAuthenticated(message),
        _ => CliError::Backend(message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(identity: Option<User>, reachable: bool) -> Session {
        Session {
            identity,
            backend_reachable: reachable,
            initializing: false,
        }
    }

    fn user() -> User {
        User {
            id: 1,
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "ada@example.com".into(),
        }
    }

    #[test]
    fn test_unreachable_blocks_everything() {
        let s = session(None, false);
        assert!(matches!(require_reachable(&s), Err(CliError::Unavailable(_))));
        assert!(matches!(require_identity(&s), Err(CliError::Unavailable(_))));
    }

    #[test]
    fn test_identity_required() {
        let s = session(None, true);
        assert!(require_reachable(&s).is_ok());
        assert!(matches!(
            require_identity(&s),
            Err(CliError::NotAuthenticated(_))
        ));

        let s = session(Some(user()), true);
        assert_eq!(require_identity(&s).unwrap().id, 1);
    }

    #[test]
    fn test_plain_errors_stay_internal() {
        let err = backend_error(anyhow::anyhow!("boom"));
        assert!(matches!(err, CliError::Anyhow(_)));
    }
}
