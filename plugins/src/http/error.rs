use serde_json::Value;
use std::{error::Error as StdError, fmt};

const BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Decode,
    Status,
    Unknown,
}

impl ApiErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Decode => "decode",
            Self::Status => "status",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct ApiError {
    kind: ApiErrorKind,
    status: Option<u16>,
    url: Option<String>,
    message: String,
    /// The backend's own `{"error": "..."}` text, when it sent one.
    backend_message: Option<String>,
    source: Option<anyhow::Error>,
}

impl ApiError {
    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn backend_message(&self) -> Option<&str> {
        self.backend_message.as_deref()
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status, Some(401) | Some(403))
    }

    /// Text fit for showing to a person at a form.
    pub fn user_message(&self) -> String {
        if let Some(msg) = &self.backend_message {
            return msg.clone();
        }
        match self.kind {
            ApiErrorKind::Timeout => {
                "Request timeout. Please check if the backend server is running.".to_string()
            }
            ApiErrorKind::Connect | ApiErrorKind::Request => {
                "Network error. Please ensure the backend server is running.".to_string()
            }
            ApiErrorKind::Status => match self.status {
                Some(code) => format!("Request failed with status {code}"),
                None => "Request failed".to_string(),
            },
            _ => "An unexpected error occurred".to_string(),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error, url: String) -> Self {
        let kind = if err.is_timeout() {
            ApiErrorKind::Timeout
        } else if err.is_connect() {
            ApiErrorKind::Connect
        } else if err.is_request() {
            ApiErrorKind::Request
        } else if err.is_body() {
            ApiErrorKind::Body
        } else if err.is_decode() {
            ApiErrorKind::Decode
        } else {
            ApiErrorKind::Unknown
        };
        let status = err.status().map(|s| s.as_u16());
        let message = err.to_string();
        ApiError {
            kind,
            status,
            url: Some(url),
            message,
            backend_message: None,
            source: Some(anyhow::Error::new(err)),
        }
    }

    pub(crate) fn status_error(status: u16, url: String, body: &str) -> Self {
        ApiError {
            kind: ApiErrorKind::Status,
            status: Some(status),
            url: Some(url),
            message: preview_body(body),
            backend_message: extract_backend_message(body),
            source: None,
        }
    }

    pub(crate) fn decode_error(
        status: u16,
        url: String,
        err: serde_json::Error,
        body: &str,
    ) -> Self {
        let message = format!(
            "failed to decode response body: {} | body={}",
            err,
            preview_body(body)
        );
        ApiError {
            kind: ApiErrorKind::Decode,
            status: Some(status),
            url: Some(url),
            message,
            backend_message: None,
            source: Some(anyhow::Error::new(err)),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "api error kind={}", self.kind)?;
        if let Some(status) = self.status {
            write!(f, " status={}", status)?;
        }
        if let Some(url) = &self.url {
            write!(f, " url={}", url)?;
        }
        write!(f, ": {}", self.message)
    }
}

impl StdError for ApiError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

pub(crate) fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out = String::new();
    let mut truncated = false;
    for (idx, ch) in trimmed.chars().enumerate() {
        if idx >= BODY_PREVIEW_LIMIT {
            truncated = true;
            break;
        }
        out.push(ch);
    }

    if truncated {
        out.push_str("...");
    }

    out
}

fn extract_backend_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Finds an [`ApiError`] anywhere in an `anyhow` chain.
pub fn find_api_error(err: &anyhow::Error) -> Option<&ApiError> {
    err.chain().find_map(|e| e.downcast_ref::<ApiError>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_body_empty() {
        assert_eq!(preview_body("   "), "<empty body>");
    }

    #[test]
    fn test_preview_body_truncates() {
        let body = "a".repeat(BODY_PREVIEW_LIMIT + 10);
        let preview = preview_body(&body);
        assert!(preview.ends_with("..."));
        assert!(preview.len() <= BODY_PREVIEW_LIMIT + 3);
    }

    #[test]
    fn test_status_error_prefers_backend_message() {
        let err = ApiError::status_error(
            400,
            "http://localhost:5000/api/appointments".to_string(),
            r#"{"error": "Time slot is already booked"}"#,
        );
        assert_eq!(err.backend_message(), Some("Time slot is already booked"));
        assert_eq!(err.user_message(), "Time slot is already booked");
        let msg = err.to_string();
        assert!(msg.contains("kind=status"));
        assert!(msg.contains("status=400"));
        assert!(msg.contains("url=http://localhost:5000/api/appointments"));
    }

    #[test]
    fn test_status_error_without_json_body() {
        let err = ApiError::status_error(502, "http://x/api/doctors".to_string(), "bad gateway");
        assert_eq!(err.backend_message(), None);
        assert_eq!(err.user_message(), "Request failed with status 502");
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn test_decode_error_display() {
        let decode_err = serde_json::from_str::<Value>("not json").unwrap_err();
        let err = ApiError::decode_error(200, "http://x/api/user".to_string(), decode_err, "not json");
        let msg = err.to_string();
        assert!(msg.contains("kind=decode"));
        assert!(msg.contains("failed to decode response body"));
        assert_eq!(err.user_message(), "An unexpected error occurred");
    }

    #[test]
    fn test_find_api_error_through_context() {
        let err: anyhow::Error =
            ApiError::status_error(401, "http://x/api/user".to_string(), "{}").into();
        let err = err.context("identity fetch");
        let api = find_api_error(&err).expect("ApiError in chain");
        assert!(api.is_unauthorized());
    }
}
