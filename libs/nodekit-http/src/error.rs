use thiserror::Error;

/// A remote call returned a status other than the one the caller expected.
///
/// Renders as `"<body> (expected=<expected> actual=<actual>)"`. The client
/// never retries on this error; the caller decides what to do with it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{body} (expected={expected} actual={actual})")]
pub struct UnexpectedStatusError {
    message: String,
    expected: u16,
    actual: u16,
    body: String,
}

impl UnexpectedStatusError {
    /// Build the error from the declared and received status and the raw body.
    ///
    /// The message is taken from a JSON `message`/`error` field (or the first
    /// entry of an `errors` array) when the body is JSON, otherwise it is the
    /// trimmed body itself.
    #[must_use]
    pub fn new(expected: u16, actual: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self {
            message: message_from_body(&body),
            expected,
            actual,
            body,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn expected(&self) -> u16 {
        self.expected
    }

    #[must_use]
    pub fn actual(&self) -> u16 {
        self.actual
    }

    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }
}

fn message_from_body(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_owned();
    };

    let from_field = |v: &serde_json::Value| {
        v.get("message")
            .or_else(|| v.get("error"))
            .and_then(serde_json::Value::as_str)
            .map(str::to_owned)
    };

    from_field(&value)
        .or_else(|| {
            value
                .get("errors")
                .and_then(serde_json::Value::as_array)
                .and_then(|errs| errs.first())
                .and_then(from_field)
        })
        .unwrap_or_else(|| body.trim().to_owned())
}

/// REST client error types
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RestClientError {
    /// Base URL or request path could not be turned into a valid URL
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Request building failed
    #[error("Failed to build request: {0}")]
    RequestBuild(#[from] http::Error),

    /// Transport error (connection refused, reset, DNS, ...)
    #[error("Transport error: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Status did not match what the caller declared
    #[error(transparent)]
    UnexpectedStatus(#[from] UnexpectedStatusError),

    /// Request or response body was not the JSON we needed
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl RestClientError {
    /// Returns the status mismatch if this is one.
    #[must_use]
    pub fn as_unexpected_status(&self) -> Option<&UnexpectedStatusError> {
        match self {
            RestClientError::UnexpectedStatus(e) => Some(e),
            _ => None,
        }
    }
}

impl From<hyper::Error> for RestClientError {
    fn from(err: hyper::Error) -> Self {
        RestClientError::Transport(Box::new(err))
    }
}

impl From<hyper_util::client::legacy::Error> for RestClientError {
    fn from(err: hyper_util::client::legacy::Error) -> Self {
        RestClientError::Transport(Box::new(err))
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_unexpected_status_display() {
        let err = UnexpectedStatusError::new(200, 404, "not found");
        assert_eq!(err.to_string(), "not found (expected=200 actual=404)");
        assert_eq!(err.message(), "not found");
        assert_eq!(err.expected(), 200);
        assert_eq!(err.actual(), 404);
    }

    #[test]
    fn test_message_from_json_body() {
        let body = r#"{"message":"volume already exists"}"#;
        let err = UnexpectedStatusError::new(201, 409, body);
        assert_eq!(err.message(), "volume already exists");
        // Display always renders the raw body
        assert_eq!(err.to_string(), format!("{body} (expected=201 actual=409)"));
    }

    #[test]
    fn test_message_from_errors_array() {
        let body = r#"{"errors":[{"code":2,"message":"peer not found"}]}"#;
        let err = UnexpectedStatusError::new(204, 404, body);
        assert_eq!(err.message(), "peer not found");
    }

    #[test]
    fn test_message_falls_back_to_trimmed_body() {
        let err = UnexpectedStatusError::new(200, 500, "  internal error\n");
        assert_eq!(err.message(), "internal error");
        assert_eq!(err.body(), "  internal error\n");
    }

    #[test]
    fn test_json_without_known_fields_uses_body() {
        let err = UnexpectedStatusError::new(200, 400, r#"{"code":7}"#);
        assert_eq!(err.message(), r#"{"code":7}"#);
    }

    #[test]
    fn test_unexpected_status_is_transparent() {
        let err = RestClientError::from(UnexpectedStatusError::new(200, 503, "busy"));
        assert_eq!(err.to_string(), "busy (expected=200 actual=503)");
        assert!(err.as_unexpected_status().is_some());
    }

    #[test]
    fn test_transport_error_preserves_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = RestClientError::Transport(Box::new(inner));

        let source = err.source().unwrap();
        assert!(source.downcast_ref::<std::io::Error>().is_some());
        assert!(err.as_unexpected_status().is_none());
    }
}
