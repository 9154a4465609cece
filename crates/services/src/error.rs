use std::future::Future;
use std::pin::Pin;

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ServiceErrorKind {
    /// Could not reach the collaborator (connect, DNS, I/O).
    Transport,
    Timeout,
    /// Non-success HTTP status.
    Status(u16),
    /// The response arrived but could not be understood.
    Decode,
}

/// Error type for external service calls.
#[derive(Debug)]
pub struct ServiceError {
    pub kind: ServiceErrorKind,
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ServiceErrorKind::Status(code) => write!(f, "{} (HTTP {code})", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl ServiceError {
    pub fn new(kind: ServiceErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        kind: ServiceErrorKind,
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ServiceErrorKind::Decode, message)
    }

    /// Classifies a reqwest failure.
    pub fn from_reqwest(context: &str, e: reqwest::Error) -> Self {
        let kind = if e.is_timeout() {
            ServiceErrorKind::Timeout
        } else if e.is_decode() {
            ServiceErrorKind::Decode
        } else if let Some(status) = e.status() {
            ServiceErrorKind::Status(status.as_u16())
        } else {
            ServiceErrorKind::Transport
        };
        Self::with_source(kind, format!("{context}: {e}"), e)
    }

    pub fn status(context: &str, status: reqwest::StatusCode) -> Self {
        Self::new(ServiceErrorKind::Status(status.as_u16()), context.to_string())
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == ServiceErrorKind::Timeout
    }
}

/// Fails with [`ServiceErrorKind::Status`] unless the response is 2xx.
pub(crate) fn check_status(
    context: &str,
    resp: reqwest::Response,
) -> Result<reqwest::Response, ServiceError> {
    if resp.status().is_success() {
        Ok(resp)
    } else {
        Err(ServiceError::status(context, resp.status()))
    }
}

#[cfg(test)]
mod tests {
    use super::{ServiceError, ServiceErrorKind};

    #[test]
    fn status_errors_mention_the_code() {
        let e = ServiceError::status("reverse geocode", reqwest::StatusCode::BAD_GATEWAY);
        assert_eq!(e.kind, ServiceErrorKind::Status(502));
        assert_eq!(e.to_string(), "reverse geocode (HTTP 502)");
    }

    #[test]
    fn source_is_exposed() {
        let io = std::io::Error::other("boom");
        let e = ServiceError::with_source(ServiceErrorKind::Transport, "read failed", io);
        let src = std::error::Error::source(&e).expect("source");
        assert_eq!(src.to_string(), "boom");
    }
}
