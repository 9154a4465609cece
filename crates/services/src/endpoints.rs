use std::time::Duration;

use crate::error::{ServiceError, ServiceErrorKind};

/// Where the collaborators live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    /// Base of the document API, without a trailing slash.
    pub api_url: String,
    pub geocode_url: String,
    pub boundary_url: String,
    pub timeout_ms: u64,
}

impl ServiceEndpoints {
    pub const DEFAULT_API_URL: &'static str = "http://127.0.0.1:8000/api";
    pub const DEFAULT_TIMEOUT_MS: u64 = 8000;

    /// Endpoints derived from one API base.
    pub fn from_api_url(api_url: &str) -> Self {
        let api_url = api_url.trim_end_matches('/').to_string();
        Self {
            geocode_url: format!("{api_url}/geocode/reverse"),
            boundary_url: format!("{api_url}/boundaries/provinces.geojson"),
            api_url,
            timeout_ms: Self::DEFAULT_TIMEOUT_MS,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Shared HTTP client with the configured timeout.
    pub fn client(&self) -> Result<reqwest::Client, ServiceError> {
        reqwest::Client::builder()
            .timeout(self.timeout())
            .build()
            .map_err(|e| {
                ServiceError::with_source(ServiceErrorKind::Transport, "failed to build HTTP client", e)
            })
    }
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        Self::from_api_url(Self::DEFAULT_API_URL)
    }
}
