use std::path::PathBuf;

use formats::BoundaryCollection;

use crate::endpoints::ServiceEndpoints;
use crate::error::{BoxFuture, ServiceError, ServiceErrorKind, check_status};

/// Where the country-wide boundary dataset comes from. Fetched once per
/// session.
pub trait BoundarySource: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, Result<BoundaryCollection, ServiceError>>;
}

fn parse(payload: &str) -> Result<BoundaryCollection, ServiceError> {
    BoundaryCollection::from_geojson_str(payload)
        .map_err(|e| ServiceError::with_source(ServiceErrorKind::Decode, "invalid boundary dataset", e))
}

/// GeoJSON feature collection over HTTP.
pub struct HttpBoundarySource {
    url: String,
    client: reqwest::Client,
}

impl HttpBoundarySource {
    pub fn new(endpoints: &ServiceEndpoints) -> Result<Self, ServiceError> {
        Ok(Self::with_client(endpoints.client()?, &endpoints.boundary_url))
    }

    pub fn with_client(client: reqwest::Client, url: &str) -> Self {
        Self {
            url: url.to_string(),
            client,
        }
    }
}

impl BoundarySource for HttpBoundarySource {
    fn fetch(&self) -> BoxFuture<'_, Result<BoundaryCollection, ServiceError>> {
        Box::pin(async move {
            let resp = self
                .client
                .get(&self.url)
                .send()
                .await
                .map_err(|e| ServiceError::from_reqwest("boundary request failed", e))?;
            let text = check_status("boundary dataset", resp)?
                .text()
                .await
                .map_err(|e| ServiceError::from_reqwest("boundary response", e))?;
            parse(&text)
        })
    }
}

/// GeoJSON feature collection on disk.
pub struct FileBoundarySource {
    path: PathBuf,
}

impl FileBoundarySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BoundarySource for FileBoundarySource {
    fn fetch(&self) -> BoxFuture<'_, Result<BoundaryCollection, ServiceError>> {
        Box::pin(async move {
            let text = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
                ServiceError::with_source(
                    ServiceErrorKind::Transport,
                    format!("failed to read {}", self.path.display()),
                    e,
                )
            })?;
            parse(&text)
        })
    }
}

/// A source that always fails; sessions started with it run on the circle
/// fallback from the start.
pub struct UnavailableBoundarySource;

impl BoundarySource for UnavailableBoundarySource {
    fn fetch(&self) -> BoxFuture<'_, Result<BoundaryCollection, ServiceError>> {
        Box::pin(async {
            Err(ServiceError::new(
                ServiceErrorKind::Transport,
                "no boundary dataset configured",
            ))
        })
    }
}
