use catalog::{CatalogSnapshot, CounterKind, DocumentCounts};
use foundation::DocumentId;
use serde::Deserialize;

use crate::endpoints::ServiceEndpoints;
use crate::error::{BoxFuture, ServiceError, check_status};

/// View/download counters held by the document store.
pub trait CounterApi: Send + Sync {
    /// One increment. Not idempotent: two calls count twice.
    fn increment(&self, id: DocumentId, kind: CounterKind) -> BoxFuture<'_, Result<(), ServiceError>>;

    fn fetch_counts(&self, id: DocumentId) -> BoxFuture<'_, Result<DocumentCounts, ServiceError>>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CountsBody {
    #[serde(alias = "views", alias = "view_count")]
    view_count: u64,
    #[serde(alias = "downloads", alias = "download_count")]
    download_count: u64,
}

/// `POST {api}/documents/{id}/view|download`, `GET {api}/documents/{id}/counts`.
pub struct HttpCounterApi {
    api_url: String,
    client: reqwest::Client,
}

impl HttpCounterApi {
    pub fn new(endpoints: &ServiceEndpoints) -> Result<Self, ServiceError> {
        Ok(Self::with_client(endpoints.client()?, &endpoints.api_url))
    }

    pub fn with_client(client: reqwest::Client, api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    fn document_url(&self, id: DocumentId, leaf: &str) -> String {
        format!("{}/documents/{}/{leaf}", self.api_url, id.0)
    }
}

impl CounterApi for HttpCounterApi {
    fn increment(&self, id: DocumentId, kind: CounterKind) -> BoxFuture<'_, Result<(), ServiceError>> {
        let url = self.document_url(id, kind.as_str());
        Box::pin(async move {
            let resp = self
                .client
                .post(&url)
                .send()
                .await
                .map_err(|e| ServiceError::from_reqwest("counter increment failed", e))?;
            check_status("counter increment", resp)?;
            Ok(())
        })
    }

    fn fetch_counts(&self, id: DocumentId) -> BoxFuture<'_, Result<DocumentCounts, ServiceError>> {
        let url = self.document_url(id, "counts");
        Box::pin(async move {
            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| ServiceError::from_reqwest("counter fetch failed", e))?;
            let body: CountsBody = check_status("counter fetch", resp)?
                .json()
                .await
                .map_err(|e| ServiceError::from_reqwest("counter fetch response", e))?;
            Ok(DocumentCounts {
                views: body.view_count,
                downloads: body.download_count,
            })
        })
    }
}

/// Best-effort counters over a local catalog.
///
/// On success the local counter is bumped by one; on failure it is left alone
/// and the error is logged and returned. There is no rollback and no dedup.
pub struct CounterService {
    api: Box<dyn CounterApi>,
}

impl CounterService {
    pub fn new(api: Box<dyn CounterApi>) -> Self {
        Self { api }
    }

    pub async fn increment_view(
        &self,
        catalog: &mut CatalogSnapshot,
        id: DocumentId,
    ) -> Result<DocumentCounts, ServiceError> {
        self.increment(catalog, id, CounterKind::View).await
    }

    pub async fn increment_download(
        &self,
        catalog: &mut CatalogSnapshot,
        id: DocumentId,
    ) -> Result<DocumentCounts, ServiceError> {
        self.increment(catalog, id, CounterKind::Download).await
    }

    async fn increment(
        &self,
        catalog: &mut CatalogSnapshot,
        id: DocumentId,
        kind: CounterKind,
    ) -> Result<DocumentCounts, ServiceError> {
        if let Err(e) = self.api.increment(id, kind).await {
            tracing::warn!(document = id.0, counter = kind.as_str(), error = %e, "counter increment failed");
            return Err(e);
        }
        catalog
            .bump(id, kind)
            .ok_or_else(|| ServiceError::decode(format!("document {id} is not in the local catalog")))
    }

    /// Overwrites local counters from the source of truth.
    pub async fn fetch_latest_counts(
        &self,
        catalog: &mut CatalogSnapshot,
        id: DocumentId,
    ) -> Result<DocumentCounts, ServiceError> {
        let counts = match self.api.fetch_counts(id).await {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(document = id.0, error = %e, "counter refresh failed");
                return Err(e);
            }
        };
        catalog.set_counts(id, counts);
        Ok(counts)
    }
}


#[cfg(test)]
mod tests {
    use super::fakes::FakeCounterApi;
    use super::{CounterService, HttpCounterApi, CounterApi};
    use crate::test_http::{serve_once, test_client};
    use catalog::{CatalogSnapshot, CounterKind, DocumentCounts, GeoDocument};
    use foundation::DocumentId;
    use pretty_assertions::assert_eq;

    fn catalog() -> CatalogSnapshot {
        let doc = GeoDocument {
            id: 7,
            title: "แผนที่น้ำท่วม".into(),
            latitude: 13.75,
            longitude: 100.5,
            category_id: 1,
            province: "กรุงเทพมหานคร".into(),
            district: String::new(),
            subdistrict: String::new(),
            year: None,
            is_published: true,
            view_count: 10,
            download_count: 2,
            created_at_ms: 0,
        };
        CatalogSnapshot::new([doc], [])
    }

    #[tokio::test]
    async fn success_bumps_local_counter_once() {
        let api = FakeCounterApi::default();
        let service = CounterService::new(Box::new(api.clone()));
        let mut cat = catalog();
        let counts = service
            .increment_view(&mut cat, DocumentId(7))
            .await
            .expect("ok");
        assert_eq!(counts, DocumentCounts { views: 11, downloads: 2 });
        assert_eq!(api.calls.lock().expect("lock").clone(), vec![(DocumentId(7), CounterKind::View)]);
    }

    #[tokio::test]
    async fn failure_leaves_local_counter_untouched() {
        let api = FakeCounterApi::default();
        *api.failing.lock().expect("lock") = true;
        let service = CounterService::new(Box::new(api.clone()));
        let mut cat = catalog();
        assert!(service.increment_download(&mut cat, DocumentId(7)).await.is_err());
        assert_eq!(cat.counts(DocumentId(7)), Some(DocumentCounts { views: 10, downloads: 2 }));
    }

    #[tokio::test]
    async fn fetch_latest_overwrites_local_counts() {
        let api = FakeCounterApi::default();
        api.remote
            .lock()
            .expect("lock")
            .insert(DocumentId(7), DocumentCounts { views: 99, downloads: 5 });
        let service = CounterService::new(Box::new(api));
        let mut cat = catalog();
        service
            .fetch_latest_counts(&mut cat, DocumentId(7))
            .await
            .expect("ok");
        assert_eq!(cat.counts(DocumentId(7)), Some(DocumentCounts { views: 99, downloads: 5 }));
    }

    #[tokio::test]
    async fn http_increment_posts_to_document_url() {
        let (base, request) = serve_once(204, "").await;
        let api = HttpCounterApi::with_client(test_client(), &format!("{base}/api/"));
        api.increment(DocumentId(42), CounterKind::Download)
            .await
            .expect("ok");
        let head = request.await.expect("server task");
        assert!(head.starts_with("POST /api/documents/42/download "), "{head}");
    }

    #[tokio::test]
    async fn http_fetch_counts_accepts_camel_case() {
        let (base, _request) = serve_once(200, r#"{"viewCount":12,"downloadCount":3}"#).await;
        let api = HttpCounterApi::with_client(test_client(), &base);
        let counts = api.fetch_counts(DocumentId(1)).await.expect("counts");
        assert_eq!(counts, DocumentCounts { views: 12, downloads: 3 });
    }
}
