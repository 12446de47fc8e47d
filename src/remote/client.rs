// ABOUTME: HTTP client for the admin REST API
// ABOUTME: Generic CRUD calls per resource plus client-side filtering of listings

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;
use std::time::Duration;
use tracing::debug;

use super::models::Envelope;
use crate::draft::Draft;
use crate::error::ClientError;
use crate::filter::{filter_records, RecordFilter};
use crate::resource::Resource;

/// Raw backend reply to create/update/delete. `data` is often absent.
pub type Ack = Envelope<Option<Value>>;

/// CRUD operations the controller drives. Failures are returned untouched;
/// nothing is retried.
#[async_trait]
pub trait CrudApi<R: Resource>: Send + Sync {
    async fn list(&self, filter: Option<&R::Filter>) -> Result<Envelope<Vec<R>>, ClientError>;

    async fn get_by_id(&self, id: &str) -> Result<Envelope<R>, ClientError>;

    async fn create(&self, draft: &Draft) -> Result<Ack, ClientError>;

    async fn update(&self, id: &str, draft: &Draft) -> Result<Ack, ClientError>;

    async fn delete(&self, id: &str) -> Result<Ack, ClientError>;
}

#[derive(Debug, Clone)]
pub struct RemoteClient {
    client: Client,
    api_base_url: String,
}

impl RemoteClient {
    pub fn new(api_base_url: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn resource<R: Resource>(&self) -> ResourceClient<R> {
        ResourceClient {
            remote: self.clone(),
            _resource: PhantomData,
        }
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base_url, path)
    }

    pub(crate) fn request(&self, method: Method, url: &str) -> RequestBuilder {
        debug!(%method, %url, "sending request");
        self.client.request(method, url)
    }

    pub(crate) async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &str,
    ) -> Result<T, ClientError> {
        let response = request.send().await.map_err(|source| ClientError::Network {
            url: url.to_string(),
            source,
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Http { status, body });
        }

        response.json().await.map_err(|source| ClientError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// CRUD client for one resource type, sharing the connection pool of its
/// [`RemoteClient`].
#[derive(Debug, Clone)]
pub struct ResourceClient<R> {
    remote: RemoteClient,
    _resource: PhantomData<fn() -> R>,
}

impl<R: Resource> ResourceClient<R> {
    pub fn remote(&self) -> &RemoteClient {
        &self.remote
    }

    fn collection_url(&self, suffix: &str) -> String {
        if suffix.is_empty() {
            self.remote.url(R::PATH)
        } else {
            self.remote.url(&format!("{}/{}", R::PATH, suffix))
        }
    }
}

#[async_trait]
impl<R: Resource> CrudApi<R> for ResourceClient<R> {
    async fn list(&self, filter: Option<&R::Filter>) -> Result<Envelope<Vec<R>>, ClientError> {
        let url = self.collection_url("");
        let envelope: Envelope<Vec<R>> = self
            .remote
            .send(self.remote.request(Method::GET, &url), &url)
            .await?;

        // rejected replies pass through untouched for the caller to report
        match filter {
            Some(filter) if envelope.success && !filter.is_empty() => {
                let fetched = envelope.data.len();
                let narrowed = envelope.map(|records| filter_records(&records, filter));
                debug!(
                    resource = R::PATH,
                    fetched,
                    kept = narrowed.data.len(),
                    "applied client-side filter"
                );
                Ok(narrowed)
            }
            _ => Ok(envelope),
        }
    }

    async fn get_by_id(&self, id: &str) -> Result<Envelope<R>, ClientError> {
        let url = self.collection_url(id);
        self.remote
            .send(self.remote.request(Method::GET, &url), &url)
            .await
    }

    async fn create(&self, draft: &Draft) -> Result<Ack, ClientError> {
        let url = self.collection_url("create");
        self.remote
            .send(self.remote.request(Method::POST, &url).json(draft), &url)
            .await
    }

    async fn update(&self, id: &str, draft: &Draft) -> Result<Ack, ClientError> {
        let url = self.collection_url(&format!("update/{}", id));
        self.remote
            .send(self.remote.request(Method::PUT, &url).json(draft), &url)
            .await
    }

    async fn delete(&self, id: &str) -> Result<Ack, ClientError> {
        let url = self.collection_url(&format!("delete/{}", id));
        self.remote
            .send(self.remote.request(Method::DELETE, &url), &url)
            .await
    }
}
