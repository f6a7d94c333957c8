//! HTTP client for the travel directory API.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::instrument;
use url::Url;

use crate::error::DirectoryError;
use crate::types::{
    City, CityListResponse, Country, CountryListResponse, Poi, PoiListResponse, PoiQuery, Tag,
    TagListResponse,
};

/// Read-only view of the directory used by the search engine.
///
/// Futures must be `Send` so fetches can run on spawned tasks.
pub trait PoiDirectory: Send + Sync + 'static {
    /// POIs matching every term present in `query`.
    fn list_pois(
        &self,
        query: &PoiQuery,
    ) -> impl Future<Output = Result<Vec<Poi>, DirectoryError>> + Send;

    fn list_countries(&self) -> impl Future<Output = Result<Vec<Country>, DirectoryError>> + Send;

    fn list_cities(&self) -> impl Future<Output = Result<Vec<City>, DirectoryError>> + Send;

    fn list_tags(&self) -> impl Future<Output = Result<Vec<Tag>, DirectoryError>> + Send;
}

#[derive(Debug, Clone)]
pub struct DirectoryClient {
    base_url: Url,
    client: Arc<Client>,
}

impl DirectoryClient {
    /// Create a client for the backend at `base_url` (e.g. `http://localhost:3001`).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, DirectoryError> {
        // Url::join drops the last path segment unless it ends with '/'
        let mut base = base_url.to_string();
        if !base.ends_with('/') {
            base.push('/');
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: Url::parse(&base)?,
            client: Arc::new(client),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<T, DirectoryError> {
        let url = self.base_url.join(endpoint)?;
        tracing::debug!("GET {} {:?}", url, query);

        let response = self.client.get(url).query(query).send().await?;
        Self::handle_response(response).await
    }

    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, DirectoryError> {
        let status = response.status();

        if status.is_success() {
            let body = response.bytes().await?;
            serde_json::from_slice(&body).map_err(|e| DirectoryError::Parse(e.to_string()))
        } else if status == StatusCode::NOT_FOUND {
            let text = response.text().await.unwrap_or_default();
            Err(DirectoryError::NotFound(text))
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(DirectoryError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

impl PoiDirectory for DirectoryClient {
    #[instrument(skip(self), level = "debug")]
    async fn list_pois(&self, query: &PoiQuery) -> Result<Vec<Poi>, DirectoryError> {
        let resp: PoiListResponse = self.get_json("api/pois", &query.query_pairs()).await?;
        tracing::info!("Fetched {} POIs", resp.pois.len());
        Ok(resp.pois)
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_countries(&self) -> Result<Vec<Country>, DirectoryError> {
        let resp: CountryListResponse = self.get_json("api/countries", &[]).await?;
        Ok(resp.countries)
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_cities(&self) -> Result<Vec<City>, DirectoryError> {
        let resp: CityListResponse = self.get_json("api/cities", &[]).await?;
        Ok(resp.cities)
    }

    #[instrument(skip(self), level = "debug")]
    async fn list_tags(&self) -> Result<Vec<Tag>, DirectoryError> {
        let resp: TagListResponse = self.get_json("api/tags", &[]).await?;
        Ok(resp.tags)
    }
}
