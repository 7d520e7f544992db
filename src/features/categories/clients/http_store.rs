use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{CategoryStore, StoreError, StoreResult};
use crate::core::config::CategoryStoreConfig;
use crate::core::error::AppError;
use crate::features::categories::dtos::{CategoryEditInput, NewCategoryInput};
use crate::features::categories::models::{CategoryId, CategoryRecord};

/// Stores answer either with the bare payload or wrapped in `{"data": ...}`
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(data) => data,
        }
    }
}

#[derive(Serialize)]
struct BatchDelete<'a> {
    ids: &'a [CategoryId],
}

/// Client for the remote category store's JSON CRUD API
pub struct HttpCategoryStore {
    base_url: Url,
    api_token: Option<String>,
    http_client: Client,
}

impl HttpCategoryStore {
    pub fn new(config: &CategoryStoreConfig) -> Result<Self, AppError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            AppError::Internal(format!(
                "Invalid category store URL '{}': {}",
                config.base_url, e
            ))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Internal(format!(
                "Category store URL '{}' cannot be used as a base",
                config.base_url
            )));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("portfolio-core/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url,
            api_token: config.api_token.clone(),
            http_client,
        })
    }

    fn url(&self, id: Option<&CategoryId>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("categories");
            if let Some(id) = id {
                segments.push(id.as_str());
            }
        }
        url
    }

    async fn send(&self, request: RequestBuilder, id: Option<&CategoryId>) -> StoreResult<Response> {
        let request = match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await.map_err(|e| {
            tracing::error!("Category store request failed: {}", e);
            StoreError::Transport(e.to_string())
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            if let Some(id) = id {
                return Err(StoreError::NotFound(id.clone()));
            }
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Category store error: HTTP {} - {}", status, body);
            return Err(StoreError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
        response
            .json::<Envelope<T>>()
            .await
            .map(Envelope::into_inner)
            .map_err(|e| {
                tracing::error!("Failed to parse category store response: {}", e);
                StoreError::Decode(e.to_string())
            })
    }
}

#[async_trait]
impl CategoryStore for HttpCategoryStore {
    async fn list_categories(&self) -> StoreResult<Vec<CategoryRecord>> {
        let url = self.url(None);
        tracing::debug!("Fetching categories from store: {}", url);

        let response = self.send(self.http_client.get(url), None).await?;
        Self::decode(response).await
    }

    async fn create_category(&self, input: &NewCategoryInput) -> StoreResult<CategoryRecord> {
        let url = self.url(None);
        tracing::debug!("Creating category in store: {}", url);

        let response = self
            .send(self.http_client.post(url).json(input), None)
            .await?;
        Self::decode(response).await
    }

    async fn update_category(
        &self,
        id: &CategoryId,
        input: &CategoryEditInput,
    ) -> StoreResult<CategoryRecord> {
        let url = self.url(Some(id));
        tracing::debug!("Updating category in store: {}", url);

        let response = self
            .send(self.http_client.put(url).json(input), Some(id))
            .await?;
        Self::decode(response).await
    }

    async fn delete_category(&self, id: &CategoryId) -> StoreResult<()> {
        let url = self.url(Some(id));
        tracing::debug!("Deleting category in store: {}", url);

        self.send(self.http_client.delete(url), Some(id)).await?;
        Ok(())
    }

    async fn delete_categories(&self, ids: &[CategoryId]) -> StoreResult<()> {
        let url = self.url(None);
        tracing::debug!("Deleting {} categories in store: {}", ids.len(), url);

        self.send(
            self.http_client.delete(url).json(&BatchDelete { ids }),
            None,
        )
        .await?;
        Ok(())
    }
}
