//! Client for the comparison service.
//!
//! JSON over HTTPS. Transport failures, non-success statuses, undecodable
//! bodies and `success: false` replies all surface as `RemoteUnreachable`.
//! Nothing here retries; a failed call is retried only by the user invoking
//! the action again.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use shortlist_protocol::{
    Ack, CreateSessionRequest, CreateSessionResponse, FetchProductsResponse,
    RemoveProductRequest, CREATE_SESSION_PATH, FETCH_PRODUCTS_PATH, REMOVE_PRODUCT_PATH,
};

use crate::config::ShortlistConfig;
use crate::error::{Result, ShortlistError};
use crate::types::ComparisonItem;

#[async_trait]
pub trait RemoteService: Send + Sync {
    /// Submits a session; returns the session id the service confirmed.
    async fn create_session(&self, request: &CreateSessionRequest) -> Result<String>;

    /// Returns the products the service holds for a session.
    async fn fetch_products(&self, session_id: &str) -> Result<Vec<ComparisonItem>>;

    async fn remove_product(&self, request: &RemoveProductRequest) -> Result<()>;
}

/// `RemoteService` backed by reqwest.
#[derive(Clone)]
pub struct HttpRemoteService {
    client: Client,
    base_url: String,
}

impl HttpRemoteService {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ShortlistError::remote("build http client", e))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ShortlistConfig) -> Result<Self> {
        Self::new(config.api_base_url(), config.request_timeout())
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }
}

#[async_trait]
impl RemoteService for HttpRemoteService {
    async fn create_session(&self, request: &CreateSessionRequest) -> Result<String> {
        let url = self.endpoint(CREATE_SESSION_PATH);
        debug!(url = %url, products = request.products.len(), "Creating comparison session");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ShortlistError::remote(CREATE_SESSION_PATH, e))?;
        let body: CreateSessionResponse = decode(response, CREATE_SESSION_PATH).await?;

        if !body.success {
            let details = body
                .error
                .map(|info| info.to_string())
                .unwrap_or_else(|| "service rejected the session".to_string());
            return Err(ShortlistError::remote(CREATE_SESSION_PATH, details));
        }
        Ok(body
            .session_id
            .unwrap_or_else(|| request.session_id.clone()))
    }

    async fn fetch_products(&self, session_id: &str) -> Result<Vec<ComparisonItem>> {
        let url = self.endpoint(FETCH_PRODUCTS_PATH);
        debug!(url = %url, "Fetching session products");

        let response = self
            .client
            .get(&url)
            .query(&[("sessionId", session_id)])
            .send()
            .await
            .map_err(|e| ShortlistError::remote(FETCH_PRODUCTS_PATH, e))?;
        let body: FetchProductsResponse = decode(response, FETCH_PRODUCTS_PATH).await?;
        Ok(body.products)
    }

    async fn remove_product(&self, request: &RemoveProductRequest) -> Result<()> {
        let url = self.endpoint(REMOVE_PRODUCT_PATH);
        debug!(url = %url, product_id = %request.product_id, "Removing session product");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ShortlistError::remote(REMOVE_PRODUCT_PATH, e))?;
        let ack: Ack = decode(response, REMOVE_PRODUCT_PATH).await?;

        if !ack.success {
            let details = ack
                .error
                .map(|info| info.to_string())
                .unwrap_or_else(|| "service did not acknowledge removal".to_string());
            return Err(ShortlistError::remote(REMOVE_PRODUCT_PATH, details));
        }
        Ok(())
    }
}

async fn decode<T: DeserializeOwned>(response: Response, operation: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        return Err(ShortlistError::remote(
            operation,
            format!("HTTP {}", status),
        ));
    }
    response
        .json::<T>()
        .await
        .map_err(|e| ShortlistError::remote(operation, e))
}
