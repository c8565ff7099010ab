use reqwest::{Client, Response};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::json;
use tracing::debug;
use url::Url;

use super::{ClientError, FormMode, OrderDraft};
use crate::model::OrderRecord;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct DeleteResponse {
    order: OrderRecord,
}

/// HTTP client for the `/order` resource.
#[derive(Debug, Clone)]
pub struct OrderApi {
    http: Client,
    orders_url: Url,
}

impl OrderApi {
    pub fn new(base_url: &Url) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: &Url) -> Result<Self, ClientError> {
        // `join` replaces the last segment unless the base ends with a slash.
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        Ok(Self {
            http,
            orders_url: base.join("order")?,
        })
    }

    pub fn orders_url(&self) -> &Url {
        &self.orders_url
    }

    pub async fn list_orders(&self) -> Result<Vec<OrderRecord>, ClientError> {
        let response = self.http.get(self.orders_url.clone()).send().await?;
        Self::parse(response).await
    }

    pub async fn create_order(&self, draft: OrderDraft) -> Result<OrderRecord, ClientError> {
        draft.validate(FormMode::Create)?;
        let response = self
            .http
            .post(self.orders_url.clone())
            .multipart(draft.into_form(None)?)
            .send()
            .await?;
        Self::parse(response).await
    }

    /// Without a new photo in `draft` the server keeps the stored one.
    pub async fn update_order(&self, id: &str, draft: OrderDraft) -> Result<OrderRecord, ClientError> {
        draft.validate(FormMode::Update)?;
        let response = self
            .http
            .put(self.orders_url.clone())
            .multipart(draft.into_form(Some(id))?)
            .send()
            .await?;
        Self::parse(response).await
    }

    pub async fn delete_order(&self, id: &str) -> Result<OrderRecord, ClientError> {
        let response = self
            .http
            .delete(self.orders_url.clone())
            .json(&json!({ "_id": id }))
            .send()
            .await?;
        let body: DeleteResponse = Self::parse(response).await?;
        Ok(body.order)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let text = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or_else(|_| {
                if text.is_empty() {
                    status.canonical_reason().unwrap_or("Request failed").to_string()
                } else {
                    text
                }
            });
        debug!(%status, %message, "Order request rejected");

        Err(ClientError::Server { status, message })
    }
}
