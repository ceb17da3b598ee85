use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;

use crate::students::{
    dto::{MessageResponse, StudentPayload},
    Student,
};

#[derive(Debug, Error)]
pub enum ClientError {
    /// Non-2xx answer; `message` is the server's `message` field when present.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ClientError::Api { message, .. } if !message.is_empty() => Some(message),
            _ => None,
        }
    }
}

/// The records API as seen by the client layer.
#[async_trait]
pub trait RecordsApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Student>, ClientError>;
    async fn create(&self, payload: &StudentPayload) -> Result<MessageResponse, ClientError>;
    async fn update(&self, id: i64, payload: &StudentPayload) -> Result<MessageResponse, ClientError>;
    async fn delete(&self, id: i64) -> Result<MessageResponse, ClientError>;
}

pub struct HttpRecordsApi {
    client: Client,
    base_url: String,
}

impl HttpRecordsApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            client: Client::builder().build()?,
            base_url: base_url.into(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn read_json<T: DeserializeOwned>(res: Response) -> Result<T, ClientError> {
    let status = res.status();
    if status.is_success() {
        return Ok(res.json::<T>().await?);
    }
    let message = match res.json::<MessageResponse>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or_default().to_string(),
    };
    debug!(status = status.as_u16(), %message, "api error");
    Err(ClientError::Api { status: status.as_u16(), message })
}

#[async_trait]
impl RecordsApi for HttpRecordsApi {
    async fn list(&self) -> Result<Vec<Student>, ClientError> {
        let res = self.client.get(self.url("/students")).send().await?;
        read_json(res).await
    }

    async fn create(&self, payload: &StudentPayload) -> Result<MessageResponse, ClientError> {
        let res = self
            .client
            .post(self.url("/students"))
            .json(payload)
            .send()
            .await?;
        read_json(res).await
    }

    async fn update(&self, id: i64, payload: &StudentPayload) -> Result<MessageResponse, ClientError> {
        let res = self
            .client
            .put(self.url(&format!("/students/{id}")))
            .json(payload)
            .send()
            .await?;
        read_json(res).await
    }

    async fn delete(&self, id: i64) -> Result<MessageResponse, ClientError> {
        let res = self
            .client
            .delete(self.url(&format!("/students/{id}")))
            .send()
            .await?;
        read_json(res).await
    }
}
