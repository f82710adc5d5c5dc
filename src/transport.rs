use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

#[cfg(test)]
use mockall::automock;

use crate::error::{Result, StudioError};
use crate::models::{ChatRequest, ChatResponse, ImageRequest, ImageResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// One-shot HTTP access to the hosted model provider
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse>;
    async fn generate_image(&self, req: &ImageRequest) -> Result<ImageResponse>;
}

pub struct OpenAiTransport {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiTransport {
    pub fn new(api_key: String, base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(StudioError::Config("model base URL cannot be empty".to_string()));
        }
        Ok(Self {
            client: Client::new(),
            api_key,
            base_url,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: serde::Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                StudioError::Network(format!("Failed to send request to model API: {e}"))
            })?;

        Self::read_json(response).await
    }

    async fn read_json<R: DeserializeOwned>(response: Response) -> Result<R> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(StudioError::Api {
                status: status.as_u16(),
                body,
            });
        }

        response.json().await.map_err(|e| {
            StudioError::Network(format!("Failed to read model API response: {e}"))
        })
    }
}

#[async_trait]
impl Transport for OpenAiTransport {
    async fn chat(&self, req: &ChatRequest) -> Result<ChatResponse> {
        tracing::debug!(model = %req.model, "POST chat/completions");
        self.post("chat/completions", req).await
    }

    async fn generate_image(&self, req: &ImageRequest) -> Result<ImageResponse> {
        tracing::debug!(model = %req.model, size = %req.size, "POST images/generations");
        self.post("images/generations", req).await
    }
}
