use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Result, StudioError};
use crate::models::{ChatMessage, ChatRequest, ImageRequest};
use crate::prompts::PromptPair;
use crate::transport::{OpenAiTransport, Transport};

/// Models and limits used by the gateway
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub chat_model: String,
    pub image_model: String,
    pub image_size: String,
    pub request_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            chat_model: "gpt-4o-mini".to_string(),
            image_model: "dall-e-3".to_string(),
            image_size: "1024x1024".to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// Issues exactly one provider request per call. No retries, no caching.
pub struct ModelGateway {
    tx: Arc<dyn Transport>,
    cfg: GatewayConfig,
}

impl ModelGateway {
    pub fn new(tx: Arc<dyn Transport>, cfg: GatewayConfig) -> Self {
        Self { tx, cfg }
    }

    /// Build a gateway talking to the configured provider over HTTP
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let transport = OpenAiTransport::new(cfg.openai.api_key.clone(), cfg.openai.base_url.clone())?;
        Ok(Self::new(Arc::new(transport), cfg.gateway_config()))
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.cfg
    }

    /// Send a system/user prompt in JSON mode and return the raw text of
    /// the first choice. An absent choice yields an empty string.
    pub async fn invoke(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.cfg.chat_model.clone(),
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature: None,
            response_format: Some(serde_json::json!({"type": "json_object"})),
        };

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("chat", %request_id, model = %request.model);
        async {
            let response = self.deadline(self.tx.chat(&request)).await?;
            let text = response.first_content();
            tracing::info!(bytes = text.len(), "Model response received");
            Ok(text)
        }
        .instrument(span)
        .await
    }

    pub async fn invoke_prompt(&self, prompt: &PromptPair) -> Result<String> {
        self.invoke(&prompt.system, &prompt.user).await
    }

    /// Request one image and return its URL
    pub async fn generate_image(&self, prompt: &str) -> Result<String> {
        let request = ImageRequest {
            model: self.cfg.image_model.clone(),
            prompt: prompt.to_string(),
            size: self.cfg.image_size.clone(),
            n: 1,
        };

        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("image", %request_id, model = %request.model);
        async {
            let response = self.deadline(self.tx.generate_image(&request)).await?;
            response
                .first_url()
                .map(str::to_string)
                .ok_or(StudioError::MissingImageUrl)
        }
        .instrument(span)
        .await
    }

    async fn deadline<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.cfg.request_timeout, fut).await {
            Ok(res) => res,
            Err(_) => {
                tracing::error!(
                    timeout_secs = self.cfg.request_timeout.as_secs_f64(),
                    "Model request exceeded deadline"
                );
                Err(StudioError::Timeout(self.cfg.request_timeout))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChatResponse, Choice, ImageData, ImageResponse};
    use crate::transport::MockTransport;
    use async_trait::async_trait;

    fn chat_response(content: &str) -> ChatResponse {
        ChatResponse {
            choices: vec![Choice {
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content: content.to_string(),
                },
            }],
        }
    }

    #[tokio::test]
    async fn invoke_requests_json_mode_and_returns_first_choice() {
        let mut mock = MockTransport::new();
        mock.expect_chat()
            .withf(|req| {
                req.model == "gpt-4o-mini"
                    && req.messages.len() == 2
                    && req.messages[0].role == "system"
                    && req.messages[0].content == "sys"
                    && req.messages[1].role == "user"
                    && req.messages[1].content == "usr"
                    && req.response_format == Some(serde_json::json!({"type": "json_object"}))
            })
            .times(1)
            .returning(|_| Ok(chat_response(r#"{"ok":true}"#)));

        let gateway = ModelGateway::new(Arc::new(mock), GatewayConfig::default());
        let text = gateway.invoke("sys", "usr").await.expect("invoke should succeed");
        assert_eq!(text, r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn empty_choices_yield_empty_string() {
        let mut mock = MockTransport::new();
        mock.expect_chat()
            .times(1)
            .returning(|_| Ok(ChatResponse { choices: vec![] }));

        let gateway = ModelGateway::new(Arc::new(mock), GatewayConfig::default());
        let text = gateway.invoke("sys", "usr").await.expect("invoke should succeed");
        assert_eq!(text, "");
    }

    #[tokio::test]
    async fn identical_calls_are_not_cached() {
        let mut mock = MockTransport::new();
        mock.expect_chat()
            .times(2)
            .returning(|_| Ok(chat_response("{}")));

        let gateway = ModelGateway::new(Arc::new(mock), GatewayConfig::default());
        gateway.invoke("sys", "usr").await.expect("first call");
        gateway.invoke("sys", "usr").await.expect("second call");
    }

    #[tokio::test]
    async fn network_failure_is_not_retried() {
        let mut mock = MockTransport::new();
        mock.expect_chat()
            .times(1)
            .returning(|_| Err(StudioError::Network("connection refused".to_string())));

        let gateway = ModelGateway::new(Arc::new(mock), GatewayConfig::default());
        let res = gateway.invoke("sys", "usr").await;
        assert!(matches!(res, Err(StudioError::Network(_))));
    }

    struct HangingTransport;

    #[async_trait]
    impl Transport for HangingTransport {
        async fn chat(&self, _req: &ChatRequest) -> Result<ChatResponse> {
            std::future::pending().await
        }

        async fn generate_image(&self, _req: &ImageRequest) -> Result<ImageResponse> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn hung_request_times_out() {
        let cfg = GatewayConfig {
            request_timeout: Duration::from_millis(20),
            ..GatewayConfig::default()
        };
        let gateway = ModelGateway::new(Arc::new(HangingTransport), cfg);
        let res = gateway.invoke("sys", "usr").await;
        assert!(matches!(res, Err(StudioError::Timeout(d)) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn image_request_uses_configured_model_and_size() {
        let mut mock = MockTransport::new();
        mock.expect_generate_image()
            .withf(|req| req.model == "dall-e-3" && req.size == "1024x1024" && req.n == 1)
            .times(1)
            .returning(|_| {
                Ok(ImageResponse {
                    data: vec![ImageData {
                        url: Some("https://img.example/mockup.png".to_string()),
                    }],
                })
            });

        let gateway = ModelGateway::new(Arc::new(mock), GatewayConfig::default());
        let url = gateway.generate_image("bottle").await.expect("image should resolve");
        assert_eq!(url, "https://img.example/mockup.png");
    }

    #[tokio::test]
    async fn image_without_url_is_an_error() {
        let mut mock = MockTransport::new();
        mock.expect_generate_image()
            .times(1)
            .returning(|_| Ok(ImageResponse::default()));

        let gateway = ModelGateway::new(Arc::new(mock), GatewayConfig::default());
        let res = gateway.generate_image("bottle").await;
        assert!(matches!(res, Err(StudioError::MissingImageUrl)));
    }
}
