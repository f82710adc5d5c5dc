use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::{Result, StudioError};
use crate::gateway::{GatewayConfig, ModelGateway};
use crate::models::{ChatMessage, ChatRequest, ChatResponse, Choice, ImageData, ImageRequest, ImageResponse};
use crate::transport::Transport;

/// A scripted chat reply; gated replies resolve when the test releases them
pub enum Reply {
    Text(String),
    Fail(String),
    Gated(oneshot::Receiver<String>),
}

/// A scripted image reply, optionally held back like a gated chat reply
pub enum ImageReply {
    Ready(Result<String>),
    Gated(oneshot::Receiver<String>),
}

/// Transport that plays back queued replies in order
#[derive(Default)]
pub struct ScriptedTransport {
    chat: Mutex<VecDeque<Reply>>,
    images: Mutex<VecDeque<ImageReply>>,
    pub chat_calls: AtomicUsize,
    pub image_calls: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.push(Reply::Text(text.to_string()));
        self
    }

    pub fn fail(self, msg: &str) -> Self {
        self.push(Reply::Fail(msg.to_string()));
        self
    }

    /// Queue a reply that stays pending until the returned sender fires
    pub fn gated(&self) -> oneshot::Sender<String> {
        let (tx, rx) = oneshot::channel();
        self.push(Reply::Gated(rx));
        tx
    }

    pub fn image(self, res: Result<String>) -> Self {
        self.push_image(ImageReply::Ready(res));
        self
    }

    /// Queue an image URL that stays pending until the returned sender fires
    pub fn gated_image(&self) -> oneshot::Sender<String> {
        let (tx, rx) = oneshot::channel();
        self.push_image(ImageReply::Gated(rx));
        tx
    }

    fn push_image(&self, reply: ImageReply) {
        self.images
            .lock()
            .expect("Scripted transport mutex should not be poisoned")
            .push_back(reply);
    }

    fn push(&self, reply: Reply) {
        self.chat
            .lock()
            .expect("Scripted transport mutex should not be poisoned")
            .push_back(reply);
    }
}

fn assistant(content: String) -> ChatResponse {
    ChatResponse {
        choices: vec![Choice {
            message: ChatMessage {
                role: "assistant".to_string(),
                content,
            },
        }],
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn chat(&self, _req: &ChatRequest) -> Result<ChatResponse> {
        self.chat_calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .chat
            .lock()
            .expect("Scripted transport mutex should not be poisoned")
            .pop_front();
        match next {
            Some(Reply::Text(text)) => Ok(assistant(text)),
            Some(Reply::Fail(msg)) => Err(StudioError::Network(msg)),
            Some(Reply::Gated(rx)) => rx
                .await
                .map(assistant)
                .map_err(|_| StudioError::Network("gate dropped".to_string())),
            None => Err(StudioError::Network("No more scripted replies".to_string())),
        }
    }

    async fn generate_image(&self, _req: &ImageRequest) -> Result<ImageResponse> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .images
            .lock()
            .expect("Scripted transport mutex should not be poisoned")
            .pop_front();
        let url = match next {
            Some(ImageReply::Ready(res)) => res?,
            Some(ImageReply::Gated(rx)) => rx
                .await
                .map_err(|_| StudioError::Network("image gate dropped".to_string()))?,
            None => return Err(StudioError::Network("No more scripted images".to_string())),
        };
        Ok(ImageResponse {
            data: vec![ImageData { url: Some(url) }],
        })
    }
}

pub fn gateway(tx: Arc<ScriptedTransport>) -> Arc<ModelGateway> {
    Arc::new(ModelGateway::new(tx, GatewayConfig::default()))
}
