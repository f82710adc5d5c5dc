use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` the same as an absent field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

// Chat-completion request format
#[derive(Debug, Serialize, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<serde_json::Value>,
}

// Chat-completion response format
#[derive(Debug, Deserialize, Clone)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Choice {
    pub message: ChatMessage,
}

impl ChatResponse {
    /// Content of the first choice, empty when the provider sent none
    pub fn first_content(&self) -> String {
        self.choices
            .first()
            .map(|c| c.message.content.clone())
            .unwrap_or_default()
    }
}

// Image generation request format
#[derive(Debug, Serialize, Clone)]
pub struct ImageRequest {
    pub model: String,
    pub prompt: String,
    pub size: String,
    pub n: u8,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ImageResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<ImageData>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ImageData {
    pub url: Option<String>,
}

impl ImageResponse {
    pub fn first_url(&self) -> Option<&str> {
        self.data
            .first()
            .and_then(|d| d.url.as_deref())
            .filter(|u| !u.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_message_content_reads_as_empty() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#,
        )
        .expect("response should deserialize");
        assert_eq!(resp.first_content(), "");
    }

    #[test]
    fn missing_choices_reads_as_empty() {
        let resp: ChatResponse = serde_json::from_str("{}").expect("response should deserialize");
        assert_eq!(resp.first_content(), "");
    }

    #[test]
    fn request_omits_unset_options() {
        let req = ChatRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("hi")],
            temperature: None,
            response_format: None,
        };
        let json = serde_json::to_value(&req).expect("request should serialize");
        assert!(json.get("temperature").is_none());
        assert!(json.get("response_format").is_none());
    }

    #[test]
    fn image_url_ignores_blank_entries() {
        let resp: ImageResponse =
            serde_json::from_str(r#"{"data":[{"url":""}]}"#).expect("response should deserialize");
        assert_eq!(resp.first_url(), None);
    }
}
