use std::time::Duration;

use thiserror::Error;

use crate::prompts::Feature;

pub type Result<T> = std::result::Result<T, StudioError>;

/// Errors surfaced by the gateway, decoder and configuration layers
#[derive(Debug, Error)]
pub enum StudioError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Model API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Model request timed out after {}s", .0.as_secs_f64())]
    Timeout(Duration),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("No image URL returned for product mockup")]
    MissingImageUrl,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for StudioError {
    fn from(err: reqwest::Error) -> Self {
        StudioError::Network(err.to_string())
    }
}

/// Why a model response could not be turned into a feature payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    Empty,
    Syntax(String),
    NotAnObject,
    Shape(String),
}

impl std::fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DecodeErrorKind::Empty => write!(f, "empty response"),
            DecodeErrorKind::Syntax(e) => write!(f, "invalid JSON: {e}"),
            DecodeErrorKind::NotAnObject => write!(f, "top-level value is not an object"),
            DecodeErrorKind::Shape(e) => write!(f, "unexpected shape: {e}"),
        }
    }
}

/// A response that could not be decoded, kept together with the raw text
/// so it can be logged.
#[derive(Debug, Clone, Error)]
#[error("AI returned an invalid format for {feature} ({kind})")]
pub struct DecodeError {
    pub feature: Feature,
    pub raw: String,
    pub kind: DecodeErrorKind,
}

impl DecodeError {
    pub fn new(feature: Feature, raw: impl Into<String>, kind: DecodeErrorKind) -> Self {
        Self {
            feature,
            raw: raw.into(),
            kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_message_names_feature() {
        let err = DecodeError::new(Feature::ProductIdea, "not json", DecodeErrorKind::NotAnObject);
        assert_eq!(
            err.to_string(),
            "AI returned an invalid format for product idea (top-level value is not an object)"
        );
    }

    #[test]
    fn decode_error_converts_into_studio_error() {
        let err: StudioError =
            DecodeError::new(Feature::TrendForecast, "", DecodeErrorKind::Empty).into();
        assert!(matches!(err, StudioError::Decode(ref d) if d.feature == Feature::TrendForecast));
    }
}
