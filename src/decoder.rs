use serde_json::Value;

use crate::error::{DecodeError, DecodeErrorKind};
use crate::prompts::Feature;
use crate::schema::FeatureSchema;

/// Parse model output as JSON without checking its shape
pub fn decode_value(raw: &str, feature: Feature) -> Result<Value, DecodeError> {
    if raw.trim().is_empty() {
        return Err(fail(feature, raw, DecodeErrorKind::Empty));
    }
    serde_json::from_str(raw).map_err(|e| fail(feature, raw, DecodeErrorKind::Syntax(e.to_string())))
}

/// Parse model output and check it against the feature's document shape.
///
/// Missing fields fall back to their defaults; a field that is present with
/// the wrong type fails the same way invalid JSON does.
pub fn decode<T: FeatureSchema>(raw: &str) -> Result<T, DecodeError> {
    let value = decode_value(raw, T::FEATURE)?;
    if !value.is_object() {
        return Err(fail(T::FEATURE, raw, DecodeErrorKind::NotAnObject));
    }
    serde_json::from_value(value)
        .map_err(|e| fail(T::FEATURE, raw, DecodeErrorKind::Shape(e.to_string())))
}

fn fail(feature: Feature, raw: &str, kind: DecodeErrorKind) -> DecodeError {
    tracing::error!(%feature, raw, reason = %kind, "Failed to parse AI JSON");
    DecodeError::new(feature, raw, kind)
}
