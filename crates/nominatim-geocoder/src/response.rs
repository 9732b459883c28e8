//! Classification of reverse lookup payloads

use serde_json::Value;

use crate::error::Result;
use crate::types::{GeocodingError, Place, ReverseResult};

/// Tag a decoded reverse payload as a place or a service error
///
/// Any object carrying an `error` field is an error, whatever else it holds.
/// Everything else is decoded as a [`Place`]; a payload that is neither fails
/// with [`crate::NominatimError::Json`].
pub fn classify_reverse(value: Value) -> Result<ReverseResult> {
    if let Some(err) = error_field(&value) {
        return Ok(ReverseResult::Error(parse_error(err)));
    }

    let place: Place = serde_json::from_value(value)?;
    Ok(ReverseResult::Place(Box::new(place)))
}

pub(crate) fn error_field(value: &Value) -> Option<&Value> {
    value.as_object()?.get("error")
}

/// Error payloads come either as `"error": "message"` or as
/// `"error": {"code": 400, "message": "..."}`
fn parse_error(err: &Value) -> GeocodingError {
    match err {
        Value::String(message) => GeocodingError {
            message: message.clone(),
            code: None,
        },
        Value::Object(fields) => GeocodingError {
            message: fields
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| err.to_string()),
            code: fields
                .get("code")
                .and_then(Value::as_u64)
                .and_then(|c| u16::try_from(c).ok()),
        },
        other => GeocodingError {
            message: other.to_string(),
            code: None,
        },
    }
}
