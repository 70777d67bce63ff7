//! JSON codec for semantic events.
//!
//! Wire format: one UTF-8 JSON object per transport message, discriminated by
//! its `"type"` field (see [`crate::protocol::event`]).
//!
//! Decoding is two-staged so that the three failure modes stay distinct:
//!
//! 1. The text must be a JSON object at all ([`ProtocolError::Malformed`]).
//! 2. It must carry a string `"type"` ([`ProtocolError::MissingType`]) that
//!    names a known event ([`ProtocolError::UnknownType`]).
//! 3. The remaining fields must match that event's payload
//!    ([`ProtocolError::Malformed`]).

use serde_json::Value;
use thiserror::Error;

use crate::protocol::event::{SemanticEvent, EVENT_TYPES};

/// Errors that can occur during event encoding or decoding.
#[derive(Debug, Error, PartialEq)]
pub enum ProtocolError {
    /// The text is not valid JSON or a field has the wrong shape.
    #[error("malformed event payload: {0}")]
    Malformed(String),

    /// The JSON object has no `"type"` discriminant.
    #[error("event payload has no \"type\" field")]
    MissingType,

    /// The `"type"` discriminant names no known event.
    #[error("unknown event type: {0:?}")]
    UnknownType(String),

    /// The event could not be serialized.
    #[error("failed to encode event: {0}")]
    Encode(String),
}

/// Encodes a [`SemanticEvent`] into its JSON wire text.
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] if serialization fails, which only
/// happens for non-finite floats.
///
/// # Examples
///
/// ```rust
/// use trackpad_core::protocol::{decode_event, encode_event, SemanticEvent};
///
/// let event = SemanticEvent::Scroll { dx: 0.0, dy: 2.0 };
/// let text = encode_event(&event).unwrap();
/// assert_eq!(decode_event(&text).unwrap(), event);
/// ```
pub fn encode_event(event: &SemanticEvent) -> Result<String, ProtocolError> {
    let value = serde_json::to_value(event).map_err(|e| ProtocolError::Encode(e.to_string()))?;
    // serde_json maps NaN and infinities to `null`, which the host would
    // reject anyway.  Refuse to put such a payload on the wire.
    if let Value::Object(map) = &value {
        if map.values().any(Value::is_null) {
            return Err(ProtocolError::Encode(format!(
                "non-finite field in {} event",
                event.kind()
            )));
        }
    }
    serde_json::to_string(&value).map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Decodes one [`SemanticEvent`] from JSON wire text.
///
/// # Errors
///
/// Returns [`ProtocolError::Malformed`], [`ProtocolError::MissingType`], or
/// [`ProtocolError::UnknownType`] as described in the module docs.
pub fn decode_event(text: &str) -> Result<SemanticEvent, ProtocolError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ProtocolError::Malformed(e.to_string()))?;

    match value.get("type") {
        None => return Err(ProtocolError::MissingType),
        Some(Value::String(kind)) => {
            if !EVENT_TYPES.contains(&kind.as_str()) {
                return Err(ProtocolError::UnknownType(kind.clone()));
            }
        }
        Some(other) => {
            return Err(ProtocolError::Malformed(format!(
                "\"type\" must be a string, got {other}"
            )))
        }
    }

    serde_json::from_value(value).map_err(|e| ProtocolError::Malformed(e.to_string()))
}
