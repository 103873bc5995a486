//! Wire envelopes for `POST /api/send`.
//!
//! Request: `{"type": string, "data": any}`. `data` defaults to `{}` when
//! absent or `null`.
//!
//! Response: `{"success": true, "result": ...}` on success, otherwise
//! `{"error": string}` with a status from [`status_for`].

use axum::http::StatusCode;
use localflare_common::BridgeError;
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// A parsed bridge call.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestEnvelope {
    #[serde(rename = "type")]
    pub message_type: String,
    #[serde(default)]
    pub data: Value,
}

impl RequestEnvelope {
    /// Parse a raw request body. Anything that is not a JSON object with a
    /// string `type` field is `MalformedRequest`.
    pub fn from_slice(body: &[u8]) -> Result<Self, BridgeError> {
        let value: Value =
            serde_json::from_slice(body).map_err(|_| BridgeError::MalformedRequest)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, BridgeError> {
        // Structs also deserialize from arrays; only objects are envelopes.
        if !value.is_object() {
            return Err(BridgeError::MalformedRequest);
        }

        let mut envelope: Self =
            serde_json::from_value(value).map_err(|_| BridgeError::MalformedRequest)?;
        if envelope.data.is_null() {
            envelope.data = Value::Object(Map::new());
        }
        Ok(envelope)
    }
}

/// HTTP status for a failed bridge call.
pub fn status_for(err: &BridgeError) -> StatusCode {
    match err {
        BridgeError::MalformedRequest => StatusCode::BAD_REQUEST,
        BridgeError::UnknownMessageType(_) => StatusCode::NOT_FOUND,
        BridgeError::HandlerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub fn success_body(result: Value) -> Value {
    json!({ "success": true, "result": result })
}

pub fn error_body(message: impl std::fmt::Display) -> Value {
    json!({ "error": message.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_type_and_data() {
        let env = RequestEnvelope::from_slice(br#"{"type":"echo","data":{"x":1}}"#).unwrap();
        assert_eq!(env.message_type, "echo");
        assert_eq!(env.data, json!({"x": 1}));
    }

    #[test]
    fn missing_data_defaults_to_empty_object() {
        let env = RequestEnvelope::from_slice(br#"{"type":"ping"}"#).unwrap();
        assert_eq!(env.data, json!({}));
    }

    #[test]
    fn null_data_defaults_to_empty_object() {
        let env = RequestEnvelope::from_slice(br#"{"type":"ping","data":null}"#).unwrap();
        assert_eq!(env.data, json!({}));
    }

    #[test]
    fn non_object_data_is_passed_through() {
        let env = RequestEnvelope::from_slice(br#"{"type":"sum","data":[1,2,3]}"#).unwrap();
        assert_eq!(env.data, json!([1, 2, 3]));
    }

    #[test]
    fn missing_type_is_malformed() {
        let err = RequestEnvelope::from_slice(br#"{"data":{}}"#).unwrap_err();
        assert_eq!(err, BridgeError::MalformedRequest);
    }

    #[test]
    fn non_string_type_is_malformed() {
        let err = RequestEnvelope::from_slice(br#"{"type":42}"#).unwrap_err();
        assert_eq!(err, BridgeError::MalformedRequest);
    }

    #[test]
    fn invalid_json_and_non_objects_are_malformed() {
        assert!(RequestEnvelope::from_slice(b"not json").is_err());
        assert!(RequestEnvelope::from_slice(b"").is_err());
        assert!(RequestEnvelope::from_slice(b"[1,2]").is_err());
        assert!(RequestEnvelope::from_slice(b"\"echo\"").is_err());
        assert!(RequestEnvelope::from_slice(br#"["echo", {}]"#).is_err());
    }

    #[test]
    fn extra_fields_are_ignored() {
        let env = RequestEnvelope::from_slice(br#"{"type":"echo","data":1,"id":7}"#).unwrap();
        assert_eq!(env.message_type, "echo");
        assert_eq!(env.data, json!(1));
    }

    #[test]
    fn status_mapping() {
        assert_eq!(status_for(&BridgeError::MalformedRequest), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&BridgeError::UnknownMessageType("ghost".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&BridgeError::HandlerError("bad".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn bodies() {
        assert_eq!(
            success_body(json!({"x": 1})),
            json!({"success": true, "result": {"x": 1}})
        );
        assert_eq!(
            error_body(BridgeError::UnknownMessageType("ghost".into())),
            json!({"error": "No handler for message type: ghost"})
        );
    }
}
