//! Decoding of raw execute-action request bodies.
//!
//! Transport-level problems are reported as [`RequestError`]; everything that
//! gets past this layer is a well-formed [`ActionRequest`], even when the action
//! name turns out to be unknown.

use serde_json::Value;
use thiserror::Error;

use crate::core::types::{ActionRequest, Payload};

/// Reasons a request body is rejected before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RequestError {
    /// Body is not JSON, or decodes to `null`, `{}` or a non-object.
    #[error("invalid or empty JSON")]
    InvalidJson,
    /// `action` is absent, empty, or not a string.
    #[error("'action' field is required")]
    MissingAction,
}

/// Decode an execute-action body.
///
/// `payload` is never validated here: anything other than an object is
/// replaced by an empty one and left for the handler to judge.
pub fn parse_request(body: &[u8]) -> Result<ActionRequest, RequestError> {
    let value: Value = serde_json::from_slice(body).map_err(|_| RequestError::InvalidJson)?;
    let mut object = match value {
        Value::Object(map) if !map.is_empty() => map,
        _ => return Err(RequestError::InvalidJson),
    };

    let action = match object.remove("action") {
        Some(Value::String(name)) if !name.is_empty() => name,
        _ => return Err(RequestError::MissingAction),
    };

    let payload = match object.remove("payload") {
        Some(Value::Object(map)) => map,
        _ => Payload::new(),
    };

    Ok(ActionRequest { action, payload })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_action_and_payload() {
        let req = parse_request(br#"{"action":"create_branch","payload":{"branch_name":"x"}}"#)
            .expect("parse");
        assert_eq!(req.action, "create_branch");
        assert_eq!(req.payload["branch_name"], "x");
    }

    #[test]
    fn missing_payload_defaults_to_empty() {
        let req = parse_request(br#"{"action":"run_tests"}"#).expect("parse");
        assert!(req.payload.is_empty());
    }

    #[test]
    fn null_payload_defaults_to_empty() {
        let req = parse_request(br#"{"action":"run_tests","payload":null}"#).expect("parse");
        assert!(req.payload.is_empty());
    }

    #[test]
    fn unknown_action_still_parses() {
        let req = parse_request(br#"{"action":"bogus"}"#).expect("parse");
        assert_eq!(req.action, "bogus");
    }

    #[test]
    fn rejects_malformed_json() {
        assert_eq!(parse_request(b"{not json"), Err(RequestError::InvalidJson));
    }

    #[test]
    fn rejects_empty_body() {
        assert_eq!(parse_request(b""), Err(RequestError::InvalidJson));
    }

    #[test]
    fn rejects_empty_object_and_non_objects() {
        assert_eq!(parse_request(b"{}"), Err(RequestError::InvalidJson));
        assert_eq!(parse_request(b"null"), Err(RequestError::InvalidJson));
        assert_eq!(parse_request(b"[1,2]"), Err(RequestError::InvalidJson));
    }

    #[test]
    fn rejects_missing_or_blank_action() {
        assert_eq!(
            parse_request(br#"{"payload":{}}"#),
            Err(RequestError::MissingAction)
        );
        assert_eq!(
            parse_request(br#"{"action":""}"#),
            Err(RequestError::MissingAction)
        );
        assert_eq!(
            parse_request(br#"{"action":7}"#),
            Err(RequestError::MissingAction)
        );
    }

    #[test]
    fn non_object_payload_becomes_empty() {
        let req = parse_request(br#"{"action":"run_tests","payload":"ignored"}"#).expect("parse");
        assert_eq!(req.action, "run_tests");
        assert!(req.payload.is_empty());

        let req = parse_request(br#"{"action":"bogus","payload":[1]}"#).expect("parse");
        assert_eq!(req.action, "bogus");
        assert!(req.payload.is_empty());
    }

    #[test]
    fn messages_match_wire_contract() {
        assert_eq!(
            RequestError::MissingAction.to_string(),
            "'action' field is required"
        );
        assert_eq!(RequestError::InvalidJson.to_string(), "invalid or empty JSON");
    }
}
