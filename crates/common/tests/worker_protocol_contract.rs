use std::collections::BTreeSet;

use slash_common::protocol::events::{PARSER_READY_EVENT, PARSE_RESULT_EVENT};
use slash_common::protocol::jsonrpc::{Request, Response, RpcError, PROTOCOL_VERSION};
use slash_common::protocol::methods::WORKER_METHODS;
use serde_json::json;

fn load_contract() -> serde_json::Value {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../contracts/worker-methods.json");
    let content = std::fs::read_to_string(path).expect("contract file should be readable");
    serde_json::from_str(&content).expect("contract file should be valid JSON")
}

#[test]
fn worker_methods_match_contract() {
    let contract = load_contract();
    let expected: BTreeSet<&str> = contract["worker_methods"]
        .as_array()
        .expect("worker_methods should be an array")
        .iter()
        .map(|v| v.as_str().expect("method should be a string"))
        .collect();

    let actual: BTreeSet<&str> = WORKER_METHODS.iter().copied().collect();
    assert_eq!(actual, expected, "WORKER_METHODS diverged from contract");
}

#[test]
fn protocol_version_matches_contract() {
    let contract = load_contract();
    assert_eq!(contract["protocol_version"], PROTOCOL_VERSION);
}

#[test]
fn frontend_events_match_contract() {
    let contract = load_contract();
    let expected: BTreeSet<&str> = contract["events"]
        .as_array()
        .expect("events should be an array")
        .iter()
        .map(|v| v.as_str().expect("event should be a string"))
        .collect();

    let actual: BTreeSet<&str> = [PARSE_RESULT_EVENT, PARSER_READY_EVENT].into_iter().collect();
    assert_eq!(actual, expected, "frontend events diverged from contract");
}

#[test]
fn request_framing_is_stable() {
    let request = Request::new("document.annotate", Some(json!({ "text": "It works." })), 3);
    let encoded = serde_json::to_value(&request).expect("request should encode");
    assert_eq!(
        encoded,
        json!({
            "jsonrpc": "2.0",
            "method": "document.annotate",
            "params": { "text": "It works." },
            "id": 3
        })
    );
}

#[test]
fn success_and_error_responses_are_mutually_exclusive() {
    let success = Response::success(1, json!({ "ok": true }));
    assert!(success.result.is_some());
    assert!(success.error.is_none());

    let error = Response::error(
        2,
        RpcError { code: -32603, message: "pipeline not loaded".into(), data: None },
    );
    assert!(error.result.is_none());
    assert_eq!(error.error.expect("error should be present").code, -32603);
}

#[test]
fn responses_decode_without_optional_fields() {
    let decoded: Response =
        serde_json::from_str(r#"{"jsonrpc":"2.0","result":{"ok":true},"id":1}"#)
            .expect("minimal response should decode");
    assert_eq!(decoded.id, 1);
    assert!(decoded.error.is_none());
}
