#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use go2link_core::protocol::request::{generate_request_id, RequestEnvelope, RequestOptions};

#[test]
fn api_id_is_mandatory() {
    let err = RequestOptions::default().into_envelope().unwrap_err();
    assert_eq!(err.kind().as_str(), "MISSING_API_ID");
}

#[test]
fn envelope_wire_shape() {
    let env = RequestOptions::api(1004).id(7).into_envelope().unwrap();
    assert_eq!(
        serde_json::to_value(&env).unwrap(),
        json!({ "header": { "identity": { "id": 7, "api_id": 1004 } }, "parameter": "" })
    );
}

#[test]
fn priority_adds_policy() {
    let env = RequestOptions::api(1008).id(1).priority().into_envelope().unwrap();
    let v = serde_json::to_value(&env).unwrap();
    assert_eq!(v["header"]["policy"], json!({ "priority": 1 }));
}

#[test]
fn parameters_are_stringified() {
    let env = RequestOptions::api(1008)
        .parameter(json!({ "x": 0.5, "y": 0, "z": 0 }))
        .into_envelope()
        .unwrap();
    let back: serde_json::Value = serde_json::from_str(&env.parameter).unwrap();
    assert_eq!(back, json!({ "x": 0.5, "y": 0, "z": 0 }));

    let env = RequestOptions::api(1).parameter(json!("raw")).into_envelope().unwrap();
    assert_eq!(env.parameter, "raw");

    let env = RequestOptions::api(1).parameter("text").into_envelope().unwrap();
    assert_eq!(env.parameter, "text");
}

#[test]
fn generated_ids_are_positive_and_bounded() {
    for _ in 0..100 {
        let id = generate_request_id();
        assert!(id >= 0);
        assert!(id <= (1i64 << 31) + 1000);
    }
    let env = RequestOptions::api(1).into_envelope().unwrap();
    assert!(env.header.identity.id >= 0);
}

#[test]
fn envelope_parses_from_response_data() {
    let env: RequestEnvelope = serde_json::from_value(json!({
        "header": { "identity": { "id": 5, "api_id": 1004 } }
    }))
    .unwrap();
    assert_eq!(env.header.identity.api_id, 1004);
    assert_eq!(env.parameter, "");
    assert!(env.header.policy.is_none());
}
