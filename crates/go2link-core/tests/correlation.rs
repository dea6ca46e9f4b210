#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use serde_json::json;

use go2link_core::{CorrelationKey, Message, MessageKind};

#[test]
fn outbound_prefers_uuid_then_identity_then_req_uuid() {
    let both = json!({ "uuid": "u-1", "header": { "identity": { "id": 42 } } });
    assert_eq!(
        CorrelationKey::for_outbound(MessageKind::Request, "t", Some(&both)),
        CorrelationKey::Id("u-1".into())
    );

    let identity = json!({ "header": { "identity": { "id": 42, "api_id": 1004 } } });
    assert_eq!(
        CorrelationKey::for_outbound(MessageKind::Request, "t", Some(&identity)),
        CorrelationKey::Id("42".into())
    );

    let req_uuid = json!({ "req_uuid": "r-9" });
    assert_eq!(
        CorrelationKey::for_outbound(MessageKind::RtcInnerReq, "", Some(&req_uuid)),
        CorrelationKey::Id("r-9".into())
    );
}

#[test]
fn missing_or_empty_ids_fall_back_to_route() {
    let route = CorrelationKey::Route {
        kind: MessageKind::Request,
        topic: "rt/api/sport/request".into(),
    };
    for data in [None, Some(json!({})), Some(json!({ "uuid": "" })), Some(json!({ "uuid": 0 }))] {
        let key = CorrelationKey::for_outbound(MessageKind::Request, "rt/api/sport/request", data.as_ref());
        assert_eq!(key, route);
        assert!(!key.is_explicit());
    }
    assert_eq!(route.to_string(), "req $ rt/api/sport/request");
}

#[test]
fn inbound_response_matches_outbound_request() {
    let sent = json!({ "header": { "identity": { "id": 1234567, "api_id": 1004 } }, "parameter": "" });
    let request_key = CorrelationKey::for_outbound(MessageKind::Request, "rt/api/sport/request", Some(&sent));

    let response = Message::new(MessageKind::Response, "rt/api/sport/request")
        .with_data(json!({ "header": { "identity": { "id": 1234567, "api_id": 1004 } }, "data": "" }));
    assert_eq!(CorrelationKey::for_inbound(&response), request_key);
    assert_eq!(request_key.to_string(), "1234567");
}

#[test]
fn inbound_reads_info_for_inner_requests() {
    let msg = Message::new(MessageKind::RtcInnerReq, "").with_info(json!({
        "req_type": "public_network_status",
        "uuid": "5b0ad6f4",
        "status": "NetworkStatus.ON_4G_CONNECTED",
    }));
    assert_eq!(CorrelationKey::for_inbound(&msg), CorrelationKey::Id("5b0ad6f4".into()));

    let reply = Message::new(MessageKind::RtcInnerReq, "").with_info(json!({ "req_uuid": "p-1" }));
    assert_eq!(CorrelationKey::for_inbound(&reply), CorrelationKey::Id("p-1".into()));
}

#[test]
fn data_ids_win_over_info() {
    let msg = Message::new(MessageKind::Response, "t")
        .with_data(json!({ "uuid": "from-data" }))
        .with_info(json!({ "uuid": "from-info" }));
    assert_eq!(CorrelationKey::for_inbound(&msg), CorrelationKey::Id("from-data".into()));
}
