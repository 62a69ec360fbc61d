//! Protocol layer tests — wire-format compatibility for the push envelope
//! and the pull API, exactly as the server emits them.

use bellbox_protocol::*;
use serde_json::json;

// ─────────────────────────────────────────────────────────────────────────
// Push envelope wire format
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn push_frame_wire_format_roundtrip() {
    let wire = r#"{"type":"NEW_NOTIFICATION","data":{"id":"n-7","type":"bulk-operation-complete","title":"5 file berhasil diproses","message":"Impor selesai","isRead":false,"createdAt":"2026-08-01T08:30:00Z","outcome":"success"}}"#;
    let frame = PushFrame::parse(wire).unwrap();
    let PushFrame::NewNotification { data } = &frame else {
        panic!("expected NEW_NOTIFICATION");
    };
    assert_eq!(data.kind, NotificationKind::BulkOperationComplete);
    assert_eq!(data.outcome, Some(BulkOutcome::Success));

    // Re-serializing keeps the discriminator and payload key.
    let value = serde_json::to_value(&frame).unwrap();
    assert_eq!(value["type"], "NEW_NOTIFICATION");
    assert_eq!(value["data"]["id"], "n-7");
    assert_eq!(value["data"]["isRead"], false);
}

#[test]
fn refresh_poke_has_no_payload() {
    let value = serde_json::to_value(PushFrame::NewAlerts).unwrap();
    assert_eq!(value, json!({"type": "NEW_ALERTS"}));
}

#[test]
fn notification_serializes_camel_case() {
    let n: Notification = serde_json::from_value(json!({
        "id": "n-1",
        "type": "stock-threshold",
        "title": "Stok menipis",
        "createdAt": "2026-08-01T08:30:00Z",
        "context": {
            "productId": "p-1",
            "productName": "Gula 1kg",
            "currentQuantity": 2,
            "threshold": 5
        }
    }))
    .unwrap();

    let value = serde_json::to_value(&n).unwrap();
    assert_eq!(value["type"], "stock-threshold");
    assert!(value.get("isRead").is_some());
    assert!(value.get("createdAt").is_some());
    // Absent optionals stay off the wire.
    assert!(value.get("outcome").is_none());

    let snapshot = n.stock_context().unwrap();
    assert_eq!(snapshot.product_id, "p-1");
    assert_eq!(snapshot.threshold, 5);
}

// ─────────────────────────────────────────────────────────────────────────
// Pull API wire format
// ─────────────────────────────────────────────────────────────────────────

#[test]
fn full_list_response_wire_format() {
    // This is exactly what GET /notifications returns.
    let wire = r#"{"data":[
        {"id":"b","type":"duplicate-detected","title":"Duplikat terdeteksi","isRead":true,"createdAt":"2026-08-01T09:00:00Z"},
        {"id":"a","type":"generic","title":"Info","isRead":false,"createdAt":"2026-08-01T08:00:00Z"}
    ]}"#;
    let resp: NotificationListResponse = serde_json::from_str(wire).unwrap();
    assert_eq!(resp.data.len(), 2);
    // Server order is preserved as-is; the store does not re-sort.
    assert_eq!(resp.data[0].id, "b");
    assert!(resp.data[0].is_read);
    assert!(!resp.data[1].is_read);
}

#[test]
fn error_display_carries_context() {
    let e = BellboxError::Status { status: 503 };
    assert!(format!("{e}").contains("503"));

    let e = PushFrame::parse("oops").unwrap_err();
    assert!(format!("{e}").contains("malformed push frame"));
}
