use agri_portal_screens::{ChatExchange, ChatRole, ChatSession};
use agri_portal_sdk::{
    api,
    portal_sdk_test::{MockBackend, MockResult},
    PortalError, StatusCode,
};
use chrono::{TimeZone, Utc};
use serde_json::json;

#[tokio::test]
async fn blank_input_is_ignored() {
    let backend = MockBackend::new();
    let mut session = ChatSession::new();

    let exchange = session.send(&backend, "   ").await;

    assert!(matches!(exchange, ChatExchange::Ignored));
    assert_eq!(session.transcript().len(), 1);
    assert_eq!(backend.request_count(), 0);
}

#[tokio::test]
async fn reply_is_appended_with_server_timestamp() {
    let backend = MockBackend::new();
    backend.enqueue_post(
        api::CHAT_PATH,
        json!({
            "reply": "Test soil pH before sowing.",
            "timestamp": "2024-06-01T10:00:00Z",
            "assistant": "KhetGuru"
        }),
    );
    let mut session = ChatSession::new();

    let exchange = session.send(&backend, "  When should I test soil?  ").await;

    assert!(matches!(exchange, ChatExchange::Replied));
    let transcript = session.transcript();
    assert_eq!(transcript.len(), 3);
    assert_eq!(transcript[1].role, ChatRole::User);
    assert_eq!(transcript[1].content, "When should I test soil?");
    assert_eq!(transcript[2].role, ChatRole::Assistant);
    assert_eq!(transcript[2].content, "Test soil pH before sowing.");
    assert_eq!(
        transcript[2].timestamp,
        Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
    );

    let requests = backend.tracked_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].body, Some(json!({ "message": "When should I test soil?" })));
    assert_eq!(requests[0].bearer, None);
}

#[tokio::test]
async fn error_detail_becomes_assistant_message() {
    let backend = MockBackend::new();
    backend.enqueue_post(
        api::CHAT_PATH,
        PortalError::StatusCode(
            StatusCode::BAD_REQUEST,
            r#"{"detail":"Message too long"}"#.to_string(),
        ),
    );
    let mut session = ChatSession::new();

    let exchange = session.send(&backend, "hello").await;

    assert!(matches!(exchange, ChatExchange::Failed(_)));
    assert_eq!(session.transcript().len(), 3);
    assert_eq!(session.transcript()[2].content, "Error: Message too long");
}

#[tokio::test]
async fn network_failure_and_bad_body_share_a_notice() {
    let backend = MockBackend::new();
    backend
        .enqueue_post(api::CHAT_PATH, MockResult::unreachable())
        .enqueue_post(api::CHAT_PATH, json!({ "unexpected": true }));
    let mut session = ChatSession::new();

    session.send(&backend, "first").await;
    session.send(&backend, "second").await;

    let transcript = session.transcript();
    assert_eq!(transcript.len(), 5);
    assert_eq!(transcript[2].content, "Network error contacting KhetGuru.");
    assert_eq!(transcript[4].content, "Network error contacting KhetGuru.");
    assert_eq!(transcript[3].content, "second");
}

#[tokio::test]
async fn every_non_blank_send_grows_the_transcript_by_two() {
    let backend = MockBackend::new();
    backend
        .enqueue_post(
            api::CHAT_PATH,
            json!({ "reply": "ok", "timestamp": "not a time" }),
        )
        .enqueue_post(
            api::CHAT_PATH,
            MockResult::status(StatusCode::SERVICE_UNAVAILABLE),
        );
    let mut session = ChatSession::new();

    for (input, expected_len) in [("a", 3), ("b", 5), ("c", 7)] {
        session.send(&backend, input).await;
        assert_eq!(session.transcript().len(), expected_len);
    }
    assert_eq!(session.transcript()[4].content, "Error: Failed to respond");
}
