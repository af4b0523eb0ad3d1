//! Drives `HttpChatClient` and `ChatSession` against a mock chat endpoint.

use persona_chat_core::{
    ChatBackend, ChatRequest, ChatSession, HttpChatClient, Message, Personality, SendFailure,
    SendOutcome, SEND_FAILURE_NOTICE,
};
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn request(message: &str, personality: Personality) -> ChatRequest {
    ChatRequest {
        message: message.to_string(),
        personality,
    }
}

fn client_for(server: &MockServer) -> HttpChatClient {
    HttpChatClient::new(&format!("{}/api/chat", server.uri()))
}

#[tokio::test]
async fn test_reply_is_returned_on_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_json(json!({"message": "hello", "personality": "friendly"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "hi there"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reply = client.send(&request("hello", Personality::Friendly)).await.unwrap();
    assert_eq!(reply, "hi there");
}

#[tokio::test]
async fn test_extra_response_fields_are_ignored() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"reply": "ok", "personality": "mirror"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reply = client.send(&request("x", Personality::Mirror)).await.unwrap();
    assert_eq!(reply, "ok");
}

#[tokio::test]
async fn test_server_error_is_a_status_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"reply": "ignored"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.send(&request("hello", Personality::Polite)).await.unwrap_err();
    assert!(matches!(err, SendFailure::Status(status) if status.as_u16() == 500));
}

#[tokio::test]
async fn test_missing_reply_field_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "nope"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.send(&request("hello", Personality::Polite)).await.unwrap_err();
    assert!(matches!(err, SendFailure::MalformedResponse(_)));
}

#[tokio::test]
async fn test_unreachable_endpoint_is_a_transport_failure() {
    // Grab a free port, then close it so nothing is listening there
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let client = HttpChatClient::new(&format!("http://127.0.0.1:{}/api/chat", port));
    let err = client.send(&request("hello", Personality::Friendly)).await.unwrap_err();
    assert!(matches!(err, SendFailure::Transport(_)));
}

#[tokio::test]
async fn test_session_round_trip_through_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_json(json!({"message": "hello", "personality": "sarcastic"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "oh, hi"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = ChatSession::new(Personality::Sarcastic);
    session.set_draft("hello");

    assert_eq!(session.send_message(&client).await, Some(SendOutcome::Replied));
    assert_eq!(
        session.conversation().messages(),
        &[Message::user("hello"), Message::bot("oh, hi")]
    );
    assert!(!session.is_busy());
}

#[tokio::test]
async fn test_session_turns_http_failure_into_notice() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut session = ChatSession::default();
    session.set_draft("hello");

    assert_eq!(session.send_message(&client).await, Some(SendOutcome::Failed));
    assert_eq!(
        session.conversation().messages(),
        &[Message::user("hello"), Message::bot(SEND_FAILURE_NOTICE)]
    );
    assert!(!session.is_busy());
}
