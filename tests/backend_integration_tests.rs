use std::time::Duration;

use blogforge::api::{ApiError, Backend, GenerateOutcome, GenerateRequest, HttpBackend, Role};
use serde_json::json;
use wiremock::{
    matchers::{body_json, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Starts a mock server and a backend pointed at its `/api` prefix.
async fn setup() -> (MockServer, HttpBackend) {
    let mock_server = MockServer::start().await;
    let backend = HttpBackend::new(format!("{}/api", mock_server.uri()), None).unwrap();
    (mock_server, backend)
}

fn request(topic: &str, chat_id: Option<i64>) -> GenerateRequest {
    GenerateRequest {
        topic: topic.to_string(),
        user_id: 1,
        chat_id,
    }
}

// ============================================================================
// Chats and Messages
// ============================================================================

#[tokio::test]
async fn test_list_chats_parses_timestamps() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/chats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 2, "title": "Brutalist SaaS", "created_at": "2024-05-02T09:30:00.123456"},
            {"id": 1, "title": "Rust async", "created_at": "2024-05-01T10:00:00+00:00"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let chats = backend.list_chats().await.unwrap();

    assert_eq!(chats.len(), 2);
    assert_eq!(chats[0].title, "Brutalist SaaS");
    assert_eq!(chats[1].created_at.format("%Y-%m-%d %H:%M").to_string(), "2024-05-01 10:00");
}

#[tokio::test]
async fn test_list_chats_scoped_to_configured_user() {
    let (mock_server, backend) = setup().await;
    let backend = backend.with_user_id(7);

    Mock::given(method("GET"))
        .and(path("/api/chats"))
        .and(query_param("user_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 42, "title": "Future of Agentic AI", "created_at": "2024-05-01T10:00:00"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let chats = backend.list_chats().await.unwrap();
    assert_eq!(chats.len(), 1);
    assert_eq!(chats[0].id, 42);
}

#[tokio::test]
async fn test_list_chats_defaults_to_user_one() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/chats"))
        .and(query_param("user_id", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert!(backend.list_chats().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_get_messages() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/chats/42/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 5, "role": "user", "content": "Rust async", "image_url": null,
             "created_at": "2024-05-01T10:00:00"},
            {"id": 6, "role": "assistant", "content": "# Rust async\n\nBody",
             "image_url": "http://img/6.png", "created_at": "2024-05-01T10:00:05"}
        ])))
        .mount(&mock_server)
        .await;

    let messages = backend.get_messages(42).await.unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[0].image_url, None);
    assert_eq!(messages[1].image_url.as_deref(), Some("http://img/6.png"));
}

#[tokio::test]
async fn test_get_messages_unknown_chat() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/chats/99/messages"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"detail": "Chat not found"})),
        )
        .mount(&mock_server)
        .await;

    let err = backend.get_messages(99).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Api {
            status: 404,
            message: "Chat not found".into()
        }
    );
    assert_eq!(err.to_string(), "API error (HTTP 404): Chat not found");
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/chats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&mock_server)
        .await;

    let err = backend.list_chats().await.unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn test_delete_chat_and_message() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("DELETE"))
        .and(path("/api/chats/42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/messages/6"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    backend.delete_chat(42).await.unwrap();
    backend.delete_message(6).await.unwrap();
}

#[tokio::test]
async fn test_update_message_sends_content_as_query() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/api/messages/5"))
        .and(query_param("content", "Rust & async, revisited"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    backend
        .update_message(5, "Rust & async, revisited")
        .await
        .unwrap();
}

// ============================================================================
// Generation
// ============================================================================

#[tokio::test]
async fn test_generate_success() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/generate-blog"))
        .and(body_json(json!({"topic": "Rust async", "user_id": 1, "chat_id": null})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "content": "# Rust async\n\nBody",
            "image_url": "",
            "user_message_id": 5,
            "assistant_message_id": 6,
            "chat_id": 42
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let outcome = backend.generate(&request("Rust async", None)).await.unwrap();

    let GenerateOutcome::Generated(turn) = outcome else {
        panic!("expected a generated turn, got {outcome:?}");
    };
    assert_eq!(turn.chat_id, 42);
    assert_eq!(turn.user_message_id, 5);
    assert_eq!(turn.assistant_message_id, 6);
    // Empty image URL means no image
    assert_eq!(turn.image_url, None);
}

#[tokio::test]
async fn test_generate_server_error_with_detail_is_rejection() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/generate-blog"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"detail": "Model overloaded"})),
        )
        .mount(&mock_server)
        .await;

    let outcome = backend.generate(&request("Rust", Some(42))).await.unwrap();
    assert_eq!(
        outcome,
        GenerateOutcome::Rejected {
            detail: "Model overloaded".into()
        }
    );
}

#[tokio::test]
async fn test_generate_structured_detail_rendered_as_json() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/generate-blog"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "detail": [{"loc": ["body", "topic"], "msg": "field required"}]
        })))
        .mount(&mock_server)
        .await;

    let outcome = backend.generate(&request("", None)).await.unwrap();
    let GenerateOutcome::Rejected { detail } = outcome else {
        panic!("expected rejection");
    };
    assert!(detail.contains("field required"));
    assert!(detail.starts_with('['));
}

#[tokio::test]
async fn test_generate_success_false_without_detail() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/generate-blog"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": false})))
        .mount(&mock_server)
        .await;

    let outcome = backend.generate(&request("Rust", None)).await.unwrap();
    assert_eq!(
        outcome,
        GenerateOutcome::Rejected {
            detail: "Unable to process request.".into()
        }
    );
}

#[tokio::test]
async fn test_generate_bad_gateway_is_api_error() {
    let (mock_server, backend) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/generate-blog"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&mock_server)
        .await;

    let err = backend.generate(&request("Rust", None)).await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Api {
            status: 502,
            message: "Bad Gateway".into()
        }
    );
}

// ============================================================================
// Archive
// ============================================================================

#[tokio::test]
async fn test_list_blogs() {
    let (mock_server, backend) = setup().await;
    let backend = backend.with_user_id(7);

    Mock::given(method("GET"))
        .and(path("/api/blogs"))
        .and(query_param("user_id", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 3, "topic": "Autonomous Agentic Ops", "content": "Agents...",
             "timestamp": "2024-06-01T12:00:00"}
        ])))
        .mount(&mock_server)
        .await;

    let blogs = backend.list_blogs().await.unwrap();
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0].id, 3);
    assert_eq!(blogs[0].topic, "Autonomous Agentic Ops");
}

// ============================================================================
// Transport Failures
// ============================================================================

#[tokio::test]
async fn test_request_timeout_is_network_error() {
    let mock_server = MockServer::start().await;
    let backend = HttpBackend::new(
        format!("{}/api", mock_server.uri()),
        Some(Duration::from_millis(100)),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/chats"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&mock_server)
        .await;

    let err = backend.list_chats().await.unwrap_err();
    assert!(err.is_connectivity());
    assert!(err.to_string().contains("timed out"), "got {err}");
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    // Grab a free port, then close it so nothing is listening
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let backend = HttpBackend::new(format!("http://127.0.0.1:{port}/api"), None).unwrap();

    let err = backend.generate(&request("Rust", None)).await.unwrap_err();
    assert!(matches!(err, ApiError::Network(_)), "got {err:?}");
}
