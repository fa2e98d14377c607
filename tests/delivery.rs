use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sensu_teams_handler::notifications::senders::teams::TeamsSender;
use sensu_teams_handler::notifications::senders::{NotificationSender, SenderError};
use sensu_teams_handler::{CardStyle, Event, HandlerConfig, HandlerError, TeamsHandler};

const CRITICAL_EVENT: &str = r#"{
    "entity": {"metadata": {"name": "db1", "namespace": "default"}},
    "check": {
        "metadata": {"name": "disk", "namespace": "default"},
        "status": 2,
        "output": "DISK CRITICAL - / at 97%",
        "last_ok": 1700000000,
        "issued": 1700000600,
        "history": []
    }
}"#;

fn config_for(server: &MockServer, style: CardStyle) -> HandlerConfig {
    HandlerConfig {
        webhook_url: format!("{}/webhook", server.uri()),
        card_style: style,
        timeout: Duration::from_secs(1),
        ..Default::default()
    }
}

async fn posted_body(server: &MockServer) -> Value {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    serde_json::from_slice(&requests[0].body).unwrap()
}

#[tokio::test]
async fn test_adaptive_card_delivered() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("1"))
        .expect(1)
        .mount(&server)
        .await;

    let handler = TeamsHandler::new(config_for(&server, CardStyle::Adaptive)).unwrap();
    let event = Event::from_json(CRITICAL_EVENT).unwrap();
    handler.handle(&event).await.unwrap();

    let body = posted_body(&server).await;
    let content = &body["attachments"][0]["content"];
    let title = content["body"][0]["text"].as_str().unwrap();
    assert!(title.contains("Critical"));
    assert!(title.contains("db1"));
    assert!(title.contains("disk"));
    assert_eq!(content["actions"].as_array().unwrap().len(), 3);
    assert_eq!(
        content["actions"][2]["url"],
        "http://localhost:3000/c/~/n/default/events/db1/disk"
    );
}

#[tokio::test]
async fn test_connector_card_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/webhook"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let handler = TeamsHandler::new(config_for(&server, CardStyle::Connector)).unwrap();
    let event = Event::from_json(CRITICAL_EVENT).unwrap();
    handler.handle(&event).await.unwrap();

    let body = posted_body(&server).await;
    let title = body["title"].as_str().unwrap();
    assert!(title.contains("Critical"));
    assert!(title.contains("db1"));
    assert!(title.contains("disk"));
    assert_eq!(body["themeColor"], "A30200");

    let actions = body["potentialAction"].as_array().unwrap();
    assert_eq!(actions.len(), 2);
    assert_eq!(actions[0]["name"], "Show check output");
    assert_eq!(actions[1]["name"], "Open in Sensu");

    let facts = body["sections"][0]["facts"].as_array().unwrap();
    assert_eq!(facts[0]["value"], "");
    assert!(facts.iter().all(|f| f["name"] != "Mentioned"));
}

#[tokio::test]
async fn test_non_success_status_is_reported_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("webhook is down"))
        .expect(1)
        .mount(&server)
        .await;

    let handler = TeamsHandler::new(config_for(&server, CardStyle::Adaptive)).unwrap();
    let event = Event::from_json(CRITICAL_EVENT).unwrap();
    let err = handler.handle(&event).await.unwrap_err();

    match &err {
        HandlerError::Delivery { source, message, .. } => {
            assert!(matches!(source, SenderError::SendFailed { status: 500, .. }));
            assert!(message.contains("AdaptiveCard"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let text = err.to_string();
    assert!(text.contains("webhook is down"));
    assert!(text.contains("message (len"));
}

#[tokio::test]
async fn test_slow_webhook_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let sender = TeamsSender::new(Duration::from_millis(200)).unwrap();
    let result = sender
        .send(&format!("{}/webhook", server.uri()), &serde_json::json!({"text": "hi"}))
        .await;

    assert!(matches!(result, Err(SenderError::Timeout(_))));
}

#[tokio::test]
async fn test_unreachable_webhook_is_network_error() {
    let sender = TeamsSender::new(Duration::from_secs(1)).unwrap();
    // Port 9 (discard) is closed on test hosts.
    let result = sender
        .send("http://127.0.0.1:9/webhook", &serde_json::json!({"text": "hi"}))
        .await;

    assert!(matches!(
        result,
        Err(SenderError::NetworkError(_)) | Err(SenderError::Timeout(_))
    ));
}

#[test]
fn test_missing_webhook_fails_before_network() {
    let result = TeamsHandler::new(HandlerConfig::default());
    assert!(matches!(result, Err(HandlerError::Config(_))));
}
