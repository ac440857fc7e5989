//! HTTP plugin backend against a wiremock server, and the full
//! dispatcher path from chat message to frames.

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use edgechat_plugins::{
    BridgeSettings, FrameKind, HttpPluginBackend, PluginBackend, PluginDispatcher, PluginError,
    PluginReply, ReportClock, StreamFrame,
};

fn backend(server: &MockServer) -> HttpPluginBackend {
    HttpPluginBackend::new(
        server.uri(),
        "plugin-secret".into(),
        None,
        reqwest::Client::new(),
    )
}

#[tokio::test]
async fn fetch_sends_query_and_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chat/plugins/naabu"))
        .and(header("Authorization", "plugin-secret"))
        .and(query_param("host", "a.com"))
        .and(query_param("port", "80,443"))
        .and(query_param("timeout", "20000"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "output": "a.com:80\n" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let out = backend(&server)
        .fetch(
            "naabu",
            &[
                ("host", "a.com".into()),
                ("port", "80,443".into()),
                ("timeout", "20000".into()),
            ],
        )
        .await
        .unwrap();
    assert_eq!(out.output.as_deref(), Some("a.com:80\n"));
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
        .mount(&server)
        .await;

    let err = backend(&server).fetch("naabu", &[]).await.unwrap_err();
    assert!(matches!(err, PluginError::Status(500)));
}

#[tokio::test]
async fn non_json_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = backend(&server).fetch("naabu", &[]).await.unwrap_err();
    assert!(matches!(err, PluginError::Json(_)));
}

#[tokio::test]
async fn null_output_is_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "output": null })))
        .mount(&server)
        .await;

    let out = backend(&server).fetch("naabu", &[]).await.unwrap();
    assert_eq!(out.output, None);
}

fn dispatcher(server: &MockServer) -> PluginDispatcher {
    PluginDispatcher::new(
        Arc::new(backend(server)),
        BridgeSettings {
            heartbeat_interval: Duration::from_secs(15),
            buffer: 16,
            clock: ReportClock::default(),
        },
        true,
    )
}

async fn frames(reply: Option<PluginReply>) -> Vec<StreamFrame> {
    match reply {
        Some(PluginReply::Stream(stream)) => stream.collect().await,
        other => panic!("expected a stream, got {other:?}"),
    }
}

#[tokio::test]
async fn chat_command_runs_scan_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chat/plugins/naabu"))
        .and(query_param("host", "a.com"))
        .and(query_param("topPorts", "100"))
        .and(query_param("excludeCDN", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            serde_json::json!({ "output": "a.com:80\nb.com:443\n\n" }),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let reply = dispatcher(&server).handle("/naabu -host a.com,b.com -tp 100 -ec");
    let frames = frames(reply).await;

    let kinds: Vec<FrameKind> = frames.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![FrameKind::Started, FrameKind::Processing, FrameKind::Report]
    );
    assert!(frames[2].text.contains("**Target**: \"a.com,b.com\""));
    assert!(frames[2].text.contains("a.com:80\nb.com:443\n```"));
}

#[tokio::test]
async fn backend_outage_is_an_error_frame() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let frames = frames(dispatcher(&server).handle("/naabu -host a.com")).await;
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[1].kind, FrameKind::Error);
    assert_eq!(frames[1].text, "🚨 Error: HTTP error! status: 502");
}

#[tokio::test]
async fn invalid_command_never_reaches_backend() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    match dispatcher(&server).handle("/naabu -host a.com -p 0") {
        Some(PluginReply::Notice(text)) => assert_eq!(text, "🚨 Invalid port range"),
        other => panic!("expected a notice, got {other:?}"),
    }
}
