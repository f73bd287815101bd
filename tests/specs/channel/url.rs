//! Stream URL specs
//!
//! Verify what the channel asks the server for.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn requests_default_endpoint_without_timeout() {
    let mut server = StreamServer::start().await;
    let channel = channel_for(&server, ChannelConfig::default());

    channel.open();

    let request = server.next_request().await;
    assert!(
        request.starts_with("GET /api/v1/notification/stream HTTP/1.1\r\n"),
        "unexpected request: {}",
        request
    );
}

#[tokio::test]
async fn requests_timeout_when_configured() {
    let mut server = StreamServer::start().await;
    let config = ChannelConfig::new()
        .with_endpoint_path("/notification/stream")
        .with_timeout_secs(30);
    let channel = channel_for(&server, config);

    assert_eq!(
        channel.stream_url(),
        format!("{}/notification/stream?timeout=30", server.api_root)
    );

    channel.open();

    let request = server.next_request().await;
    assert!(
        request.starts_with("GET /api/v1/notification/stream?timeout=30 HTTP/1.1\r\n"),
        "unexpected request: {}",
        request
    );
    assert!(request
        .to_ascii_lowercase()
        .contains("accept: text/event-stream"));
}

#[tokio::test]
async fn config_loaded_from_toml_drives_the_request() {
    let mut server = StreamServer::start().await;
    let config = ChannelConfig::from_toml_str(
        r#"
        endpoint_path = "/jobs/stream"
        timeout = "1m"
        "#,
    )
    .unwrap();
    let channel = channel_for(&server, config);

    channel.open();

    let request = server.next_request().await;
    assert!(
        request.starts_with("GET /api/v1/jobs/stream?timeout=60 HTTP/1.1\r\n"),
        "unexpected request: {}",
        request
    );
}
