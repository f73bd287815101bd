//! Channel lifecycle specs
//!
//! Verify open/close/reopen and caller-driven reconnection.

use crate::prelude::*;
use similar_asserts::assert_eq;

#[tokio::test]
async fn close_drops_the_connection() {
    let mut server = StreamServer::start().await;
    let channel = channel_for(&server, ChannelConfig::default());
    let (_e, mut errors) = channel.subscribe_channel(ERROR_KEY);

    channel.open();
    server.next_request().await;
    assert!(channel.is_open());

    channel.close();

    assert!(!channel.is_open());
    server.send(": are you there\n\n");
    server.send(": still there\n\n");
    server.disconnected().await;
    stays_quiet(&mut errors).await;
}

#[tokio::test]
async fn close_is_idempotent() {
    let mut server = StreamServer::start().await;
    let channel = channel_for(&server, ChannelConfig::default());

    channel.close();
    channel.open();
    server.next_request().await;
    channel.close();
    channel.close();
    channel.close();

    assert!(!channel.is_open());
}

#[tokio::test]
async fn nothing_dispatches_after_close() {
    let mut server = StreamServer::start().await;
    let channel = channel_for(&server, ChannelConfig::default());
    let (_j, mut jobs) = channel.subscribe_channel("event.job");

    channel.open();
    server.next_request().await;
    channel.close();
    server.send_data(r#"{"type":"job"}"#);

    stays_quiet(&mut jobs).await;
}

#[tokio::test]
async fn reopen_replaces_the_previous_connection() {
    let mut server = StreamServer::start().await;
    let channel = channel_for(&server, ChannelConfig::default());
    let (_j, mut jobs) = channel.subscribe_channel("event.job");

    channel.open();
    server.next_request().await;

    channel.open();
    // Old response is torn down, then the new request arrives
    server.send(": probe\n\n");
    server.send(": probe\n\n");
    server.disconnected().await;
    server.next_request().await;

    server.send_data(r#"{"type":"job","conn":2}"#);
    let event = recv(&mut jobs).await;
    assert_eq!(event.as_event().unwrap().get("conn"), Some(&json!(2)));
}

#[tokio::test]
async fn error_subscriber_can_reconnect() {
    let mut server = StreamServer::start().await;
    let channel = channel_for(&server, ChannelConfig::default());
    let (_j, mut jobs) = channel.subscribe_channel("event.job");

    let reconnect = {
        let channel = channel.clone();
        subscriber(move |n| {
            if matches!(n, Notification::Error(ChannelError::TransportFailure(_))) {
                channel.open();
            }
        })
    };
    channel.subscribe(ERROR_KEY, &reconnect);

    channel.open();
    server.next_request().await;
    server.hang_up();

    server.next_request().await;
    server.send_data(r#"{"type":"job"}"#);
    assert!(recv(&mut jobs).await.as_event().is_some());
    assert!(channel.is_open());

    // Break the cycle between the subscriber and the channel
    channel.unsubscribe(ERROR_KEY, &reconnect);
    channel.close();
}
