//! Harness self-tests: the scripted transport has to be trustworthy before
//! anything built on top of it is.

use felt_client::error::ClientError;
use felt_client::transport::{Transport, TransportEvent};
use felt_harness::{fixtures, sim_pair};
use felt_proto::ClientEvent;

#[tokio::test]
async fn connect_is_idempotent() {
    let (mut transport, server) = sim_pair();

    transport.connect().await.unwrap();
    transport.connect().await.unwrap();

    assert_eq!(server.connect_count(), 1);
    // Exactly one Up event was emitted.
    assert_eq!(transport.next_event().await, Some(TransportEvent::Up));
    server.push_error("sentinel");
    assert_eq!(
        transport.next_event().await,
        Some(TransportEvent::ServerError("sentinel".into()))
    );
}

#[tokio::test]
async fn pushes_are_recorded_in_order() {
    let (mut transport, server) = sim_pair();
    transport.connect().await.unwrap();

    transport.send(ClientEvent::Join { game_id: "g1".into() }).await.unwrap();
    transport
        .send(ClientEvent::Action {
            game_id: "g1".into(),
            player_id: 0,
            action: felt_proto::ActionKind::Fold,
            amount: 0,
        })
        .await
        .unwrap();

    let sent = server.take_sent();
    assert_eq!(sent.len(), 2);
    assert!(matches!(sent[0], ClientEvent::Join { .. }));
    assert!(matches!(sent[1], ClientEvent::Action { .. }));
    assert!(server.sent().is_empty(), "take_sent drains the record");
}

#[tokio::test]
async fn sends_fail_while_the_link_is_down() {
    let (mut transport, server) = sim_pair();
    transport.connect().await.unwrap();
    server.drop_link();

    let result = transport.send(ClientEvent::Join { game_id: "g1".into() }).await;
    assert!(matches!(result, Err(ClientError::TransportUnavailable(_))));
    assert_eq!(server.joins(), 0);
}

#[tokio::test]
async fn one_shot_calls_consume_scripted_outcomes() {
    let (mut transport, server) = sim_pair();
    server.enqueue_create(Ok(fixtures::fresh_hand("g1")));

    let snapshot = transport.create_game("You").await.unwrap();
    assert_eq!(snapshot.game_id, "g1");

    // Unscripted calls fail rather than hang.
    assert!(matches!(
        transport.create_game("You").await,
        Err(ClientError::CreateGameFailed(_))
    ));
    assert!(matches!(
        transport.advance_hand("g1").await,
        Err(ClientError::AdvanceHandFailed(_))
    ));
}

#[tokio::test]
async fn link_events_arrive_in_injection_order() {
    let (mut transport, server) = sim_pair();
    transport.connect().await.unwrap();

    server.drop_link();
    server.restore_link();
    server.push_snapshot(fixtures::fresh_hand("g1"));

    assert_eq!(transport.next_event().await, Some(TransportEvent::Up));
    assert_eq!(transport.next_event().await, Some(TransportEvent::Down));
    assert_eq!(transport.next_event().await, Some(TransportEvent::Up));
    assert!(matches!(transport.next_event().await, Some(TransportEvent::Snapshot(_))));
}
