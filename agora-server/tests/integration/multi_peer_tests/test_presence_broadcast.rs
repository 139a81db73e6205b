use agora_core::{ClientMessage, MovePayload, PeerState, ServerEvent};
use std::time::Duration;

use crate::integration::{create_test_session, init_tracing, quiet_config};
use crate::utils::TestChannel;

fn is_peers(event: &ServerEvent) -> bool {
    matches!(event, ServerEvent::Peers(_))
}

#[tokio::test]
async fn test_presence_includes_idle_peers_but_never_self() {
    init_tracing();

    let config = agora_server::ServerConfig {
        presence_interval: Duration::from_millis(20),
        ..quiet_config()
    };
    let (session, _backend) = create_test_session(config).await;
    let a = TestChannel::open(&session).await.expect("open a");
    let mut b = TestChannel::open(&session).await.expect("open b");

    let event = b
        .next_matching(|e| matches!(e, ServerEvent::Peers(p) if !p.is_empty()))
        .await
        .expect("presence snapshot");

    let ServerEvent::Peers(snapshot) = event else {
        unreachable!();
    };
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.get(&a.peer_id), Some(&PeerState::default()));
    assert!(!snapshot.contains_key(&b.peer_id));
}

#[tokio::test]
async fn test_presence_carries_latest_move() {
    init_tracing();

    let config = agora_server::ServerConfig {
        presence_interval: Duration::from_millis(20),
        ..quiet_config()
    };
    let (session, _backend) = create_test_session(config).await;
    let a = TestChannel::open(&session).await.expect("open a");
    let mut b = TestChannel::open(&session).await.expect("open b");

    a.send(ClientMessage::Move(MovePayload {
        position: [4.0, 0.5, 4.0],
        rotation: [0.0, 1.0, 0.0, 0.0],
    }))
    .await
    .expect("move");

    let moved = b
        .next_matching(|e| {
            matches!(e, ServerEvent::Peers(p)
                if p.get(&a.peer_id).is_some_and(|s| s.position == [4.0, 0.5, 4.0]))
        })
        .await;
    assert!(moved.is_ok(), "move never showed up in presence");
}

#[tokio::test]
async fn test_departed_peer_leaves_presence() {
    init_tracing();

    let config = agora_server::ServerConfig {
        presence_interval: Duration::from_millis(20),
        ..quiet_config()
    };
    let (session, _backend) = create_test_session(config).await;
    let a = TestChannel::open(&session).await.expect("open a");
    let mut b = TestChannel::open(&session).await.expect("open b");

    a.close().await.expect("close a");
    assert!(b.drain().contains(&ServerEvent::PeerDisconnected(a.peer_id)));
    a.send(ClientMessage::Move(MovePayload {
        position: [9.0, 9.0, 9.0],
        rotation: [0.0, 0.0, 0.0, 1.0],
    }))
    .await
    .expect("late move");

    for _ in 0..3 {
        let ServerEvent::Peers(snapshot) = b.next_matching(is_peers).await.expect("presence")
        else {
            unreachable!();
        };
        assert!(!snapshot.contains_key(&a.peer_id));
    }
}
