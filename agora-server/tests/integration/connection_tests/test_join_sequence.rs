use agora_core::{CapacityReport, PeerState, ServerEvent};

use crate::integration::{create_test_session, init_tracing, quiet_config};
use crate::utils::TestChannel;

#[tokio::test]
async fn test_first_peer_gets_empty_introduction() {
    init_tracing();

    let (session, _backend) = create_test_session(quiet_config()).await;
    let mut a = TestChannel::open(&session).await.expect("open a");

    let events = a.drain();

    assert_eq!(
        events,
        vec![
            ServerEvent::Welcome { peer_id: a.peer_id },
            ServerEvent::Introduction(Default::default()),
            ServerEvent::UpdateCapacity(CapacityReport::new(1, 14)),
            ServerEvent::InitSttFile(String::new()),
            ServerEvent::ExistingTranscripts(Default::default()),
        ]
    );
}

#[tokio::test]
async fn test_second_peer_is_introduced_to_first() {
    init_tracing();

    let (session, _backend) = create_test_session(quiet_config()).await;
    let mut a = TestChannel::open(&session).await.expect("open a");
    a.drain();

    let mut b = TestChannel::open(&session).await.expect("open b");

    let b_events = b.drain();
    assert_eq!(b_events[0], ServerEvent::Welcome { peer_id: b.peer_id });
    let ServerEvent::Introduction(intro) = &b_events[1] else {
        panic!("expected introduction, got {:?}", b_events[1]);
    };
    assert_eq!(intro.len(), 1);
    assert_eq!(intro.get(&a.peer_id), Some(&PeerState::default()));
    assert!(!intro.contains_key(&b.peer_id));
    assert!(
        !b_events.contains(&ServerEvent::NewPeerConnected(b.peer_id)),
        "newcomer must not be told about itself"
    );

    assert_eq!(
        a.drain(),
        vec![
            ServerEvent::NewPeerConnected(b.peer_id),
            ServerEvent::UpdateCapacity(CapacityReport::new(2, 14)),
        ]
    );
}

#[tokio::test]
async fn test_introduction_reflects_last_known_positions() {
    init_tracing();

    let (session, _backend) = create_test_session(quiet_config()).await;
    let a = TestChannel::open(&session).await.expect("open a");
    a.send(agora_core::ClientMessage::Move(agora_core::MovePayload {
        position: [3.0, 0.5, -1.0],
        rotation: [0.0, 0.7071, 0.0, 0.7071],
    }))
    .await
    .expect("move");

    let mut b = TestChannel::open(&session).await.expect("open b");

    let ServerEvent::Introduction(intro) = b.drain().remove(1) else {
        panic!("expected introduction");
    };
    assert_eq!(intro[&a.peer_id].position, [3.0, 0.5, -1.0]);
    assert_eq!(intro[&a.peer_id].rotation, [0.0, 0.7071, 0.0, 0.7071]);
}

#[tokio::test]
async fn test_ids_are_unique() {
    init_tracing();

    let (session, _backend) = create_test_session(quiet_config()).await;
    let a = TestChannel::open(&session).await.expect("open a");
    a.close().await.expect("close a");
    let b = TestChannel::open(&session).await.expect("open b");

    assert_ne!(a.peer_id, b.peer_id);
}
