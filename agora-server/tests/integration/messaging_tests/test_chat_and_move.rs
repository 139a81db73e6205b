use std::time::Duration;

use agora_core::{ClientMessage, MovePayload, ServerEvent};
use agora_server::ServerConfig;
use serde_json::json;

use crate::integration::{create_test_session, init_tracing, quiet_config};
use crate::utils::TestChannel;

#[tokio::test]
async fn test_chat_is_stamped_with_sender() {
    init_tracing();

    let (session, _backend) = create_test_session(quiet_config()).await;
    let mut a = TestChannel::open(&session).await.expect("open a");
    let mut b = TestChannel::open(&session).await.expect("open b");
    a.drain();
    b.drain();

    a.send(ClientMessage::Msg(json!({ "text": "anyone here?" })))
        .await
        .expect("chat");

    assert_eq!(
        b.next_event().await.expect("chat"),
        ServerEvent::Msg {
            from: a.peer_id,
            data: json!({ "text": "anyone here?" }),
        }
    );
    a.expect_silence(100).await.expect("no echo");
}

#[tokio::test]
async fn test_move_shows_up_in_next_presence_tick() {
    init_tracing();

    let config = ServerConfig {
        presence_interval: Duration::from_millis(20),
        ..quiet_config()
    };
    let (session, _backend) = create_test_session(config).await;
    let a = TestChannel::open(&session).await.expect("open a");
    let mut b = TestChannel::open(&session).await.expect("open b");

    a.send(ClientMessage::Move(MovePayload {
        position: [2.0, 0.5, 7.0],
        rotation: [0.0, 1.0, 0.0, 0.0],
    }))
    .await
    .expect("move");

    let a_id = a.peer_id;
    let event = b
        .next_matching(|e| {
            matches!(e, ServerEvent::Peers(peers)
                if peers.get(&a_id).is_some_and(|s| s.position == [2.0, 0.5, 7.0]))
        })
        .await
        .expect("presence with new position");

    let ServerEvent::Peers(peers) = event else {
        unreachable!();
    };
    assert_eq!(peers[&a_id].rotation, [0.0, 1.0, 0.0, 0.0]);
    assert!(!peers.contains_key(&b.peer_id));
}
