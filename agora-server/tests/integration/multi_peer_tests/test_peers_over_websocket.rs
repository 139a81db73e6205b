use agora_client::{ClientEvent, ClientSession};
use agora_core::PeerId;
use agora_server::router;
use anyhow::{Context, Result};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::integration::{create_test_session, init_tracing, quiet_config};
use crate::utils::MockTransport;

async fn start_server() -> Result<String> {
    let (session, _backend) = create_test_session(quiet_config()).await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router(session, None)).await;
    });
    Ok(format!("ws://{}/ws", addr))
}

async fn wait_for<F>(events: &mut mpsc::UnboundedReceiver<ClientEvent>, mut pred: F) -> Result<ClientEvent>
where
    F: FnMut(&ClientEvent) -> bool,
{
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let event = tokio::time::timeout_at(deadline, events.recv())
            .await
            .context("timed out waiting for client event")?
            .context("client event stream ended")?;
        if pred(&event) {
            return Ok(event);
        }
    }
}

async fn welcomed(events: &mut mpsc::UnboundedReceiver<ClientEvent>) -> Result<PeerId> {
    match wait_for(events, |e| matches!(e, ClientEvent::Welcomed(_))).await? {
        ClientEvent::Welcomed(id) => Ok(id),
        _ => unreachable!(),
    }
}

#[tokio::test]
async fn test_roles_and_relay_end_to_end() -> Result<()> {
    init_tracing();
    let url = start_server().await?;

    let first_transport = MockTransport::new();
    let (first, mut first_events) = ClientSession::connect(&url, first_transport.clone()).await?;
    let first_id = welcomed(&mut first_events).await?;

    let late_transport = MockTransport::new();
    let (late, mut late_events) = ClientSession::connect(&url, late_transport.clone()).await?;
    let late_id = welcomed(&mut late_events).await?;

    wait_for(&mut late_events, |e| *e == ClientEvent::PeerJoined(first_id)).await?;
    wait_for(&mut first_events, |e| *e == ClientEvent::PeerJoined(late_id)).await?;

    // The late joiner initiates; whoever was already there answers.
    assert_eq!(late_transport.created(), vec![(first_id, true)]);
    assert_eq!(first_transport.created(), vec![(late_id, false)]);

    let offer = r#"{"type":"offer","sdp":"v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\n"}"#;
    let sent = late_transport
        .events_for(&first_id)
        .context("late joiner has no link")?
        .signal(offer);
    assert!(sent);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while first_transport.applied().is_empty() && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(first_transport.applied(), vec![(late_id, offer.to_string())]);

    late.close().await;
    wait_for(&mut first_events, |e| *e == ClientEvent::PeerLeft(late_id)).await?;
    assert_eq!(first_transport.closed(), vec![late_id]);

    first.close().await;
    Ok(())
}

#[tokio::test]
async fn test_chat_reaches_other_client() -> Result<()> {
    init_tracing();
    let url = start_server().await?;

    let (a, mut a_events) = ClientSession::connect(&url, MockTransport::new()).await?;
    let a_id = welcomed(&mut a_events).await?;
    let (b, mut b_events) = ClientSession::connect(&url, MockTransport::new()).await?;
    welcomed(&mut b_events).await?;
    wait_for(&mut a_events, |e| matches!(e, ClientEvent::PeerJoined(_))).await?;

    a.send_chat(serde_json::json!({"text": "anyone here?"}))?;

    let chat = wait_for(&mut b_events, |e| matches!(e, ClientEvent::Chat { .. })).await?;
    assert_eq!(
        chat,
        ClientEvent::Chat {
            from: a_id,
            data: serde_json::json!({"text": "anyone here?"}),
        }
    );

    a.close().await;
    b.close().await;
    Ok(())
}
