use crate::SessionHandle;
use agora_core::{ClientMessage, ServerEvent};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(session): State<SessionHandle>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, session))
}

async fn send_event(
    sender: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    match serde_json::to_string(event) {
        Ok(json) => sender.send(Message::Text(json.into())).await,
        Err(e) => {
            error!("Failed to serialize {}: {}", event.name(), e);
            Ok(())
        }
    }
}

async fn handle_socket(socket: WebSocket, session: SessionHandle) {
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerEvent>();

    let peer_id = match session.open(tx).await {
        Ok(Some(peer_id)) => peer_id,
        Ok(None) => {
            // Flush the refusal, then hang up.
            while let Some(event) = rx.recv().await {
                if send_event(&mut sender, &event).await.is_err() {
                    break;
                }
            }
            let _ = sender.send(Message::Close(None)).await;
            return;
        }
        Err(e) => {
            error!("Cannot open channel: {}", e);
            return;
        }
    };

    info!("New WebSocket connection: {}", peer_id);

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            if send_event(&mut sender, &event).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let session = session.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                        Ok(message) => {
                            if let Err(e) = session.dispatch(peer_id, message).await {
                                error!("Coordinator died: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid message from {}: {}", peer_id, e),
                    },
                    Message::Close(_) => break,
                    other => debug!("Ignoring non-text frame from {}: {:?}", peer_id, other),
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    if let Err(e) = session.close(peer_id).await {
        error!("Failed to release {}: {}", peer_id, e);
    }
    info!("WebSocket disconnected: {}", peer_id);
}
