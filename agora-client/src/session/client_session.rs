use crate::ClientError;
use crate::manager::{ClientEvent, ConnectionManager};
use crate::transport::{ConnectionHandle, MediaTransport};
use agora_core::{ClientMessage, MovePayload, Position, Rotation, ServerEvent};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

/// A participant's connection to the coordinator.
///
/// Frames from the coordinator and events from the media transport are both
/// fed into one [`ConnectionManager`], owned by a single driver task.
pub struct ClientSession {
    outbound: mpsc::UnboundedSender<ClientMessage>,
    writer: JoinHandle<()>,
    driver: JoinHandle<()>,
}

impl ClientSession {
    pub async fn connect<T>(
        url: &str,
        transport: T,
    ) -> Result<(Self, mpsc::UnboundedReceiver<ClientEvent>), ClientError>
    where
        T: MediaTransport + 'static,
        T::Handle: ConnectionHandle + 'static,
    {
        let (ws_stream, _) = connect_async(url).await?;
        info!("Connected to coordinator at {}", url);
        let (mut ws_write, mut ws_read) = ws_stream.split();

        let (outbound_tx, mut outbound_rx) = mpsc::unbounded_channel::<ClientMessage>();
        let (transport_tx, mut transport_rx) = mpsc::unbounded_channel();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let writer = tokio::spawn(async move {
            while let Some(message) = outbound_rx.recv().await {
                let text = match serde_json::to_string(&message) {
                    Ok(text) => text,
                    Err(e) => {
                        warn!("Failed to serialize outgoing message: {}", e);
                        continue;
                    }
                };
                if ws_write.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }
            let _ = ws_write.send(Message::Close(None)).await;
        });

        let mut manager =
            ConnectionManager::new(transport, transport_tx, outbound_tx.clone(), events_tx);

        let driver = tokio::spawn(async move {
            loop {
                tokio::select! {
                    frame = ws_read.next() => match frame {
                        Some(Ok(Message::Text(text))) => {
                            match serde_json::from_str::<ServerEvent>(&text) {
                                Ok(event) => {
                                    if let Err(e) = manager.handle_server_event(event) {
                                        warn!("Failed to apply coordinator event: {}", e);
                                    }
                                }
                                Err(e) => warn!("Invalid frame from coordinator: {}", e),
                            }
                        }
                        Some(Ok(Message::Close(_))) | None => {
                            info!("Coordinator closed the connection");
                            break;
                        }
                        Some(Ok(other)) => debug!("Ignoring frame: {:?}", other),
                        Some(Err(e)) => {
                            warn!("WebSocket error: {}", e);
                            break;
                        }
                    },

                    Some(event) = transport_rx.recv() => {
                        if let Err(e) = manager.handle_transport_event(event) {
                            warn!("{}", e);
                        }
                    }
                }
            }
        });

        Ok((
            Self {
                outbound: outbound_tx,
                writer,
                driver,
            },
            events_rx,
        ))
    }

    pub fn send_move(&self, position: Position, rotation: Rotation) -> Result<(), ClientError> {
        self.send(ClientMessage::Move(MovePayload { position, rotation }))
    }

    pub fn send_transcript(&self, text: impl Into<String>) -> Result<(), ClientError> {
        self.send(ClientMessage::Transcript(text.into()))
    }

    pub fn send_chat(&self, data: serde_json::Value) -> Result<(), ClientError> {
        self.send(ClientMessage::Msg(data))
    }

    fn send(&self, message: ClientMessage) -> Result<(), ClientError> {
        self.outbound
            .send(message)
            .map_err(|_| ClientError::Disconnected)
    }

    /// Stops handling events, then flushes pending messages and closes the socket.
    pub async fn close(self) {
        self.driver.abort();
        let _ = self.driver.await;
        drop(self.outbound);
        let _ = self.writer.await;
    }
}
