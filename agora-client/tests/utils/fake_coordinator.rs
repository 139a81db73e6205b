use agora_core::{ClientMessage, ServerEvent};
use anyhow::{Context, Result, bail};
use futures::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{WebSocketStream, accept_async};

/// Bare websocket listener playing the coordinator's side by hand.
pub struct FakeCoordinator {
    listener: TcpListener,
}

impl FakeCoordinator {
    pub async fn bind() -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        Ok(Self { listener })
    }

    pub fn url(&self) -> Result<String> {
        Ok(format!("ws://{}", self.listener.local_addr()?))
    }

    pub async fn accept(&self) -> Result<FakeChannel> {
        let (stream, _) = self.listener.accept().await?;
        let ws = accept_async(stream).await?;
        Ok(FakeChannel { ws })
    }
}

pub struct FakeChannel {
    ws: WebSocketStream<TcpStream>,
}

impl FakeChannel {
    pub async fn push(&mut self, event: &ServerEvent) -> Result<()> {
        let json = serde_json::to_string(event)?;
        self.ws.send(Message::Text(json.into())).await?;
        Ok(())
    }

    pub async fn next_message(&mut self) -> Result<ClientMessage> {
        let frame = tokio::time::timeout(Duration::from_secs(2), self.ws.next())
            .await
            .context("timed out waiting for a client frame")?
            .context("client hung up")??;

        match frame {
            Message::Text(text) => Ok(serde_json::from_str(&text)?),
            other => bail!("unexpected frame: {:?}", other),
        }
    }

    /// Waits for the client's close frame or the end of the stream.
    pub async fn expect_close(&mut self) -> Result<()> {
        let frame = tokio::time::timeout(Duration::from_secs(2), self.ws.next())
            .await
            .context("timed out waiting for the client to close")?;
        match frame {
            None | Some(Ok(Message::Close(_))) | Some(Err(_)) => Ok(()),
            Some(Ok(other)) => bail!("expected close, got {:?}", other),
        }
    }

    pub async fn hang_up(mut self) -> Result<()> {
        self.ws.close(None).await?;
        Ok(())
    }
}
