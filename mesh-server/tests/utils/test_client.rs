use anyhow::{Context, Result};
use futures::{SinkExt, StreamExt};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use mesh_core::{IceServerConfig, ParticipantId, SignalMessage};

/// Timeout for a single frame from the server (ms).
pub const FRAME_TIMEOUT_MS: u64 = 3000;

/// A bare signaling client speaking JSON frames to a live server.
pub struct TestClient {
    /// Identity announced by the server in `Welcome`.
    pub id: ParticipantId,
    /// ICE servers announced in `IceConfig`.
    pub ice_servers: Vec<IceServerConfig>,
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Connect and consume the `Welcome` + `IceConfig` greeting.
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let url = format!("ws://{}/ws", addr);
        let (ws, _) = connect_async(url).await.context("WebSocket connect failed")?;
        let mut client = Self {
            id: ParticipantId::from(""),
            ice_servers: Vec::new(),
            ws,
        };

        match client.recv().await? {
            SignalMessage::Welcome { id } => client.id = id,
            other => anyhow::bail!("Expected Welcome, got {:?}", other),
        }
        match client.recv().await? {
            SignalMessage::IceConfig { ice_servers } => client.ice_servers = ice_servers,
            other => anyhow::bail!("Expected IceConfig, got {:?}", other),
        }

        Ok(client)
    }

    pub async fn send(&mut self, msg: &SignalMessage) -> Result<()> {
        let text = serde_json::to_string(msg)?;
        self.ws.send(Message::Text(text.into())).await?;
        Ok(())
    }

    pub async fn join(&mut self, display_name: &str) -> Result<()> {
        self.send(&SignalMessage::Join {
            display_name: display_name.to_string(),
        })
        .await
    }

    /// Next signaling message; fails on timeout or close.
    pub async fn recv(&mut self) -> Result<SignalMessage> {
        loop {
            let frame = tokio::time::timeout(Duration::from_millis(FRAME_TIMEOUT_MS), self.ws.next())
                .await
                .context("Timeout waiting for frame")?;
            match frame {
                Some(Ok(Message::Text(text))) => return Ok(serde_json::from_str(&text)?),
                Some(Ok(Message::Close(_))) | None => anyhow::bail!("Connection closed"),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Waits until the server closes the socket, skipping any remaining frames.
    pub async fn expect_closed(&mut self) -> Result<()> {
        loop {
            let frame = tokio::time::timeout(Duration::from_millis(FRAME_TIMEOUT_MS), self.ws.next())
                .await
                .context("Server did not close the connection")?;
            match frame {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return Ok(()),
                Some(Ok(_)) => continue,
            }
        }
    }

    /// Nothing arrives within `ms`.
    pub async fn expect_silence(&mut self, ms: u64) -> Result<()> {
        match tokio::time::timeout(Duration::from_millis(ms), self.ws.next()).await {
            Err(_) => Ok(()),
            Ok(frame) => anyhow::bail!("Unexpected frame: {:?}", frame),
        }
    }

    pub async fn close(mut self) -> Result<()> {
        self.ws.close(None).await?;
        Ok(())
    }
}
