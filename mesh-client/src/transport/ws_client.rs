use futures::{SinkExt, StreamExt};
use mesh_core::SignalMessage;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, info, warn};

use crate::error::ClientError;
use crate::transport::{SignalingChannel, TransportEvent};

/// Opens the signaling socket and spawns its reader and writer tasks.
pub async fn connect(url: &str) -> Result<SignalingChannel, ClientError> {
    let (ws_stream, _) = connect_async(url)
        .await
        .map_err(|e| ClientError::Transport(e.to_string()))?;
    info!("Connected to signaling server {}", url);

    let (mut sender, mut receiver) = ws_stream.split();
    let (out_tx, mut out_rx) = mpsc::unbounded_channel::<SignalMessage>();
    let (in_tx, in_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(msg) = out_rx.recv().await {
            let text = match serde_json::to_string(&msg) {
                Ok(text) => text,
                Err(e) => {
                    error!("Failed to serialize signal message: {}", e);
                    continue;
                }
            };
            if let Err(e) = sender.send(Message::Text(text.into())).await {
                error!("Signaling send failed: {}", e);
                return;
            }
        }
        debug!("Outbound channel dropped, closing socket");
        let _ = sender.send(Message::Close(None)).await;
    });

    tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => match serde_json::from_str::<SignalMessage>(&text) {
                    Ok(signal) => {
                        if in_tx.send(TransportEvent::Signal(signal)).is_err() {
                            return;
                        }
                    }
                    Err(e) => warn!("Invalid SignalMessage from server: {:?}", e),
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    let _ = in_tx.send(TransportEvent::Error(e.to_string()));
                    return;
                }
            }
        }
        let _ = in_tx.send(TransportEvent::Closed);
    });

    Ok(SignalingChannel {
        outbound: out_tx,
        inbound: in_rx,
    })
}
