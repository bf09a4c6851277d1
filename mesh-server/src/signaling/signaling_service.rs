use crate::room::RoomCommand;
use crate::signaling::SignalingOutput;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use mesh_core::{IceServerConfig, ParticipantId, SignalMessage};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

struct SignalingInner {
    connections: DashMap<ParticipantId, mpsc::UnboundedSender<Message>>,
    ice_servers: Vec<IceServerConfig>,
}

/// Open signaling connections, keyed by the identity assigned on accept.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
    pub(crate) room_cmd_tx: mpsc::Sender<RoomCommand>,
}

impl SignalingService {
    pub fn new(room_cmd_tx: mpsc::Sender<RoomCommand>, ice_servers: Vec<IceServerConfig>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                connections: DashMap::new(),
                ice_servers,
            }),
            room_cmd_tx,
        }
    }

    pub fn get_ice_servers(&self) -> Vec<IceServerConfig> {
        self.inner.ice_servers.clone()
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }

    pub fn add_connection(&self, participant_id: ParticipantId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.connections.insert(participant_id, tx);
    }

    pub fn remove_connection(&self, participant_id: &ParticipantId) {
        self.inner.connections.remove(participant_id);
    }

    pub fn send_signal(&self, participant_id: &ParticipantId, msg: &SignalMessage) {
        let Some(conn) = self.inner.connections.get(participant_id) else {
            debug!(
                "Attempted to send signal to disconnected participant {}",
                participant_id
            );
            return;
        };

        match serde_json::to_string(msg) {
            Ok(json) => {
                if let Err(e) = conn.send(Message::Text(json.into())) {
                    error!("Failed to queue WS message to {}: {:?}", participant_id, e);
                }
            }
            Err(e) => error!("Failed to serialize signal message: {}", e),
        }
    }

    /// Queues a close frame and forgets the connection. The writer task stops once
    /// the frame is flushed.
    pub fn close_connection(&self, participant_id: &ParticipantId) {
        let Some((_, conn)) = self.inner.connections.remove(participant_id) else {
            return;
        };
        let _ = conn.send(Message::Close(None));
    }
}

#[async_trait]
impl SignalingOutput for SignalingService {
    async fn send(&self, participant: &ParticipantId, msg: SignalMessage) {
        self.send_signal(participant, &msg);
    }

    async fn disconnect(&self, participant: &ParticipantId) {
        self.close_connection(participant);
    }
}
