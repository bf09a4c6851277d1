use async_trait::async_trait;
use mesh_core::{ParticipantId, SignalMessage};

/// Outbound side of the signaling channel, as seen by the room.
///
/// Implementations must not wait for the recipient: a slow or dead client must
/// never stall the room loop.
#[async_trait]
pub trait SignalingOutput: Send + Sync {
    /// Deliver `msg` to one connection. Unknown connections are ignored.
    async fn send(&self, participant: &ParticipantId, msg: SignalMessage);

    /// Close the connection from the server side.
    async fn disconnect(&self, participant: &ParticipantId);
}
