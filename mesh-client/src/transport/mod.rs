mod ws_client;

pub use ws_client::*;

use mesh_core::SignalMessage;
use tokio::sync::mpsc;

/// What the signaling socket reports to the session manager.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Signal(SignalMessage),
    Closed,
    Error(String),
}

/// Both halves of an open signaling connection. Dropping `outbound` closes the
/// socket.
pub struct SignalingChannel {
    pub outbound: mpsc::UnboundedSender<SignalMessage>,
    pub inbound: mpsc::UnboundedReceiver<TransportEvent>,
}
