use mesh_core::ParticipantId;
use tracing::{info, warn};

use crate::engine::{PeerConnector, PeerLink};
use crate::error::ClientError;
use crate::events::SessionEvent;
use crate::manager::PeerSessionManager;
use crate::session::NegotiationSession;

impl<C: PeerConnector> PeerSessionManager<C> {
    pub(super) fn member_left(&mut self, remote: &ParticipantId) {
        let Some(session) = self.sessions.remove(remote) else {
            return;
        };
        info!("{} left, closing session", remote);
        release(session);
        self.emit(SessionEvent::PeerLeft { id: remote.clone() });
    }

    async fn teardown(&mut self) {
        info!("Tearing down {} sessions", self.sessions.len());
        for (_, session) in self.sessions.drain() {
            release(session);
        }
        self.connector.stop_media().await;
    }

    pub(super) async fn end_call(&mut self) {
        self.teardown().await;
        self.emit(SessionEvent::CallEnded);
    }

    pub(super) async fn room_full(&mut self, message: String) -> ClientError {
        warn!("Room full: {}", message);
        self.teardown().await;
        self.emit(SessionEvent::RoomFull {
            message: message.clone(),
        });
        ClientError::RoomFull(message)
    }

    pub(super) async fn transport_lost(&mut self, reason: String) -> ClientError {
        warn!("Signaling lost: {}", reason);
        self.emit(SessionEvent::ConnectionError {
            reason: reason.clone(),
        });
        self.teardown().await;
        ClientError::Transport(reason)
    }
}

/// Closes the link in the background.
fn release<L: PeerLink + 'static>(session: NegotiationSession<L>) {
    let remote = session.remote_id().clone();
    let link = session.into_link();
    tokio::spawn(async move {
        if let Err(e) = link.close().await {
            warn!("Closing link to {} failed: {:#}", remote, e);
        }
    });
}
