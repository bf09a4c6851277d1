use anyhow::Result;
use async_trait::async_trait;
use mesh_core::{IceCandidate, IceServerConfig, ParticipantId, SessionDescription};
use tokio::sync::mpsc;

use crate::session::ConnectionState;

mod rtc_connector;
mod rtc_link;

pub use rtc_connector::RtcConnector;
pub use rtc_link::RtcLink;

/// Asynchronous signals pushed by the engine for one remote participant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    CandidateDiscovered {
        remote: ParticipantId,
        candidate: IceCandidate,
    },
    StateChanged {
        remote: ParticipantId,
        state: ConnectionState,
    },
    /// Local tracks changed and the session needs a fresh offer/answer.
    NegotiationNeeded { remote: ParticipantId },
    RemoteTrack {
        remote: ParticipantId,
        track_id: String,
        kind: String,
    },
}

/// Factory for peer connections plus the local media they carry.
#[async_trait]
pub trait PeerConnector: Send + Sync {
    type Link: PeerLink + 'static;

    /// ICE servers for links created from now on.
    async fn set_ice_servers(&self, servers: Vec<IceServerConfig>);

    /// Creates a connection to `remote` with local media attached and all
    /// observers reporting into `events`.
    async fn connect(
        &self,
        remote: &ParticipantId,
        events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Result<Self::Link>;

    /// Drops the local tracks so links created afterwards carry no media. Live
    /// links keep their senders until they are closed.
    async fn stop_media(&self);
}

/// One peer connection.
#[async_trait]
pub trait PeerLink: Send + Sync {
    /// Creates an offer and applies it as the local description.
    async fn create_offer(&self) -> Result<SessionDescription>;

    /// Creates an answer and applies it as the local description.
    async fn create_answer(&self) -> Result<SessionDescription>;

    async fn apply_remote(&self, description: SessionDescription) -> Result<()>;

    async fn add_candidate(&self, candidate: IceCandidate) -> Result<()>;

    async fn close(&self) -> Result<()>;
}
