use mesh_core::ParticipantId;

use crate::session::ConnectionState;

/// Notifications for the UI layer. Purely informational: nothing here feeds back
/// into negotiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The server assigned our identity.
    Welcomed { local_id: ParticipantId },

    PeerJoined {
        id: ParticipantId,
        display_name: String,
    },

    /// A placeholder name was replaced by the real one.
    PeerRenamed {
        id: ParticipantId,
        display_name: String,
    },

    ConnectionStateChanged {
        id: ParticipantId,
        state: ConnectionState,
    },

    RemoteTrack {
        id: ParticipantId,
        track_id: String,
        kind: String,
    },

    PeerLeft { id: ParticipantId },

    RoomFull { message: String },

    ConnectionError { reason: String },

    CallEnded,
}
