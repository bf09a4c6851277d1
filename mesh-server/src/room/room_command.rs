use mesh_core::{NegotiationEnvelope, ParticipantId};

/// Commands delivered to the room loop by the signaling endpoint.
#[derive(Debug)]
pub enum RoomCommand {
    /// A connection asked to join under `display_name`.
    Join {
        participant_id: ParticipantId,
        display_name: String,
    },

    /// An offer, answer or candidate sent by connection `participant_id`, to
    /// relay to `envelope.target`.
    Forward {
        participant_id: ParticipantId,
        envelope: NegotiationEnvelope,
    },

    /// The connection went away.
    Leave { participant_id: ParticipantId },
}
