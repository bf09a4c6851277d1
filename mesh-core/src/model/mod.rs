mod envelope;
mod participant;
mod room;
mod signaling;

pub use envelope::{
    EnvelopeError, EnvelopeKind, IceCandidate, NegotiationEnvelope, SdpKind, SessionDescription,
};
pub use participant::ParticipantId;
pub use room::{MemberInfo, ROOM_CAPACITY, room_full_message};
pub use signaling::{IceServerConfig, SignalMessage};
