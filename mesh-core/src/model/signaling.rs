use crate::model::envelope::{EnvelopeKind, NegotiationEnvelope};
use crate::model::participant::ParticipantId;
use crate::model::room::MemberInfo;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IceServerConfig {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

impl IceServerConfig {
    pub fn stun(url: impl Into<String>) -> Self {
        Self {
            urls: vec![url.into()],
            username: None,
            credential: None,
        }
    }
}

/// Everything that travels over the signaling socket, in both directions.
///
/// Encoded as `{"op": "<Variant>", "d": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", content = "d")]
pub enum SignalMessage {
    /// Identity assigned to the connection by the server.
    Welcome { id: ParticipantId },

    #[serde(rename_all = "camelCase")]
    IceConfig { ice_servers: Vec<IceServerConfig> },

    #[serde(rename_all = "camelCase")]
    Join { display_name: String },

    /// Snapshot sent to a new member: everyone who was already in the room.
    ExistingMembers { members: Vec<MemberInfo> },

    /// Sent to every other member; `members` lists all identities after the join.
    #[serde(rename_all = "camelCase")]
    NewMember {
        id: ParticipantId,
        display_name: String,
        members: Vec<ParticipantId>,
    },

    MemberLeft { id: ParticipantId },

    RoomFull { message: String },

    Offer {
        target: ParticipantId,
        sender: ParticipantId,
        description: serde_json::Value,
    },

    Answer {
        target: ParticipantId,
        sender: ParticipantId,
        description: serde_json::Value,
    },

    IceCandidate {
        target: ParticipantId,
        sender: ParticipantId,
        candidate: serde_json::Value,
    },
}

impl SignalMessage {
    /// Splits relay messages out as envelopes; any other message is handed back.
    pub fn into_envelope(self) -> Result<NegotiationEnvelope, SignalMessage> {
        let (kind, target, sender, payload) = match self {
            SignalMessage::Offer {
                target,
                sender,
                description,
            } => (EnvelopeKind::Offer, target, sender, description),
            SignalMessage::Answer {
                target,
                sender,
                description,
            } => (EnvelopeKind::Answer, target, sender, description),
            SignalMessage::IceCandidate {
                target,
                sender,
                candidate,
            } => (EnvelopeKind::Candidate, target, sender, candidate),
            other => return Err(other),
        };

        Ok(NegotiationEnvelope {
            kind,
            sender,
            target,
            payload,
        })
    }
}

impl From<NegotiationEnvelope> for SignalMessage {
    fn from(envelope: NegotiationEnvelope) -> Self {
        let NegotiationEnvelope {
            kind,
            sender,
            target,
            payload,
        } = envelope;

        match kind {
            EnvelopeKind::Offer => SignalMessage::Offer {
                target,
                sender,
                description: payload,
            },
            EnvelopeKind::Answer => SignalMessage::Answer {
                target,
                sender,
                description: payload,
            },
            EnvelopeKind::Candidate => SignalMessage::IceCandidate {
                target,
                sender,
                candidate: payload,
            },
        }
    }
}
