use crate::model::participant::ParticipantId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnvelopeError {
    #[error("failed to encode {kind:?} payload: {source}")]
    Encode {
        kind: EnvelopeKind,
        source: serde_json::Error,
    },

    #[error("malformed {kind:?} payload: {source}")]
    Decode {
        kind: EnvelopeKind,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvelopeKind {
    Offer,
    Answer,
    Candidate,
}

/// A negotiation message routed by identity. The relay never looks inside `payload`.
#[derive(Debug, Clone, PartialEq)]
pub struct NegotiationEnvelope {
    pub kind: EnvelopeKind,
    pub sender: ParticipantId,
    pub target: ParticipantId,
    pub payload: serde_json::Value,
}

impl NegotiationEnvelope {
    pub fn description(
        sender: ParticipantId,
        target: ParticipantId,
        description: &SessionDescription,
    ) -> Result<Self, EnvelopeError> {
        let kind = match description.kind {
            SdpKind::Offer => EnvelopeKind::Offer,
            SdpKind::Answer => EnvelopeKind::Answer,
        };
        let payload = serde_json::to_value(description)
            .map_err(|source| EnvelopeError::Encode { kind, source })?;

        Ok(Self {
            kind,
            sender,
            target,
            payload,
        })
    }

    pub fn candidate(
        sender: ParticipantId,
        target: ParticipantId,
        candidate: &IceCandidate,
    ) -> Result<Self, EnvelopeError> {
        let payload = serde_json::to_value(candidate).map_err(|source| EnvelopeError::Encode {
            kind: EnvelopeKind::Candidate,
            source,
        })?;

        Ok(Self {
            kind: EnvelopeKind::Candidate,
            sender,
            target,
            payload,
        })
    }

    pub fn decode_description(&self) -> Result<SessionDescription, EnvelopeError> {
        serde_json::from_value(self.payload.clone()).map_err(|source| EnvelopeError::Decode {
            kind: self.kind,
            source,
        })
    }

    pub fn decode_candidate(&self) -> Result<IceCandidate, EnvelopeError> {
        serde_json::from_value(self.payload.clone()).map_err(|source| EnvelopeError::Decode {
            kind: self.kind,
            source,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpKind {
    Offer,
    Answer,
}

/// Session description in the shape browsers produce with `toJSON()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpKind,
    pub sdp: String,
}

impl SessionDescription {
    pub fn offer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Offer,
            sdp: sdp.into(),
        }
    }

    pub fn answer(sdp: impl Into<String>) -> Self {
        Self {
            kind: SdpKind::Answer,
            sdp: sdp.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_mid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}
