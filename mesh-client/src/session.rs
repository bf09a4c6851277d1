use mesh_core::utils::PLACEHOLDER_DISPLAY_NAME;
use mesh_core::{IceCandidate, ParticipantId, SessionDescription, is_initiator};
use tracing::{debug, warn};

use crate::engine::PeerLink;

/// Negotiation progress with one remote participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationState {
    Idle,
    Connecting,
    Connected,
    Closed,
}

/// Coarse connection state as reported by the peer-connection engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

/// One direct session with a remote participant. Owns its link exclusively.
pub struct NegotiationSession<L> {
    remote_id: ParticipantId,
    display_name: String,
    link: L,
    state: NegotiationState,
    connection_state: ConnectionState,
    awaiting_answer: bool,
    local_description: Option<SessionDescription>,
    remote_description: Option<SessionDescription>,
    pending_candidates: Vec<IceCandidate>,
    renegotiation_pending: bool,
}

impl<L: PeerLink> NegotiationSession<L> {
    pub fn new(remote_id: ParticipantId, display_name: Option<&str>, link: L) -> Self {
        Self {
            remote_id,
            display_name: display_name.unwrap_or(PLACEHOLDER_DISPLAY_NAME).to_owned(),
            link,
            state: NegotiationState::Idle,
            connection_state: ConnectionState::New,
            awaiting_answer: false,
            local_description: None,
            remote_description: None,
            pending_candidates: Vec::new(),
            renegotiation_pending: false,
        }
    }

    pub fn remote_id(&self) -> &ParticipantId {
        &self.remote_id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn state(&self) -> NegotiationState {
        self.state
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection_state
    }

    pub fn awaiting_answer(&self) -> bool {
        self.awaiting_answer
    }

    pub fn local_description(&self) -> Option<&SessionDescription> {
        self.local_description.as_ref()
    }

    pub fn remote_description(&self) -> Option<&SessionDescription> {
        self.remote_description.as_ref()
    }

    pub fn pending_candidates(&self) -> usize {
        self.pending_candidates.len()
    }

    pub fn renegotiation_pending(&self) -> bool {
        self.renegotiation_pending
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    /// Replaces the placeholder name. Returns `true` if the name changed.
    pub fn refresh_display_name(&mut self, display_name: &str) -> bool {
        if self.display_name == PLACEHOLDER_DISPLAY_NAME && display_name != PLACEHOLDER_DISPLAY_NAME {
            self.display_name = display_name.to_owned();
            return true;
        }
        false
    }

    pub fn start_connecting(&mut self) {
        if self.state == NegotiationState::Idle {
            self.state = NegotiationState::Connecting;
        }
    }

    /// The single offer rule shared by the initial negotiation and every later
    /// renegotiation: only the elected side offers, one offer at a time.
    pub fn may_offer(&self, local_id: &ParticipantId) -> bool {
        is_initiator(local_id, &self.remote_id)
            && !self.awaiting_answer
            && matches!(
                self.state,
                NegotiationState::Connecting | NegotiationState::Connected
            )
    }

    /// Holds a renegotiation request that arrived while an exchange was still in
    /// flight.
    pub(crate) fn defer_renegotiation(&mut self) {
        self.renegotiation_pending = true;
    }

    /// Consumes a deferred renegotiation once the session is connected and has no
    /// offer outstanding.
    pub(crate) fn take_deferred_renegotiation(&mut self) -> bool {
        if self.renegotiation_pending
            && self.state == NegotiationState::Connected
            && !self.awaiting_answer
        {
            self.renegotiation_pending = false;
            return true;
        }
        false
    }

    pub(crate) fn record_local_offer(&mut self, offer: SessionDescription) {
        self.local_description = Some(offer);
        self.awaiting_answer = true;
    }

    pub(crate) fn record_local_answer(&mut self, answer: SessionDescription) {
        self.local_description = Some(answer);
    }

    pub(crate) fn record_remote(&mut self, description: SessionDescription) {
        self.remote_description = Some(description);
        self.awaiting_answer = false;
    }

    pub(crate) fn queue_candidate(&mut self, candidate: IceCandidate) {
        self.pending_candidates.push(candidate);
    }

    /// Applies candidates that arrived before the remote description.
    pub(crate) async fn apply_pending_candidates(&mut self) {
        for candidate in std::mem::take(&mut self.pending_candidates) {
            if let Err(e) = self.link.add_candidate(candidate).await {
                warn!("Queued ICE candidate for {} rejected: {:#}", self.remote_id, e);
            }
        }
    }

    /// Records an engine-reported state. Returns `true` when this completes the
    /// negotiation.
    pub(crate) fn update_connection_state(&mut self, state: ConnectionState) -> bool {
        self.connection_state = state;
        if state == ConnectionState::Closed {
            self.state = NegotiationState::Closed;
            return false;
        }
        if state == ConnectionState::Connected && self.state == NegotiationState::Connecting {
            self.state = NegotiationState::Connected;
            debug!("Session with {} connected", self.remote_id);
            return true;
        }
        false
    }

    /// Discards the session, handing back the link for release.
    pub(crate) fn into_link(self) -> L {
        self.link
    }
}
