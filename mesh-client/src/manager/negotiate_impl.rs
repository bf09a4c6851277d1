use mesh_core::{EnvelopeError, NegotiationEnvelope, ParticipantId, SignalMessage};
use tracing::{debug, info, warn};

use crate::engine::{PeerConnector, PeerLink};
use crate::events::SessionEvent;
use crate::manager::PeerSessionManager;
use crate::session::NegotiationSession;

pub(super) enum SessionSlot {
    Created,
    Existing,
    Failed,
}

impl<C: PeerConnector> PeerSessionManager<C> {
    /// Get-or-create. A new session starts connecting right away.
    pub(super) async fn ensure_session(
        &mut self,
        remote: &ParticipantId,
        display_name: Option<&str>,
    ) -> SessionSlot {
        if self.sessions.contains_key(remote) {
            return SessionSlot::Existing;
        }

        let link = match self.connector.connect(remote, self.engine_tx.clone()).await {
            Ok(link) => link,
            Err(e) => {
                warn!("Could not create a connection to {}: {:#}", remote, e);
                return SessionSlot::Failed;
            }
        };

        let mut session = NegotiationSession::new(remote.clone(), display_name, link);
        session.start_connecting();
        info!("Session with {} ({}) created", remote, session.display_name());
        self.emit(SessionEvent::PeerJoined {
            id: remote.clone(),
            display_name: session.display_name().to_owned(),
        });
        self.sessions.insert(remote.clone(), session);
        SessionSlot::Created
    }

    /// Sends an offer if this side is the elected initiator and no offer is
    /// outstanding. Shared by the first negotiation and every renegotiation.
    pub(super) async fn offer_to(&mut self, remote: &ParticipantId) {
        let Some(local) = self.local_id.clone() else {
            return;
        };
        let Some(session) = self.sessions.get_mut(remote) else {
            return;
        };
        if !session.may_offer(&local) {
            debug!("Not offering to {}, waiting for theirs", remote);
            return;
        }

        let offer = match session.link().create_offer().await {
            Ok(offer) => offer,
            Err(e) => {
                warn!("Failed to create offer for {}: {:#}", remote, e);
                return;
            }
        };
        session.record_local_offer(offer.clone());

        debug!("Offering to {}", remote);
        self.send_envelope(NegotiationEnvelope::description(
            local,
            remote.clone(),
            &offer,
        ));
    }

    /// Inbound offers are answered whatever the election says; an offer may also
    /// arrive before the membership notice.
    pub(super) async fn answer_offer(&mut self, envelope: NegotiationEnvelope) {
        let remote = envelope.sender.clone();
        let offer = match envelope.decode_description() {
            Ok(offer) => offer,
            Err(e) => {
                warn!("Offer from {} dropped: {}", remote, e);
                return;
            }
        };

        if matches!(
            self.ensure_session(&remote, None).await,
            SessionSlot::Failed
        ) {
            return;
        }
        let Some(session) = self.sessions.get_mut(&remote) else {
            return;
        };

        if let Err(e) = session.link().apply_remote(offer.clone()).await {
            warn!("Failed to apply offer from {}: {:#}", remote, e);
            return;
        }
        session.record_remote(offer);
        session.apply_pending_candidates().await;

        let answer = match session.link().create_answer().await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Failed to create answer for {}: {:#}", remote, e);
                return;
            }
        };
        session.record_local_answer(answer.clone());

        let Some(local) = self.local_id.clone() else {
            return;
        };
        debug!("Answering {}", remote);
        self.send_envelope(NegotiationEnvelope::description(local, remote.clone(), &answer));
        self.resume_renegotiation(&remote).await;
    }

    pub(super) async fn accept_answer(&mut self, envelope: NegotiationEnvelope) {
        let remote = &envelope.sender;
        let Some(session) = self.sessions.get_mut(remote) else {
            debug!("Dropping answer from unknown {}", remote);
            return;
        };
        if !session.awaiting_answer() {
            debug!("Dropping unexpected answer from {}", remote);
            return;
        }

        let answer = match envelope.decode_description() {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Answer from {} dropped: {}", remote, e);
                return;
            }
        };
        if let Err(e) = session.link().apply_remote(answer.clone()).await {
            warn!("Failed to apply answer from {}: {:#}", remote, e);
            return;
        }
        session.record_remote(answer);
        session.apply_pending_candidates().await;

        let remote = remote.clone();
        self.resume_renegotiation(&remote).await;
    }

    pub(super) async fn add_remote_candidate(&mut self, envelope: NegotiationEnvelope) {
        let remote = &envelope.sender;
        let Some(session) = self.sessions.get_mut(remote) else {
            debug!("Dropping candidate from unknown {}", remote);
            return;
        };

        let candidate = match envelope.decode_candidate() {
            Ok(candidate) => candidate,
            Err(e) => {
                warn!("Candidate from {} dropped: {}", remote, e);
                return;
            }
        };

        if session.remote_description().is_none() {
            session.queue_candidate(candidate);
            return;
        }
        if let Err(e) = session.link().add_candidate(candidate).await {
            warn!("ICE candidate from {} rejected: {:#}", remote, e);
        }
    }

    pub(super) fn send_envelope(&self, envelope: Result<NegotiationEnvelope, EnvelopeError>) {
        match envelope {
            Ok(envelope) => {
                let _ = self.outbound.send(SignalMessage::from(envelope));
            }
            Err(e) => warn!("Could not encode outgoing envelope: {}", e),
        }
    }
}
