use mesh_core::{NegotiationEnvelope, ParticipantId, is_initiator};
use tracing::{debug, info};

use crate::engine::{EngineEvent, PeerConnector};
use crate::events::SessionEvent;
use crate::manager::PeerSessionManager;
use crate::session::NegotiationState;

impl<C: PeerConnector> PeerSessionManager<C> {
    pub async fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::CandidateDiscovered { remote, candidate } => {
                let Some(local) = self.local_id.clone() else {
                    return;
                };
                if !self.sessions.contains_key(&remote) {
                    debug!("Dropping local candidate for closed session {}", remote);
                    return;
                }
                self.send_envelope(NegotiationEnvelope::candidate(local, remote, &candidate));
            }

            EngineEvent::StateChanged { remote, state } => {
                let Some(session) = self.sessions.get_mut(&remote) else {
                    return;
                };
                let connected = session.update_connection_state(state);
                self.emit(SessionEvent::ConnectionStateChanged {
                    id: remote.clone(),
                    state,
                });
                if connected {
                    info!("Connected to {}", remote);
                    self.resume_renegotiation(&remote).await;
                }
            }

            EngineEvent::NegotiationNeeded { remote } => self.renegotiate(&remote).await,

            EngineEvent::RemoteTrack {
                remote,
                track_id,
                kind,
            } => {
                if !self.sessions.contains_key(&remote) {
                    return;
                }
                info!("Remote {} track {} from {}", kind, track_id, remote);
                self.emit(SessionEvent::RemoteTrack {
                    id: remote,
                    track_id,
                    kind,
                });
            }
        }
    }

    /// Only the elected side acts. A request that arrives while an exchange is in
    /// flight is held until the session is connected with no offer outstanding;
    /// one that arrives before any description was made is covered by the first
    /// offer.
    async fn renegotiate(&mut self, remote: &ParticipantId) {
        let Some(local) = self.local_id.clone() else {
            return;
        };
        if !is_initiator(&local, remote) {
            debug!("Negotiation request for {} left to the remote side", remote);
            return;
        }
        let Some(session) = self.sessions.get_mut(remote) else {
            return;
        };

        match session.state() {
            NegotiationState::Connected if !session.awaiting_answer() => {
                self.offer_to(remote).await;
            }
            NegotiationState::Connecting | NegotiationState::Connected
                if session.local_description().is_some() =>
            {
                debug!("Deferring renegotiation with {}", remote);
                session.defer_renegotiation();
            }
            _ => debug!("Ignoring negotiation request for {} before first offer", remote),
        }
    }

    /// Runs a deferred renegotiation once the session can take it.
    pub(super) async fn resume_renegotiation(&mut self, remote: &ParticipantId) {
        let ready = self
            .sessions
            .get_mut(remote)
            .is_some_and(|s| s.take_deferred_renegotiation());
        if ready {
            debug!("Resuming deferred renegotiation with {}", remote);
            self.offer_to(remote).await;
        }
    }
}
