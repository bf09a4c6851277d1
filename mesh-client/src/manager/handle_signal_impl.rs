use mesh_core::{EnvelopeKind, NegotiationEnvelope, ParticipantId, SignalMessage};
use tracing::{debug, info};

use crate::engine::PeerConnector;
use crate::error::ClientError;
use crate::events::SessionEvent;
use crate::manager::PeerSessionManager;
use crate::manager::negotiate_impl::SessionSlot;

impl<C: PeerConnector> PeerSessionManager<C> {
    /// Applies one relay message. Only `RoomFull` is an error; it ends the call.
    pub async fn handle_signal(&mut self, msg: SignalMessage) -> Result<(), ClientError> {
        let msg = match msg.into_envelope() {
            Ok(envelope) => {
                self.handle_envelope(envelope).await;
                return Ok(());
            }
            Err(msg) => msg,
        };

        match msg {
            SignalMessage::Welcome { id } => {
                info!("Assigned identity {}", id);
                self.local_id = Some(id.clone());
                self.emit(SessionEvent::Welcomed { local_id: id });
                let _ = self.outbound.send(SignalMessage::Join {
                    display_name: self.display_name.clone(),
                });
            }

            SignalMessage::IceConfig { ice_servers } => {
                self.connector.set_ice_servers(ice_servers).await;
            }

            SignalMessage::ExistingMembers { members } => {
                info!("{} members already present", members.len());
                for member in members {
                    self.discover(member.id, &member.display_name).await;
                }
            }

            SignalMessage::NewMember {
                id, display_name, ..
            } => {
                self.discover(id, &display_name).await;
            }

            SignalMessage::MemberLeft { id } => self.member_left(&id),

            SignalMessage::RoomFull { message } => return Err(self.room_full(message).await),

            other => debug!("Ignoring unexpected {:?}", other),
        }
        Ok(())
    }

    async fn discover(&mut self, remote: ParticipantId, display_name: &str) {
        if self.local_id.as_ref() == Some(&remote) {
            return;
        }

        match self.ensure_session(&remote, Some(display_name)).await {
            SessionSlot::Created => self.offer_to(&remote).await,
            SessionSlot::Existing => {
                let renamed = self
                    .sessions
                    .get_mut(&remote)
                    .is_some_and(|s| s.refresh_display_name(display_name));
                if renamed {
                    self.emit(SessionEvent::PeerRenamed {
                        id: remote,
                        display_name: display_name.to_owned(),
                    });
                }
            }
            SessionSlot::Failed => {}
        }
    }

    async fn handle_envelope(&mut self, envelope: NegotiationEnvelope) {
        if self.local_id.as_ref() != Some(&envelope.target) {
            debug!(
                "Dropping {:?} for {} (not us)",
                envelope.kind, envelope.target
            );
            return;
        }

        match envelope.kind {
            EnvelopeKind::Offer => self.answer_offer(envelope).await,
            EnvelopeKind::Answer => self.accept_answer(envelope).await,
            EnvelopeKind::Candidate => self.add_remote_candidate(envelope).await,
        }
    }
}
