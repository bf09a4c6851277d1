use crate::signaling::SignalingOutput;
use mesh_core::{
    MemberInfo, NegotiationEnvelope, ParticipantId, ROOM_CAPACITY, SignalMessage,
    room_full_message,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("room is full ({capacity} participants)")]
    RoomFull { capacity: usize },

    #[error("participant {0} has already joined")]
    AlreadyJoined(ParticipantId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipStatus {
    Active,
}

#[derive(Debug, Clone)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: String,
    pub status: MembershipStatus,
}

impl Participant {
    fn info(&self) -> MemberInfo {
        MemberInfo::new(self.id.clone(), self.display_name.clone())
    }
}

/// The room's membership table.
///
/// Mutated only through `join`/`leave`; every side effect goes out through the
/// `SignalingOutput`, which never waits on the recipient.
pub struct RoomRegistry {
    members: Vec<Participant>,
    capacity: usize,
    output: Arc<dyn SignalingOutput>,
}

impl RoomRegistry {
    pub fn new(output: Arc<dyn SignalingOutput>) -> Self {
        Self::with_capacity(output, ROOM_CAPACITY)
    }

    pub fn with_capacity(output: Arc<dyn SignalingOutput>, capacity: usize) -> Self {
        Self {
            members: Vec::with_capacity(capacity),
            capacity,
            output,
        }
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.members.iter().any(|p| &p.id == id)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn members(&self) -> Vec<MemberInfo> {
        self.members.iter().map(Participant::info).collect()
    }

    /// Admits `id` if there is room, announcing it to everyone already present and
    /// sending it the current membership snapshot.
    ///
    /// A rejected connection gets `RoomFull` and is disconnected.
    pub async fn join(
        &mut self,
        id: ParticipantId,
        display_name: String,
    ) -> Result<(), RegistryError> {
        if self.contains(&id) {
            warn!("Ignoring repeated join from {}", id);
            return Err(RegistryError::AlreadyJoined(id));
        }

        if self.members.len() >= self.capacity {
            info!(
                "Rejecting {} ({}): room full ({}/{})",
                id,
                display_name,
                self.members.len(),
                self.capacity
            );
            let msg = SignalMessage::RoomFull {
                message: room_full_message(self.capacity),
            };
            self.output.send(&id, msg).await;
            self.output.disconnect(&id).await;
            return Err(RegistryError::RoomFull {
                capacity: self.capacity,
            });
        }

        let snapshot = self.members();

        self.members.push(Participant {
            id: id.clone(),
            display_name: display_name.clone(),
            status: MembershipStatus::Active,
        });
        info!(
            "Participant {} ({}) joined, {}/{} present",
            id,
            display_name,
            self.members.len(),
            self.capacity
        );

        let all_ids: Vec<ParticipantId> = self.members.iter().map(|p| p.id.clone()).collect();
        for other in self.members.iter().filter(|p| p.id != id) {
            let msg = SignalMessage::NewMember {
                id: id.clone(),
                display_name: display_name.clone(),
                members: all_ids.clone(),
            };
            self.output.send(&other.id, msg).await;
        }

        self.output
            .send(&id, SignalMessage::ExistingMembers { members: snapshot })
            .await;

        Ok(())
    }

    /// Relays an envelope from connection `from` to its target. Returns `false`
    /// when the envelope is dropped: the claimed sender is not `from`, `from` is
    /// not a member, or the target is not a member any more (an expected race
    /// with `leave`).
    pub async fn forward(&self, from: &ParticipantId, envelope: NegotiationEnvelope) -> bool {
        if &envelope.sender != from {
            warn!(
                "Dropping {:?} from {} claiming to be {}",
                envelope.kind, from, envelope.sender
            );
            return false;
        }
        if !self.contains(from) {
            debug!("Dropping {:?} from non-member {}", envelope.kind, from);
            return false;
        }
        if !self.contains(&envelope.target) {
            debug!(
                "Dropping {:?} from {} to departed {}",
                envelope.kind, envelope.sender, envelope.target
            );
            return false;
        }

        debug!(
            "{:?} from {} to {}",
            envelope.kind, envelope.sender, envelope.target
        );
        let target = envelope.target.clone();
        self.output.send(&target, SignalMessage::from(envelope)).await;
        true
    }

    /// Removes `id` and tells the remaining members. Returns `false` if `id` was not
    /// a member, in which case nothing is broadcast.
    pub async fn leave(&mut self, id: &ParticipantId) -> bool {
        let Some(pos) = self.members.iter().position(|p| &p.id == id) else {
            return false;
        };
        let gone = self.members.remove(pos);
        info!(
            "Participant {} ({}) left, {}/{} present",
            gone.id,
            gone.display_name,
            self.members.len(),
            self.capacity
        );

        for other in &self.members {
            let msg = SignalMessage::MemberLeft { id: id.clone() };
            self.output.send(&other.id, msg).await;
        }
        true
    }
}
