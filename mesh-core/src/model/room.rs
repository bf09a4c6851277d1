use crate::model::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// Hard limit on concurrent room members.
pub const ROOM_CAPACITY: usize = 6;

/// Identity and display name of one room member, as carried in membership snapshots.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberInfo {
    pub id: ParticipantId,
    pub display_name: String,
}

impl MemberInfo {
    pub fn new(id: ParticipantId, display_name: impl Into<String>) -> Self {
        Self {
            id,
            display_name: display_name.into(),
        }
    }
}

pub fn room_full_message(capacity: usize) -> String {
    format!("Meeting is full (max {} participants)", capacity)
}
