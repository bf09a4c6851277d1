use crate::room::registry::RoomRegistry;
use crate::room::room_command::RoomCommand;
use crate::signaling::SignalingOutput;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Owns the registry and applies commands strictly one after another, so the
/// membership table never needs a lock.
pub struct Room {
    registry: RoomRegistry,
    command_rx: mpsc::Receiver<RoomCommand>,
}

impl Room {
    pub fn new(command_rx: mpsc::Receiver<RoomCommand>, signaling: Arc<dyn SignalingOutput>) -> Self {
        Self {
            registry: RoomRegistry::new(signaling),
            command_rx,
        }
    }

    pub fn with_registry(command_rx: mpsc::Receiver<RoomCommand>, registry: RoomRegistry) -> Self {
        Self {
            registry,
            command_rx,
        }
    }

    pub async fn run(mut self) {
        info!("Room event loop started");

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd).await;
        }

        info!("Command channel closed. Room event loop finished");
    }

    async fn handle_command(&mut self, cmd: RoomCommand) {
        match cmd {
            RoomCommand::Join {
                participant_id,
                display_name,
            } => {
                if let Err(e) = self.registry.join(participant_id.clone(), display_name).await {
                    info!("Join from {} refused: {}", participant_id, e);
                }
            }

            RoomCommand::Forward {
                participant_id,
                envelope,
            } => {
                self.registry.forward(&participant_id, envelope).await;
            }

            RoomCommand::Leave { participant_id } => {
                if !self.registry.leave(&participant_id).await {
                    debug!("Leave for non-member {} ignored", participant_id);
                }
            }
        }
    }
}
