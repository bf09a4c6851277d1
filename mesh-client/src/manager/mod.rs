use mesh_core::{ParticipantId, SignalMessage};
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::info;

use crate::engine::{EngineEvent, PeerConnector};
use crate::error::ClientError;
use crate::events::SessionEvent;
use crate::session::NegotiationSession;
use crate::transport::TransportEvent;

mod handle_engine_event_impl;
mod handle_signal_impl;
mod negotiate_impl;
mod teardown_impl;

/// Requests from the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCommand {
    EndCall,
}

enum Wake {
    Transport(Option<TransportEvent>),
    Engine(EngineEvent),
    Command(Option<ClientCommand>),
}

/// Keeps one negotiation session per remote member and drives each of them from
/// relay messages and engine signals.
///
/// Every handler runs to completion before the next event is taken, so sessions
/// are never mutated concurrently.
pub struct PeerSessionManager<C: PeerConnector> {
    local_id: Option<ParticipantId>,
    display_name: String,
    connector: C,
    sessions: HashMap<ParticipantId, NegotiationSession<C::Link>>,
    outbound: mpsc::UnboundedSender<SignalMessage>,
    events: mpsc::UnboundedSender<SessionEvent>,
    engine_tx: mpsc::UnboundedSender<EngineEvent>,
    engine_rx: mpsc::UnboundedReceiver<EngineEvent>,
}

impl<C: PeerConnector> PeerSessionManager<C> {
    pub fn new(
        connector: C,
        display_name: impl Into<String>,
        outbound: mpsc::UnboundedSender<SignalMessage>,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        let (engine_tx, engine_rx) = mpsc::unbounded_channel();
        Self {
            local_id: None,
            display_name: display_name.into(),
            connector,
            sessions: HashMap::new(),
            outbound,
            events,
            engine_tx,
            engine_rx,
        }
    }

    /// Identity assigned by the server, once `Welcome` has arrived.
    pub fn local_id(&self) -> Option<&ParticipantId> {
        self.local_id.as_ref()
    }

    pub fn session(&self, remote: &ParticipantId) -> Option<&NegotiationSession<C::Link>> {
        self.sessions.get(remote)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Takes the next engine signal that is already queued, if any.
    pub fn try_next_engine_event(&mut self) -> Option<EngineEvent> {
        self.engine_rx.try_recv().ok()
    }

    /// Runs until the call ends. Returns `Ok(())` for a user-initiated end of call.
    pub async fn run(
        mut self,
        mut transport_rx: mpsc::UnboundedReceiver<TransportEvent>,
        mut command_rx: mpsc::UnboundedReceiver<ClientCommand>,
    ) -> Result<(), ClientError> {
        let mut commands_open = true;

        loop {
            let wake = tokio::select! {
                ev = transport_rx.recv() => Wake::Transport(ev),
                Some(ev) = self.engine_rx.recv() => Wake::Engine(ev),
                cmd = command_rx.recv(), if commands_open => Wake::Command(cmd),
            };

            match wake {
                Wake::Transport(Some(TransportEvent::Signal(msg))) => self.handle_signal(msg).await?,
                Wake::Transport(Some(TransportEvent::Error(reason))) => {
                    return Err(self.transport_lost(reason).await);
                }
                Wake::Transport(Some(TransportEvent::Closed) | None) => {
                    return Err(self.transport_lost("signaling connection closed".into()).await);
                }
                Wake::Engine(ev) => self.handle_engine_event(ev).await,
                Wake::Command(Some(ClientCommand::EndCall)) => {
                    self.end_call().await;
                    return Ok(());
                }
                Wake::Command(None) => {
                    info!("Command channel closed");
                    commands_open = false;
                }
            }
        }
    }

    fn emit(&self, event: SessionEvent) {
        let _ = self.events.send(event);
    }
}
