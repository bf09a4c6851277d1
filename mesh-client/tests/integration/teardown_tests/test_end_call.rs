use mesh_client::{ClientCommand, ClientError, PeerSessionManager, SessionEvent, TransportEvent};
use mesh_core::{MemberInfo, SignalMessage};
use tokio::sync::mpsc;

use crate::integration::init_tracing;
use crate::utils::{MockConnector, settle};

struct Running {
    connector: MockConnector,
    transport_tx: mpsc::UnboundedSender<TransportEvent>,
    command_tx: mpsc::UnboundedSender<ClientCommand>,
    outbound_rx: mpsc::UnboundedReceiver<SignalMessage>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    handle: tokio::task::JoinHandle<Result<(), ClientError>>,
}

fn spawn_manager(local: &str) -> Running {
    let connector = MockConnector::new(local);
    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let (transport_tx, transport_rx) = mpsc::unbounded_channel();
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let manager = PeerSessionManager::new(connector.clone(), "alice", outbound_tx, events_tx);
    let handle = tokio::spawn(manager.run(transport_rx, command_rx));

    Running {
        connector,
        transport_tx,
        command_tx,
        outbound_rx,
        events_rx,
        handle,
    }
}

fn start_call(running: &Running) {
    running
        .transport_tx
        .send(TransportEvent::Signal(SignalMessage::Welcome { id: "a".into() }))
        .unwrap();
    running
        .transport_tx
        .send(TransportEvent::Signal(SignalMessage::ExistingMembers {
            members: vec![MemberInfo::new("b".into(), "bob")],
        }))
        .unwrap();
}

#[tokio::test]
async fn test_end_call() {
    init_tracing();

    let mut running = spawn_manager("a");
    start_call(&running);
    settle().await;

    running.command_tx.send(ClientCommand::EndCall).unwrap();
    let res = running.handle.await.unwrap();
    settle().await;

    assert_eq!(res, Ok(()));
    assert!(running.connector.link_log("b").lock().unwrap().closed);
    assert!(running.connector.media_stopped());

    // The manager is gone, so is its outbound sender: the socket would close.
    let mut sent = Vec::new();
    while let Some(msg) = running.outbound_rx.recv().await {
        sent.push(msg);
    }
    assert!(matches!(sent[0], SignalMessage::Join { .. }));
    assert!(matches!(sent[1], SignalMessage::Offer { .. }));

    let mut events = Vec::new();
    while let Some(ev) = running.events_rx.recv().await {
        events.push(ev);
    }
    assert_eq!(events.last(), Some(&SessionEvent::CallEnded));
}

#[tokio::test]
async fn test_transport_closed_ends_with_error() {
    init_tracing();

    let mut running = spawn_manager("a");
    start_call(&running);
    running.transport_tx.send(TransportEvent::Closed).unwrap();

    let res = running.handle.await.unwrap();
    settle().await;

    assert!(matches!(res, Err(ClientError::Transport(_))));
    assert!(running.connector.link_log("b").lock().unwrap().closed);

    let mut events = Vec::new();
    while let Some(ev) = running.events_rx.recv().await {
        events.push(ev);
    }
    assert!(
        events
            .iter()
            .any(|e| matches!(e, SessionEvent::ConnectionError { .. }))
    );
}
