use mesh_client::{ConnectionState, EngineEvent, NegotiationState, SessionEvent};
use mesh_core::SignalMessage;

use crate::integration::init_tracing;
use crate::utils::{Peer, relay};

async fn connected_pair() -> (Peer, Peer) {
    let mut a = Peer::welcomed("a", "alice").await;
    let mut b = Peer::welcomed("b", "bob").await;
    b.existing(&[("a", "alice")]).await;
    a.new_member("b", "bob").await;
    relay(&mut a, &mut b).await;
    relay(&mut b, &mut a).await;

    for (peer, remote) in [(&mut a, "b"), (&mut b, "a")] {
        peer.connector.emit(EngineEvent::StateChanged {
            remote: remote.into(),
            state: ConnectionState::Connected,
        });
        peer.pump_engine().await;
        peer.events();
    }
    (a, b)
}

#[tokio::test]
async fn test_engine_connected_completes_session() {
    init_tracing();

    let (a, b) = connected_pair().await;
    assert_eq!(
        a.manager.session(&"b".into()).map(|s| s.state()),
        Some(NegotiationState::Connected)
    );
    assert_eq!(
        b.manager.session(&"a".into()).map(|s| s.connection_state()),
        Some(ConnectionState::Connected)
    );
}

#[tokio::test]
async fn test_renegotiation_from_elected_side() {
    init_tracing();

    let (mut a, mut b) = connected_pair().await;

    // The non-elected side stays quiet.
    b.connector.emit(EngineEvent::NegotiationNeeded { remote: "a".into() });
    b.pump_engine().await;
    assert!(b.sent().is_empty());

    a.connector.emit(EngineEvent::NegotiationNeeded { remote: "b".into() });
    a.pump_engine().await;
    let sent = a.sent();
    assert_eq!(sent.len(), 1);
    assert!(matches!(&sent[0], SignalMessage::Offer { description, .. } if description["sdp"] == "offer 2 from a"));

    // A second request while the offer is outstanding does not stack offers.
    a.connector.emit(EngineEvent::NegotiationNeeded { remote: "b".into() });
    a.pump_engine().await;
    assert!(a.sent().is_empty());
    assert!(a.manager.session(&"b".into()).unwrap().renegotiation_pending());

    b.signal(sent[0].clone()).await;
    relay(&mut b, &mut a).await;

    let a_log = a.connector.link_log("b");
    let b_log = b.connector.link_log("a");
    assert_eq!(b_log.lock().unwrap().remote.as_ref().map(|d| d.sdp.as_str()), Some("offer 2 from a"));
    assert_eq!(a_log.lock().unwrap().remote, b_log.lock().unwrap().local);
    assert_eq!(b_log.lock().unwrap().answers, 2);

    // The held request goes out once the answer is in.
    let follow_up = a.sent();
    assert_eq!(follow_up.len(), 1);
    assert!(matches!(&follow_up[0], SignalMessage::Offer { description, .. } if description["sdp"] == "offer 3 from a"));
    assert!(!a.manager.session(&"b".into()).unwrap().renegotiation_pending());
}

#[tokio::test]
async fn test_renegotiation_requested_while_ice_connecting() {
    init_tracing();

    let mut a = Peer::welcomed("a", "alice").await;
    let mut b = Peer::welcomed("b", "bob").await;
    b.existing(&[("a", "alice")]).await;
    a.new_member("b", "bob").await;
    relay(&mut a, &mut b).await;
    relay(&mut b, &mut a).await;

    // Descriptions are exchanged but the engine has not connected yet.
    a.connector.emit(EngineEvent::NegotiationNeeded { remote: "b".into() });
    a.pump_engine().await;
    assert!(a.sent().is_empty());
    assert_eq!(
        a.manager.session(&"b".into()).map(|s| s.state()),
        Some(NegotiationState::Connecting)
    );

    a.connector.emit(EngineEvent::StateChanged {
        remote: "b".into(),
        state: ConnectionState::Connected,
    });
    a.pump_engine().await;

    let sent = a.sent();
    assert_eq!(sent.len(), 1);
    assert!(matches!(&sent[0], SignalMessage::Offer { description, .. } if description["sdp"] == "offer 2 from a"));
    assert_eq!(a.connector.link_log("b").lock().unwrap().offers, 2);
}

#[tokio::test]
async fn test_renegotiation_request_on_non_elected_side_is_not_held() {
    init_tracing();

    let (_a, mut b) = {
        let mut a = Peer::welcomed("a", "alice").await;
        let mut b = Peer::welcomed("b", "bob").await;
        b.existing(&[("a", "alice")]).await;
        a.new_member("b", "bob").await;
        relay(&mut a, &mut b).await;
        relay(&mut b, &mut a).await;
        (a, b)
    };

    b.connector.emit(EngineEvent::NegotiationNeeded { remote: "a".into() });
    b.connector.emit(EngineEvent::StateChanged {
        remote: "a".into(),
        state: ConnectionState::Connected,
    });
    b.pump_engine().await;

    assert!(!b.manager.session(&"a".into()).unwrap().renegotiation_pending());
    assert!(b.sent().is_empty());
}

#[tokio::test]
async fn test_negotiation_needed_during_initial_offer_is_held() {
    init_tracing();

    let mut a = Peer::welcomed("a", "alice").await;
    a.new_member("b", "bob").await;
    a.sent();

    a.connector.emit(EngineEvent::NegotiationNeeded { remote: "b".into() });
    a.pump_engine().await;

    assert!(a.sent().is_empty());
    assert_eq!(a.connector.link_log("b").lock().unwrap().offers, 1);
    assert!(a.manager.session(&"b".into()).unwrap().renegotiation_pending());
}

#[tokio::test]
async fn test_remote_track_is_surfaced() {
    init_tracing();

    let (mut a, _b) = connected_pair().await;
    a.connector.emit(EngineEvent::RemoteTrack {
        remote: "b".into(),
        track_id: "audio".into(),
        kind: "audio".into(),
    });
    a.pump_engine().await;

    assert_eq!(
        a.events(),
        vec![SessionEvent::RemoteTrack {
            id: "b".into(),
            track_id: "audio".into(),
            kind: "audio".into()
        }]
    );
}
