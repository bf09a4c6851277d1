use mesh_client::{NegotiationState, SessionEvent};
use mesh_core::{ParticipantId, SdpKind, SignalMessage};

use crate::integration::init_tracing;
use crate::utils::Peer;

#[tokio::test]
async fn test_single_initiator_per_pair() {
    init_tracing();

    let mut a = Peer::welcomed("a", "alice").await;
    let mut b = Peer::welcomed("b", "bob").await;

    // b joins after a: b learns about a from the snapshot, a from NewMember.
    b.existing(&[("a", "alice")]).await;
    a.new_member("b", "bob").await;

    let from_b = b.sent();
    assert!(from_b.is_empty(), "larger id must not offer: {from_b:?}");
    assert_eq!(
        b.manager.session(&"a".into()).map(|s| s.state()),
        Some(NegotiationState::Connecting)
    );

    let from_a = a.sent();
    assert_eq!(from_a.len(), 1);
    match &from_a[0] {
        SignalMessage::Offer {
            target,
            sender,
            description,
        } => {
            assert_eq!(target, &ParticipantId::from("b"));
            assert_eq!(sender, &ParticipantId::from("a"));
            assert_eq!(description["type"], "offer");
        }
        other => panic!("expected Offer, got {other:?}"),
    }
    let session = a.manager.session(&"b".into()).unwrap();
    assert!(session.awaiting_answer());
    assert_eq!(session.local_description().map(|d| d.kind), Some(SdpKind::Offer));

    assert_eq!(
        a.events(),
        vec![SessionEvent::PeerJoined {
            id: "b".into(),
            display_name: "bob".into()
        }]
    );
}

#[tokio::test]
async fn test_own_identity_in_snapshot_is_skipped() {
    init_tracing();

    let mut a = Peer::welcomed("a", "alice").await;
    a.existing(&[("a", "alice"), ("c", "carol")]).await;

    assert_eq!(a.manager.session_count(), 1);
    assert!(a.manager.session(&"a".into()).is_none());
    assert_eq!(a.connector.link_count(), 1);
}

#[tokio::test]
async fn test_repeated_membership_notice_keeps_session() {
    init_tracing();

    let mut a = Peer::welcomed("a", "alice").await;
    a.new_member("b", "bob").await;
    a.sent();

    a.new_member("b", "bob").await;
    assert!(a.sent().is_empty());
    assert_eq!(a.connector.link_count(), 1);
    assert_eq!(a.connector.link_log("b").lock().unwrap().offers, 1);
}
