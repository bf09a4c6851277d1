use mesh_core::{EnvelopeKind, NegotiationEnvelope, ParticipantId, SignalMessage};
use serde_json::json;

use crate::integration::{create_test_room, init_tracing};
use crate::utils::{CapturedSignal, collect_signals, expect_quiet, forward, join};

#[tokio::test]
async fn test_forward_to_member() {
    init_tracing();

    let (room_tx, mut signal_rx, _signaling) = create_test_room();

    join(&room_tx, "id1", "alice").await.unwrap();
    join(&room_tx, "id2", "bob").await.unwrap();
    collect_signals(&mut signal_rx, 3).await.unwrap();

    let offer = NegotiationEnvelope {
        kind: EnvelopeKind::Offer,
        sender: "id1".into(),
        target: "id2".into(),
        payload: json!({"type": "offer", "sdp": "v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\n"}),
    };
    forward(&room_tx, "id1", offer.clone()).await.unwrap();

    let signals = collect_signals(&mut signal_rx, 1).await.unwrap();
    assert_eq!(
        signals,
        vec![CapturedSignal::Sent {
            to: ParticipantId::from("id2"),
            msg: SignalMessage::from(offer),
        }]
    );
    expect_quiet(&mut signal_rx).await.unwrap();
}

#[tokio::test]
async fn test_rapid_candidates_keep_order() {
    init_tracing();

    let (room_tx, mut signal_rx, _signaling) = create_test_room();

    join(&room_tx, "id1", "alice").await.unwrap();
    join(&room_tx, "id2", "bob").await.unwrap();
    collect_signals(&mut signal_rx, 3).await.unwrap();

    for i in 0..20 {
        let candidate = NegotiationEnvelope {
            kind: EnvelopeKind::Candidate,
            sender: "id2".into(),
            target: "id1".into(),
            payload: json!({"candidate": format!("candidate:{i}")}),
        };
        forward(&room_tx, "id2", candidate).await.unwrap();
    }

    let signals = collect_signals(&mut signal_rx, 20).await.unwrap();
    for (i, signal) in signals.iter().enumerate() {
        let CapturedSignal::Sent {
            msg: SignalMessage::IceCandidate { candidate, .. },
            ..
        } = signal
        else {
            panic!("unexpected signal {:?}", signal);
        };
        assert_eq!(candidate["candidate"], format!("candidate:{i}"));
    }
}
